use std::fmt;

/// Identity of a task record.
///
/// json-server assigns string ids to records it creates, while ids generated
/// by this client are millisecond timestamps. Both shapes round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(u64),
    Text(String),
}

impl TaskId {
    /// Client-side id derived from a wall-clock timestamp.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::Number(millis)
    }

    /// Path segment form used in `/tasks/{id}`.
    #[must_use]
    pub fn as_path_segment(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
