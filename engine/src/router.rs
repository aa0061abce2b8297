//! Route table and the authentication guard.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    Login,
    /// The Task Manager page. Requires a session token.
    #[default]
    Home,
}

impl Route {
    /// Resolve a path. Anything that is not `/login` falls through to `/`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        match path.trim().trim_end_matches('/') {
            "/login" | "login" => Self::Login,
            _ => Self::Home,
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Home => "/",
        }
    }

    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where navigation to `requested` actually lands.
#[must_use]
pub fn guard(requested: Route, authenticated: bool) -> Route {
    if requested.is_protected() && !authenticated {
        Route::Login
    } else {
        requested
    }
}
