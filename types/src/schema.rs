//! Declarative validation for the task form.
//!
//! A [`Schema`] maps each [`Field`] to an ordered list of [`Rule`]s. The first
//! failing rule of a field produces that field's message.

use std::collections::BTreeMap;

use crate::TaskDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Title,
    Description,
}

impl Field {
    /// Form order.
    pub const ALL: [Self; 3] = [Self::FullName, Self::Title, Self::Description];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::Title => "Title",
            Self::Description => "Description",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::FullName => Self::Title,
            Self::Title => Self::Description,
            Self::Description => Self::FullName,
        }
    }

    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::FullName => Self::Description,
            Self::Title => Self::FullName,
            Self::Description => Self::Title,
        }
    }
}

/// A predicate paired with the message shown when it fails.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub check: fn(&str) -> bool,
    pub message: &'static str,
}

impl Rule {
    #[must_use]
    pub const fn new(check: fn(&str) -> bool, message: &'static str) -> Self {
        Self { check, message }
    }

    #[must_use]
    pub const fn required(message: &'static str) -> Self {
        Self::new(is_present, message)
    }
}

fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Per-field validation messages. Empty when the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn set(&mut self, field: Field, message: Option<&'static str>) {
        match message {
            Some(message) => {
                self.0.insert(field, message);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<(Field, Vec<Rule>)>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[must_use]
    pub fn field(mut self, field: Field, rules: Vec<Rule>) -> Self {
        self.fields.push((field, rules));
        self
    }

    /// The task form schema: every text field is required.
    #[must_use]
    pub fn task() -> Self {
        Self::new()
            .field(
                Field::FullName,
                vec![Rule::required("Full Name is required")],
            )
            .field(Field::Title, vec![Rule::required("Title is required")])
            .field(
                Field::Description,
                vec![Rule::required("Description is required")],
            )
    }

    /// First failing rule's message for `field`, if any.
    #[must_use]
    pub fn validate_field(&self, field: Field, value: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .filter(|(f, _)| *f == field)
            .flat_map(|(_, rules)| rules.iter())
            .find(|rule| !(rule.check)(value))
            .map(|rule| rule.message)
    }

    #[must_use]
    pub fn validate(&self, draft: &TaskDraft) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for (field, _) in &self.fields {
            errors.set(*field, self.validate_field(*field, draft.value(*field)));
        }
        errors
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::task()
    }
}
