//! The operation a row asks for.

use std::fmt;

/// A calendar operation requested by a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Delete,
}

impl Action {
    /// Status label written back after the action succeeds.
    pub fn status_label(self) -> &'static str {
        match self {
            Action::Add => "Added",
            Action::Update => "Updated",
            Action::Delete => "Deleted",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Action::Add => "Add",
            Action::Update => "Update",
            Action::Delete => "Delete",
        };
        write!(f, "{tag}")
    }
}

/// Contents of a row's action cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCell {
    Empty,
    Known(Action),
    Unrecognized(String),
}

impl ActionCell {
    /// Tags match exactly, so "add" or "ADD" are unrecognized.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" => ActionCell::Empty,
            "Add" => ActionCell::Known(Action::Add),
            "Update" => ActionCell::Known(Action::Update),
            "Delete" => ActionCell::Known(Action::Delete),
            other => ActionCell::Unrecognized(other.to_string()),
        }
    }
}
