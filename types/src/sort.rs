//! Column sorting for the rows of the current page.

use std::cmp::Ordering;

use crate::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    FullName,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Active sort, if any. Unsorted rows keep server order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    active: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    #[must_use]
    pub fn active(&self) -> Option<(SortColumn, SortDirection)> {
        self.active
    }

    #[must_use]
    pub fn direction_of(&self, column: SortColumn) -> Option<SortDirection> {
        self.active
            .filter(|(active, _)| *active == column)
            .map(|(_, direction)| direction)
    }

    /// Clicking a column header: ascending first, then flip.
    pub fn toggle(&mut self, column: SortColumn) {
        self.active = Some(match self.direction_of(column) {
            Some(SortDirection::Ascending) => (column, SortDirection::Descending),
            Some(SortDirection::Descending) | None => (column, SortDirection::Ascending),
        });
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Borrowed view of `tasks` in display order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let mut rows: Vec<&Task> = tasks.iter().collect();
        if let Some((column, direction)) = self.active {
            rows.sort_by(|a, b| {
                let ordering = compare(column, a, b);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }
}

fn compare(column: SortColumn, a: &Task, b: &Task) -> Ordering {
    let (left, right) = match column {
        SortColumn::FullName => (&a.full_name, &b.full_name),
        SortColumn::Title => (&a.title, &b.title),
    };
    left.to_lowercase().cmp(&right.to_lowercase())
}
