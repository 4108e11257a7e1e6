//! Filters, search, and ordering for task listings.

use super::{Task, TaskPriority, TaskStatus};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Column a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Task deadline. Missing deadlines compare greater than any date.
    Deadline,
    /// Task priority by rank (low, medium, high).
    Priority,
}

/// One component of a listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    field: SortField,
    descending: bool,
}

impl SortKey {
    /// Ascending order on `field`.
    #[must_use]
    pub const fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    /// Descending order on `field`.
    #[must_use]
    pub const fn descending(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parses `deadline`, `-deadline`, `priority`, or `-priority`.
    #[must_use]
    pub fn parse(term: &str) -> Option<Self> {
        let trimmed = term.trim();
        let (descending, name) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));
        let field = match name {
            "deadline" => SortField::Deadline,
            "priority" => SortField::Priority,
            _ => return None,
        };
        Some(Self { field, descending })
    }

    /// Returns the sorted column.
    #[must_use]
    pub const fn field(self) -> SortField {
        self.field
    }

    /// Returns `true` for descending order.
    #[must_use]
    pub const fn is_descending(self) -> bool {
        self.descending
    }

    fn compare(self, left: &Task, right: &Task) -> Ordering {
        let ordering = match self.field {
            SortField::Deadline => compare_deadlines(left.deadline(), right.deadline()),
            SortField::Priority => left.priority().rank().cmp(&right.priority().rank()),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

fn compare_deadlines(left: Option<DateTime<Utc>>, right: Option<DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A task listing scoped to one requesting user.
///
/// The requester scope is mandatory: a query can never return tasks owned by
/// anyone else, whatever filters are applied on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    requester: UserId,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    owner: Option<UserId>,
    search_terms: Vec<String>,
    ordering: Vec<SortKey>,
}

impl TaskQuery {
    /// Default order of the HTTP listing: earliest deadline first.
    pub const LISTING_DEFAULT: SortKey = SortKey::ascending(SortField::Deadline);

    /// Natural order of tasks: latest deadline first.
    pub const NATURAL_ORDER: SortKey = SortKey::descending(SortField::Deadline);

    /// Creates a listing query using the HTTP listing default order.
    #[must_use]
    pub fn for_requester(requester: UserId) -> Self {
        Self {
            requester,
            status: None,
            priority: None,
            owner: None,
            search_terms: Vec::new(),
            ordering: vec![Self::LISTING_DEFAULT],
        }
    }

    /// Creates a query for all of a user's tasks in natural order.
    #[must_use]
    pub fn natural_order(requester: UserId) -> Self {
        Self {
            ordering: vec![Self::NATURAL_ORDER],
            ..Self::for_requester(requester)
        }
    }

    /// Restricts results to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts results to one owner, on top of the requester scope.
    #[must_use]
    pub const fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Adds free-text search. Every whitespace- or comma-separated term must
    /// appear, case-insensitively, in the title or the description.
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        self.search_terms = search
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|term| !term.is_empty())
            .map(str::to_owned)
            .collect();
        self
    }

    /// Applies a comma-separated ordering parameter such as
    /// `-priority,deadline`.
    ///
    /// Unknown terms are ignored. When no term is recognised the current
    /// ordering stays in place.
    #[must_use]
    pub fn with_ordering(mut self, raw: &str) -> Self {
        let keys: Vec<SortKey> = raw.split(',').filter_map(SortKey::parse).collect();
        if !keys.is_empty() {
            self.ordering = keys;
        }
        self
    }

    /// Returns the requesting user.
    #[must_use]
    pub const fn requester(&self) -> UserId {
        self.requester
    }

    /// Returns the status filter.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the priority filter.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the owner filter.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Returns the search terms.
    #[must_use]
    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    /// Returns the sort keys, most significant first.
    #[must_use]
    pub fn ordering(&self) -> &[SortKey] {
        &self.ordering
    }

    /// Returns `true` when `task` satisfies scope, filters, and search.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.is_owned_by(self.requester)
            && self.owner.is_none_or(|owner| task.is_owned_by(owner))
            && self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && self.search_terms.iter().all(|term| {
                let needle = term.to_lowercase();
                task.title().as_str().to_lowercase().contains(&needle)
                    || task.description().to_lowercase().contains(&needle)
            })
    }

    /// Compares two tasks by the query ordering, breaking ties by id.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        self.ordering
            .iter()
            .map(|key| key.compare(left, right))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| left.id().cmp(&right.id()))
    }
}
