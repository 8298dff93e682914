// Query vocabulary for listing visits

use std::str::FromStr;

/// Completion-status filter for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    /// True when a record with this completion flag passes the filter
    pub fn matches(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !completed,
            StatusFilter::Completed => completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!("unknown status filter: {other} (expected all, pending or completed)")),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Pending => write!(f, "pending"),
            StatusFilter::Completed => write!(f, "completed"),
        }
    }
}

/// Sort order for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Case-insensitive lexicographic by name, ascending
    Name,
    /// Calendar date ascending; unparseable dates sort before valid ones
    Date,
    /// Pending before completed, stable within ties
    Status,
    /// Keep store iteration order
    #[default]
    Unsorted,
}

impl SortKey {
    /// Total conversion: any unrecognized key means no reordering
    pub fn from_key(s: &str) -> Self {
        match s {
            "name" => SortKey::Name,
            "date" => SortKey::Date,
            "status" => SortKey::Status,
            _ => SortKey::Unsorted,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Date => write!(f, "date"),
            SortKey::Status => write!(f, "status"),
            SortKey::Unsorted => write!(f, "unsorted"),
        }
    }
}

/// Parameters for one query: filter, search, sort
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub status: StatusFilter,
    /// Case-insensitive name-contains match; empty matches everything
    pub search: String,
    pub sort: SortKey,
}

impl QueryParams {
    pub fn new(status: StatusFilter, search: &str, sort: SortKey) -> Self {
        Self {
            status,
            search: search.to_string(),
            sort,
        }
    }
}
