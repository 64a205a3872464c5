use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tudu_core::{AppError, AppResult};

/// Sort direction of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns stable query value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort specification sent as `sort=<field>,<direction>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Wire name of the sorted field.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on a field.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Returns the query parameter value.
    #[must_use]
    pub fn to_param(&self) -> String {
        format!("{},{}", self.field, self.direction.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match value.split_once(',') {
            Some((field, direction)) => (field.trim(), direction.trim()),
            None => (value.trim(), "asc"),
        };

        if field.is_empty() {
            return Err(AppError::Validation(format!(
                "sort '{value}' must name a field"
            )));
        }

        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => {
                return Err(AppError::Validation(format!(
                    "unknown sort direction '{other}'"
                )));
            }
        };

        Ok(Self {
            field: field.to_owned(),
            direction,
        })
    }
}

/// Zero-based page request; paging is only sent together with a sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Sort order.
    pub sort: SortSpec,
}

impl PageRequest {
    /// Creates a validated page request.
    pub fn new(page: u32, size: u32, sort: SortSpec) -> AppResult<Self> {
        if size == 0 {
            return Err(AppError::Validation(
                "page size must be greater than zero".to_owned(),
            ));
        }

        Ok(Self { page, size, sort })
    }
}

/// Combined list/search request as issued by list screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Search text; blank means a plain listing.
    pub query: Option<String>,
    /// Paging and sort.
    pub paging: Option<PageRequest>,
}

impl ListQuery {
    /// Returns the trimmed search text when it is not blank.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

/// One page of a collection plus the backend's total count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<E> {
    /// Entities on this page in response order.
    pub items: Vec<E>,
    /// Total number of matching entities across all pages.
    pub total_items: u64,
}

#[cfg(test)]
mod tests {
    use super::{ListQuery, PageRequest, SortDirection, SortSpec};

    #[test]
    fn sort_parses_field_and_direction() {
        let sort = "dueDate,desc".parse::<SortSpec>();
        assert_eq!(
            sort,
            Ok(SortSpec {
                field: "dueDate".to_owned(),
                direction: SortDirection::Desc,
            })
        );
    }

    #[test]
    fn sort_defaults_to_ascending() {
        let sort = "id".parse::<SortSpec>().unwrap_or_else(|_| unreachable!());
        assert_eq!(sort.to_param(), "id,asc");
    }

    #[test]
    fn sort_rejects_unknown_direction() {
        assert!("id,sideways".parse::<SortSpec>().is_err());
        assert!(",asc".parse::<SortSpec>().is_err());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(PageRequest::new(0, 0, SortSpec::ascending("id")).is_err());
    }

    #[test]
    fn blank_search_text_is_ignored() {
        let query = ListQuery {
            query: Some("   ".to_owned()),
            paging: None,
        };
        assert_eq!(query.search_text(), None);
    }
}
