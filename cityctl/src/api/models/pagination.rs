//! Shared pagination types for API query parameters.
//!
//! List endpoints use offset-based pagination with `skip` and `limit`. Values are parsed
//! leniently: anything missing, unparsable or out of range falls back to the default instead of
//! rejecting the request.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default number of items to return per page.
pub const DEFAULT_LIMIT: i64 = 10;

/// Offset-based pagination parameters.
///
/// - `skip`: number of items to skip (default 0, negative or unparsable → 0)
/// - `limit`: maximum items to return (default 10, below 1 or unparsable → 10)
///
/// There is no upper bound on `limit`.
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct Pagination {
    /// Number of items to skip (default: 0)
    #[param(value_type = Option<i64>, default = 0, minimum = 0)]
    #[schema(value_type = Option<i64>)]
    pub skip: Option<String>,

    /// Maximum number of items to return (default: 10)
    #[param(value_type = Option<i64>, default = 10, minimum = 1)]
    #[schema(value_type = Option<i64>)]
    pub limit: Option<String>,
}

impl Pagination {
    /// Get the skip value, falling back to 0 when missing, negative or unparsable.
    #[inline]
    pub fn skip(&self) -> i64 {
        parse(self.skip.as_deref()).filter(|skip| *skip >= 0).unwrap_or(0)
    }

    /// Get the limit value, falling back to DEFAULT_LIMIT when missing, below 1 or unparsable.
    #[inline]
    pub fn limit(&self) -> i64 {
        parse(self.limit.as_deref()).filter(|limit| *limit >= 1).unwrap_or(DEFAULT_LIMIT)
    }

    /// Get both skip and limit as a tuple, useful for destructuring.
    #[inline]
    pub fn params(&self) -> (i64, i64) {
        (self.skip(), self.limit())
    }
}

fn parse(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// Page window and total reported alongside paginated data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    /// Maximum items returned per page
    pub limit: i64,
    /// Number of items skipped
    pub skip: i64,
    /// Total number of items matching the query (before pagination)
    pub total: i64,
}

/// Envelope for list endpoints: the items of the current page plus page metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T: ToSchema> {
    /// Always `success`
    pub status: String,
    /// The items for the current page
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T: ToSchema> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(data: Vec<T>, total: i64, skip: i64, limit: i64) -> Self {
        Self {
            status: super::responses::STATUS_SUCCESS.to_string(),
            data,
            meta: PageMeta { limit, skip, total },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::translations::TranslationResponse;

    fn pagination(skip: Option<&str>, limit: Option<&str>) -> Pagination {
        Pagination {
            skip: skip.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_default_values() {
        let p = Pagination::default();
        assert_eq!(p.skip(), 0);
        assert_eq!(p.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_invalid_limit_falls_back_to_default() {
        for raw in ["0", "-5", "abc", "", "1.5"] {
            assert_eq!(pagination(None, Some(raw)).limit(), DEFAULT_LIMIT, "limit={raw:?}");
        }
    }

    #[test]
    fn test_invalid_skip_falls_back_to_zero() {
        for raw in ["-10", "ten", ""] {
            assert_eq!(pagination(Some(raw), None).skip(), 0, "skip={raw:?}");
        }
    }

    #[test]
    fn test_valid_values_pass_through_uncapped() {
        let p = pagination(Some("100"), Some("1000"));
        assert_eq!(p.params(), (100, 1000));

        let p = pagination(Some(" 3 "), Some("1"));
        assert_eq!(p.params(), (3, 1));
    }

    #[test]
    fn test_paginated_response_shape() {
        let translation = TranslationResponse {
            id: 1,
            city_id: 5,
            lang: "EN".to_string(),
            name: "Springfield".to_string(),
        };
        let response = PaginatedResponse::new(vec![translation], 42, 0, 2);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "data": [{"id": 1, "city_id": 5, "lang": "EN", "name": "Springfield"}],
                "meta": {"limit": 2, "skip": 0, "total": 42}
            })
        );
    }
}
