//! Pagination helpers
//!
//! Turns raw query parameters into a page window and sort specification,
//! and derives count-based page metadata.

use serde::Serialize;
use serde_json::{Map, Value};

/// Page size used when `limit` is absent or invalid
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Column used when `sortName` is absent or not sortable
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Sort direction, descending unless `sort=asc`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order
    Asc,
    /// Descending order
    Desc,
}

impl SortDirection {
    /// SQL keyword for the direction
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Page window and sort specification for a list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of rows returned
    pub limit: i64,
    /// Requested page, 1-based
    pub page: i64,
    /// Rows skipped before the page starts
    pub skip: i64,
    /// Whitelisted sort column
    pub sort_column: &'static str,
    /// Sort direction
    pub sort_direction: SortDirection,
}

impl Pagination {
    /// Compute the page window from raw query parameters
    ///
    /// `limit`, `page`, `sortName` and `sort` are all optional; absent or
    /// invalid values fall back to defaults. Sort columns are resolved
    /// against a fixed whitelist, never taken verbatim from input.
    pub fn from_params(params: &Map<String, Value>) -> Self {
        let limit = match param_i64(params, "limit") {
            Some(l) if l >= 1 => l,
            _ => DEFAULT_PAGE_SIZE,
        };
        let page = match param_i64(params, "page") {
            Some(p) if p >= 1 => p,
            _ => 1,
        };
        // Saturate: these come straight from the query string
        let skip = page.saturating_sub(1).saturating_mul(limit);

        let sort_column = params
            .get("sortName")
            .and_then(Value::as_str)
            .and_then(sortable_column)
            .unwrap_or(DEFAULT_SORT_COLUMN);

        let sort_direction = match params.get("sort").and_then(Value::as_str) {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };

        Self {
            limit,
            page,
            skip,
            sort_column,
            sort_direction,
        }
    }
}

/// Count-derived page metadata returned with every list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total rows matching the filter
    pub total_items: i64,
    /// Total pages at the current limit
    pub total_pages: i64,
    /// Page that was returned
    pub current_page: i64,
    /// Page size that was used
    pub limit: i64,
}

impl PageInfo {
    /// Derive page metadata from a total count
    ///
    /// `limit` is at least 1 by the time it gets here; the ceiling sum
    /// saturates so an extreme limit cannot overflow.
    pub fn new(total_items: i64, limit: i64, page: i64) -> Self {
        Self {
            total_items,
            total_pages: total_items.saturating_add(limit - 1) / limit,
            current_page: page,
            limit,
        }
    }
}

fn param_i64(params: &Map<String, Value>, key: &str) -> Option<i64> {
    match params.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn sortable_column(sort_name: &str) -> Option<&'static str> {
    match sort_name {
        "createdAt" => Some("created_at"),
        "price" => Some("price"),
        "rooms" => Some("rooms"),
        "bathrooms" => Some("bathrooms"),
        "squareMeters" => Some("square_meters"),
        "priceMeters" => Some("price_meters"),
        "propertyType" => Some("property_type"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let p = Pagination::from_params(&Map::new());
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(p.page, 1);
        assert_eq!(p.skip, 0);
        assert_eq!(p.sort_column, "created_at");
        assert_eq!(p.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_skip_arithmetic() {
        let p = Pagination::from_params(&params(&[("limit", "5"), ("page", "3")]));
        assert_eq!(p.skip, 10);

        // page 1 always starts at 0, for any limit
        for limit in ["1", "7", "100"] {
            let p = Pagination::from_params(&params(&[("limit", limit), ("page", "1")]));
            assert_eq!(p.skip, 0);
        }
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let p = Pagination::from_params(&params(&[
            ("limit", "zero"),
            ("page", "-2"),
            ("sortName", "offerer"),
            ("sort", "upwards"),
        ]));
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(p.page, 1);
        // Non-sortable names fall back instead of reaching the SQL layer
        assert_eq!(p.sort_column, "created_at");
        assert_eq!(p.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_specification() {
        let p = Pagination::from_params(&params(&[("sortName", "price"), ("sort", "asc")]));
        assert_eq!(p.sort_column, "price");
        assert_eq!(p.sort_direction, SortDirection::Asc);
        assert_eq!(p.sort_direction.as_sql(), "ASC");
    }

    #[test]
    fn test_numeric_params_accepted() {
        let mut m = Map::new();
        m.insert("limit".to_string(), json!(25));
        m.insert("page".to_string(), json!(2));
        let p = Pagination::from_params(&m);
        assert_eq!(p.limit, 25);
        assert_eq!(p.skip, 25);
    }

    #[test]
    fn test_extreme_window_values_saturate() {
        // Query parameters are attacker-controlled; the window math must
        // not overflow for any page/limit combination.
        let p = Pagination::from_params(&params(&[
            ("page", &i64::MAX.to_string()),
            ("limit", "2"),
        ]));
        assert_eq!(p.skip, i64::MAX);

        let p = Pagination::from_params(&params(&[
            ("page", "2"),
            ("limit", &i64::MAX.to_string()),
        ]));
        assert_eq!(p.skip, i64::MAX);
    }

    #[test]
    fn test_page_info_extreme_limit_saturates() {
        let info = PageInfo::new(2, i64::MAX, 1);
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.total_items, 2);

        let info = PageInfo::new(i64::MAX, 1, 1);
        assert_eq!(info.total_pages, i64::MAX);
    }

    #[test]
    fn test_page_info_ceiling() {
        assert_eq!(PageInfo::new(0, 10, 1).total_pages, 0);
        assert_eq!(PageInfo::new(1, 10, 1).total_pages, 1);
        assert_eq!(PageInfo::new(10, 10, 1).total_pages, 1);
        assert_eq!(PageInfo::new(11, 10, 2).total_pages, 2);
        assert_eq!(PageInfo::new(25, 10, 3).total_pages, 3);
    }

    #[test]
    fn test_page_info_echoes_window() {
        let info = PageInfo::new(42, 5, 4);
        assert_eq!(info.total_items, 42);
        assert_eq!(info.current_page, 4);
        assert_eq!(info.limit, 5);
        assert_eq!(info.total_pages, 9);
    }
}
