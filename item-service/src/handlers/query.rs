//! Query parameters of the list endpoints
//!
//! `sort` may repeat and keeps its order, which rules out a plain
//! `Query<struct>`; the raw pairs are read and interpreted here.
//!
//! ```text
//! GET /items?sort=name&sort=asc
//! GET /items/paging?page=2&size=25&sort=createTime,desc&sort=name,asc
//! ```

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::error::{Error, Result};
use crate::repository::{PageRequest, SortSpec};
use crate::state::AppState;

/// Sort and paging parameters with configured defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Parsed `sort` tokens, or the configured default sort
    pub sort: SortSpec,
    /// Zero-based page index, 0 when absent
    pub page: i64,
    /// Page size, the configured default when absent
    pub size: i64,
}

impl ListParams {
    /// Interpret raw query pairs
    pub fn from_pairs(
        pairs: &[(String, String)],
        default_sort: &SortSpec,
        default_size: i64,
    ) -> Result<Self> {
        let sort_tokens: Vec<&str> = pairs
            .iter()
            .filter(|(key, _)| key == "sort")
            .map(|(_, value)| value.as_str())
            .collect();

        let sort = if sort_tokens.is_empty() {
            default_sort.clone()
        } else {
            SortSpec::parse(sort_tokens.as_slice())?
        };

        Ok(Self {
            sort,
            page: integer_param(pairs, "page")?.unwrap_or(0),
            size: integer_param(pairs, "size")?.unwrap_or(default_size),
        })
    }

    /// Validated page request
    pub fn page_request(&self) -> Result<PageRequest> {
        Ok(PageRequest::new(self.page, self.size, self.sort.clone())?)
    }
}

fn integer_param(pairs: &[(String, String)], name: &str) -> Result<Option<i64>> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| {
            value.trim().parse::<i64>().map_err(|_| {
                Error::BadRequest(format!("{} must be an integer (got '{}')", name, value))
            })
        })
        .transpose()
}

impl FromRequestParts<AppState> for ListParams {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::BadRequest(e.body_text()))?;

        Self::from_pairs(&pairs, state.default_sort(), state.default_page_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{SortDirection, SortField, SortOrder};

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn default_sort() -> SortSpec {
        SortSpec::by(SortField::Name, SortDirection::Descending)
    }

    #[test]
    fn test_defaults_applied() {
        let params = ListParams::from_pairs(&[], &default_sort(), 100).unwrap();
        assert_eq!(params.sort, default_sort());
        assert_eq!(params.page, 0);
        assert_eq!(params.size, 100);
    }

    #[test]
    fn test_two_token_sort() {
        let params = ListParams::from_pairs(
            &pairs(&[("sort", "name"), ("sort", "asc")]),
            &default_sort(),
            100,
        )
        .unwrap();
        assert_eq!(params.sort, SortSpec::by(SortField::Name, SortDirection::Ascending));
    }

    #[test]
    fn test_multi_order_sort_keeps_sequence() {
        let params = ListParams::from_pairs(
            &pairs(&[
                ("page", "1"),
                ("sort", "createTime,desc"),
                ("size", "5"),
                ("sort", "name,asc"),
            ]),
            &default_sort(),
            100,
        )
        .unwrap();

        assert_eq!(
            params.sort.orders(),
            &[
                SortOrder::desc(SortField::CreateTime),
                SortOrder::asc(SortField::Name)
            ]
        );
        assert_eq!(params.page, 1);
        assert_eq!(params.size, 5);
    }

    #[test]
    fn test_non_numeric_page_rejected() {
        let err = ListParams::from_pairs(&pairs(&[("page", "two")]), &default_sort(), 100)
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_bad_sort_rejected() {
        let err = ListParams::from_pairs(&pairs(&[("sort", "name")]), &default_sort(), 100)
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_negative_values_rejected_by_page_request() {
        let params = ListParams::from_pairs(&pairs(&[("page", "-1")]), &default_sort(), 100)
            .unwrap();
        assert!(matches!(params.page_request(), Err(Error::BadRequest(_))));

        let params = ListParams::from_pairs(&pairs(&[("size", "0")]), &default_sort(), 100)
            .unwrap();
        assert!(matches!(params.page_request(), Err(Error::BadRequest(_))));
    }
}
