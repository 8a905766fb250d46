//! Shared response envelope types for API handlers.
//!
//! Every list endpoint returns the [`Paginated`] envelope:
//! `{ "count", "next", "previous", "results" }`.

use axum::http::Uri;
use byeolpedia_core::listing::PAGE_PARAM;
use byeolpedia_core::pagination::PageInfo;
use byeolpedia_db::listing::Page;
use serde::Serialize;

use crate::error::AppResult;

/// Page-number pagination envelope.
///
/// `next` and `previous` are the request path and query string with the
/// `page` parameter replaced, or `null` at either end.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> Paginated<T> {
    /// Wrap a fetched page, converting each row into its response shape.
    ///
    /// Fails with `Invalid page` (404) if `page` lies beyond the last page.
    pub fn from_page<R>(page: Page<R>, current: i64, uri: &Uri) -> AppResult<Self>
    where
        R: Into<T>,
    {
        let info = PageInfo::new(current, page.count)?;
        Ok(Self {
            count: page.count,
            next: info.has_next.then(|| page_link(uri, Some(current + 1))),
            // Page 1 is addressed without a `page` parameter.
            previous: info
                .has_previous
                .then(|| page_link(uri, (current > 2).then_some(current - 1))),
            results: page.items.into_iter().map(Into::into).collect(),
        })
    }
}

/// Rebuild `uri` with its `page` parameter set to `page`, or removed when
/// `page` is `None`. Other parameters keep their original encoding and order.
fn page_link(uri: &Uri, page: Option<i64>) -> String {
    let page_param = page.map(|p| format!("{PAGE_PARAM}={p}"));
    let mut params: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some(PAGE_PARAM))
        .collect();

    if let Some(param) = &page_param {
        params.push(param);
    }

    if params.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::AppError;

    fn page(count: i64) -> Page<i64> {
        Page {
            count,
            items: vec![1, 2, 3],
        }
    }

    #[test]
    fn first_page_links_forward_only() {
        let uri: Uri = "/api/catalog/groups/?group_type=solo".parse().unwrap();
        let body = Paginated::<i64>::from_page(page(45), 1, &uri).unwrap();
        assert_eq!(
            body.next.as_deref(),
            Some("/api/catalog/groups/?group_type=solo&page=2")
        );
        assert_eq!(body.previous, None);
    }

    #[test]
    fn second_page_links_back_without_page_param() {
        let uri: Uri = "/api/catalog/groups/?page=2&search=red%20velvet".parse().unwrap();
        let body = Paginated::<i64>::from_page(page(45), 2, &uri).unwrap();
        assert_eq!(body.previous.as_deref(), Some("/api/catalog/groups/?search=red%20velvet"));
        assert_eq!(
            body.next.as_deref(),
            Some("/api/catalog/groups/?search=red%20velvet&page=3")
        );
    }

    #[test]
    fn last_page_links_backward_only() {
        let uri: Uri = "/api/catalog/groups/?page=3".parse().unwrap();
        let body = Paginated::<i64>::from_page(page(45), 3, &uri).unwrap();
        assert_eq!(body.next, None);
        assert_eq!(body.previous.as_deref(), Some("/api/catalog/groups/?page=2"));
    }

    #[test]
    fn page_past_the_end_is_rejected() {
        let uri: Uri = "/api/catalog/groups/?page=9".parse().unwrap();
        assert_matches!(
            Paginated::<i64>::from_page(page(45), 9, &uri),
            Err(AppError::Core(_))
        );
    }
}
