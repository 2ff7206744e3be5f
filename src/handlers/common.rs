use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

/// Bosses listed per page
pub const BOSSES_PER_PAGE: u64 = 12;

#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
}

impl PaginationParams {
    /// Requested page, 1-based. Missing, unparseable or non-positive values mean page 1.
    pub fn page(&self) -> u64 {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => match raw.parse::<u64>() {
                Ok(page) if page >= 1 => page,
                _ => {
                    tracing::warn!("Cannot parse pager param {:?}", raw);
                    1
                }
            },
        }
    }
}

/// Page arithmetic for an index view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    pub total_entries: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total_entries: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
            total_entries,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_entries.div_ceil(self.per_page)
    }

    /// Zero-based page index as used by the database paginator
    pub fn page_index(&self) -> u64 {
        self.page - 1
    }

    /// Saturates for absurd page numbers
    pub fn offset(&self) -> u64 {
        self.page_index().saturating_mul(self.per_page)
    }

    /// True when the requested page lies past the last populated one
    pub fn is_out_of_range(&self) -> bool {
        self.page > 1 && self.page > self.total_pages()
    }

    pub fn previous_page(&self) -> Option<u64> {
        (self.page > 1).then(|| (self.page - 1).min(self.total_pages().max(1)))
    }

    pub fn next_page(&self) -> Option<u64> {
        (self.page < self.total_pages()).then_some(self.page + 1)
    }
}

/// 302 Found
pub fn found(uri: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, uri.to_string())]).into_response()
}

/// 303 See Other, used after successful mutations
pub fn see_other(uri: &str) -> Response {
    Redirect::to(uri).into_response()
}

/// 307 Temporary Redirect, used when a looked-up resource is missing
pub fn temporary(uri: &str) -> Response {
    Redirect::temporary(uri).into_response()
}
