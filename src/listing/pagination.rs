//! Page slicing and the `data`/`links`/`meta` envelope

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use utoipa::ToSchema;

use crate::models::{author::AuthorResponse, book::BookResponse};

pub const DEFAULT_PER_PAGE: i64 = 15;
pub const MAX_PER_PAGE: i64 = 100;

/// Page size bounds, configurable under `[pagination]`
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_per_page: i64,
    pub max_per_page: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

/// Requested slice of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Coerce raw query values. Missing, non-numeric or non-positive values
    /// take the defaults; `per_page` is capped at `limits.max_per_page`.
    pub fn from_params(page: Option<&str>, per_page: Option<&str>, limits: PageLimits) -> Self {
        let page = positive(page).unwrap_or(1);
        let per_page = positive(per_page)
            .unwrap_or(limits.default_per_page)
            .min(limits.max_per_page)
            .max(1);
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn push_limit_offset(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" LIMIT ")
            .push_bind(self.limit())
            .push(" OFFSET ")
            .push_bind(self.offset());
    }
}

fn positive(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// Request path and the query parameters to carry into navigation links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    path: String,
    params: Vec<String>,
}

impl PageUrl {
    pub fn new(path: &str, query: Option<&str>) -> Self {
        let params = query
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| pair.split('=').next() != Some("page"))
            .map(String::from)
            .collect();
        Self {
            path: path.to_string(),
            params,
        }
    }

    pub fn for_page(&self, page: i64) -> String {
        let mut url = format!("{}?", self.path);
        for param in &self.params {
            url.push_str(param);
            url.push('&');
        }
        url.push_str(&format!("page={}", page));
        url
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageMeta {
    pub current_page: i64,
    pub per_page: i64,
    /// Number of records matching the filters
    pub total: i64,
    pub last_page: i64,
    /// 1-based position of the first record of the page
    pub from: Option<i64>,
    /// 1-based position of the last record of the page
    pub to: Option<i64>,
    pub path: String,
}

/// Paginated response envelope
#[derive(Debug, Serialize, ToSchema)]
#[aliases(AuthorPage = Page<AuthorResponse>, BookPage = Page<BookResponse>)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub data: Vec<T>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(data: Vec<T>, total: i64, request: &PageRequest, url: &PageUrl) -> Self {
        let total = total.max(0);
        let last_page = last_page(total, request.per_page);
        let current_page = request.page;

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + data.len() as i64 - 1))
        };

        let links = PageLinks {
            first: url.for_page(1),
            last: url.for_page(last_page),
            prev: (current_page > 1).then(|| url.for_page(current_page - 1)),
            next: (current_page < last_page).then(|| url.for_page(current_page + 1)),
        };

        Self {
            data,
            links,
            meta: PageMeta {
                current_page,
                per_page: request.per_page,
                total,
                last_page,
                from,
                to,
                path: url.path.clone(),
            },
        }
    }
}

fn last_page(total: i64, per_page: i64) -> i64 {
    ((total + per_page - 1) / per_page).max(1)
}
