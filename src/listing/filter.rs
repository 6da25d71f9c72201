//! Predicate composition for author and book listings.
//!
//! Criteria arrive as loosely-typed query parameters. They are coerced here
//! into typed criteria (blank or malformed values become absent) and then
//! rendered as bound SQL predicates joined with `AND`.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

/// Criteria accepted by the author listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorCriteria {
    pub search: Option<String>,
}

impl AuthorCriteria {
    pub fn from_params(search: Option<&str>) -> Self {
        Self {
            search: non_blank(search),
        }
    }
}

/// Criteria accepted by the book listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCriteria {
    pub search: Option<String>,
    pub author_id: Option<i64>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl BookCriteria {
    pub fn from_params(
        search: Option<&str>,
        author_id: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
    ) -> Self {
        Self {
            search: non_blank(search),
            author_id: parse_lenient(author_id),
            min_price: parse_lenient(min_price),
            max_price: parse_lenient(max_price),
        }
    }

    /// Criteria restricted to the books of one author
    pub fn for_author(author_id: i64) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }
}

/// A single restriction on a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `authors.first_name` or `authors.last_name` contains the term
    AuthorNameContains(String),
    /// `books.title` or the related author's name contains the term
    TitleOrAuthorNameContains(String),
    AuthorIs(i64),
    PriceAtLeast(Decimal),
    PriceAtMost(Decimal),
}

impl Predicate {
    fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::AuthorNameContains(term) => {
                let pattern = like_pattern(term);
                qb.push("(authors.first_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR authors.last_name ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
            Predicate::TitleOrAuthorNameContains(term) => {
                let pattern = like_pattern(term);
                qb.push("(books.title ILIKE ")
                    .push_bind(pattern.clone())
                    .push(
                        " OR EXISTS (SELECT 1 FROM authors search_author \
                         WHERE search_author.id = books.author_id \
                         AND (search_author.first_name ILIKE ",
                    )
                    .push_bind(pattern.clone())
                    .push(" OR search_author.last_name ILIKE ")
                    .push_bind(pattern)
                    .push(")))");
            }
            Predicate::AuthorIs(author_id) => {
                qb.push("books.author_id = ").push_bind(*author_id);
            }
            Predicate::PriceAtLeast(min) => {
                qb.push("books.price >= ").push_bind(*min);
            }
            Predicate::PriceAtMost(max) => {
                qb.push("books.price <= ").push_bind(*max);
            }
        }
    }
}

/// Conjunction of predicates applied to a base listing query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn for_authors(criteria: &AuthorCriteria) -> Self {
        let mut predicates = Vec::new();
        if let Some(ref search) = criteria.search {
            predicates.push(Predicate::AuthorNameContains(search.clone()));
        }
        Self { predicates }
    }

    pub fn for_books(criteria: &BookCriteria) -> Self {
        let mut predicates = Vec::new();
        if let Some(ref search) = criteria.search {
            predicates.push(Predicate::TitleOrAuthorNameContains(search.clone()));
        }
        if let Some(author_id) = criteria.author_id {
            predicates.push(Predicate::AuthorIs(author_id));
        }
        if let Some(min) = criteria.min_price {
            predicates.push(Predicate::PriceAtLeast(min));
        }
        if let Some(max) = criteria.max_price {
            predicates.push(Predicate::PriceAtMost(max));
        }
        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Append ` WHERE p1 AND p2 ...`; nothing when no predicate is present
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(qb);
        }
    }
}

/// Trimmed term with NUL bytes removed; Postgres text cannot hold them.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.replace('\0', ""))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_lenient<T: FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|s| s.trim().parse().ok())
}

/// Unanchored `ILIKE` pattern with the wildcard characters of `term` escaped
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
