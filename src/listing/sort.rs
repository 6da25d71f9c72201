//! Sort key resolution.
//!
//! Only allow-listed keys ever reach the `ORDER BY` clause. An unknown key
//! resolves to the entity's default ordering, and every ordering ends with an
//! `id` tie-break so that pagination is stable.

use std::fmt;

use sqlx::{Postgres, QueryBuilder};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Case-insensitive; anything other than `desc` is ascending
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("desc") => Direction::Desc,
            _ => Direction::Asc,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// Sortable author fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorSort {
    FirstName,
    LastName,
    CreatedAt,
    UpdatedAt,
}

impl AuthorSort {
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "first_name" => Some(AuthorSort::FirstName),
            "last_name" => Some(AuthorSort::LastName),
            "created_at" => Some(AuthorSort::CreatedAt),
            "updated_at" => Some(AuthorSort::UpdatedAt),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            AuthorSort::FirstName => "authors.first_name",
            AuthorSort::LastName => "authors.last_name",
            AuthorSort::CreatedAt => "authors.created_at",
            AuthorSort::UpdatedAt => "authors.updated_at",
        }
    }
}

/// Sortable book fields, including the virtual `author_name` key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSort {
    Title,
    Price,
    PublicationDate,
    CreatedAt,
    UpdatedAt,
    /// Author last name, then first name (requires a join on `authors`)
    AuthorName,
}

impl BookSort {
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "title" => Some(BookSort::Title),
            "price" => Some(BookSort::Price),
            "publication_date" => Some(BookSort::PublicationDate),
            "created_at" => Some(BookSort::CreatedAt),
            "updated_at" => Some(BookSort::UpdatedAt),
            "author_name" => Some(BookSort::AuthorName),
            _ => None,
        }
    }

    fn columns(self) -> &'static [&'static str] {
        match self {
            BookSort::Title => &["books.title"],
            BookSort::Price => &["books.price"],
            BookSort::PublicationDate => &["books.publication_date"],
            BookSort::CreatedAt => &["books.created_at"],
            BookSort::UpdatedAt => &["books.updated_at"],
            BookSort::AuthorName => &["authors.last_name", "authors.first_name"],
        }
    }
}

/// One `column direction` term of an `ORDER BY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderClause {
    pub column: &'static str,
    pub direction: Direction,
}

impl OrderClause {
    const fn new(column: &'static str, direction: Direction) -> Self {
        Self { column, direction }
    }
}

/// Resolved ordering of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    clauses: Vec<OrderClause>,
    join_authors: bool,
}

impl Ordering {
    /// Default: last name, then first name, ascending
    pub fn for_authors(sort: Option<&str>, direction: Option<&str>) -> Self {
        let clauses = match sort.and_then(AuthorSort::parse) {
            Some(key) => vec![OrderClause::new(key.column(), Direction::parse(direction))],
            None => vec![
                OrderClause::new("authors.last_name", Direction::Asc),
                OrderClause::new("authors.first_name", Direction::Asc),
            ],
        };
        Self::with_tie_break(clauses, "authors.id", false)
    }

    /// Default: title ascending
    pub fn for_books(sort: Option<&str>, direction: Option<&str>) -> Self {
        let key = sort.and_then(BookSort::parse);
        let clauses = match key {
            Some(key) => {
                let direction = Direction::parse(direction);
                key.columns()
                    .iter()
                    .map(|column| OrderClause::new(*column, direction))
                    .collect()
            }
            None => vec![OrderClause::new("books.title", Direction::Asc)],
        };
        Self::with_tie_break(clauses, "books.id", key == Some(BookSort::AuthorName))
    }

    fn with_tie_break(mut clauses: Vec<OrderClause>, id_column: &'static str, join_authors: bool) -> Self {
        clauses.push(OrderClause::new(id_column, Direction::Asc));
        Self {
            clauses,
            join_authors,
        }
    }

    pub fn clauses(&self) -> &[OrderClause] {
        &self.clauses
    }

    /// Whether the base book query must be widened with a join on `authors`
    pub fn joins_authors(&self) -> bool {
        self.join_authors
    }

    pub fn push_order_by(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" ORDER BY ");
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(clause.column).push(" ").push(clause.direction);
        }
    }
}
