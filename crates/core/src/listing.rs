//! Declarative list specifications and query-string parsing.
//!
//! Each list endpoint declares a [`ListSpec`]: which query parameters filter
//! which columns, which columns `search` covers, and which columns `ordering`
//! may name. [`ListSpec::parse`] turns raw query parameters into a typed
//! [`ListQuery`] that the repository layer renders into SQL.
//!
//! Parameter conventions:
//!
//! | Parameter        | Meaning                                              |
//! |------------------|------------------------------------------------------|
//! | `<field>`        | exact match                                          |
//! | `<prefix>_year`  | exact calendar year of a date column                 |
//! | `<prefix>_after` | date on or after (inclusive)                         |
//! | `<prefix>_before`| date on or before (inclusive)                        |
//! | `min_<field>`    | numeric lower bound (inclusive)                      |
//! | `max_<field>`    | numeric upper bound (inclusive)                      |
//! | `search`         | case-insensitive substring; every term must match    |
//! | `ordering`       | comma-separated fields, `-` prefix for descending    |
//! | `page`           | 1-based page number                                  |

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::catalog::validate_choice;
use crate::error::CoreError;
use crate::pagination::{parse_page, PAGE_SIZE};
use crate::types::DbId;

pub const SEARCH_PARAM: &str = "search";
pub const ORDERING_PARAM: &str = "ordering";
pub const PAGE_PARAM: &str = "page";

/// How a raw parameter value is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Id,
    Bool,
    Choice(&'static [&'static str]),
    Date,
    Decimal,
}

/// How a parsed value is compared against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Exact,
    Year,
    Gte,
    Lte,
}

/// One filterable query parameter.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub param: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    pub lookup: Lookup,
}

impl FilterField {
    pub const fn exact(param: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            param,
            column,
            kind,
            lookup: Lookup::Exact,
        }
    }

    pub const fn year(param: &'static str, column: &'static str) -> Self {
        Self {
            param,
            column,
            kind: FieldKind::Date,
            lookup: Lookup::Year,
        }
    }

    pub const fn after(param: &'static str, column: &'static str) -> Self {
        Self {
            param,
            column,
            kind: FieldKind::Date,
            lookup: Lookup::Gte,
        }
    }

    pub const fn before(param: &'static str, column: &'static str) -> Self {
        Self {
            param,
            column,
            kind: FieldKind::Date,
            lookup: Lookup::Lte,
        }
    }

    pub const fn min(param: &'static str, column: &'static str) -> Self {
        Self {
            param,
            column,
            kind: FieldKind::Decimal,
            lookup: Lookup::Gte,
        }
    }

    pub const fn max(param: &'static str, column: &'static str) -> Self {
        Self {
            param,
            column,
            kind: FieldKind::Decimal,
            lookup: Lookup::Lte,
        }
    }

    fn parse(&self, raw: &str) -> Result<FilterValue, CoreError> {
        let invalid = |message: &str| CoreError::invalid_field(self.param, message);

        if self.lookup == Lookup::Year {
            return raw
                .parse::<i32>()
                .map(FilterValue::Integer)
                .map_err(|_| invalid("Enter a whole number."));
        }

        match self.kind {
            FieldKind::Text => Ok(FilterValue::Text(raw.to_string())),
            FieldKind::Id => DbId::parse_str(raw)
                .map(FilterValue::Id)
                .map_err(|_| invalid("Enter a valid UUID.")),
            FieldKind::Bool => match raw {
                "true" | "True" | "1" => Ok(FilterValue::Bool(true)),
                "false" | "False" | "0" => Ok(FilterValue::Bool(false)),
                _ => Err(invalid("Enter 'true' or 'false'.")),
            },
            FieldKind::Choice(choices) => {
                validate_choice(self.param, raw, choices)?;
                Ok(FilterValue::Text(raw.to_string()))
            }
            FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(FilterValue::Date)
                .map_err(|_| invalid("Enter a valid date (YYYY-MM-DD).")),
            FieldKind::Decimal => Decimal::from_str(raw)
                .map(FilterValue::Decimal)
                .map_err(|_| invalid("Enter a number.")),
        }
    }
}

/// A parsed filter value, ready to bind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Id(DbId),
    Bool(bool),
    Integer(i32),
    Date(NaiveDate),
    Decimal(Decimal),
}

/// A single `column <lookup> value` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: &'static str,
    pub lookup: Lookup,
    pub value: FilterValue,
}

/// A field that may appear in the `ordering` parameter.
#[derive(Debug, Clone, Copy)]
pub struct OrderField {
    pub param: &'static str,
    pub column: &'static str,
}

/// A resolved `ORDER BY` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub column: &'static str,
    pub descending: bool,
}

impl Ordering {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

impl OrderField {
    pub const fn new(param: &'static str, column: &'static str) -> Self {
        Self { param, column }
    }
}

/// Declared filtering, search and ordering capabilities of one list endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    pub filters: &'static [FilterField],
    pub search: &'static [&'static str],
    pub ordering: &'static [OrderField],
    /// Ordering applied when the request names no valid field. May use
    /// columns that clients cannot order by themselves.
    pub default_ordering: &'static [Ordering],
    /// Appended to every ordering so pages are stable.
    pub tiebreaker: &'static str,
}

impl ListSpec {
    /// Parse raw query parameters into a [`ListQuery`].
    ///
    /// Unknown parameters and unknown ordering fields are ignored. Empty
    /// filter values are treated as absent.
    pub fn parse(&self, params: &HashMap<String, String>) -> Result<ListQuery, CoreError> {
        let page = parse_page(params.get(PAGE_PARAM).map(String::as_str))?;

        let mut conditions = Vec::new();
        for field in self.filters {
            let Some(raw) = params.get(field.param) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            conditions.push(Condition {
                column: field.column,
                lookup: field.lookup,
                value: field.parse(raw)?,
            });
        }

        let search_terms = match params.get(SEARCH_PARAM) {
            Some(raw) if !self.search.is_empty() => split_search_terms(raw),
            _ => Vec::new(),
        };

        let mut ordering = params
            .get(ORDERING_PARAM)
            .map(|raw| self.resolve_ordering(raw))
            .unwrap_or_default();
        if ordering.is_empty() {
            ordering = self.default_ordering.to_vec();
        }

        Ok(ListQuery {
            conditions,
            search_columns: self.search,
            search_terms,
            ordering,
            tiebreaker: self.tiebreaker,
            page,
        })
    }

    fn resolve_ordering(&self, raw: &str) -> Vec<Ordering> {
        raw.split(',')
            .filter_map(|term| {
                let term = term.trim();
                let (name, descending) = match term.strip_prefix('-') {
                    Some(rest) => (rest, true),
                    None => (term, false),
                };
                self.ordering
                    .iter()
                    .find(|f| f.param == name)
                    .map(|f| Ordering {
                        column: f.column,
                        descending,
                    })
            })
            .collect()
    }
}

/// Split a search string into terms on whitespace and commas.
fn split_search_terms(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A fully parsed list request.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub conditions: Vec<Condition>,
    pub search_columns: &'static [&'static str],
    pub search_terms: Vec<String>,
    pub ordering: Vec<Ordering>,
    pub tiebreaker: &'static str,
    pub page: i64,
}

impl ListQuery {
    /// Restrict the query to rows whose `column` equals `id` (parent scoping
    /// for sub-listings, owner scoping for per-user lists).
    pub fn scoped(mut self, column: &'static str, id: DbId) -> Self {
        self.conditions.insert(
            0,
            Condition {
                column,
                lookup: Lookup::Exact,
                value: FilterValue::Id(id),
            },
        );
        self
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }
}
