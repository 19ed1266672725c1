//! Row-level query statements rendered as REST requests.
//!
//! DESIGN
//! ======
//! Statements are plain builders that render to an [`HttpRequest`]; the
//! [`crate::Backend`] adds credentials and decodes responses. Filters follow
//! the `column=operator.value` convention, and values inside list/`or`
//! expressions are double-quoted when they contain reserved characters so a
//! search term like `a,b` cannot break out of the expression.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use std::fmt::Display;

use serde::Serialize;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::transport::{Body, HttpRequest, Method};

const OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";
const RESERVED: &[char] = &[',', '.', ':', '(', ')', '"', '\\', ' '];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// How many rows a [`Select`] expects back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cardinality {
    #[default]
    Many,
    /// Exactly one row; zero rows is a `PGRST116` error.
    One,
    /// Zero or one row, read as a list and unwrapped client-side.
    MaybeOne,
}

/// Quote a value for use inside `in.(...)` or `or=(...)` expressions.
#[must_use]
pub fn quote_value(value: &str) -> String {
    if value.contains(RESERVED) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        value.to_owned()
    }
}

/// Read the exact total from a `Content-Range` header (`0-9/120`, `*/0`).
#[must_use]
pub fn content_range_total(header: &str) -> Option<u64> {
    header.rsplit('/').next().and_then(|total| total.trim().parse().ok())
}

fn strip_whitespace(columns: &str) -> String {
    columns.chars().filter(|c| !c.is_whitespace()).collect()
}

fn render_url(config: &BackendConfig, path: &str, params: &[(String, String)]) -> String {
    let base = config.rest_url(path);
    match url::Url::parse(&base) {
        Ok(mut url) => {
            if !params.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (k, v) in params {
                    pairs.append_pair(k, v);
                }
            }
            url.into()
        }
        Err(_) => base,
    }
}

macro_rules! filter_methods {
    () => {
        fn push_filter(mut self, column: &str, op: &str, value: impl Display) -> Self {
            self.filters.push((column.to_owned(), format!("{op}.{value}")));
            self
        }

        #[must_use]
        pub fn eq(self, column: &str, value: impl Display) -> Self {
            self.push_filter(column, "eq", value)
        }

        #[must_use]
        pub fn neq(self, column: &str, value: impl Display) -> Self {
            self.push_filter(column, "neq", value)
        }

        #[must_use]
        pub fn gt(self, column: &str, value: impl Display) -> Self {
            self.push_filter(column, "gt", value)
        }

        #[must_use]
        pub fn gte(self, column: &str, value: impl Display) -> Self {
            self.push_filter(column, "gte", value)
        }

        #[must_use]
        pub fn lt(self, column: &str, value: impl Display) -> Self {
            self.push_filter(column, "lt", value)
        }

        #[must_use]
        pub fn lte(self, column: &str, value: impl Display) -> Self {
            self.push_filter(column, "lte", value)
        }

        /// Case-insensitive pattern match; `*` is the wildcard.
        #[must_use]
        pub fn ilike(self, column: &str, pattern: &str) -> Self {
            self.push_filter(column, "ilike", pattern)
        }

        #[must_use]
        pub fn is_null(self, column: &str) -> Self {
            self.push_filter(column, "is", "null")
        }

        /// Column value is one of `values`.
        #[must_use]
        pub fn in_list<I, V>(self, column: &str, values: I) -> Self
        where
            I: IntoIterator<Item = V>,
            V: Display,
        {
            let list = values
                .into_iter()
                .map(|v| quote_value(&v.to_string()))
                .collect::<Vec<_>>()
                .join(",");
            self.push_filter(column, "in", format!("({list})"))
        }
    };
}

// =============================================================================
// SELECT
// =============================================================================

/// A read against one table (or view).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Select {
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    or_groups: Vec<String>,
    order: Vec<String>,
    limit: Option<usize>,
    offset: Option<usize>,
    cardinality: Cardinality,
    count_only: bool,
}

impl Select {
    #[must_use]
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_owned(),
            columns: "*".to_owned(),
            filters: Vec::new(),
            or_groups: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
            cardinality: Cardinality::Many,
            count_only: false,
        }
    }

    filter_methods!();

    /// Column list, including embedded resources such as `*,categories(id,name)`.
    #[must_use]
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = strip_whitespace(columns);
        self
    }

    /// Match rows where any of `columns` contains `term` (case-insensitive).
    ///
    /// A blank term adds no filter.
    #[must_use]
    pub fn or_ilike_any(mut self, columns: &[&str], term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() || columns.is_empty() {
            return self;
        }
        let pattern = quote_value(&format!("*{term}*"));
        let group = columns
            .iter()
            .map(|c| format!("{c}.ilike.{pattern}"))
            .collect::<Vec<_>>()
            .join(",");
        self.or_groups.push(format!("({group})"));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(format!("{column}.{}", direction.as_str()));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Inclusive row range, as used for offset pagination.
    #[must_use]
    pub fn range(mut self, from: usize, to: usize) -> Self {
        self.offset = Some(from);
        self.limit = Some(to.saturating_sub(from) + 1);
        self
    }

    /// Expect exactly one row back as a JSON object.
    #[must_use]
    pub fn single(mut self) -> Self {
        self.cardinality = Cardinality::One;
        self
    }

    /// Expect at most one row.
    #[must_use]
    pub fn maybe_single(mut self) -> Self {
        self.cardinality = Cardinality::MaybeOne;
        self
    }

    /// Ask only for the exact row count; no rows are returned.
    #[must_use]
    pub fn count_only(mut self) -> Self {
        self.count_only = true;
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_owned(), self.columns.clone())];
        params.extend(self.filters.iter().cloned());
        for group in &self.or_groups {
            params.push(("or".to_owned(), group.clone()));
        }
        if !self.order.is_empty() {
            params.push(("order".to_owned(), self.order.join(",")));
        }
        let limit = if self.count_only { Some(0) } else { self.limit };
        if let Some(limit) = limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|_| !self.count_only) {
            params.push(("offset".to_owned(), offset.to_string()));
        }
        params
    }

    /// Render the GET request (credentials are added by the caller).
    #[must_use]
    pub fn to_request(&self, config: &BackendConfig) -> HttpRequest {
        let mut request = HttpRequest::new(Method::Get, render_url(config, &self.table, &self.params()));
        if self.count_only {
            request = request.header("Prefer", "count=exact");
        }
        if self.cardinality == Cardinality::One {
            request = request.header("Accept", OBJECT_MEDIA_TYPE);
        }
        request
    }
}

// =============================================================================
// INSERT
// =============================================================================

/// Insert (or upsert) one or more rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insert {
    table: String,
    body: String,
    on_conflict: Option<String>,
    upsert: bool,
    ignore_duplicates: bool,
    returning: bool,
}

impl Insert {
    /// Insert a single row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Decode`] if the row cannot be serialized.
    pub fn new<T: Serialize + ?Sized>(table: &str, row: &T) -> Result<Self, BackendError> {
        let body = serde_json::to_string(row).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Self {
            table: table.to_owned(),
            body,
            on_conflict: None,
            upsert: false,
            ignore_duplicates: false,
            returning: false,
        })
    }

    /// Upsert on the given conflict columns (`"user_id,prompt_id"`).
    #[must_use]
    pub fn upsert(mut self, on_conflict: &str, ignore_duplicates: bool) -> Self {
        self.upsert = true;
        self.on_conflict = Some(strip_whitespace(on_conflict));
        self.ignore_duplicates = ignore_duplicates;
        self
    }

    /// Ask for the written rows back.
    #[must_use]
    pub fn returning(mut self) -> Self {
        self.returning = true;
        self
    }

    #[must_use]
    pub fn to_request(&self, config: &BackendConfig) -> HttpRequest {
        let mut params = Vec::new();
        if let Some(cols) = &self.on_conflict {
            params.push(("on_conflict".to_owned(), cols.clone()));
        }
        let mut prefer = vec![return_preference(self.returning)];
        if self.upsert {
            prefer.push(if self.ignore_duplicates {
                "resolution=ignore-duplicates"
            } else {
                "resolution=merge-duplicates"
            });
        }
        let mut request = HttpRequest::new(Method::Post, render_url(config, &self.table, &params))
            .header("Prefer", prefer.join(","));
        request.body = Some(Body::Json(self.body.clone()));
        request
    }
}

fn return_preference(returning: bool) -> &'static str {
    if returning { "return=representation" } else { "return=minimal" }
}

// =============================================================================
// UPDATE / DELETE
// =============================================================================

/// Patch every row matching the filters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    table: String,
    body: String,
    filters: Vec<(String, String)>,
    returning: bool,
}

impl Update {
    /// # Errors
    ///
    /// Returns [`BackendError::Decode`] if the patch cannot be serialized.
    pub fn new<T: Serialize + ?Sized>(table: &str, patch: &T) -> Result<Self, BackendError> {
        let body = serde_json::to_string(patch).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Self { table: table.to_owned(), body, filters: Vec::new(), returning: false })
    }

    filter_methods!();

    #[must_use]
    pub fn returning(mut self) -> Self {
        self.returning = true;
        self
    }

    #[must_use]
    pub fn to_request(&self, config: &BackendConfig) -> HttpRequest {
        let mut request = HttpRequest::new(Method::Patch, render_url(config, &self.table, &self.filters))
            .header("Prefer", return_preference(self.returning));
        request.body = Some(Body::Json(self.body.clone()));
        request
    }
}

/// Delete every row matching the filters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delete {
    table: String,
    filters: Vec<(String, String)>,
}

impl Delete {
    #[must_use]
    pub fn new(table: &str) -> Self {
        Self { table: table.to_owned(), filters: Vec::new() }
    }

    filter_methods!();

    #[must_use]
    pub fn to_request(&self, config: &BackendConfig) -> HttpRequest {
        HttpRequest::new(Method::Delete, render_url(config, &self.table, &self.filters))
            .header("Prefer", return_preference(false))
    }
}

/// A write statement the [`crate::Backend`] can execute.
pub trait Statement {
    fn to_request(&self, config: &BackendConfig) -> HttpRequest;
}

impl Statement for Insert {
    fn to_request(&self, config: &BackendConfig) -> HttpRequest {
        Insert::to_request(self, config)
    }
}

impl Statement for Update {
    fn to_request(&self, config: &BackendConfig) -> HttpRequest {
        Update::to_request(self, config)
    }
}

impl Statement for Delete {
    fn to_request(&self, config: &BackendConfig) -> HttpRequest {
        Delete::to_request(self, config)
    }
}
