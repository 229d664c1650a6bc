//! Cursor pagination engine.
//!
//! Stateless per-request computation: resolve the total field ordering,
//! parse an incoming cursor against it, describe the "strictly after the
//! cursor tuple" predicate for the backend, and render the next cursor from
//! the last row of a page. The engine performs no I/O and holds no state
//! between requests.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::cursor;
use crate::error::Error;
use crate::fields::{SortDir, SortableField, DEFAULT_SORT_DIRECTION};
use crate::model::ResourceModel;
use crate::page::{Page, PageCursor};

/// Default and maximum page sizes applied to list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default: u64,
    pub max: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: 10,
            max: 50,
        }
    }
}

/// Clamp a requested limit into the configured window.
///
/// A missing limit falls back to the default; zero is rejected; anything
/// above the maximum is capped.
pub fn clamp_limit(requested: Option<u64>, limits: PageLimits) -> Result<u64, Error> {
    let limit = requested.unwrap_or(limits.default);
    if limit == 0 {
        return Err(Error::InvalidLimit);
    }
    Ok(limit.min(limits.max))
}

/// How a list request paginates. The `type` tag discriminates strategies on
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaginationParams {
    Offset {
        limit: Option<u64>,
        offset: Option<u64>,
    },
    Cursor {
        limit: Option<u64>,
        next: Option<String>,
    },
}

impl PaginationParams {
    pub fn limit(&self) -> Option<u64> {
        match self {
            PaginationParams::Offset { limit, .. } | PaginationParams::Cursor { limit, .. } => {
                *limit
            }
        }
    }
}

/// Request-scoped cursor descriptor, computed once per list call.
///
/// `reversed` is carried for parity with the wire contract; backward
/// pagination is not implemented, so it is always false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorInfo {
    pub reversed: bool,
    pub cursor: Option<String>,
    pub limit: Option<u64>,
}

impl CursorInfo {
    pub fn from_params(params: &PaginationParams) -> Self {
        match params {
            PaginationParams::Cursor { limit, next } => Self {
                reversed: false,
                cursor: next.clone(),
                limit: *limit,
            },
            PaginationParams::Offset { limit, .. } => Self {
                reversed: false,
                cursor: None,
                limit: *limit,
            },
        }
    }
}

/// Fully resolved sort precedence: the user's sort followed by identifier
/// tie-breakers, each field at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOrdering(Vec<SortableField>);

impl FieldOrdering {
    /// Resolve the complete ordering for a request.
    ///
    /// Identifier fields not named by the user are appended with the last
    /// user field's direction, or descending when the user gave no sort.
    /// The tie-break is unconditional: the resolved ordering never compares
    /// two rows equal, which cursor pagination requires to neither skip nor
    /// repeat rows.
    pub fn resolve(sorting: &[SortableField], id_fields: &[impl AsRef<str>]) -> Self {
        let default_dir = sorting
            .last()
            .map(SortableField::dir)
            .unwrap_or(DEFAULT_SORT_DIRECTION);
        let mut fields: Vec<SortableField> = sorting.to_vec();
        for id_field in id_fields {
            let id_field = id_field.as_ref();
            if !fields.iter().any(|field| field.name() == id_field) {
                fields.push(SortableField::new(id_field, default_dir));
            }
        }
        Self(fields)
    }

    pub fn fields(&self) -> &[SortableField] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortableField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One parsed cursor entry: a resolved ordering field and its boundary value.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorEntry {
    pub field: SortableField,
    pub value: Value,
}

/// Parsed cursor: one boundary value per entry of the resolved ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor(Vec<CursorEntry>);

impl Cursor {
    /// Decode a token against the resolved ordering.
    ///
    /// A length mismatch is a hard error: the token was minted for a
    /// different ordering configuration and cannot resume this one.
    pub fn parse(token: &str, ordering: &FieldOrdering) -> Result<Self, Error> {
        let raw = cursor::decode(token)?;
        if raw.len() != ordering.len() {
            return Err(Error::CursorLengthMismatch {
                expected: ordering.len(),
                got: raw.len(),
            });
        }
        let entries = ordering
            .iter()
            .zip(raw)
            .map(|(field, text)| {
                let value = serde_json::from_str(&text).map_err(|_| Error::CursorInvalidToken)?;
                Ok(CursorEntry {
                    field: field.clone(),
                    value,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self(entries))
    }

    pub fn entries(&self) -> &[CursorEntry] {
        &self.0
    }

    /// Describe the "rows strictly after this cursor" predicate as an
    /// OR-chain a backend translates into its query syntax: clause `i`
    /// holds fields `0..i` equal and compares field `i` in its direction
    /// (ascending compares greater, descending less).
    pub fn clauses(&self) -> Vec<CursorClause> {
        (0..self.0.len())
            .map(|i| {
                let equal = self.0[..i]
                    .iter()
                    .map(|entry| (entry.field.name().to_owned(), entry.value.clone()))
                    .collect();
                let entry = &self.0[i];
                let op = match entry.field.dir() {
                    SortDir::Asc => CompareOp::Gt,
                    SortDir::Desc => CompareOp::Lt,
                };
                CursorClause {
                    equal,
                    field: entry.field.name().to_owned(),
                    op,
                    value: entry.value.clone(),
                }
            })
            .collect()
    }

    /// Reference evaluation of the predicate described by [`Cursor::clauses`]:
    /// whether the row exposed through `resolve` sorts strictly after this
    /// cursor. Backends with native query syntax never call this; it pins the
    /// comparison semantics and serves in-memory repositories.
    pub fn admits(&self, resolve: impl Fn(&str) -> Option<Value>) -> bool {
        for entry in &self.0 {
            let actual = match resolve(entry.field.name()) {
                Some(value) => value,
                None => return false,
            };
            let ord = match compare_values(&actual, &entry.value) {
                Some(ord) => ord,
                None => {
                    warn!(field = entry.field.name(), "cursor value type mismatch");
                    return false;
                }
            };
            let after = match entry.field.dir() {
                SortDir::Asc => Ordering::Greater,
                SortDir::Desc => Ordering::Less,
            };
            if ord == after {
                return true;
            }
            if ord != Ordering::Equal {
                return false;
            }
        }
        // Equal on every field: the cursor row itself.
        false
    }
}

/// Comparison applied to the first unequal field of a cursor clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Lt,
}

/// One disjunct of the lexicographic cursor predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorClause {
    pub equal: Vec<(String, Value)>,
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

/// Order over the JSON scalars cursors carry. Nulls sort first; `None` means
/// the two values are of incomparable types.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(xi), Some(yi)) => Some(xi.cmp(&yi)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Render the continuation token from the last returned row.
pub fn render_cursor<M: ResourceModel>(
    item: &M,
    ordering: &FieldOrdering,
) -> Result<String, Error> {
    let mut values = Vec::with_capacity(ordering.len());
    for field in ordering.iter() {
        let value = item.field_value(field.name()).unwrap_or(Value::Null);
        let text =
            serde_json::to_string(&value).map_err(|err| Error::repository(err.to_string()))?;
        values.push(text);
    }
    Ok(cursor::encode(&values))
}

/// Assemble a cursor page from the rows a backend returned for `limit`.
///
/// A full page carries the next cursor rendered from its last row; a short
/// page is terminal and carries none.
pub fn cursor_page<M: ResourceModel>(
    rows: Vec<M>,
    limit: u64,
    ordering: &FieldOrdering,
) -> Result<Page<M>, Error> {
    let next = match rows.last() {
        Some(last) if rows.len() as u64 == limit => {
            Some(PageCursor::Token(render_cursor(last, ordering)?))
        }
        _ => None,
    };
    Ok(Page::new(rows, next))
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod pagination_tests;
