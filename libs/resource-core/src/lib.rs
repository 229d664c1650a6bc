//! Transport-agnostic protocol layer for declarative REST resource binding.
//!
//! Given a repository for an entity type, this crate defines everything the
//! binding boundary negotiates per request: projection field sets, sortable
//! field sets, cursor-based pagination, subset projection, and the storage
//! port any backend must satisfy. HTTP routing and concrete storage engines
//! live elsewhere; this crate only computes and validates.

pub mod cursor;
pub mod error;
pub mod fields;
pub mod model;
pub mod page;
pub mod pagination;
pub mod projection;
pub mod repository;
pub mod schema;

pub use error::Error;
pub use fields::{SortDir, SortableField, DEFAULT_SORT_DIRECTION};
pub use model::{entity_id, FieldDescriptor, FieldKind, ResourceModel};
pub use page::{Page, PageCursor};
pub use pagination::{
    clamp_limit, compare_values, cursor_page, render_cursor, CompareOp, Cursor, CursorClause,
    CursorEntry, CursorInfo, FieldOrdering, PageLimits, PaginationParams,
};
pub use projection::{subset_fields, Projection, ProjectionNode};
pub use repository::{BulkItem, BulkResponse, ListQuery, Repository, RepositoryConfig};
pub use schema::{derive_schema, registry, FieldEntry, FieldSet, ModelSchema, SortSet};
