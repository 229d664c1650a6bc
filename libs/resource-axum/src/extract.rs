//! Typed extractor for list-endpoint negotiation.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use resource_core::{
    clamp_limit, registry, ListQuery, PaginationParams, ResourceModel, SortableField,
};

use crate::error::ApiError;
use crate::params::ListParams;

/// Validated list-request negotiation for the model `M`.
///
/// Resolves the raw query against `M`'s memoized schema: projection paths
/// and sort terms arrive validated, the pagination strategy is selected, and
/// the limit is clamped into the model's window. Handlers never see raw
/// strings; a request outside the derived sets is rejected before the
/// handler runs.
#[derive(Debug)]
pub struct ResourceQuery<M: ResourceModel> {
    pub query: ListQuery,
    _model: PhantomData<fn() -> M>,
}

impl<M: ResourceModel> ResourceQuery<M> {
    pub fn into_inner(self) -> ListQuery {
        self.query
    }
}

impl<M, S> FromRequestParts<S> for ResourceQuery<M>
where
    M: ResourceModel,
    S: Send + Sync,
{
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let raw = ListParams::from_query(parts.uri.query().unwrap_or(""))?;
            let schema = registry::resolve::<M>()?;

            // Alias terms canonicalize to the field path backends key by.
            let mut fields = Vec::with_capacity(raw.fields.len());
            for name in &raw.fields {
                fields.push(schema.fields.resolve(name)?.name.clone());
            }

            let mut sorting: Vec<SortableField> = Vec::with_capacity(raw.sorting.len());
            for term in &raw.sorting {
                sorting.push(schema.sorting.parse(term)?);
            }

            let limit = clamp_limit(raw.limit, schema.limits)?;
            let pagination = match raw.pagination() {
                PaginationParams::Cursor { next, .. } => PaginationParams::Cursor {
                    limit: Some(limit),
                    next,
                },
                PaginationParams::Offset { offset, .. } => PaginationParams::Offset {
                    limit: Some(limit),
                    offset,
                },
            };

            let mut query = ListQuery::new(pagination).with_sorting(sorting);
            if !fields.is_empty() {
                query = query.with_fields(fields);
            }
            Ok(Self {
                query,
                _model: PhantomData,
            })
        }
    }
}
