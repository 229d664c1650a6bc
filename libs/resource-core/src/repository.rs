//! Storage port consumed by the binding layer, per-entity configuration,
//! and bulk operation results.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::fields::SortableField;
use crate::model::{entity_id, ResourceModel};
use crate::page::Page;
use crate::pagination::{PageLimits, PaginationParams};

/// Everything a list call carries after negotiation: pagination strategy,
/// validated projection paths, validated sorting, and an opaque per-model
/// filter the backend interprets.
#[derive(Debug, Clone)]
pub struct ListQuery<F = ()> {
    pub pagination: PaginationParams,
    pub fields: Option<Vec<String>>,
    pub sorting: Vec<SortableField>,
    pub filtering: Option<F>,
}

impl<F> ListQuery<F> {
    pub fn new(pagination: PaginationParams) -> Self {
        Self {
            pagination,
            fields: None,
            sorting: Vec::new(),
            filtering: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_sorting(mut self, sorting: Vec<SortableField>) -> Self {
        self.sorting = sorting;
        self
    }

    pub fn with_filtering(mut self, filtering: F) -> Self {
        self.filtering = Some(filtering);
        self
    }
}

/// Per-entity-type static configuration, computed once at registration and
/// immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub fields_include: Option<HashSet<String>>,
    pub fields_exclude: Option<HashSet<String>>,
    pub sort_include: Option<HashSet<String>>,
    pub sort_exclude: Option<HashSet<String>>,
    pub default_limit: Option<u64>,
    pub max_limit: Option<u64>,
}

impl RepositoryConfig {
    /// Compose a child config over its parent: a field set on the child
    /// wins, otherwise the parent's value flows through.
    pub fn merge(child: Self, parent: Self) -> Self {
        Self {
            fields_include: child.fields_include.or(parent.fields_include),
            fields_exclude: child.fields_exclude.or(parent.fields_exclude),
            sort_include: child.sort_include.or(parent.sort_include),
            sort_exclude: child.sort_exclude.or(parent.sort_exclude),
            default_limit: child.default_limit.or(parent.default_limit),
            max_limit: child.max_limit.or(parent.max_limit),
        }
    }

    pub fn limits(&self) -> PageLimits {
        let defaults = PageLimits::default();
        PageLimits {
            default: self.default_limit.unwrap_or(defaults.default),
            max: self.max_limit.unwrap_or(defaults.max),
        }
    }
}

/// Per-item outcome of a bulk operation, tagged on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[serde(tag = "status")]
pub enum BulkItem {
    #[serde(rename = "OK")]
    Ok { id: String },
    #[serde(rename = "ERROR")]
    Error { message: String },
}

/// Ordered per-item results of a bulk operation. Partial success is
/// expected; one failed item never aborts its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
pub struct BulkResponse {
    pub items: Vec<BulkItem>,
    pub has_errors: bool,
}

impl BulkResponse {
    pub fn push_ok(&mut self, id: impl Into<String>) {
        self.items.push(BulkItem::Ok { id: id.into() });
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.items.push(BulkItem::Error {
            message: message.into(),
        });
        self.has_errors = true;
    }

    pub fn from_results(results: impl IntoIterator<Item = Result<String, Error>>) -> Self {
        let mut response = Self::default();
        for result in results {
            match result {
                Ok(id) => response.push_ok(id),
                Err(err) => response.push_error(err.to_string()),
            }
        }
        response
    }
}

/// Storage port every backend satisfies.
///
/// The pagination engine supplies resolved ordering and parsed cursors
/// through [`ListQuery`]; turning them into a backend query is the
/// repository's responsibility. Bulk defaults aggregate the unary
/// operations item by item.
#[async_trait]
pub trait Repository<M: ResourceModel>: Send + Sync {
    type Key: Send + Sync + ToString;
    type Filter: Send + Sync;

    async fn get(&self, id: &Self::Key, fields: Option<&[String]>) -> Result<Option<M>, Error>;

    async fn list(&self, query: &ListQuery<Self::Filter>) -> Result<Page<M>, Error>;

    async fn add(&self, entity: M) -> Result<M, Error>;

    async fn update(&self, entity: M) -> Result<Option<M>, Error>;

    async fn delete(&self, id: &Self::Key) -> Result<(), Error>;

    async fn bulk_create(&self, entities: Vec<M>) -> Result<BulkResponse, Error> {
        let mut response = BulkResponse::default();
        for entity in entities {
            match self.add(entity).await {
                Ok(created) => response.push_ok(entity_id(&created)),
                Err(err) => response.push_error(err.to_string()),
            }
        }
        debug!(
            resource = M::RESOURCE_NAME,
            items = response.items.len(),
            has_errors = response.has_errors,
            "bulk create finished"
        );
        Ok(response)
    }

    async fn bulk_update(&self, entities: Vec<M>) -> Result<BulkResponse, Error> {
        let mut response = BulkResponse::default();
        for entity in entities {
            let id = entity_id(&entity);
            match self.update(entity).await {
                Ok(Some(updated)) => response.push_ok(entity_id(&updated)),
                Ok(None) => {
                    response.push_error(Error::not_found(M::RESOURCE_NAME, id).to_string());
                }
                Err(err) => response.push_error(err.to_string()),
            }
        }
        debug!(
            resource = M::RESOURCE_NAME,
            items = response.items.len(),
            has_errors = response.has_errors,
            "bulk update finished"
        );
        Ok(response)
    }

    async fn bulk_delete(&self, ids: Vec<Self::Key>) -> Result<BulkResponse, Error> {
        let mut response = BulkResponse::default();
        for id in ids {
            match self.delete(&id).await {
                Ok(()) => response.push_ok(id.to_string()),
                Err(err) => response.push_error(err.to_string()),
            }
        }
        debug!(
            resource = M::RESOURCE_NAME,
            items = response.items.len(),
            has_errors = response.has_errors,
            "bulk delete finished"
        );
        Ok(response)
    }
}
