//! Per-model field and sort set derivation.
//!
//! Derivation runs once per entity type at registration time and produces
//! closed value sets reused across all requests; the registry memoizes the
//! result by type identity so request handling never re-walks descriptors.

use std::collections::HashSet;

use tracing::debug;

use crate::error::Error;
use crate::fields::SortableField;
use crate::model::{FieldDescriptor, FieldKind, ResourceModel};
use crate::pagination::PageLimits;
use crate::repository::RepositoryConfig;

/// One projectable field: canonical dotted path plus its wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub wire: String,
}

/// Closed set of projectable field paths for one entity type.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    entries: Vec<FieldEntry>,
}

impl FieldSet {
    pub fn new(entries: Vec<FieldEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.resolve(raw).is_ok()
    }

    /// Resolve a requested name against the set, accepting either the
    /// canonical path or its wire alias.
    pub fn resolve(&self, raw: &str) -> Result<&FieldEntry, Error> {
        self.entries
            .iter()
            .find(|entry| entry.name == raw || entry.wire == raw)
            .ok_or_else(|| Error::UnknownField(raw.to_string()))
    }
}

/// Closed set of sortable field names for one entity type.
#[derive(Debug, Clone, Default)]
pub struct SortSet {
    entries: Vec<FieldEntry>,
}

impl SortSet {
    pub fn new(entries: Vec<FieldEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.name == raw || entry.wire == raw)
    }

    /// Parse a `name[:direction]` term and validate membership. The returned
    /// field carries the canonical name even when the term used an alias.
    pub fn parse(&self, raw: &str) -> Result<SortableField, Error> {
        let requested = SortableField::parse(raw)?;
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.name == requested.name() || entry.wire == requested.name())
            .ok_or_else(|| Error::InvalidSortField(requested.name().to_string()))?;
        Ok(SortableField::new(entry.name.clone(), requested.dir()))
    }
}

/// Derived, immutable description of one bindable entity type.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    pub fields: FieldSet,
    pub sorting: SortSet,
    pub id_fields: Vec<String>,
    pub limits: PageLimits,
}

fn collect_paths(
    fields: &[FieldDescriptor],
    include: Option<&HashSet<String>>,
    recursive: bool,
) -> Vec<FieldEntry> {
    fn walk(
        fields: &[FieldDescriptor],
        name_prefix: &str,
        wire_prefix: &str,
        recursive: bool,
        out: &mut Vec<FieldEntry>,
    ) {
        for field in fields {
            let name = if name_prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{name_prefix}.{}", field.name)
            };
            let wire = if wire_prefix.is_empty() {
                field.wire_name().to_owned()
            } else {
                format!("{wire_prefix}.{}", field.wire_name())
            };
            out.push(FieldEntry {
                name: name.clone(),
                wire: wire.clone(),
            });
            if recursive {
                if let FieldKind::Composite(children) = &field.kind {
                    walk(children, &name, &wire, recursive, out);
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(fields, "", "", recursive, &mut out);
    if let Some(include) = include {
        out.retain(|entry| include.contains(&entry.name));
    }
    out
}

/// Derive the projection and sort sets for `M` under `config`.
///
/// The include set applies during the walk; the exclude set applies after
/// and wins when both name the same field. An empty resulting set is a
/// configuration error, surfaced at registration rather than per request.
pub fn derive_schema<M: ResourceModel>(config: &RepositoryConfig) -> Result<ModelSchema, Error> {
    let fields = M::fields();

    let mut field_entries = collect_paths(&fields, config.fields_include.as_ref(), true);
    if let Some(exclude) = &config.fields_exclude {
        field_entries.retain(|entry| !exclude.contains(&entry.name));
    }
    if field_entries.is_empty() {
        return Err(Error::configuration(format!(
            "{} has no projectable fields",
            M::RESOURCE_NAME
        )));
    }

    let mut sort_entries = collect_paths(&fields, config.sort_include.as_ref(), false);
    if let Some(exclude) = &config.sort_exclude {
        sort_entries.retain(|entry| !exclude.contains(&entry.name));
    }
    if sort_entries.is_empty() {
        return Err(Error::configuration(format!(
            "{} has no sortable fields",
            M::RESOURCE_NAME
        )));
    }

    let schema = ModelSchema {
        fields: FieldSet::new(field_entries),
        sorting: SortSet::new(sort_entries),
        id_fields: M::id_fields().iter().map(|s| s.to_string()).collect(),
        limits: config.limits(),
    };
    debug!(
        resource = M::RESOURCE_NAME,
        fields = schema.fields.len(),
        sortable = schema.sorting.len(),
        "derived resource schema"
    );
    Ok(schema)
}

pub mod registry {
    //! Process-wide schema lookup keyed by entity type identity.

    use std::any::TypeId;
    use std::sync::{Arc, OnceLock};

    use dashmap::DashMap;

    use super::{derive_schema, ModelSchema};
    use crate::error::Error;
    use crate::model::ResourceModel;
    use crate::repository::RepositoryConfig;

    fn table() -> &'static DashMap<TypeId, Arc<ModelSchema>> {
        static TABLE: OnceLock<DashMap<TypeId, Arc<ModelSchema>>> = OnceLock::new();
        TABLE.get_or_init(DashMap::new)
    }

    /// Derive and memoize the schema for `M` under `config`.
    /// Re-registering replaces any previous entry.
    pub fn register<M: ResourceModel>(config: &RepositoryConfig) -> Result<Arc<ModelSchema>, Error> {
        let schema = Arc::new(derive_schema::<M>(config)?);
        table().insert(TypeId::of::<M>(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Memoized schema for `M`, derived under the default config on first use.
    pub fn resolve<M: ResourceModel>() -> Result<Arc<ModelSchema>, Error> {
        if let Some(found) = table().get(&TypeId::of::<M>()) {
            return Ok(Arc::clone(found.value()));
        }
        register::<M>(&RepositoryConfig::default())
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod schema_tests;
