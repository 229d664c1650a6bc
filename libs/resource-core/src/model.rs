use serde_json::Value;

/// Shape of a single entity field as exposed to projection and sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Wire alias; `None` means the field name is also the wire name.
    pub alias: Option<String>,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    /// Nested composite carrying its own field set.
    Composite(Vec<FieldDescriptor>),
}

impl FieldDescriptor {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            kind: FieldKind::Scalar,
        }
    }

    pub fn composite(name: impl Into<String>, children: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            kind: FieldKind::Composite(children),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn wire_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn children(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            FieldKind::Composite(children) => Some(children),
            FieldKind::Scalar => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, FieldKind::Composite(_))
    }
}

/// An entity type bindable to REST resources.
///
/// The core never inspects entity internals beyond this contract: a field
/// descriptor set for schema derivation, identifier fields for tie-break
/// ordering, and field values serializable for cursor rendering.
pub trait ResourceModel: Send + Sync + 'static {
    /// Singular resource name used in error messages.
    const RESOURCE_NAME: &'static str;

    fn fields() -> Vec<FieldDescriptor>;

    /// Fields guaranteed unique, appended as tie-breakers to any user sort.
    fn id_fields() -> &'static [&'static str];

    /// Value of a (possibly dotted) field path on this instance.
    fn field_value(&self, path: &str) -> Option<Value>;
}

/// Render an entity's identifier from its id fields.
///
/// Composite identifiers join their parts with `:`; the common single-field
/// case yields the bare value.
pub fn entity_id<M: ResourceModel>(entity: &M) -> String {
    let parts: Vec<String> = M::id_fields()
        .iter()
        .map(|field| match entity.field_value(field) {
            Some(Value::String(text)) => text,
            Some(value) => value.to_string(),
            None => String::new(),
        })
        .collect();
    parts.join(":")
}
