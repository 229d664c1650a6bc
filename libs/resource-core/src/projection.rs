//! Subset-model projection.
//!
//! A projection spec is a nested mapping of field name to either a leaf
//! include (`1` on the wire) or a nested spec for a composite field. Keys
//! may be dotted paths into the descriptor tree. Unknown names are skipped
//! silently; the reduced descriptor set only ever narrows the source schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{FieldDescriptor, FieldKind};

/// Nested projection specification, keyed by field name or dotted path.
pub type Projection = BTreeMap<String, ProjectionNode>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectionNode {
    /// Include the named field as a whole.
    Include(u8),
    /// Recurse into a composite field with its own spec.
    Nested(Projection),
}

/// Reduce `fields` to the subset named by `projection`.
pub fn subset_fields(fields: &[FieldDescriptor], projection: &Projection) -> Vec<FieldDescriptor> {
    reduce(fields, &normalize(projection))
}

/// Rewrite dotted keys into nested specs so reduction only ever deals with
/// single-segment names. Colliding entries merge; a whole-field include
/// absorbs any nested spec for the same field.
fn normalize(projection: &Projection) -> Projection {
    let mut out = Projection::new();
    for (key, node) in projection {
        let node = match node {
            ProjectionNode::Nested(nested) => ProjectionNode::Nested(normalize(nested)),
            leaf => leaf.clone(),
        };
        let (head, entry) = match key.split_once('.') {
            None => (key.clone(), node),
            Some((head, rest)) => {
                let mut inner = Projection::new();
                inner.insert(rest.to_string(), node);
                (head.to_string(), ProjectionNode::Nested(normalize(&inner)))
            }
        };
        match out.remove(&head) {
            Some(existing) => {
                out.insert(head, merge_nodes(existing, entry));
            }
            None => {
                out.insert(head, entry);
            }
        }
    }
    out
}

fn merge_nodes(a: ProjectionNode, b: ProjectionNode) -> ProjectionNode {
    match (a, b) {
        (ProjectionNode::Nested(mut left), ProjectionNode::Nested(right)) => {
            for (key, node) in right {
                match left.remove(&key) {
                    Some(existing) => {
                        left.insert(key, merge_nodes(existing, node));
                    }
                    None => {
                        left.insert(key, node);
                    }
                }
            }
            ProjectionNode::Nested(left)
        }
        (ProjectionNode::Include(i), _) | (_, ProjectionNode::Include(i)) => {
            ProjectionNode::Include(i)
        }
    }
}

fn reduce(fields: &[FieldDescriptor], projection: &Projection) -> Vec<FieldDescriptor> {
    let mut out = Vec::new();
    for (key, node) in projection {
        let Some(descriptor) = fields
            .iter()
            .find(|field| field.name == *key || field.wire_name() == key)
        else {
            // Unknown names are skipped, not rejected.
            continue;
        };
        match node {
            ProjectionNode::Include(_) => out.push(descriptor.clone()),
            ProjectionNode::Nested(nested) => match &descriptor.kind {
                FieldKind::Composite(children) => out.push(FieldDescriptor {
                    name: descriptor.name.clone(),
                    alias: descriptor.alias.clone(),
                    kind: FieldKind::Composite(reduce(children, nested)),
                }),
                // A nested spec against a scalar keeps the scalar.
                FieldKind::Scalar => out.push(descriptor.clone()),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::scalar("flat"),
            FieldDescriptor::composite(
                "inner",
                vec![FieldDescriptor::composite(
                    "inner2",
                    vec![FieldDescriptor::scalar("field")],
                )],
            ),
            FieldDescriptor::scalar("renamed").with_alias("wire_name"),
        ]
    }

    fn paths(fields: &[FieldDescriptor]) -> Vec<String> {
        fn walk(fields: &[FieldDescriptor], prefix: &str, out: &mut Vec<String>) {
            for field in fields {
                let path = if prefix.is_empty() {
                    field.name.clone()
                } else {
                    format!("{prefix}.{}", field.name)
                };
                out.push(path.clone());
                if let Some(children) = field.children() {
                    walk(children, &path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(fields, "", &mut out);
        out
    }

    fn include() -> ProjectionNode {
        ProjectionNode::Include(1)
    }

    #[test]
    fn scalar_leaf_includes_the_field() {
        let projection = Projection::from([("flat".to_string(), include())]);
        assert_eq!(paths(&subset_fields(&model(), &projection)), vec!["flat"]);
    }

    #[test]
    fn dotted_leaf_keeps_the_spine() {
        let projection = Projection::from([("inner.inner2".to_string(), include())]);
        let reduced = subset_fields(&model(), &projection);
        let reduced_paths = paths(&reduced);
        assert!(reduced_paths.contains(&"inner.inner2".to_string()));
        assert!(!reduced_paths.contains(&"flat".to_string()));
    }

    #[test]
    fn nested_specs_narrow_composites() {
        let projection = Projection::from([(
            "inner".to_string(),
            ProjectionNode::Nested(Projection::from([("inner2".to_string(), include())])),
        )]);
        let reduced = subset_fields(&model(), &projection);
        assert_eq!(
            paths(&reduced),
            vec!["inner", "inner.inner2", "inner.inner2.field"]
        );
    }

    #[test]
    fn unknown_names_are_skipped_silently() {
        let projection = Projection::from([
            ("flat".to_string(), include()),
            ("ghost".to_string(), include()),
            ("inner.ghost".to_string(), include()),
        ]);
        let reduced = subset_fields(&model(), &projection);
        let reduced_paths = paths(&reduced);
        assert!(reduced_paths.contains(&"flat".to_string()));
        assert!(!reduced_paths.iter().any(|p| p.contains("ghost")));
    }

    #[test]
    fn aliases_resolve_to_their_field() {
        let projection = Projection::from([("wire_name".to_string(), include())]);
        assert_eq!(paths(&subset_fields(&model(), &projection)), vec!["renamed"]);
    }

    #[test]
    fn dotted_and_nested_entries_merge() {
        let projection = Projection::from([
            ("inner.inner2.field".to_string(), include()),
            (
                "inner".to_string(),
                ProjectionNode::Nested(Projection::from([("inner2".to_string(), include())])),
            ),
        ]);
        let reduced = subset_fields(&model(), &projection);
        // The whole-subtree include for inner2 absorbs the narrower entry.
        assert_eq!(
            paths(&reduced),
            vec!["inner", "inner.inner2", "inner.inner2.field"]
        );
    }

    #[test]
    fn projection_deserializes_from_wire_form() {
        let projection: Projection =
            serde_json::from_value(serde_json::json!({"flat": 1, "inner": {"inner2": 1}}))
                .unwrap();
        let reduced = subset_fields(&model(), &projection);
        let reduced_paths = paths(&reduced);
        assert!(reduced_paths.contains(&"flat".to_string()));
        assert!(reduced_paths.contains(&"inner.inner2".to_string()));
    }
}
