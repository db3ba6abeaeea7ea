//! Input envelopes
//!
//! Two response shapes are accepted:
//! - file response: roots are `document.children`
//! - node response: roots are the `document` of each `nodes` entry, in key
//!   order

use crate::assemble::{ComponentInfo, ComponentSetInfo, FileMetadata};
use crate::error::ConvertError;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
enum Shape<'a> {
    File { document: &'a Value },
    Nodes { nodes: &'a Map<String, Value> },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MetadataFields {
    name: String,
    last_modified: Option<String>,
    thumbnail_url: Option<String>,
    version: Option<String>,
    components: IndexMap<String, ComponentInfo>,
    component_sets: IndexMap<String, ComponentSetInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EntryComponents {
    components: IndexMap<String, ComponentInfo>,
    component_sets: IndexMap<String, ComponentSetInfo>,
}

/// A parsed response envelope borrowing the input value
#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    value: &'a Value,
    shape: Shape<'a>,
}

impl<'a> RawDocument<'a> {
    /// Detect the envelope shape
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidDocument`] if the input is neither a
    /// file response nor a node response
    pub fn parse(value: &'a Value) -> Result<Self, ConvertError> {
        let object = value
            .as_object()
            .ok_or_else(|| ConvertError::InvalidDocument("expected a JSON object".to_string()))?;

        let shape = if let Some(document) = object.get("document").filter(|d| d.is_object()) {
            Shape::File { document }
        } else if let Some(nodes) = object.get("nodes").and_then(Value::as_object) {
            Shape::Nodes { nodes }
        } else {
            return Err(ConvertError::InvalidDocument(
                "expected a `document` or `nodes` object".to_string(),
            ));
        };
        Ok(Self { value, shape })
    }

    /// File metadata, with components of every node entry merged in
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidDocument`] if metadata fields have the
    /// wrong shape
    pub fn metadata(&self) -> Result<FileMetadata, ConvertError> {
        let fields = MetadataFields::deserialize(self.value)
            .map_err(|e| ConvertError::InvalidDocument(format!("metadata: {e}")))?;
        let mut metadata = FileMetadata {
            name: fields.name,
            last_modified: fields.last_modified,
            thumbnail_url: fields.thumbnail_url,
            version: fields.version,
            components: fields.components,
            component_sets: fields.component_sets,
        };

        if let Shape::Nodes { nodes } = self.shape {
            for (id, entry) in nodes.iter().filter(|(_, e)| e.is_object()) {
                let extra = EntryComponents::deserialize(entry).map_err(|e| {
                    ConvertError::InvalidDocument(format!("components of node {id}: {e}"))
                })?;
                for (key, info) in extra.components {
                    metadata.components.entry(key).or_insert(info);
                }
                for (key, info) in extra.component_sets {
                    metadata.component_sets.entry(key).or_insert(info);
                }
            }
        }
        Ok(metadata)
    }

    /// Roots to walk
    ///
    /// Without `node_id` these are all top-level nodes; with it, the single
    /// node carrying that id.
    ///
    /// # Errors
    /// Returns [`ConvertError::NodeNotFound`] if `node_id` is absent from the input
    pub fn roots(&self, node_id: Option<&str>) -> Result<Vec<&'a Value>, ConvertError> {
        match (node_id, self.shape) {
            (None, Shape::File { document }) => Ok(document
                .get("children")
                .and_then(Value::as_array)
                .map(|children| children.iter().collect())
                .unwrap_or_default()),
            (None, Shape::Nodes { nodes }) => {
                Ok(nodes.values().filter_map(entry_document).collect())
            }
            (Some(id), Shape::File { document }) => find_node(document, id)
                .map(|node| vec![node])
                .ok_or_else(|| ConvertError::NodeNotFound(id.to_string())),
            (Some(id), Shape::Nodes { nodes }) => nodes
                .get(id)
                .and_then(entry_document)
                .or_else(|| {
                    nodes
                        .values()
                        .filter_map(entry_document)
                        .find_map(|doc| find_node(doc, id))
                })
                .map(|node| vec![node])
                .ok_or_else(|| ConvertError::NodeNotFound(id.to_string())),
        }
    }
}

fn entry_document(entry: &Value) -> Option<&Value> {
    entry.get("document").filter(|d| !d.is_null())
}

/// Depth-first search for the node with `id`, starting at `root`
#[must_use]
pub fn find_node<'a>(root: &'a Value, id: &str) -> Option<&'a Value> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.get("id").and_then(Value::as_str) == Some(id) {
            return Some(node);
        }
        if let Some(children) = node.get("children").and_then(Value::as_array) {
            stack.extend(children.iter().rev());
        }
    }
    None
}
