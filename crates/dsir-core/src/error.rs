//! Error types for DSIR Core
//!
//! Two layers:
//! - [`ConvertError`]: stops a conversion before or after the walk
//!   (unusable input document, unknown start node, writer failures)
//! - [`NodeIssue`]: a problem local to one node, reported through the
//!   diagnostic sink while the walk carries on

use dsir_style::StyleError;
use std::fmt::{self, Display, Formatter};

/// Errors that abort a conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Input matches neither the file nor the node response shape
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Requested start node does not exist in the input
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// JSON encoding or decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding failed
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Writing output failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a node sits relative to its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLocation {
    /// Parent id (`None` for a root)
    pub parent_id: Option<String>,
    /// Position among the parent's children (or among the roots)
    pub index: usize,
}

impl Display for NodeLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.parent_id {
            Some(parent) => write!(f, "child {} of {parent}", self.index),
            None => write!(f, "root {}", self.index),
        }
    }
}

/// Recoverable, node-local problems
///
/// None of these abort the conversion.
#[derive(Debug, thiserror::Error)]
pub enum NodeIssue {
    /// Node lacks an identifying field; it and its subtree are skipped
    #[error("malformed node at {location}: {reason}")]
    Malformed {
        /// Position of the skipped node
        location: NodeLocation,
        /// What was missing
        reason: String,
    },

    /// Type tag not recognized; node degrades to a generic node
    #[error("unsupported node type '{node_type}' for node {id}")]
    UnsupportedType {
        /// Node id
        id: String,
        /// Unrecognized type tag
        node_type: String,
    },

    /// Properties of a recognized node did not decode; node degrades to a
    /// generic node
    #[error("invalid properties on node {id}: {reason}")]
    InvalidProperties {
        /// Node id
        id: String,
        /// Decoder message
        reason: String,
    },

    /// Style record could not be interned; node keeps no style reference
    #[error("style interning failed for node {id}: {source}")]
    Style {
        /// Node id
        id: String,
        /// Underlying error
        #[source]
        source: StyleError,
    },
}

impl NodeIssue {
    /// Create malformed-node issue
    pub fn malformed(location: NodeLocation, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location,
            reason: reason.into(),
        }
    }

    /// Whether the node was dropped from the output entirely
    #[inline]
    #[must_use]
    pub fn drops_node(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
