//! DSIR Core
//!
//! Turns a raw design-file node graph into a compact simplified tree whose
//! styles live once in a shared `globalVars` table.
//!
//! # Pipeline
//!
//! 1. [`RawDocument`] detects the response envelope and selects roots
//! 2. [`NodeWalker`] visits them in pre-order, bounded by depth
//! 3. [`SimplifiedNodeBuilder`] extracts each node's [`StyleRecord`] with
//!    [`StyleExtractor`] and interns it into a [`GlobalVariableTable`]
//! 4. [`ImageReferenceCollector`] lists image fills for the asset fetcher
//! 5. [`ResultAssembler`] freezes the table into a [`SimplifiedDesign`]
//!
//! # Example
//!
//! ```rust,ignore
//! use dsir_core::{convert, ConvertOptions, TracingSink};
//!
//! let input: serde_json::Value = serde_json::from_str(&text)?;
//! let options = ConvertOptions::new().with_max_depth(3);
//! let out = convert(&input, &options, &mut TracingSink)?;
//! out.design.write_json(std::io::stdout().lock())?;
//! ```
//!
//! [`StyleRecord`]: dsir_style::StyleRecord
//! [`GlobalVariableTable`]: dsir_style::GlobalVariableTable

#![warn(unreachable_pub)]

pub mod assemble;
pub mod builder;
pub mod convert;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod extract;
pub mod images;
pub mod raw;
pub mod walker;

// Re-exports
pub use assemble::{
    ComponentInfo, ComponentSetInfo, FileMetadata, ResultAssembler, SimplifiedDesign,
};
pub use builder::{BoundingBox, SimplifiedNode, SimplifiedNodeBuilder};
pub use convert::{convert, convert_str, Conversion, ConvertOptions};
pub use diagnostics::{
    CollectingSink, ConversionPhase, ConversionSummary, DiagnosticSink, TracingSink,
};
pub use document::{find_node, RawDocument};
pub use error::{ConvertError, NodeIssue, NodeLocation};
pub use extract::StyleExtractor;
pub use images::{ImageReference, ImageReferenceCollector};
pub use raw::{NodeCategory, RawNode, RawNodeKind};
pub use walker::{NodeVisitor, NodeWalker, Visit, VisitContext, WalkStats};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
