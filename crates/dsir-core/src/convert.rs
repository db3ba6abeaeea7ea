//! Conversion entry point
//!
//! One call owns everything it creates: the style table, the builder and
//! the output. Nothing is shared between calls, so independent conversions
//! may run on separate threads.

use crate::assemble::{ResultAssembler, SimplifiedDesign};
use crate::builder::SimplifiedNodeBuilder;
use crate::diagnostics::{ConversionPhase, ConversionSummary, DiagnosticSink};
use crate::document::RawDocument;
use crate::error::ConvertError;
use crate::images::{ImageReference, ImageReferenceCollector};
use crate::walker::NodeWalker;
use dsir_style::GlobalVariableTable;
use serde_json::Value;

/// Conversion parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Start at this node instead of the top-level children
    pub node_id: Option<String>,
    /// Depth bound below each root (`None` = unbounded)
    pub max_depth: Option<usize>,
    /// Keep nodes marked `visible: false` (a requested start node is kept
    /// regardless)
    pub include_hidden: bool,
}

impl ConvertOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With starting node
    #[inline]
    #[must_use]
    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    /// With depth bound
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// With hidden nodes
    #[inline]
    #[must_use]
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    fn walker(&self) -> NodeWalker {
        NodeWalker::new()
            .with_max_depth(self.max_depth)
            .with_hidden(self.include_hidden)
            .with_hidden_roots(self.node_id.is_some())
    }
}

/// Result of one conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Simplified output
    pub design: SimplifiedDesign,
    /// Images for the asset fetcher, in pre-order
    pub images: Vec<ImageReference>,
    /// Run counters
    pub summary: ConversionSummary,
}

/// Convert a raw response into its simplified form
///
/// # Errors
/// Returns [`ConvertError::InvalidDocument`] for an unrecognized envelope and
/// [`ConvertError::NodeNotFound`] when the requested start node is absent.
/// Node-local problems never fail the call; they go to `sink`.
pub fn convert(
    input: &Value,
    options: &ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<Conversion, ConvertError> {
    sink.phase(ConversionPhase::Start);
    let document = RawDocument::parse(input)?;
    let metadata = document.metadata()?;
    let roots = document.roots(options.node_id.as_deref())?;

    sink.phase(ConversionPhase::Walking);
    let mut table = GlobalVariableTable::new();
    let mut builder = SimplifiedNodeBuilder::new(&mut table, &mut *sink);
    let walk = options.walker().walk(roots, &mut builder);
    let nodes = builder.finish();

    sink.phase(ConversionPhase::Collecting);
    let images = ImageReferenceCollector::new(&table).collect(&nodes);

    sink.phase(ConversionPhase::Assembling);
    let summary = ConversionSummary {
        walk,
        styles: table.len(),
        images: images.len(),
    };
    let design = ResultAssembler::new(metadata).assemble(nodes, table);

    sink.finished(&summary);
    sink.phase(ConversionPhase::Done);
    Ok(Conversion {
        design,
        images,
        summary,
    })
}

/// Parse `input` as JSON and convert it
///
/// # Errors
/// Returns [`ConvertError::Json`] if `input` is not JSON, otherwise as [`convert`]
pub fn convert_str(
    input: &str,
    options: &ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<Conversion, ConvertError> {
    let value: Value = serde_json::from_str(input)?;
    convert(&value, options, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use serde_json::json;

    fn input() -> Value {
        json!({
            "name": "Demo",
            "document": {"id": "0:0", "type": "DOCUMENT", "children": [
                {"id": "1:1", "type": "RECTANGLE",
                 "fills": [{"type": "IMAGE", "imageRef": "hero"}]},
                {"id": "1:2", "type": "SPARKLE"}
            ]}
        })
    }

    #[test]
    fn phases_in_order() {
        let mut sink = CollectingSink::new();
        convert(&input(), &ConvertOptions::new(), &mut sink).unwrap();
        assert_eq!(
            sink.phases,
            vec![
                ConversionPhase::Start,
                ConversionPhase::Walking,
                ConversionPhase::Collecting,
                ConversionPhase::Assembling,
                ConversionPhase::Done,
            ]
        );
        let summary = sink.summary.unwrap();
        assert_eq!(summary.walk.visited, 2);
        assert_eq!(summary.styles, 1);
        assert_eq!(summary.images, 1);
    }

    #[test]
    fn collects_images_and_issues() {
        let mut sink = CollectingSink::new();
        let out = convert(&input(), &ConvertOptions::new(), &mut sink).unwrap();
        assert_eq!(out.images.len(), 1);
        assert_eq!(out.images[0].node_id, "1:1");
        assert_eq!(out.images[0].image_ref, "hero");
        assert_eq!(sink.issues.len(), 1);
    }

    #[test]
    fn errors_stop_before_walking() {
        let mut sink = CollectingSink::new();
        let options = ConvertOptions::new().with_node_id("4:4");
        let err = convert(&input(), &options, &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::NodeNotFound(_)));
        assert_eq!(sink.phases, vec![ConversionPhase::Start]);
    }

    #[test]
    fn convert_str_rejects_non_json() {
        let mut sink = CollectingSink::new();
        let err = convert_str("not json", &ConvertOptions::new(), &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::Json(_)));
    }

    #[test]
    fn options_builder() {
        let options = ConvertOptions::new()
            .with_node_id("1:2")
            .with_max_depth(3)
            .with_hidden(true);
        assert_eq!(options.node_id.as_deref(), Some("1:2"));
        assert_eq!(options.max_depth, Some(3));
        assert!(options.include_hidden);
    }
}
