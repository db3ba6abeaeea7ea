//! Simplified node construction
//!
//! [`SimplifiedNodeBuilder`] is a [`NodeVisitor`]: on `enter` it extracts
//! and interns the node's style and pushes a childless [`SimplifiedNode`];
//! on `leave` it pops that node and attaches it to its parent (or to the
//! root list). The resulting tree mirrors exactly what the walker emitted.

use crate::diagnostics::DiagnosticSink;
use crate::error::NodeIssue;
use crate::extract::StyleExtractor;
use crate::raw::{RawNode, RawNodeKind, RawRect};
use crate::walker::{NodeVisitor, VisitContext};
use dsir_style::{GlobalVariableTable, Scalar, VarId};
use serde::Serialize;

/// Absolute bounding geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: Scalar,
    /// Top edge
    pub y: Scalar,
    /// Width
    pub width: Scalar,
    /// Height
    pub height: Scalar,
}

impl BoundingBox {
    /// Normalize a raw rectangle; `None` if any coordinate is non-finite
    #[must_use]
    pub fn from_raw(rect: &RawRect) -> Option<Self> {
        Some(Self {
            x: Scalar::new(rect.x)?,
            y: Scalar::new(rect.y)?,
            width: Scalar::new(rect.width)?,
            height: Scalar::new(rect.height)?,
        })
    }
}

/// One node of the simplified output tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedNode {
    /// Node id
    pub id: String,
    /// Layer name
    pub name: String,
    /// Type tag as supplied
    #[serde(rename = "type")]
    pub node_type: String,
    /// Absolute bounding box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Literal text of a text node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// References into `globalVars`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub style_refs: Vec<VarId>,
    /// Main component of an instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Children in document order
    pub children: Vec<SimplifiedNode>,
}

impl SimplifiedNode {
    /// Minimal node carrying only identity
    #[must_use]
    pub fn generic(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            bounding_box: None,
            text: None,
            style_refs: Vec::new(),
            component_id: None,
            children: Vec::new(),
        }
    }

    /// Pre-order iterator over this node and its descendants
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }
}

/// Pre-order iterator over a simplified subtree
#[derive(Debug, Clone)]
pub struct Preorder<'n> {
    stack: Vec<&'n SimplifiedNode>,
}

impl<'n> Iterator for Preorder<'n> {
    type Item = &'n SimplifiedNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Visitor that assembles simplified nodes while interning their styles
pub struct SimplifiedNodeBuilder<'t, S: ?Sized> {
    extractor: StyleExtractor,
    table: &'t mut GlobalVariableTable,
    sink: &'t mut S,
    stack: Vec<SimplifiedNode>,
    roots: Vec<SimplifiedNode>,
}

impl<'t, S> SimplifiedNodeBuilder<'t, S>
where
    S: DiagnosticSink + ?Sized,
{
    /// Create a builder writing into `table` and reporting to `sink`
    #[must_use]
    pub fn new(table: &'t mut GlobalVariableTable, sink: &'t mut S) -> Self {
        Self {
            extractor: StyleExtractor::new(),
            table,
            sink,
            stack: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Build one childless simplified node
    pub fn build_node(&mut self, node: &RawNode<'_>) -> SimplifiedNode {
        if let Some(reason) = &node.property_error {
            self.sink.issue(NodeIssue::InvalidProperties {
                id: node.id.to_owned(),
                reason: reason.clone(),
            });
            return SimplifiedNode::generic(node.id, node.name, node.node_type);
        }
        if matches!(node.kind, RawNodeKind::Generic) {
            self.sink.issue(NodeIssue::UnsupportedType {
                id: node.id.to_owned(),
                node_type: node.node_type.to_owned(),
            });
            return SimplifiedNode::generic(node.id, node.name, node.node_type);
        }

        let record = self.extractor.extract(node);
        let mut style_refs = Vec::new();
        if !record.is_empty() {
            match self.table.intern(record) {
                Ok(id) => style_refs.push(id),
                Err(source) => self.sink.issue(NodeIssue::Style {
                    id: node.id.to_owned(),
                    source,
                }),
            }
        }

        SimplifiedNode {
            id: node.id.to_owned(),
            name: node.name.to_owned(),
            node_type: node.node_type.to_owned(),
            bounding_box: node.bounds.as_ref().and_then(BoundingBox::from_raw),
            text: node.characters().map(str::to_owned),
            style_refs,
            component_id: node.component_id.clone(),
            children: Vec::new(),
        }
    }

    /// Finished root nodes, in walk order
    #[must_use]
    pub fn finish(mut self) -> Vec<SimplifiedNode> {
        // Unbalanced enter/leave would leave nodes on the stack
        while let Some(node) = self.stack.pop() {
            self.attach(node);
        }
        self.roots
    }

    fn attach(&mut self, node: SimplifiedNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }
}

impl<'a, 't, S> NodeVisitor<'a> for SimplifiedNodeBuilder<'t, S>
where
    S: DiagnosticSink + ?Sized,
{
    fn enter(&mut self, node: &RawNode<'a>, _ctx: &VisitContext<'_>) {
        let built = self.build_node(node);
        self.stack.push(built);
    }

    fn leave(&mut self, _node: &RawNode<'a>, _ctx: &VisitContext<'_>) {
        if let Some(done) = self.stack.pop() {
            self.attach(done);
        }
    }

    fn skipped(&mut self, issue: NodeIssue) {
        self.sink.issue(issue);
    }
}
