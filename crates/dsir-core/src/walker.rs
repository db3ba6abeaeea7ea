//! Depth-bounded pre-order traversal
//!
//! [`NodeWalker`] visits raw nodes depth-first, parents before children,
//! siblings in document order, and reports each visit to a
//! [`NodeVisitor`] as an `enter`/`leave` pair. Nodes are decoded only when
//! reached.
//!
//! - a node at `max_depth` is emitted but its children are not visited
//! - a node without id or type is reported via [`NodeVisitor::skipped`] and
//!   dropped together with its subtree; its siblings are still visited
//! - hidden nodes (`visible: false`) are dropped with their subtree unless
//!   hidden nodes are included; roots can be exempted so an explicitly
//!   requested node is always emitted

use crate::error::{NodeIssue, NodeLocation};
use crate::raw::RawNode;
use serde_json::Value;

/// Position of the node being visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitContext<'p> {
    /// Edges between this node and its root (roots are at 0)
    pub depth: usize,
    /// Position among the parent's raw children (or among the roots)
    pub index: usize,
    /// Parent id (`None` for roots)
    pub parent_id: Option<&'p str>,
    /// Whether this node has children that the depth bound cut off
    pub truncated: bool,
}

/// Receiver of walk events
pub trait NodeVisitor<'a> {
    /// Called before any of the node's children
    fn enter(&mut self, node: &RawNode<'a>, ctx: &VisitContext<'_>);

    /// Called after all of the node's visited children
    fn leave(&mut self, _node: &RawNode<'a>, _ctx: &VisitContext<'_>) {}

    /// A node was dropped because it could not be identified
    fn skipped(&mut self, _issue: NodeIssue) {}
}

/// Counters for one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Nodes passed to `enter`
    pub visited: usize,
    /// Nodes dropped for missing id or type
    pub skipped_malformed: usize,
    /// Hidden nodes dropped (subtree roots only)
    pub skipped_hidden: usize,
    /// Emitted nodes whose children were cut off by the depth bound
    pub truncated: usize,
}

/// One entry of a visitation sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Node id
    pub id: String,
    /// Type tag
    pub node_type: String,
    /// Depth below the root
    pub depth: usize,
    /// Position among siblings
    pub index: usize,
    /// Parent id
    pub parent_id: Option<String>,
    /// Whether children were cut off
    pub truncated: bool,
}

/// Depth-bounded, order-preserving walker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeWalker {
    max_depth: Option<usize>,
    include_hidden: bool,
    keep_hidden_roots: bool,
}

impl NodeWalker {
    /// Unbounded walker that skips hidden nodes
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the depth (`None` = unbounded)
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Visit hidden nodes too
    #[inline]
    #[must_use]
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Emit hidden roots anyway (their hidden descendants are still dropped)
    #[inline]
    #[must_use]
    pub fn with_hidden_roots(mut self, keep: bool) -> Self {
        self.keep_hidden_roots = keep;
        self
    }

    /// Walk every root in order
    pub fn walk<'a, I, V>(&self, roots: I, visitor: &mut V) -> WalkStats
    where
        I: IntoIterator<Item = &'a Value>,
        V: NodeVisitor<'a> + ?Sized,
    {
        let mut stats = WalkStats::default();
        for (index, root) in roots.into_iter().enumerate() {
            self.walk_node(root, 0, index, None, visitor, &mut stats);
        }
        stats
    }

    /// Pre-order visitation sequence of `roots`
    pub fn visit_order<'a, I>(&self, roots: I) -> Vec<Visit>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut recorder = VisitRecorder::default();
        self.walk(roots, &mut recorder);
        recorder.visits
    }

    fn walk_node<'a, V>(
        &self,
        value: &'a Value,
        depth: usize,
        index: usize,
        parent_id: Option<&str>,
        visitor: &mut V,
        stats: &mut WalkStats,
    ) where
        V: NodeVisitor<'a> + ?Sized,
    {
        let node = match RawNode::decode(value) {
            Ok(node) => node,
            Err(e) => {
                stats.skipped_malformed += 1;
                let location = NodeLocation {
                    parent_id: parent_id.map(str::to_owned),
                    index,
                };
                visitor.skipped(NodeIssue::malformed(location, e.to_string()));
                return;
            }
        };

        let exempt = depth == 0 && self.keep_hidden_roots;
        if !node.visible && !self.include_hidden && !exempt {
            stats.skipped_hidden += 1;
            return;
        }

        let at_limit = self.max_depth.is_some_and(|max| depth >= max);
        let truncated = at_limit && !node.children().is_empty();
        if truncated {
            stats.truncated += 1;
        }

        let ctx = VisitContext {
            depth,
            index,
            parent_id,
            truncated,
        };
        stats.visited += 1;
        visitor.enter(&node, &ctx);

        if !at_limit {
            for (child_index, child) in node.children().iter().enumerate() {
                self.walk_node(child, depth + 1, child_index, Some(node.id), visitor, stats);
            }
        }

        visitor.leave(&node, &ctx);
    }
}

#[derive(Debug, Default)]
struct VisitRecorder {
    visits: Vec<Visit>,
}

impl<'a> NodeVisitor<'a> for VisitRecorder {
    fn enter(&mut self, node: &RawNode<'a>, ctx: &VisitContext<'_>) {
        self.visits.push(Visit {
            id: node.id.to_owned(),
            node_type: node.node_type.to_owned(),
            depth: ctx.depth,
            index: ctx.index,
            parent_id: ctx.parent_id.map(str::to_owned),
            truncated: ctx.truncated,
        });
    }
}
