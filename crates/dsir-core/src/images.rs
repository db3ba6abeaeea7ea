//! Image hand-off records
//!
//! [`ImageReferenceCollector`] projects the image fills out of an already
//! built tree so an external asset fetcher can download them. It reads the
//! tree and the style table; it never touches the network or filesystem.

use crate::builder::SimplifiedNode;
use dsir_style::GlobalVariableTable;
use serde::Serialize;

/// One image to fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    /// Node whose fill uses the image
    pub node_id: String,
    /// Opaque image reference
    pub image_ref: String,
}

/// Read-only scanner for image-backed fills
#[derive(Debug, Clone, Copy)]
pub struct ImageReferenceCollector<'t> {
    table: &'t GlobalVariableTable,
}

impl<'t> ImageReferenceCollector<'t> {
    /// Create collector resolving style refs through `table`
    #[inline]
    #[must_use]
    pub fn new(table: &'t GlobalVariableTable) -> Self {
        Self { table }
    }

    /// Image references in pre-order, one per distinct image on each node
    #[must_use]
    pub fn collect(&self, roots: &[SimplifiedNode]) -> Vec<ImageReference> {
        let mut out = Vec::new();
        for node in roots.iter().flat_map(SimplifiedNode::preorder) {
            let first = out.len();
            let refs = node
                .style_refs
                .iter()
                .filter_map(|id| self.table.resolve(id.as_str()))
                .flat_map(|record| record.image_refs());
            for image_ref in refs {
                let seen = out[first..]
                    .iter()
                    .any(|r: &ImageReference| r.image_ref == image_ref);
                if !seen {
                    out.push(ImageReference {
                        node_id: node.id.clone(),
                        image_ref: image_ref.to_owned(),
                    });
                }
            }
        }
        out
    }
}
