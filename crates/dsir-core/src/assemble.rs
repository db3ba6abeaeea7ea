//! Output envelope
//!
//! [`ResultAssembler`] is the only consumer of the style table's final
//! state: it takes the table by value and freezes it into `globalVars`.

use crate::builder::SimplifiedNode;
use crate::error::ConvertError;
use dsir_style::{GlobalVariableTable, GlobalVars};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Component descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentInfo {
    /// Library key
    pub key: String,
    /// Component name
    pub name: String,
    /// Owning component set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_set_id: Option<String>,
}

/// Component set descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentSetInfo {
    /// Library key
    pub key: String,
    /// Set name
    pub name: String,
}

/// File-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// File name
    pub name: String,
    /// Last modification timestamp, as supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Thumbnail URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// File version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Components by node id
    pub components: IndexMap<String, ComponentInfo>,
    /// Component sets by node id
    pub component_sets: IndexMap<String, ComponentSetInfo>,
}

/// Final output of one conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedDesign {
    /// File metadata
    pub metadata: FileMetadata,
    /// Root nodes in original order
    pub nodes: Vec<SimplifiedNode>,
    /// Every distinct style, in first-interned order
    #[serde(rename = "globalVars")]
    pub global_vars: GlobalVars,
}

impl SimplifiedDesign {
    /// Write compact JSON, one root node at a time
    ///
    /// The bytes are identical to `serde_json::to_vec(self)`.
    ///
    /// # Errors
    /// Returns error if encoding or writing fails
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), ConvertError> {
        writer.write_all(br#"{"metadata":"#)?;
        serde_json::to_writer(&mut writer, &self.metadata)?;
        writer.write_all(br#","nodes":["#)?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writer.write_all(b",")?;
            }
            serde_json::to_writer(&mut writer, node)?;
        }
        writer.write_all(br#"],"globalVars":"#)?;
        serde_json::to_writer(&mut writer, &self.global_vars)?;
        writer.write_all(b"}")?;
        writer.flush()?;
        Ok(())
    }

    /// Write indented JSON
    ///
    /// # Errors
    /// Returns error if encoding or writing fails
    pub fn write_json_pretty<W: Write>(&self, mut writer: W) -> Result<(), ConvertError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Write YAML
    ///
    /// # Errors
    /// Returns error if encoding or writing fails
    pub fn write_yaml<W: Write>(&self, mut writer: W) -> Result<(), ConvertError> {
        serde_yaml::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Total number of nodes in the tree
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(|root| root.preorder().count()).sum()
    }
}

/// Combines metadata, roots and the final style table
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    metadata: FileMetadata,
}

impl ResultAssembler {
    /// Create assembler for a file
    #[inline]
    #[must_use]
    pub fn new(metadata: FileMetadata) -> Self {
        Self { metadata }
    }

    /// Freeze the table and build the output
    #[must_use]
    pub fn assemble(
        self,
        nodes: Vec<SimplifiedNode>,
        table: GlobalVariableTable,
    ) -> SimplifiedDesign {
        SimplifiedDesign {
            metadata: self.metadata,
            nodes,
            global_vars: table.into_global_vars(),
        }
    }
}
