//! Raw design-tree nodes
//!
//! A [`RawNode`] borrows one JSON node from the fetched document and decodes
//! only that node's own properties. Its children stay undecoded
//! (`&[Value]`) until the walker reaches them, so a malformed child is
//! discovered, reported and skipped on its own.
//!
//! Type tags are sorted into a [`NodeCategory`]; each category carries its
//! own property set in [`RawNodeKind`], and anything unrecognized lands in
//! the explicit [`RawNodeKind::Generic`] fallback.

use serde::Deserialize;
use serde_json::Value;

/// Property family of a recognized node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Frames, groups, components and other nodes that hold children
    Container,
    /// Vector geometry
    Shape,
    /// Text layers
    Text,
}

impl NodeCategory {
    /// Classify a type tag; unrecognized tags yield `None`
    #[must_use]
    pub fn classify(node_type: &str) -> Option<Self> {
        match node_type {
            "DOCUMENT" | "CANVAS" | "FRAME" | "GROUP" | "SECTION" | "COMPONENT"
            | "COMPONENT_SET" | "INSTANCE" => Some(Self::Container),
            "RECTANGLE" | "ELLIPSE" | "LINE" | "VECTOR" | "STAR" | "REGULAR_POLYGON"
            | "POLYGON" | "BOOLEAN_OPERATION" => Some(Self::Shape),
            "TEXT" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Why a node could not be identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Value is not a JSON object
    #[error("node is not an object")]
    NotAnObject,
    /// `id` missing, empty or not a string
    #[error("missing id")]
    MissingId,
    /// `type` missing, empty or not a string
    #[error("missing type")]
    MissingType,
}

/// RGBA color with unit-interval channels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawColor {
    /// Red
    #[serde(default)]
    pub r: f64,
    /// Green
    #[serde(default)]
    pub g: f64,
    /// Blue
    #[serde(default)]
    pub b: f64,
    /// Alpha
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

/// 2D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawVector {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

/// Axis-aligned rectangle in absolute coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawRect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// One gradient stop
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawColorStop {
    /// Position along the gradient
    #[serde(default)]
    pub position: f64,
    /// Stop color
    pub color: RawColor,
}

/// Fill or stroke paint as supplied
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPaint {
    /// Paint type tag (`SOLID`, `GRADIENT_LINEAR`, `IMAGE`, ...)
    #[serde(rename = "type")]
    pub paint_type: String,
    /// Visibility flag (absent means visible)
    pub visible: Option<bool>,
    /// Paint opacity
    pub opacity: Option<f64>,
    /// Color of a solid paint
    pub color: Option<RawColor>,
    /// Stops of a gradient paint
    pub gradient_stops: Vec<RawColorStop>,
    /// Image reference of an image paint
    pub image_ref: Option<String>,
    /// Scale mode of an image paint
    pub scale_mode: Option<String>,
}

/// Effect as supplied
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEffect {
    /// Effect type tag
    #[serde(rename = "type")]
    pub effect_type: String,
    /// Visibility flag (absent means visible)
    pub visible: Option<bool>,
    /// Shadow color
    pub color: Option<RawColor>,
    /// Shadow offset
    pub offset: Option<RawVector>,
    /// Blur radius
    pub radius: Option<f64>,
    /// Shadow spread
    pub spread: Option<f64>,
}

/// Visual properties shared by every recognized category
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualProps {
    /// Fill paints
    pub fills: Vec<RawPaint>,
    /// Stroke paints
    pub strokes: Vec<RawPaint>,
    /// Stroke weight
    pub stroke_weight: Option<f64>,
    /// Uniform corner radius
    pub corner_radius: Option<f64>,
    /// Per-corner radii `[tl, tr, br, bl]`
    pub rectangle_corner_radii: Option<[f64; 4]>,
    /// Effects
    pub effects: Vec<RawEffect>,
    /// Layer opacity
    pub opacity: Option<f64>,
}

/// Auto-layout properties of a container
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutProps {
    /// `NONE`, `HORIZONTAL` or `VERTICAL`
    pub layout_mode: Option<String>,
    /// Top padding
    pub padding_top: Option<f64>,
    /// Right padding
    pub padding_right: Option<f64>,
    /// Bottom padding
    pub padding_bottom: Option<f64>,
    /// Left padding
    pub padding_left: Option<f64>,
    /// Gap between items
    pub item_spacing: Option<f64>,
    /// Main-axis alignment tag
    pub primary_axis_align_items: Option<String>,
    /// Cross-axis alignment tag
    pub counter_axis_align_items: Option<String>,
    /// `NO_WRAP` or `WRAP`
    pub layout_wrap: Option<String>,
}

/// Typography as supplied
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTypeStyle {
    /// Font family
    pub font_family: Option<String>,
    /// Font size in px
    pub font_size: Option<f64>,
    /// Numeric weight
    pub font_weight: Option<f64>,
    /// Line height in px
    pub line_height_px: Option<f64>,
    /// Letter spacing in px
    pub letter_spacing: Option<f64>,
    /// Horizontal alignment tag
    pub text_align_horizontal: Option<String>,
    /// Case transform tag
    pub text_case: Option<String>,
}

/// Text-node properties
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextProps {
    /// Literal characters
    pub characters: Option<String>,
    /// Typography
    pub style: Option<RawTypeStyle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CommonProps {
    absolute_bounding_box: Option<RawRect>,
    component_id: Option<String>,
}

/// Category-specific properties
#[derive(Debug, Clone, PartialEq)]
pub enum RawNodeKind {
    /// Container node
    Container {
        /// Visual properties
        visual: VisualProps,
        /// Auto-layout properties
        layout: LayoutProps,
    },
    /// Shape node
    Shape {
        /// Visual properties
        visual: VisualProps,
    },
    /// Text node
    Text {
        /// Visual properties
        visual: VisualProps,
        /// Characters and typography
        text: TextProps,
    },
    /// Unrecognized type, or properties that failed to decode
    Generic,
}

/// One raw node borrowed from the fetched document
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode<'a> {
    /// Node id
    pub id: &'a str,
    /// Layer name (empty when absent)
    pub name: &'a str,
    /// Type tag
    pub node_type: &'a str,
    /// Visibility (absent means visible)
    pub visible: bool,
    /// Absolute bounding box
    pub bounds: Option<RawRect>,
    /// Main component of an instance
    pub component_id: Option<String>,
    /// Category-specific properties
    pub kind: RawNodeKind,
    /// Decoder message when a recognized node's properties were unreadable
    pub property_error: Option<String>,
    children: &'a [Value],
}

impl<'a> RawNode<'a> {
    /// Decode one node
    ///
    /// Only a missing id or type tag is fatal for the node. Properties that
    /// fail to decode degrade it to [`RawNodeKind::Generic`] with
    /// `property_error` set.
    ///
    /// # Errors
    /// Returns error if the value is not an object or lacks `id` / `type`
    pub fn decode(value: &'a Value) -> Result<Self, DecodeError> {
        if !value.is_object() {
            return Err(DecodeError::NotAnObject);
        }
        let id = non_empty_str(value, "id").ok_or(DecodeError::MissingId)?;
        let node_type = non_empty_str(value, "type").ok_or(DecodeError::MissingType)?;
        let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
        let visible = value.get("visible").and_then(Value::as_bool).unwrap_or(true);
        let children = value
            .get("children")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);

        let mut node = Self {
            id,
            name,
            node_type,
            visible,
            bounds: None,
            component_id: None,
            kind: RawNodeKind::Generic,
            property_error: None,
            children,
        };

        if let Some(category) = NodeCategory::classify(node_type) {
            match decode_props(value, category) {
                Ok((kind, common)) => {
                    node.kind = kind;
                    node.bounds = common.absolute_bounding_box;
                    node.component_id = common.component_id;
                }
                Err(e) => node.property_error = Some(e.to_string()),
            }
        }
        Ok(node)
    }

    /// Category of the type tag
    #[inline]
    #[must_use]
    pub fn category(&self) -> Option<NodeCategory> {
        NodeCategory::classify(self.node_type)
    }

    /// Undecoded children in document order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &'a [Value] {
        self.children
    }

    /// Literal characters of a text node
    #[must_use]
    pub fn characters(&self) -> Option<&str> {
        match &self.kind {
            RawNodeKind::Text { text, .. } => text.characters.as_deref(),
            _ => None,
        }
    }
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn decode_props(
    value: &Value,
    category: NodeCategory,
) -> Result<(RawNodeKind, CommonProps), serde_json::Error> {
    let common = CommonProps::deserialize(value)?;
    let visual = VisualProps::deserialize(value)?;
    let kind = match category {
        NodeCategory::Container => RawNodeKind::Container {
            visual,
            layout: LayoutProps::deserialize(value)?,
        },
        NodeCategory::Shape => RawNodeKind::Shape { visual },
        NodeCategory::Text => RawNodeKind::Text {
            visual,
            text: TextProps::deserialize(value)?,
        },
    };
    Ok((kind, common))
}
