//! Canonical style records
//!
//! A [`StyleRecord`] holds the recognized visual and layout properties of
//! one node, already normalized. Absent and default-valued properties are
//! `None`/empty and are skipped on serialization, so two nodes that differ
//! only in defaults encode to identical bytes.
//!
//! The compact JSON encoding produced by [`StyleRecord::canonical_bytes`] is
//! the canonical form used for content addressing.

use crate::error::StyleError;
use crate::value::{Color, Scalar};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Normalized visual and layout properties of one node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    /// Visible fill paints, in paint order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,

    /// Visible stroke paints, in paint order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,

    /// Stroke weight (only meaningful with strokes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<Scalar>,

    /// Corner radius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<CornerRadius>,

    /// Visible effects, in effect order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,

    /// Layer opacity (omitted when 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Scalar>,

    /// Auto-layout configuration of a container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutStyle>,

    /// Typography of a text node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,
}

impl StyleRecord {
    /// Whether no property survived normalization
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Canonical byte encoding (compact JSON)
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, StyleError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Image references of the record's image fills, in fill order
    pub fn image_refs(&self) -> impl Iterator<Item = &str> {
        self.fills.iter().filter_map(|paint| match paint {
            Paint::Image(image) => Some(image.image_ref.as_str()),
            _ => None,
        })
    }
}

/// A normalized paint (fill or stroke)
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Flat color; paint opacity is folded into the alpha channel
    Solid(Color),
    /// Gradient of any geometry
    Gradient(GradientPaint),
    /// Image-backed paint
    Image(ImagePaint),
}

impl Serialize for Paint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Solid(color) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "SOLID")?;
                map.serialize_entry("color", color)?;
                map.end()
            }
            Self::Gradient(gradient) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", gradient.kind.as_str())?;
                map.serialize_entry("stops", &gradient.stops)?;
                map.end()
            }
            Self::Image(image) => {
                let len = if image.scale_mode.is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("type", "IMAGE")?;
                map.serialize_entry("imageRef", &image.image_ref)?;
                if let Some(mode) = &image.scale_mode {
                    map.serialize_entry("scaleMode", mode)?;
                }
                map.end()
            }
        }
    }
}

/// Gradient geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    /// `GRADIENT_LINEAR`
    Linear,
    /// `GRADIENT_RADIAL`
    Radial,
    /// `GRADIENT_ANGULAR`
    Angular,
    /// `GRADIENT_DIAMOND`
    Diamond,
}

impl GradientKind {
    /// Parse the paint type tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "GRADIENT_LINEAR" => Some(Self::Linear),
            "GRADIENT_RADIAL" => Some(Self::Radial),
            "GRADIENT_ANGULAR" => Some(Self::Angular),
            "GRADIENT_DIAMOND" => Some(Self::Diamond),
            _ => None,
        }
    }

    /// Paint type tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "GRADIENT_LINEAR",
            Self::Radial => "GRADIENT_RADIAL",
            Self::Angular => "GRADIENT_ANGULAR",
            Self::Diamond => "GRADIENT_DIAMOND",
        }
    }
}

/// Gradient paint
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPaint {
    /// Geometry
    pub kind: GradientKind,
    /// Color stops in position order as supplied
    pub stops: Vec<GradientStop>,
}

/// One gradient stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    /// Position along the gradient (`0..=1`)
    pub position: Scalar,
    /// Stop color
    pub color: Color,
}

/// Image paint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePaint {
    /// Opaque image reference, resolved by the asset fetcher
    pub image_ref: String,
    /// Scale mode (`FILL`, `FIT`, `TILE`, `STRETCH`)
    pub scale_mode: Option<String>,
}

/// Corner radius, uniform or per corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CornerRadius {
    /// Same radius on all four corners
    Uniform(Scalar),
    /// `[top-left, top-right, bottom-right, bottom-left]`
    PerCorner([Scalar; 4]),
}

/// A normalized visual effect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    /// Outer shadow
    DropShadow(Shadow),
    /// Inner shadow
    InnerShadow(Shadow),
    /// Blur of the layer itself
    LayerBlur(Blur),
    /// Blur of what lies behind the layer
    BackgroundBlur(Blur),
}

/// Shadow parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shadow {
    /// Shadow color
    pub color: Color,
    /// `[x, y]` offset
    pub offset: [Scalar; 2],
    /// Blur radius
    pub radius: Scalar,
    /// Spread (omitted when 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<Scalar>,
}

/// Blur parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Blur {
    /// Blur radius
    pub radius: Scalar,
}

/// Auto-layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// `HORIZONTAL`
    Row,
    /// `VERTICAL`
    Column,
}

impl LayoutMode {
    /// Parse the `layoutMode` tag; `NONE` and unknown tags yield `None`
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "HORIZONTAL" => Some(Self::Row),
            "VERTICAL" => Some(Self::Column),
            _ => None,
        }
    }
}

/// Auto-layout configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStyle {
    /// Direction
    pub mode: LayoutMode,

    /// `[top, right, bottom, left]` (omitted when all zero)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<[Scalar; 4]>,

    /// Gap between items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<Scalar>,

    /// Main-axis alignment keyword (omitted when `min`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_axis_align: Option<String>,

    /// Cross-axis alignment keyword (omitted when `min`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_axis_align: Option<String>,

    /// Whether items wrap onto new lines
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub wrap: bool,
}

/// Typography of a text node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font family
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Font size in px
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Scalar>,

    /// Numeric weight (omitted when 400)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,

    /// Line height in px
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<Scalar>,

    /// Letter spacing in px (omitted when 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<Scalar>,

    /// Horizontal alignment keyword (omitted when `left`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,

    /// Case transform keyword (omitted when `original`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
}

impl TextStyle {
    /// Whether no typography property survived normalization
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
