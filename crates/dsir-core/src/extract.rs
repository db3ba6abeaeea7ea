//! Style extraction
//!
//! [`StyleExtractor`] maps the recognized properties of one [`RawNode`] to a
//! [`StyleRecord`]. It is pure: the same node content always yields the same
//! record, and properties that are absent, invisible or equal to their
//! default are left out so they cannot split otherwise identical styles.
//!
//! Rules:
//! - colors quantize to 8 bits per channel; paint opacity multiplies alpha
//! - numbers round to two decimal places
//! - invisible paints and effects are dropped, as are unknown paint and
//!   effect types and solid paints without a color
//! - `strokeWeight` only accompanies visible strokes
//! - defaults omitted: opacity 1, corner radius 0, stroke weight 0,
//!   padding/spacing 0, alignment `MIN`, font weight 400, letter spacing 0,
//!   text align `LEFT`, text case `ORIGINAL`, layout mode `NONE`

use crate::raw::{
    LayoutProps, RawColor, RawEffect, RawNode, RawNodeKind, RawPaint, TextProps, VisualProps,
};
use dsir_style::{
    Blur, Color, CornerRadius, Effect, GradientKind, GradientPaint, GradientStop, ImagePaint,
    LayoutMode, LayoutStyle, Paint, Scalar, Shadow, StyleRecord, TextStyle,
};

const DEFAULT_FONT_WEIGHT: u16 = 400;

/// Normalizes one node's visual and layout properties
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleExtractor;

impl StyleExtractor {
    /// Create extractor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract the canonical style record of `node`
    ///
    /// Generic nodes produce an empty record.
    #[must_use]
    pub fn extract(&self, node: &RawNode<'_>) -> StyleRecord {
        match &node.kind {
            RawNodeKind::Container { visual, layout } => StyleRecord {
                layout: layout_style(layout),
                ..visual_record(visual)
            },
            RawNodeKind::Shape { visual } => visual_record(visual),
            RawNodeKind::Text { visual, text } => StyleRecord {
                text: text_style(text),
                ..visual_record(visual)
            },
            RawNodeKind::Generic => StyleRecord::default(),
        }
    }
}

fn visual_record(visual: &VisualProps) -> StyleRecord {
    let fills = paints(&visual.fills);
    let strokes = paints(&visual.strokes);
    let stroke_weight = if strokes.is_empty() {
        None
    } else {
        Scalar::non_zero(visual.stroke_weight)
    };

    StyleRecord {
        fills,
        strokes,
        stroke_weight,
        corner_radius: corner_radius(visual),
        effects: visual.effects.iter().filter_map(effect).collect(),
        opacity: Scalar::unless_default(visual.opacity, 1.0),
        layout: None,
        text: None,
    }
}

fn color(raw: RawColor, opacity: f64) -> Color {
    Color::from_unit(raw.r, raw.g, raw.b, raw.a * opacity)
}

fn paints(raw: &[RawPaint]) -> Vec<Paint> {
    raw.iter().filter_map(paint).collect()
}

fn paint(raw: &RawPaint) -> Option<Paint> {
    if raw.visible == Some(false) {
        return None;
    }
    let opacity = raw.opacity.unwrap_or(1.0);

    match raw.paint_type.as_str() {
        "SOLID" => Some(Paint::Solid(color(raw.color?, opacity))),
        "IMAGE" => Some(Paint::Image(ImagePaint {
            image_ref: raw.image_ref.clone()?,
            scale_mode: raw.scale_mode.clone(),
        })),
        tag => {
            let kind = GradientKind::from_tag(tag)?;
            let stops = raw
                .gradient_stops
                .iter()
                .filter_map(|stop| {
                    Some(GradientStop {
                        position: Scalar::new(stop.position)?,
                        color: color(stop.color, opacity),
                    })
                })
                .collect();
            Some(Paint::Gradient(GradientPaint { kind, stops }))
        }
    }
}

fn corner_radius(visual: &VisualProps) -> Option<CornerRadius> {
    if let Some(radii) = visual.rectangle_corner_radii {
        let corners = radii.map(|r| Scalar::new(r).unwrap_or(Scalar::ZERO));
        if corners.iter().all(|c| c.is_zero()) {
            return None;
        }
        if corners.iter().all(|c| *c == corners[0]) {
            return Some(CornerRadius::Uniform(corners[0]));
        }
        return Some(CornerRadius::PerCorner(corners));
    }
    Scalar::non_zero(visual.corner_radius).map(CornerRadius::Uniform)
}

fn effect(raw: &RawEffect) -> Option<Effect> {
    if raw.visible == Some(false) {
        return None;
    }
    let radius = Scalar::new(raw.radius.unwrap_or(0.0)).unwrap_or(Scalar::ZERO);

    match raw.effect_type.as_str() {
        "DROP_SHADOW" => shadow(raw, radius).map(Effect::DropShadow),
        "INNER_SHADOW" => shadow(raw, radius).map(Effect::InnerShadow),
        "LAYER_BLUR" => Some(Effect::LayerBlur(Blur { radius })),
        "BACKGROUND_BLUR" => Some(Effect::BackgroundBlur(Blur { radius })),
        _ => None,
    }
}

fn shadow(raw: &RawEffect, radius: Scalar) -> Option<Shadow> {
    let offset = raw.offset.unwrap_or_default();
    Some(Shadow {
        color: color(raw.color?, 1.0),
        offset: [
            Scalar::new(offset.x).unwrap_or(Scalar::ZERO),
            Scalar::new(offset.y).unwrap_or(Scalar::ZERO),
        ],
        radius,
        spread: Scalar::non_zero(raw.spread),
    })
}

fn layout_style(layout: &LayoutProps) -> Option<LayoutStyle> {
    let mode = LayoutMode::from_tag(layout.layout_mode.as_deref()?)?;

    let padding = [
        layout.padding_top,
        layout.padding_right,
        layout.padding_bottom,
        layout.padding_left,
    ]
    .map(|p| Scalar::new(p.unwrap_or(0.0)).unwrap_or(Scalar::ZERO));

    Some(LayoutStyle {
        mode,
        padding: (!padding.iter().all(|p| p.is_zero())).then_some(padding),
        item_spacing: Scalar::non_zero(layout.item_spacing),
        primary_axis_align: keyword(layout.primary_axis_align_items.as_deref(), "MIN"),
        counter_axis_align: keyword(layout.counter_axis_align_items.as_deref(), "MIN"),
        wrap: layout.layout_wrap.as_deref() == Some("WRAP"),
    })
}

fn text_style(text: &TextProps) -> Option<TextStyle> {
    let raw = text.style.as_ref()?;
    let style = TextStyle {
        font_family: raw.font_family.clone().filter(|f| !f.is_empty()),
        font_size: raw.font_size.and_then(Scalar::new),
        font_weight: raw
            .font_weight
            .and_then(font_weight)
            .filter(|w| *w != DEFAULT_FONT_WEIGHT),
        line_height: raw.line_height_px.and_then(Scalar::new),
        letter_spacing: Scalar::non_zero(raw.letter_spacing),
        text_align: keyword(raw.text_align_horizontal.as_deref(), "LEFT"),
        text_case: keyword(raw.text_case.as_deref(), "ORIGINAL"),
    };
    (!style.is_empty()).then_some(style)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn font_weight(raw: f64) -> Option<u16> {
    (raw.is_finite() && raw > 0.0 && raw <= f64::from(u16::MAX)).then(|| raw.round() as u16)
}

fn keyword(tag: Option<&str>, default: &str) -> Option<String> {
    let tag = tag.filter(|t| !t.is_empty())?;
    (tag != default).then(|| tag.to_ascii_lowercase())
}
