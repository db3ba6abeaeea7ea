//! Testing utilities for DSIR workspace
//!
//! Raw-node fixture builders and a conversion helper that collects
//! diagnostics.

#![allow(missing_docs)]

use dsir_core::{convert, CollectingSink, Conversion, ConvertOptions};
use serde_json::{json, Value};

pub fn solid_fill(r: f64, g: f64, b: f64) -> Value {
    json!({"type": "SOLID", "color": {"r": r, "g": g, "b": b, "a": 1.0}})
}

pub fn image_fill(image_ref: &str) -> Value {
    json!({"type": "IMAGE", "imageRef": image_ref, "scaleMode": "FILL"})
}

pub fn bounds(x: f64, y: f64, width: f64, height: f64) -> Value {
    json!({"x": x, "y": y, "width": width, "height": height})
}

pub fn rectangle(id: &str, fills: Vec<Value>) -> Value {
    json!({
        "id": id,
        "name": format!("Rectangle {id}"),
        "type": "RECTANGLE",
        "fills": fills,
        "absoluteBoundingBox": bounds(0.0, 0.0, 100.0, 50.0),
    })
}

pub fn frame(id: &str, children: Vec<Value>) -> Value {
    json!({
        "id": id,
        "name": format!("Frame {id}"),
        "type": "FRAME",
        "children": children,
    })
}

pub fn auto_layout_frame(id: &str, mode: &str, children: Vec<Value>) -> Value {
    json!({
        "id": id,
        "name": format!("Frame {id}"),
        "type": "FRAME",
        "layoutMode": mode,
        "itemSpacing": 8,
        "paddingLeft": 16, "paddingRight": 16, "paddingTop": 12, "paddingBottom": 12,
        "children": children,
    })
}

pub fn text(id: &str, characters: &str) -> Value {
    json!({
        "id": id,
        "name": characters,
        "type": "TEXT",
        "characters": characters,
        "style": {"fontFamily": "Inter", "fontSize": 16, "fontWeight": 600},
    })
}

pub fn node_of_type(id: &str, node_type: &str) -> Value {
    json!({"id": id, "name": node_type, "type": node_type})
}

/// Wrap top-level nodes in a file response
pub fn file_response(children: Vec<Value>) -> Value {
    json!({
        "name": "Fixture",
        "lastModified": "2024-01-01T00:00:00Z",
        "version": "1",
        "document": {
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [{
                "id": "0:1",
                "name": "Page 1",
                "type": "CANVAS",
                "children": children,
            }],
        },
        "components": {},
        "componentSets": {},
    })
}

/// Wrap one node in a node response keyed by its id
pub fn node_response(node: Value) -> Value {
    let id = node["id"].as_str().unwrap_or_default().to_string();
    json!({
        "name": "Fixture",
        "lastModified": "2024-01-01T00:00:00Z",
        "nodes": {
            id: {"document": node, "components": {}, "componentSets": {}},
        },
    })
}

/// A chain of nested frames `depth` levels deep, ending in a rectangle
pub fn nested_chain(depth: usize) -> Value {
    let mut node = rectangle(&format!("{depth}:0"), vec![solid_fill(0.0, 0.0, 0.0)]);
    for level in (0..depth).rev() {
        node = frame(&format!("{level}:0"), vec![node]);
    }
    node
}

pub fn convert_collecting(input: &Value, options: &ConvertOptions) -> (Conversion, CollectingSink) {
    let mut sink = CollectingSink::new();
    let conversion = convert(input, options, &mut sink).unwrap();
    (conversion, sink)
}

pub fn to_json(conversion: &Conversion) -> Vec<u8> {
    let mut out = Vec::new();
    conversion.design.write_json(&mut out).unwrap();
    out
}
