use dsir_core::{ConvertOptions, SimplifiedNode};
use dsir_test_utils::{convert_collecting, file_response, to_json};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;

const PALETTE: [(f64, f64, f64); 4] = [
    (1.0, 0.0, 0.0),
    (0.0, 0.0, 1.0),
    (0.2, 0.4, 0.6),
    (0.0, 0.0, 0.0),
];

/// Raw tree shape without ids
#[derive(Debug, Clone)]
enum Shape {
    Leaf { color: Option<usize>, radius: u8 },
    Frame { color: Option<usize>, children: Vec<Shape> },
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = (proptest::option::of(0..PALETTE.len()), 0u8..3)
        .prop_map(|(color, radius)| Shape::Leaf { color, radius });
    leaf.prop_recursive(5, 48, 4, |inner| {
        (
            proptest::option::of(0..PALETTE.len()),
            proptest::collection::vec(inner, 0..4),
        )
            .prop_map(|(color, children)| Shape::Frame { color, children })
    })
}

fn fills(color: Option<usize>) -> Value {
    match color {
        Some(i) => {
            let (r, g, b) = PALETTE[i];
            json!([{"type": "SOLID", "color": {"r": r, "g": g, "b": b, "a": 1}}])
        }
        None => json!([]),
    }
}

fn materialize(shape: &Shape, next_id: &mut usize) -> Value {
    let id = format!("9:{next_id}");
    *next_id += 1;
    match shape {
        Shape::Leaf { color, radius } => json!({
            "id": id, "name": "leaf", "type": "RECTANGLE",
            "fills": fills(*color), "cornerRadius": radius
        }),
        Shape::Frame { color, children } => {
            let children: Vec<Value> = children.iter().map(|c| materialize(c, next_id)).collect();
            json!({
                "id": id, "name": "frame", "type": "FRAME",
                "fills": fills(*color), "children": children
            })
        }
    }
}

fn input_for(shapes: &[Shape]) -> Value {
    let mut next_id = 0;
    file_response(shapes.iter().map(|s| materialize(s, &mut next_id)).collect())
}

fn max_depth(node: &SimplifiedNode) -> usize {
    node.children.iter().map(|c| 1 + max_depth(c)).max().unwrap_or(0)
}

proptest! {
    #[test]
    fn prop_output_is_idempotent(shapes in proptest::collection::vec(shape_strategy(), 0..4)) {
        let input = input_for(&shapes);
        let (first, _) = convert_collecting(&input, &ConvertOptions::new());
        let (second, _) = convert_collecting(&input, &ConvertOptions::new());
        prop_assert_eq!(to_json(&first), to_json(&second));
    }

    #[test]
    fn prop_depth_bound_holds(
        shapes in proptest::collection::vec(shape_strategy(), 1..4),
        depth in 0usize..5,
    ) {
        let input = input_for(&shapes);
        let (out, _) = convert_collecting(&input, &ConvertOptions::new().with_max_depth(depth));
        for root in &out.design.nodes {
            prop_assert!(max_depth(root) <= depth);
        }
    }

    #[test]
    fn prop_refs_resolve_and_dedup_by_content(
        shapes in proptest::collection::vec(shape_strategy(), 1..4),
    ) {
        let input = input_for(&shapes);
        let (out, _) = convert_collecting(&input, &ConvertOptions::new());
        let design = &out.design;

        // canonical bytes -> id must be a bijection
        let mut by_content: HashMap<Vec<u8>, String> = HashMap::new();
        for node in design.nodes.iter().flat_map(SimplifiedNode::preorder) {
            prop_assert!(node.style_refs.len() <= 1);
            for id in &node.style_refs {
                let record = design.global_vars.get(id.as_str());
                prop_assert!(record.is_some(), "dangling {}", id);
                let bytes = serde_json::to_vec(record.unwrap()).unwrap();
                let known = by_content.entry(bytes).or_insert_with(|| id.as_str().to_string());
                prop_assert_eq!(known.as_str(), id.as_str());
            }
        }
        prop_assert_eq!(by_content.len(), design.global_vars.len());
    }
}
