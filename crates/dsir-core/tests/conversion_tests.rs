use dsir_core::{
    convert, ConversionPhase, ConvertError, ConvertOptions, NodeIssue, SimplifiedDesign,
    SimplifiedNode,
};
use dsir_test_utils::{
    auto_layout_frame, convert_collecting, file_response, frame, image_fill, nested_chain,
    node_of_type, node_response, rectangle, solid_fill, text, to_json,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashSet;

fn all_nodes(design: &SimplifiedDesign) -> Vec<&SimplifiedNode> {
    design.nodes.iter().flat_map(SimplifiedNode::preorder).collect()
}

fn node<'d>(design: &'d SimplifiedDesign, id: &str) -> &'d SimplifiedNode {
    all_nodes(design)
        .into_iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("node {id} missing"))
}

#[test]
fn test_identical_styles_share_one_entry() {
    let input = file_response(vec![
        rectangle("1:1", vec![solid_fill(1.0, 0.0, 0.0)]),
        rectangle("1:2", vec![solid_fill(1.0, 0.0, 0.0)]),
    ]);
    let (out, sink) = convert_collecting(&input, &ConvertOptions::new());
    assert!(sink.issues.is_empty());

    let a = node(&out.design, "1:1");
    let b = node(&out.design, "1:2");
    assert_eq!(a.style_refs.len(), 1);
    assert_eq!(a.style_refs, b.style_refs);
    assert_eq!(out.design.global_vars.len(), 1);

    let record = &out.design.global_vars[&a.style_refs[0]];
    assert_eq!(
        serde_json::to_value(record).unwrap(),
        json!({"fills": [{"type": "SOLID", "color": "#FF0000"}]})
    );
}

#[test]
fn test_distinct_style_adds_second_entry() {
    let input = file_response(vec![
        rectangle("1:1", vec![solid_fill(1.0, 0.0, 0.0)]),
        rectangle("1:2", vec![solid_fill(1.0, 0.0, 0.0)]),
        rectangle("1:3", vec![solid_fill(0.0, 0.0, 1.0)]),
    ]);
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());
    assert_eq!(out.design.global_vars.len(), 2);
    assert_ne!(
        node(&out.design, "1:1").style_refs,
        node(&out.design, "1:3").style_refs
    );
}

#[test]
fn test_depth_zero_returns_requested_node_only() {
    let input = node_response(frame(
        "1:2",
        vec![rectangle("2:1", vec![]), text("2:2", "Label")],
    ));
    let options = ConvertOptions::new().with_node_id("1:2").with_max_depth(0);
    let (out, sink) = convert_collecting(&input, &options);

    assert_eq!(out.design.nodes.len(), 1);
    assert_eq!(out.design.nodes[0].id, "1:2");
    assert!(out.design.nodes[0].children.is_empty());
    assert_eq!(sink.summary.unwrap().walk.truncated, 1);
}

#[test]
fn test_unknown_type_becomes_generic_node() {
    let mut widget = node_of_type("3:1", "WIDGET");
    widget["fills"] = json!([solid_fill(0.0, 1.0, 0.0)]);
    let input = file_response(vec![widget, rectangle("3:2", vec![solid_fill(0.0, 1.0, 0.0)])]);
    let (out, sink) = convert_collecting(&input, &ConvertOptions::new());

    let generic = node(&out.design, "3:1");
    assert_eq!(
        serde_json::to_value(generic).unwrap(),
        json!({"id": "3:1", "name": "WIDGET", "type": "WIDGET", "children": []})
    );
    assert!(sink.issues.iter().any(|i| matches!(
        i,
        NodeIssue::UnsupportedType { node_type, .. } if node_type == "WIDGET"
    )));
    // the sibling still converts normally
    assert_eq!(node(&out.design, "3:2").style_refs.len(), 1);
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let input = file_response(vec![
        auto_layout_frame(
            "1:1",
            "HORIZONTAL",
            vec![
                text("2:1", "Buy"),
                rectangle("2:2", vec![image_fill("hero"), solid_fill(0.2, 0.4, 0.6)]),
            ],
        ),
        rectangle("1:2", vec![solid_fill(0.2, 0.4, 0.6)]),
    ]);
    let (first, _) = convert_collecting(&input, &ConvertOptions::new());
    let (second, _) = convert_collecting(&input, &ConvertOptions::new());
    assert_eq!(to_json(&first), to_json(&second));

    let first_ids: Vec<_> = first.design.global_vars.keys().collect();
    let second_ids: Vec<_> = second.design.global_vars.keys().collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn test_every_reference_resolves_and_every_entry_is_used() {
    let input = file_response(vec![
        auto_layout_frame("1:1", "VERTICAL", vec![text("2:1", "A"), text("2:2", "B")]),
        rectangle("1:2", vec![solid_fill(0.5, 0.5, 0.5)]),
        frame("1:3", vec![rectangle("2:3", vec![solid_fill(0.5, 0.5, 0.5)])]),
    ]);
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());

    let referenced: HashSet<_> = all_nodes(&out.design)
        .iter()
        .flat_map(|n| n.style_refs.iter().map(|id| id.as_str().to_string()))
        .collect();
    for id in &referenced {
        assert!(out.design.global_vars.contains_key(id.as_str()), "dangling {id}");
    }
    for id in out.design.global_vars.keys() {
        assert!(referenced.contains(id.as_str()), "orphan {id}");
    }
}

#[test]
fn test_sibling_order_preserved() {
    let ids = ["1:5", "1:3", "1:9", "1:1"];
    let input = file_response(ids.iter().map(|id| rectangle(id, vec![])).collect());
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());
    let page = &out.design.nodes[0];
    let got: Vec<_> = page.children.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(got, ids);
}

#[test]
fn test_file_roots_are_top_level_children() {
    let input = file_response(vec![rectangle("1:1", vec![])]);
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());
    assert_eq!(out.design.nodes.len(), 1);
    assert_eq!(out.design.nodes[0].node_type, "CANVAS");
    assert_eq!(out.design.metadata.name, "Fixture");
}

#[test]
fn test_missing_start_node_fails() {
    let input = file_response(vec![rectangle("1:1", vec![])]);
    let mut sink = dsir_core::CollectingSink::new();
    let err = convert(&input, &ConvertOptions::new().with_node_id("404:1"), &mut sink).unwrap_err();
    assert!(matches!(err, ConvertError::NodeNotFound(ref id) if id == "404:1"));
    assert_eq!(sink.phases, vec![ConversionPhase::Start]);
}

#[test]
fn test_invalid_envelope_fails() {
    let mut sink = dsir_core::CollectingSink::new();
    let err = convert(&json!({"nodes": []}), &ConvertOptions::new(), &mut sink).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidDocument(_)));
}

#[test]
fn test_streamed_json_equals_serde() {
    let input = file_response(vec![
        text("1:1", "Hello"),
        rectangle("1:2", vec![image_fill("img")]),
    ]);
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());
    assert_eq!(to_json(&out), serde_json::to_vec(&out.design).unwrap());

    let parsed: Value = serde_json::from_slice(&to_json(&out)).unwrap();
    let keys: Vec<_> = parsed.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["metadata", "nodes", "globalVars"]);
}

#[test]
fn test_yaml_output() {
    let input = file_response(vec![text("1:1", "Hello")]);
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());
    let mut yaml = Vec::new();
    out.design.write_yaml(&mut yaml).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_slice(&yaml).unwrap();
    assert_eq!(parsed["metadata"]["name"], serde_yaml::Value::from("Fixture"));
}

#[test]
fn test_images_in_preorder() {
    let input = file_response(vec![
        frame("1:1", vec![rectangle("2:1", vec![image_fill("a")])]),
        rectangle("1:2", vec![image_fill("b"), image_fill("a")]),
    ]);
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());
    let pairs: Vec<_> = out
        .images
        .iter()
        .map(|r| (r.node_id.as_str(), r.image_ref.as_str()))
        .collect();
    assert_eq!(pairs, vec![("2:1", "a"), ("1:2", "b"), ("1:2", "a")]);
}

#[test]
fn test_text_and_layout_styles() {
    let input = file_response(vec![auto_layout_frame(
        "1:1",
        "HORIZONTAL",
        vec![text("2:1", "Title")],
    )]);
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());

    let row = node(&out.design, "1:1");
    let layout = &out.design.global_vars[&row.style_refs[0]];
    assert_eq!(
        serde_json::to_value(layout).unwrap(),
        json!({"layout": {"mode": "row", "padding": [12, 16, 12, 16], "itemSpacing": 8}})
    );

    let title = node(&out.design, "2:1");
    assert_eq!(title.text.as_deref(), Some("Title"));
    let style = &out.design.global_vars[&title.style_refs[0]];
    assert_eq!(
        serde_json::to_value(style).unwrap(),
        json!({"text": {"fontFamily": "Inter", "fontSize": 16, "fontWeight": 600}})
    );
}

#[test]
fn test_depth_bound_on_deep_chain() {
    let input = node_response(nested_chain(10));
    let options = ConvertOptions::new().with_max_depth(3);
    let (out, _) = convert_collecting(&input, &options);
    let depth = |mut n: &SimplifiedNode| {
        let mut d = 0;
        while let Some(child) = n.children.first() {
            n = child;
            d += 1;
        }
        d
    };
    assert_eq!(depth(&out.design.nodes[0]), 3);
}

#[test]
fn test_hidden_nodes_dropped_by_default() {
    let mut hidden = rectangle("1:1", vec![solid_fill(1.0, 1.0, 1.0)]);
    hidden["visible"] = json!(false);
    let input = file_response(vec![hidden, rectangle("1:2", vec![])]);

    let (out, _) = convert_collecting(&input, &ConvertOptions::new());
    assert_eq!(all_nodes(&out.design).len(), 2);
    assert!(out.design.global_vars.is_empty());

    let (out, _) = convert_collecting(&input, &ConvertOptions::new().with_hidden(true));
    assert_eq!(all_nodes(&out.design).len(), 3);
}

#[test]
fn test_requested_hidden_node_is_still_returned() {
    let mut target = frame(
        "1:2",
        vec![rectangle("2:1", vec![solid_fill(0.0, 1.0, 0.0)])],
    );
    target["visible"] = json!(false);
    let input = file_response(vec![target]);

    let (out, sink) = convert_collecting(&input, &ConvertOptions::new().with_node_id("1:2"));
    assert_eq!(out.design.nodes.len(), 1);
    assert_eq!(out.design.nodes[0].id, "1:2");
    assert_eq!(out.design.nodes[0].children.len(), 1);
    assert_eq!(sink.summary.unwrap().walk.skipped_hidden, 0);

    // without a start node the hidden frame is dropped as usual
    let (out, _) = convert_collecting(&input, &ConvertOptions::new());
    assert!(out.design.nodes[0].children.is_empty());
}

#[test]
fn test_malformed_child_skipped() {
    let input = file_response(vec![
        json!({"name": "anonymous", "type": "RECTANGLE"}),
        rectangle("1:2", vec![]),
    ]);
    let (out, sink) = convert_collecting(&input, &ConvertOptions::new());
    let page = &out.design.nodes[0];
    assert_eq!(page.children.len(), 1);
    assert!(sink.issues.iter().any(NodeIssue::drops_node));
}
