use rlpd_core::{
    Control, EditError, EditorOptions, Mode, Representation, RootController, Tree, Value,
};

fn leaf(b: &[u8]) -> Value {
    Value::leaf(b.to_vec())
}

fn minimal_be(b: &[u8]) -> Vec<u8> {
    let v = b.iter().fold(0u64, |acc, x| (acc << 8) | *x as u64);
    let be = v.to_be_bytes();
    let skip = be.iter().take_while(|x| **x == 0).count().min(7);
    be[skip..].to_vec()
}

fn byte_samples(max_len: usize) -> Vec<Vec<u8>> {
    let mut out = vec![Vec::new()];
    for len in 1..=max_len {
        out.push(vec![0x00; len]);
        out.push(vec![0xff; len]);
        let mut mixed: Vec<u8> = (0..len as u8).map(|i| i.wrapping_mul(37)).collect();
        out.push(mixed.clone());
        mixed[0] = 0;
        out.push(mixed);
    }
    out
}

#[test]
fn uint_reencodes_minimal_form() {
    let opts = EditorOptions::default();
    for b in byte_samples(8) {
        let text = Representation::UnsignedInt.decode(&b, &opts).unwrap();
        assert_eq!(
            Representation::UnsignedInt.encode(&text),
            Some(minimal_be(&b)),
            "bytes {:02x?}",
            b
        );
    }
}

#[test]
fn timestamp_reencodes_minimal_form() {
    let opts = EditorOptions::default();
    for b in byte_samples(4) {
        match Representation::Timestamp.decode(&b, &opts) {
            Some(text) => assert_eq!(Representation::Timestamp.encode(&text), Some(minimal_be(&b))),
            // only the zero timestamp has no rendering
            None => assert!(b.iter().all(|x| *x == 0), "bytes {:02x?}", b),
        }
    }
}

#[test]
fn hex_identity() {
    let opts = EditorOptions::default();
    for b in byte_samples(12) {
        let text = Representation::Hex.decode(&b, &opts).unwrap();
        assert_eq!(Representation::Hex.encode(&text), Some(b));
    }
}

#[test]
fn utf8_rejection() {
    let opts = EditorOptions::default();
    for c0 in (0x00u8..=0x1f).filter(|c| !matches!(c, 0x09 | 0x0a | 0x0d)) {
        assert_eq!(Representation::Utf8.decode(&[b'a', c0], &opts), None);
    }
    for ws in [0x09u8, 0x0a, 0x0d] {
        assert!(Representation::Utf8.decode(&[ws], &opts).is_some());
    }
    assert_eq!(Representation::Utf8.decode(&[0xc2], &opts), None);
}

#[test]
fn validity_propagation_independent_of_sibling_edits() {
    let mut tree = Tree::from_value(
        Value::List(vec![leaf(b"A"), leaf(b"B"), leaf(b"C")]),
        EditorOptions::default(),
    );
    let a = tree.resolve("/0").unwrap();
    let b = tree.resolve("/1").unwrap();
    let c = tree.resolve("/2").unwrap();

    assert!(tree.edit_text(b, "0xq").unwrap().invalid);
    assert!(tree.edit_text(c, "0x43").unwrap().invalid);
    assert!(tree.edit_text(a, "0x41").unwrap().invalid);
    let note = tree.edit_text(b, "0x42").unwrap();
    assert!(!note.invalid);
    assert!(tree.is_valid());
}

#[test]
fn insert_after_renumbers_invalid_child() {
    let mut tree = Tree::from_value(
        Value::List(vec![leaf(b"A"), leaf(b"B"), leaf(b"C")]),
        EditorOptions::default(),
    );
    let a = tree.resolve("/0").unwrap();
    let b = tree.resolve("/1").unwrap();
    tree.edit_text(b, "not hex").unwrap();
    tree.insert_after(a).unwrap();

    let root = tree.list(tree.root()).unwrap();
    assert_eq!(root.invalid_children().iter().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(root.children()[2], b);
    assert_eq!(
        root.value(),
        &[leaf(b"A"), leaf(&[0x00]), leaf(b"B"), leaf(b"C")]
    );
}

#[test]
fn switching_to_unrenderable_view_reports_invalid() {
    let mut tree = Tree::from_value(Value::List(vec![leaf(&[0x00])]), EditorOptions::default());
    let id = tree.resolve("/0").unwrap();
    tree.select(id, Representation::UnsignedInt).unwrap();
    assert_eq!(tree.leaf(id).unwrap().text(), "0");

    let note = tree.select(id, Representation::Timestamp).unwrap();
    assert!(note.invalid);
    let state = tree.leaf(id).unwrap();
    assert_eq!(state.value(), None);
    assert_eq!(state.text(), "");
    // the list still holds the last good bytes, but reports invalid
    assert_eq!(tree.value(), Some(Value::List(vec![leaf(&[0x00])])));
    assert!(!tree.is_valid());

    tree.edit_text(id, "2020-01-01").unwrap();
    assert!(tree.is_valid());
    assert_eq!(tree.value(), Some(Value::List(vec![leaf(&[0x5e, 0x0b, 0xe1, 0x00])])));
}

#[test]
fn oversized_leaf_has_no_timestamp_view() {
    let mut tree = Tree::from_value(leaf(&[1, 2, 3, 4, 5]), EditorOptions::default());
    let root = tree.root();
    let note = tree.select(root, Representation::Timestamp).unwrap();
    assert!(note.invalid);
    assert_eq!(note.value, None);
}

#[test]
fn end_to_end_decode_edit_encode() {
    let mut c = RootController::default();
    c.set_input("c382746f").unwrap();
    assert_eq!(c.decode_control().label, "Decode");
    c.enter_decoded().unwrap();

    let tree = c.tree().unwrap();
    assert_eq!(tree.value(), Some(Value::List(vec![leaf(&[0x74, 0x6f])])));
    let id = tree.resolve("/0").unwrap();

    c.select(id, Representation::Utf8).unwrap();
    let note = c.edit_text(id, "hi").unwrap();
    assert_eq!(note.value, Some(Value::List(vec![leaf(&[0x68, 0x69])])));
    assert_eq!(c.wire_text(), Some("0xc3826869"));
    assert_eq!(c.encode_control(), Control { enabled: true, label: "Encode" });

    c.leave_decoded().unwrap();
    assert_eq!(c.mode(), Mode::Encoded);
    assert_eq!(c.input(), "0xc3826869");
}

#[test]
fn overlong_list_prefix_is_rejected() {
    // declares a 6-byte payload but carries 3
    let mut c = RootController::default();
    c.set_input("c682746f").unwrap();
    assert_eq!(c.decode_control().label, "RLP decode error");
    assert!(c.tree().is_none());
    assert_eq!(c.enter_decoded(), Err(EditError::NoTree));
}

#[test]
fn nested_structural_edits_reach_wire_text() {
    let mut c = RootController::default();
    c.set_input("0xc4c3820102").unwrap();
    c.enter_decoded().unwrap();
    let inner = c.tree().unwrap().resolve("/0/0").unwrap();

    c.wrap_into_list(inner).unwrap();
    assert_eq!(c.wire_text(), Some("0xc5c4c3820102"));

    let wrapper = c.tree().unwrap().resolve("/0/0").unwrap();
    c.insert_at_head(wrapper).unwrap();
    assert_eq!(c.wire_text(), Some("0xc6c5c400820102"));

    let placeholder = c.tree().unwrap().resolve("/0/0/0").unwrap();
    c.remove(placeholder).unwrap();
    assert_eq!(c.wire_text(), Some("0xc5c4c3820102"));

    let err = c.wrap_into_list(wrapper).unwrap_err();
    assert_eq!(err, EditError::NotALeaf(wrapper));
    assert_eq!(c.wire_text(), Some("0xc5c4c3820102"));
}

#[test]
fn snapshot_without_front_end() {
    let mut c = RootController::default();
    c.set_input("c3 82 74 6f").unwrap();
    c.enter_decoded().unwrap();
    let id = c.tree().unwrap().resolve("/0").unwrap();
    c.select(id, Representation::UnsignedInt).unwrap();
    let snap = c.tree().unwrap().snapshot();
    assert_eq!(
        snap,
        serde_json::json!({
            "kind": "list",
            "invalidChildren": [],
            "children": [{
                "kind": "leaf",
                "selected": "uint",
                "value": "746f",
                "views": {
                    "hex": "746f",
                    "utf8": "to",
                    "uint": "29807",
                    "timestamp": "1970-01-01T08:16:47.000Z"
                },
                "draft": null,
                "valid": true
            }]
        })
    );
}

#[test]
fn epoch_timestamp_edit_is_valid() {
    let mut c = RootController::default();
    c.set_input("c10a").unwrap();
    c.enter_decoded().unwrap();
    let id = c.tree().unwrap().resolve("/0").unwrap();
    c.select(id, Representation::Timestamp).unwrap();
    let note = c.edit_text(id, "1970-01-01T00:00:00Z").unwrap();
    assert!(!note.invalid);
    assert_eq!(note.value, Some(Value::List(vec![leaf(&[])])));
    assert_eq!(c.wire_text(), Some("0xc180"));
}
