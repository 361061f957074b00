//! Parse/serialize round trips across the whole workspace.

mod support;

use facet_testhelpers::test;
use jsontree::{Node, from_slice, to_vec};
use support::leaf;

fn round_trip(input: &str) -> String {
    let root: Node<String> = from_slice(input.as_bytes()).expect("document should parse");
    String::from_utf8(to_vec(&root).expect("tree should serialize")).unwrap()
}

#[test]
fn test_documents_round_trip_exactly() {
    for input in [
        r#"{"a":"b"}"#,
        r#"{"":""}"#,
        r#"{"root":{"b":"3","c":"1","a":"2"}}"#,
        r#"{"root":{"a":"v1","b":{"b1":{"b11":"v3"},"b2":"v2"}}}"#,
        r#"{"ro\"ot":{"{a}":"\"hello\"","b}":"\\backslash\nnewline"}}"#,
        r#"{"k":{"\\":"\u00e9","x\\\"y":"tab\there"}}"#,
    ] {
        assert_eq!(round_trip(input), input);
    }
}

#[test]
fn test_raw_bytes_round_trip() {
    let input = b"{\"r\":{\"\xc3\xa9\":\"\xff\xfe\"}}";
    let root: Node<Vec<u8>> = from_slice(input).unwrap();
    assert_eq!(root.lookup(&[b"\xc3\xa9"]).and_then(|n| n.value.clone()), Some(vec![0xff, 0xfe]));
    assert_eq!(to_vec(&root).unwrap(), input);
}

#[test]
fn test_built_tree_round_trips() {
    let mut root = Node::new("config");
    root.get_or_create(&["server", "host"])
        .unwrap()
        .set_value("localhost".to_string());
    root.get_or_create(&["server", "port"])
        .unwrap()
        .set_value("8080".to_string());
    root.get_or_create(&["name"]).unwrap().set_value("demo".to_string());

    let bytes = to_vec(&root).unwrap();
    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        r#"{"config":{"server":{"host":"localhost","port":"8080"},"name":"demo"}}"#
    );
    assert_eq!(from_slice::<String>(&bytes).unwrap(), root);
}

#[test]
fn test_output_is_valid_json() {
    let root = Node::branch(
        "root",
        [
            leaf("quote", r#"say \"hi\""#),
            Node::branch("nested", [leaf("path", r"C:\\temp"), leaf("nl", r"a\nb")]),
        ],
    );
    let bytes = to_vec(&root).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["root"]["quote"], r#"say "hi""#);
    assert_eq!(json["root"]["nested"]["path"], r"C:\temp");
    assert_eq!(json["root"]["nested"]["nl"], "a\nb");
}

mod proptests {
    use proptest::prelude::*;

    use super::round_trip;

    /// Key or value content that is valid inside JSON quotes.
    fn raw_string() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                6 => prop::string::string_regex("[a-z0-9{}:, ]").unwrap(),
                1 => Just(r#"\""#.to_string()),
                1 => Just(r"\\".to_string()),
                1 => Just(r"\t".to_string()),
                1 => Just(r"\u0041".to_string()),
            ],
            0..5,
        )
        .prop_map(|parts| parts.concat())
    }

    /// A document in the restricted dialect, built as text.
    fn member() -> impl Strategy<Value = String> {
        let leaf = (raw_string(), raw_string()).prop_map(|(k, v)| format!(r#""{k}":"{v}""#));
        leaf.prop_recursive(4, 24, 4, |inner| {
            (raw_string(), prop::collection::vec(inner, 1..4)).prop_map(|(key, members)| {
                // Prefix each child with its index to keep sibling keys unique.
                let body = members
                    .iter()
                    .enumerate()
                    .map(|(i, m)| format!("\"{i}{}", &m[1..]))
                    .collect::<Vec<_>>()
                    .join(",");
                format!(r#""{key}":{{{body}}}"#)
            })
        })
    }

    proptest! {
        #[test]
        fn parse_then_serialize_is_identity(body in member()) {
            let document = format!("{{{body}}}");
            prop_assert_eq!(round_trip(&document), document.clone());

            let json: Result<serde_json::Value, _> = serde_json::from_str(&document);
            prop_assert!(json.is_ok(), "not valid JSON: {}", document);
        }
    }
}
