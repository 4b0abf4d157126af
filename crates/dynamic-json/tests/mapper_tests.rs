use std::collections::{BTreeMap, HashMap};

use dynamic_json::{from_node, from_str, parse, JsonError, Node};
use serde::Deserialize;

fn assert_schema_mismatch<T: std::fmt::Debug>(result: dynamic_json::Result<T>) {
    match result {
        Err(JsonError::SchemaMismatch(_)) => {}
        other => panic!("expected schema mismatch, got {other:?}"),
    }
}

fn assert_unsupported_shape<T: std::fmt::Debug>(result: dynamic_json::Result<T>) {
    match result {
        Err(JsonError::UnsupportedShape(_)) => {}
        other => panic!("expected unsupported shape, got {other:?}"),
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Pair {
    a: i32,
    b: f64,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Listing {
    title: String,
    price: Option<u32>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(rename = "inStock")]
    in_stock: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
enum Status {
    Active,
    Closed,
    Pending(u8),
    Moved { to: String },
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn partial_mapping_ignores_extra_members() {
    let pair: Pair = from_str(r#"{"a":1,"b":"2.5","extra":"ignored"}"#).unwrap();
    assert_eq!(pair, Pair { a: 1, b: 2.5 });
}

#[test]
fn missing_required_field_is_schema_mismatch() {
    assert_schema_mismatch(from_str::<Pair>(r#"{"a":1}"#));
}

#[test]
fn optional_and_defaulted_fields() {
    let listing: Listing = from_str(r#"{"title":"Desk","inStock":"true"}"#).unwrap();
    assert_eq!(
        listing,
        Listing {
            title: "Desk".into(),
            price: None,
            tags: vec![],
            in_stock: true,
        }
    );
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
struct Settings {
    name: String,
    retries: u32,
    verbose: bool,
}

#[test]
fn container_default_leaves_unmatched_members_at_default() {
    let settings: Settings = from_str(r#"{"retries":"3","other":1}"#).unwrap();
    assert_eq!(
        settings,
        Settings {
            name: String::new(),
            retries: 3,
            verbose: false,
        }
    );
    assert_eq!(from_str::<Settings>("{}").unwrap(), Settings::default());
}

#[test]
fn explicit_null_maps_to_none() {
    let listing: Listing =
        from_str(r#"{"title":"Lamp","price":null,"tags":["a","b"],"inStock":false}"#).unwrap();
    assert_eq!(listing.price, None);
    assert_eq!(listing.tags, vec!["a", "b"]);
}

#[test]
fn nested_records_in_sequences() {
    #[derive(Debug, Deserialize)]
    struct Page {
        items: Vec<Pair>,
    }
    let page: Page = from_str(r#"{"items":[{"a":1,"b":2},{"a":"3","b":4.5}]}"#).unwrap();
    assert_eq!(page.items, vec![Pair { a: 1, b: 2.0 }, Pair { a: 3, b: 4.5 }]);
}

#[test]
fn record_from_array_is_unsupported_shape() {
    assert_unsupported_shape(from_str::<Pair>("[1,2.5]"));
}

#[test]
fn record_from_scalar_is_unsupported_shape() {
    assert_unsupported_shape(from_str::<Pair>("7"));
}

#[test]
fn maps_keep_all_members() {
    let map: HashMap<String, f64> = from_str(r#"{"x":1,"y":"2"}"#).unwrap();
    assert_eq!(map.get("x"), Some(&1.0));
    assert_eq!(map.get("y"), Some(&2.0));

    let ordered: BTreeMap<String, bool> = from_str(r#"{"b":true,"a":0}"#).unwrap();
    assert_eq!(ordered.into_iter().collect::<Vec<_>>(), vec![
        ("a".to_string(), false),
        ("b".to_string(), true),
    ]);
}

#[test]
fn dynamic_node_field_is_kept_verbatim() {
    #[derive(Debug, Deserialize)]
    struct Envelope {
        kind: String,
        payload: Node,
    }
    let envelope: Envelope = from_str(r#"{"kind":"k","payload":{"z":[1,null],"a":1.5}}"#).unwrap();
    assert_eq!(envelope.kind, "k");
    assert_eq!(envelope.payload.member_names(), vec!["z", "a"]);
    assert_eq!(envelope.payload.get("z").and_then(|z| z.get(1)), Some(&Node::Null));
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn growable_sequence_maps_in_order() {
    let values: Vec<i64> = from_str("[3,1,2]").unwrap();
    assert_eq!(values, vec![3, 1, 2]);
    let empty: Vec<String> = from_str("[]").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn sequence_from_object_is_unsupported_shape() {
    assert_unsupported_shape(from_str::<Vec<i32>>(r#"{"0":1}"#));
}

#[test]
fn fixed_size_array_requires_exact_length() {
    let triple: [i32; 3] = from_str("[1,2,3]").unwrap();
    assert_eq!(triple, [1, 2, 3]);
    assert_unsupported_shape(from_str::<[i32; 3]>("[1,2]"));
    assert_unsupported_shape(from_str::<[i32; 3]>("[1,2,3,4]"));
}

#[test]
fn tuples_map_positionally() {
    let (n, s, b): (u16, String, bool) = from_str(r#"[8,"x",1]"#).unwrap();
    assert_eq!((n, s.as_str(), b), (8, "x", true));
    assert_unsupported_shape(from_str::<(u8, u8)>("[1]"));
}

#[test]
fn one_bad_element_fails_whole_mapping() {
    assert_schema_mismatch(from_str::<Vec<i32>>(r#"[1,2,"three"]"#));
}

// ============================================================================
// Scalar coercion
// ============================================================================

#[test]
fn boolean_coercions() {
    assert!(from_str::<bool>("true").unwrap());
    assert!(from_str::<bool>(r#""TRUE""#).unwrap());
    assert!(!from_str::<bool>(r#""false""#).unwrap());
    assert!(from_str::<bool>("2").unwrap());
    assert!(!from_str::<bool>("0").unwrap());
    assert_schema_mismatch(from_str::<bool>(r#""yes""#));
    assert_schema_mismatch(from_str::<bool>("null"));
}

#[test]
fn integer_coercions() {
    assert_eq!(from_str::<i32>("42").unwrap(), 42);
    assert_eq!(from_str::<i32>("4.0").unwrap(), 4);
    assert_eq!(from_str::<i32>(r#"" 17 ""#).unwrap(), 17);
    assert_eq!(from_str::<i32>(r#""1e2""#).unwrap(), 100);
    assert_eq!(from_str::<u8>("true").unwrap(), 1);
    assert_eq!(from_str::<i64>("9007199254740992").unwrap(), 9_007_199_254_740_992);
}

#[test]
fn integer_coercion_failures() {
    assert_schema_mismatch(from_str::<i32>("2.5"));
    assert_schema_mismatch(from_str::<u8>("300"));
    assert_schema_mismatch(from_str::<u32>("-1"));
    assert_schema_mismatch(from_str::<i16>(r#""abc""#));
    assert_schema_mismatch(from_str::<i32>("null"));
    assert_schema_mismatch(from_str::<i32>("[1]"));
    assert_schema_mismatch(from_str::<i32>(r#"{"a":1}"#));
}

#[test]
fn float_coercions() {
    assert_eq!(from_str::<f64>(r#""2.5""#).unwrap(), 2.5);
    assert_eq!(from_str::<f64>("false").unwrap(), 0.0);
    assert_eq!(from_str::<f32>("0.5").unwrap(), 0.5);
    assert_schema_mismatch(from_str::<f64>(r#""NaN""#));
    assert_schema_mismatch(from_str::<f32>("1e300"));
}

#[test]
fn text_coercions() {
    assert_eq!(from_str::<String>(r#""plain""#).unwrap(), "plain");
    assert_eq!(from_str::<String>("1.5").unwrap(), "1.5");
    assert_eq!(from_str::<String>("10").unwrap(), "10");
    assert_eq!(from_str::<String>("true").unwrap(), "true");
    assert_schema_mismatch(from_str::<String>("null"));
    assert_schema_mismatch(from_str::<String>("[]"));
}

#[test]
fn char_coercion() {
    assert_eq!(from_str::<char>(r#""x""#).unwrap(), 'x');
    assert_eq!(from_str::<char>("7").unwrap(), '7');
    assert_schema_mismatch(from_str::<char>(r#""xy""#));
}

#[test]
fn option_wraps_coerced_scalar() {
    assert_eq!(from_str::<Option<i32>>("null").unwrap(), None);
    assert_eq!(from_str::<Option<i32>>(r#""5""#).unwrap(), Some(5));
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn unit_variant_from_string() {
    assert_eq!(from_str::<Status>(r#""Active""#).unwrap(), Status::Active);
    assert_eq!(from_str::<Status>(r#""Closed""#).unwrap(), Status::Closed);
}

#[test]
fn data_variants_from_single_key_object() {
    assert_eq!(
        from_str::<Status>(r#"{"Pending":3}"#).unwrap(),
        Status::Pending(3)
    );
    assert_eq!(
        from_str::<Status>(r#"{"Moved":{"to":"archive"}}"#).unwrap(),
        Status::Moved { to: "archive".into() }
    );
}

#[test]
fn unknown_variant_is_schema_mismatch() {
    assert_schema_mismatch(from_str::<Status>(r#""Deleted""#));
}

#[test]
fn enum_from_wrong_shape_is_unsupported() {
    assert_unsupported_shape(from_str::<Status>("[1]"));
    assert_unsupported_shape(from_str::<Status>(r#"{"Pending":1,"Closed":null}"#));
}

// ============================================================================
// Entry points
// ============================================================================

#[test]
fn deserialize_into_from_existing_tree() {
    let node = parse(r#"{"outer":{"a":5,"b":0.25}}"#).unwrap();
    let pair: Pair = node.get("outer").unwrap().deserialize_into().unwrap();
    assert_eq!(pair, Pair { a: 5, b: 0.25 });
    let again: Pair = from_node(node.get("outer").unwrap()).unwrap();
    assert_eq!(again, pair);
}

#[test]
fn from_str_reports_parse_errors() {
    assert!(matches!(
        from_str::<Pair>(r#"{"a":1"#),
        Err(JsonError::Parse { .. })
    ));
}
