use serde::{Deserialize, Serialize};
use hipack::{
    annotations, cast_fn, dump, dump_compact, dump_with, from_str, hipack, load, load_with,
    to_string, to_string_compact, value_fn, Annotations, Dict, Error, HipackOptions, Number,
    Value,
};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
}

fn dict(value: Value) -> Dict {
    match value {
        Value::Dict(dict) => dict,
        other => panic!("expected a dict, got {:?}", other),
    }
}

#[test]
fn test_dump_empty() {
    assert_eq!(dump(&Dict::new()).unwrap(), "");
    assert_eq!(dump_compact(&Dict::new()).unwrap(), "");
}

#[test]
fn test_dump_scalars() {
    assert_eq!(dump(&dict(hipack!({ "value": 42 }))).unwrap(), "value: 42\n");
    assert_eq!(dump(&dict(hipack!({ "value": 1.5 }))).unwrap(), "value: 1.5\n");
    assert_eq!(
        dump(&dict(hipack!({ "value": "a string" }))).unwrap(),
        "value: \"a string\"\n"
    );
    assert_eq!(dump(&dict(hipack!({ "value": true }))).unwrap(), "value: True\n");
    assert_eq!(dump(&dict(hipack!({ "value": false }))).unwrap(), "value: False\n");
}

#[test]
fn test_dump_empty_collections() {
    assert_eq!(dump(&dict(hipack!({ "value": [] }))).unwrap(), "value []\n");
    assert_eq!(dump(&dict(hipack!({ "value": {} }))).unwrap(), "value {}\n");
}

#[test]
fn test_dump_nested_dict() {
    assert_eq!(
        dump(&dict(hipack!({ "value": { "value": 42 } }))).unwrap(),
        "value {\n  value: 42\n}\n"
    );
}

#[test]
fn test_dump_sorts_keys() {
    assert_eq!(
        dump(&dict(hipack!({ "c": 1, "b": 2, "a": 3 }))).unwrap(),
        "a: 3\nb: 2\nc: 1\n"
    );
}

#[test]
fn test_dump_compact() {
    assert_eq!(
        dump_compact(&dict(hipack!({ "value": [1, 2, 3, 4, 5] }))).unwrap(),
        "value[1,2,3,4,5]"
    );
    assert_eq!(
        dump_compact(&dict(hipack!({ "value": { "a": 1, "b": [2, 3] } }))).unwrap(),
        "value{a:1,b[2,3]}"
    );
}

#[test]
fn test_load_scenarios() {
    assert_eq!(load("").unwrap(), None);
    assert_eq!(load("{}").unwrap(), Some(Dict::new()));

    let expected = dict(hipack!({ "value": { "a": 1, "b": 2 } }));
    assert_eq!(load("value { a 1 b 2 }").unwrap(), Some(expected.clone()));
    assert_eq!(load("value: { a: 1, b: 2 }").unwrap(), Some(expected.clone()));
    assert_eq!(load("{ value { a 1, b 2, } }").unwrap(), Some(expected));

    let numbers = load("a 0xCAFE b 01755 c 0x2A d 052 e 42").unwrap().unwrap();
    assert_eq!(numbers.get("a"), Some(&Value::from(0xCAFE)));
    assert_eq!(numbers.get("b"), Some(&Value::from(0o1755)));
    assert_eq!(numbers.get("c"), numbers.get("e"));
    assert_eq!(numbers.get("d"), numbers.get("e"));
}

#[test]
fn test_load_reports_location() {
    let err = load("value: [1, 2").unwrap_err();
    assert!(err.is_decode());
    assert_eq!(err.location(), Some((1, 13)));
    assert_eq!(
        err.to_string(),
        "expected ']', found end of input at line 1, column 13"
    );
}

#[test]
fn test_round_trip_both_modes() {
    let data = dict(hipack!({
        "name": "probe \"one\"\n",
        "enabled": true,
        "ratio": 0.25,
        "offset": -3,
        "matrix": [[1, 2], [3, 4], []],
        "nested": { "empty": {}, "list": [{ "k": "v" }] }
    }));

    let pretty = dump(&data).unwrap();
    assert_eq!(load(&pretty).unwrap(), Some(data.clone()));

    let compact = dump_compact(&data).unwrap();
    assert!(!compact.contains('\n'));
    assert_eq!(load(&compact).unwrap(), Some(data));
}

#[test]
fn test_cast_hook_sees_literals() {
    let cast = cast_fn(|tags: &Annotations, literal: Option<&str>, value: Value| {
        match literal {
            Some(text) if tags.contains("raw") => Value::from(text),
            _ => value,
        }
    });
    let dict = load_with("a: :raw 0x10 b: 0x10 c :raw \"q\"", &HipackOptions::new(), cast)
        .unwrap()
        .unwrap();
    assert_eq!(dict.get("a"), Some(&Value::from("0x10")));
    assert_eq!(dict.get("b"), Some(&Value::from(16)));
    assert_eq!(dict.get("c"), Some(&Value::from("\"q\"")));
}

#[test]
fn test_cast_hook_distinguishes_int_and_float() {
    let mut kinds = Vec::new();
    let cast = cast_fn(|tags: &Annotations, _: Option<&str>, value: Value| {
        if tags.contains(annotations::INT) {
            kinds.push("int");
        } else if tags.contains(annotations::FLOAT) {
            kinds.push("float");
        }
        value
    });
    let dict = load_with("a 3 b 3.0", &HipackOptions::new(), cast).unwrap().unwrap();
    assert_eq!(kinds, vec!["int", "float"]);
    // The value model does not keep the difference.
    assert_eq!(dict.get("a"), dict.get("b"));
}

#[test]
fn test_value_hook_round_trip() {
    let data = dict(hipack!({ "count": 3, "ratio": 0.5, "names": ["x"] }));
    let hook = value_fn(|value: &Value, annotations: &mut Annotations| {
        if let Value::Number(n) = value {
            annotations.insert(if n.is_integer() { "int" } else { "float" });
        }
        None
    });
    let text = dump_with(&data, &HipackOptions::new(), hook).unwrap();
    assert_eq!(text, "count: :int 3\nnames [\n  \"x\"\n]\nratio: :float 0.5\n");

    let mut seen = Vec::new();
    let cast = cast_fn(|tags: &Annotations, _: Option<&str>, value: Value| {
        if tags.contains("int") || tags.contains("float") {
            seen.push(value.clone());
        }
        value
    });
    let back = load_with(&text, &HipackOptions::new(), cast).unwrap().unwrap();
    assert_eq!(back, data);
    assert_eq!(seen, vec![Value::from(3), Value::from(0.5)]);
}

#[test]
fn test_null_cannot_be_dumped() {
    let json: serde_json::Value = serde_json::json!({ "value": null });
    let err = to_string(&json).unwrap_err();
    assert_eq!(err, Error::cannot_dump("null"));
    assert!(err.is_encode());
}

#[test]
fn test_foreign_values_through_serde() {
    let json = serde_json::json!({ "a": [1, 2.5, "x", true], "b": { "c": -1 } });
    let text = to_string_compact(&json).unwrap();
    assert_eq!(text, "a[1,2.5,\"x\",True],b{c:-1}");
    let back: serde_json::Value = from_str(&text).unwrap();
    assert_eq!(back, json);
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let text = to_string(&user).unwrap();
    assert_eq!(
        text,
        "active: True\nid: 123\nname: \"Alice\"\ntags [\n  \"admin\"\n  \"developer\"\n]\n"
    );
    let user_back: User = from_str(&text).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_structures() {
    let order = Order {
        order_id: 1001,
        customer: User {
            id: 123,
            name: "Bob".to_string(),
            active: true,
            tags: vec![],
        },
        items: vec![
            Product {
                sku: "A1".to_string(),
                price: 9.99,
                quantity: 2,
            },
            Product {
                sku: "B2".to_string(),
                price: 14.5,
                quantity: 1,
            },
        ],
        total: 34.48,
    };

    let pretty: Order = from_str(&to_string(&order).unwrap()).unwrap();
    assert_eq!(pretty, order);
    let compact: Order = from_str(&to_string_compact(&order).unwrap()).unwrap();
    assert_eq!(compact, order);
}

#[test]
fn test_whole_floats_keep_a_decimal_point() {
    #[derive(Serialize)]
    struct Reading {
        celsius: f64,
    }
    assert_eq!(to_string(&Reading { celsius: 21.0 }).unwrap(), "celsius: 21.0\n");
    assert_eq!(to_string(&Reading { celsius: -0.0 }).unwrap(), "celsius: -0.0\n");
    let err = to_string(&Reading { celsius: f64::NAN }).unwrap_err();
    assert!(err.is_encode());
}

#[test]
fn test_type_mismatch_is_reported() {
    let err = from_str::<User>("id \"not a number\"").unwrap_err();
    assert!(matches!(err, Error::Message(_)));
}

#[test]
fn test_integer_and_float_compare_equal() {
    assert_eq!(Value::Number(Number::Integer(2)), Value::Number(Number::Float(2.0)));
    assert_ne!(Value::Number(Number::Integer(2)), Value::Number(Number::Float(2.5)));
}
