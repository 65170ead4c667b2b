use serde_csf::{csf, Codec, Map, SchemaTable, Value};

#[test]
fn test_csf_macro_scalars() {
    assert_eq!(csf!(null), Value::Null);
    assert_eq!(csf!(true), Value::Bool(true));
    assert_eq!(csf!(false), Value::Bool(false));
    assert_eq!(csf!(42), Value::Integer(42));
    assert_eq!(csf!(-123), Value::Integer(-123));
    assert_eq!(csf!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(csf!(""), Value::String(String::new()));
}

#[test]
fn test_csf_macro_variables() {
    let age = 30u32;
    let name = String::from("John Doe");
    let phones = vec!["+1-555-123-4567"];

    assert_eq!(csf!(age), Value::Integer(30));
    assert_eq!(csf!(name), Value::from("John Doe"));
    assert_eq!(csf!(phones), csf!(["+1-555-123-4567"]));
}

#[test]
fn test_csf_macro_objects_keep_insertion_order() {
    let value = csf!({ "z": 1, "a": 2, "m": 3 });
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["z", "a", "m"]);

    let mut expected = Map::new();
    expected.insert("z".to_string(), Value::Integer(1));
    expected.insert("a".to_string(), Value::Integer(2));
    expected.insert("m".to_string(), Value::Integer(3));
    assert_eq!(value, Value::Object(expected));
}

#[test]
fn test_csf_macro_record_encodes() {
    let record = csf!({
        "id": 7,
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "is_active": false,
        "age": 36,
        "address": {
            "street": "12 St James Sq",
            "city": "London",
            "state": "LDN",
            "zip_code": "SW1Y"
        },
        "phone_numbers": [],
        "roles": ["editor"],
        "created_at": "1843-07-01T00:00:00Z"
    });

    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);
    let encoded = codec.encode(&record).unwrap();
    assert_eq!(
        encoded,
        "7|Ada_Lovelace|ada@example.com|0|36|12_St_James_Sq|London|LDN|SW1Y||1|1843-07-01T00:00:00Z"
    );
    assert_eq!(codec.decode(&encoded).unwrap(), record);
}
