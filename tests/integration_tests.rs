use serde::{Deserialize, Serialize};
use serde_csf::{
    csf, from_str, prompt, to_string, to_value, Codec, CsfOptions, Error, ErrorKind, Record,
    SchemaConfig, SchemaTable, UnknownRolePolicy, Value,
};

const SAMPLE_CSF: &str = "1|John_Doe|john.doe@example.com|1|30|123_Main_St|Springfield|IL|62704|+1-555-123-4567,+1-555-987-6543|0,1|2025-11-11T10:00:00Z";

const SAMPLE_JSON: &str = r#"{
    "id": 1,
    "name": "John Doe",
    "email": "john.doe@example.com",
    "is_active": true,
    "age": 30,
    "address": {
        "street": "123 Main St",
        "city": "Springfield",
        "state": "IL",
        "zip_code": "62704"
    },
    "phone_numbers": ["+1-555-123-4567", "+1-555-987-6543"],
    "roles": ["admin", "editor"],
    "created_at": "2025-11-11T10:00:00Z"
}"#;

fn sample_value() -> Value {
    serde_json::from_str(SAMPLE_JSON).unwrap()
}

fn set(record: &mut Value, field: &str, value: Value) {
    if let Value::Object(obj) = record {
        obj.insert(field.to_string(), value);
    }
}

#[test]
fn test_sample_record_encodes_to_published_string() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let csf = codec.encode(&sample_value()).unwrap();
    println!("CSF: {}", csf);
    assert_eq!(csf, SAMPLE_CSF);
}

#[test]
fn test_sample_string_decodes_to_sample_record() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let record = codec.decode(SAMPLE_CSF).unwrap();
    assert_eq!(record, sample_value());

    let json: serde_json::Value = serde_json::to_value(&record).unwrap();
    let expected: serde_json::Value = serde_json::from_str(SAMPLE_JSON).unwrap();
    assert_eq!(json, expected);
}

#[test]
fn test_short_key_json_view() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let short = codec.to_short_keys(&sample_value()).unwrap();
    let json = serde_json::to_string(&short).unwrap();
    assert_eq!(
        json,
        r#"{"i":1,"n":"John Doe","e":"john.doe@example.com","ia":true,"a":30,"ad":{"s":"123 Main St","c":"Springfield","st":"IL","z":"62704"},"pn":["+1-555-123-4567","+1-555-987-6543"],"r":[0,1],"ca":"2025-11-11T10:00:00Z"}"#
    );

    // Compact forms shrink at every stage
    let full = serde_json::to_string(&sample_value()).unwrap();
    assert!(json.len() < full.len());
    assert!(SAMPLE_CSF.len() < json.len());
}

#[test]
fn test_field_count_is_fixed() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    for phones in [
        csf!([]),
        csf!(["+1"]),
        csf!(["+1", "+2", "+3", "+4", "+5"]),
    ] {
        let mut record = sample_value();
        set(&mut record, "phone_numbers", phones);
        let csf = codec.encode(&record).unwrap();
        assert_eq!(csf.split('|').count(), 12, "{}", csf);
        assert!(!csf.starts_with('|'));
    }
}

#[test]
fn test_boolean_fidelity() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let mut record = sample_value();
    set(&mut record, "is_active", csf!(true));
    assert_eq!(codec.encode(&record).unwrap().split('|').nth(3), Some("1"));

    set(&mut record, "is_active", csf!(false));
    let csf = codec.encode(&record).unwrap();
    assert_eq!(csf.split('|').nth(3), Some("0"));
    assert_eq!(codec.decode(&csf).unwrap(), record);

    let bad = SAMPLE_CSF.replacen("|1|30|", "|yes|30|", 1);
    let err = codec.decode(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert!(matches!(err, Error::InvalidSegment { index: 3, ref field, .. } if field == "is_active"));
}

#[test]
fn test_empty_phone_numbers() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let mut record = sample_value();
    set(&mut record, "phone_numbers", csf!([]));
    let csf = codec.encode(&record).unwrap();
    assert_eq!(csf.split('|').nth(9), Some(""));

    let decoded = codec.decode(&csf).unwrap();
    let phones = decoded
        .as_object()
        .and_then(|o| o.get("phone_numbers"))
        .and_then(Value::as_array)
        .unwrap();
    assert!(phones.is_empty());
}

#[test]
fn test_role_enum_boundary() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let mut record = sample_value();
    set(&mut record, "roles", csf!(["admin", "editor"]));
    assert_eq!(codec.encode(&record).unwrap().split('|').nth(10), Some("0,1"));

    set(&mut record, "roles", csf!(["admin", "guest"]));
    let csf = codec.encode(&record).unwrap();
    assert_eq!(csf.split('|').nth(10), Some("0,guest"));

    let decoded = codec.decode(&csf).unwrap();
    assert_eq!(
        decoded.as_object().and_then(|o| o.get("roles")),
        Some(&csf!(["admin", "guest"]))
    );
}

#[test]
fn test_role_reject_policy() {
    let schema = SchemaTable::standard();
    let codec = Codec::with_options(
        &schema,
        CsfOptions::new().with_unknown_roles(UnknownRolePolicy::Reject),
    );

    let mut record = sample_value();
    set(&mut record, "roles", csf!(["admin", "guest"]));
    assert_eq!(codec.encode(&record).unwrap_err().kind(), ErrorKind::InvalidValue);

    let err = codec.decode(&SAMPLE_CSF.replace("|0,1|", "|0,guest|")).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("unknown role `guest`"));
}

#[test]
fn test_malformed_field_counts() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let segments: Vec<&str> = SAMPLE_CSF.split('|').collect();
    let eleven = segments[..11].join("|");
    let thirteen = format!("{}|", SAMPLE_CSF);

    assert_eq!(codec.decode(&eleven).unwrap_err(), Error::field_count(12, 11));
    assert_eq!(codec.decode(&thirteen).unwrap_err(), Error::field_count(12, 13));
}

#[test]
fn test_numeric_segments() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let err = codec.decode(&SAMPLE_CSF.replacen("1|", "one|", 1)).unwrap_err();
    assert!(matches!(err, Error::InvalidSegment { index: 0, .. }));

    let err = codec.decode(&SAMPLE_CSF.replacen("|30|", "|3o|", 1)).unwrap_err();
    assert!(matches!(err, Error::InvalidSegment { index: 4, .. }));
}

#[test]
fn test_space_placeholder_limitation() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    let mut record = sample_value();
    set(
        &mut record,
        "address",
        csf!({ "street": "1 snake_case Rd", "city": "Springfield", "state": "IL", "zip_code": "62704" }),
    );
    let csf = codec.encode(&record).unwrap();
    assert!(csf.contains("|1_snake_case_Rd|"));

    let decoded = codec.decode(&csf).unwrap();
    let street = decoded
        .as_object()
        .and_then(|o| o.get("address"))
        .and_then(Value::as_object)
        .and_then(|a| a.get("street"))
        .and_then(Value::as_str);
    assert_eq!(street, Some("1 snake case Rd"));
}

#[test]
fn test_typed_record() {
    let schema = SchemaTable::standard();
    let csf = to_string(&Record::sample(), &schema).unwrap();
    assert_eq!(csf, SAMPLE_CSF);

    let record: Record = from_str(&csf, &schema).unwrap();
    assert_eq!(record, Record::sample());
    assert_eq!(to_value(&record).unwrap(), sample_value());
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Ticket {
    number: i64,
    title: String,
    labels: Vec<String>,
    owner: Owner,
    open: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Owner {
    login: String,
    team: String,
}

#[test]
fn test_schema_from_json_config() {
    let config: SchemaConfig = serde_json::from_str(
        r##"{
            "fields": [
                { "name": "number", "short": "#", "kind": "integer" },
                { "name": "title", "short": "t", "kind": "text" },
                { "name": "labels", "short": "l", "kind": "roles" },
                { "name": "owner", "short": "o", "kind": "group", "fields": [
                    { "name": "login", "short": "ol" },
                    { "name": "team", "short": "ot" }
                ]},
                { "name": "open", "short": "x", "kind": "bool" }
            ],
            "roles": [
                { "name": "bug", "code": 0 },
                { "name": "feature", "code": 1 }
            ]
        }"##,
    )
    .unwrap();
    let schema = SchemaTable::from_config(config).unwrap();

    let ticket = Ticket {
        number: -4,
        title: "Crash on empty input".to_string(),
        labels: vec!["bug".to_string(), "p1".to_string()],
        owner: Owner {
            login: "ada".to_string(),
            team: "core".to_string(),
        },
        open: true,
    };

    let csf = to_string(&ticket, &schema).unwrap();
    assert_eq!(csf, "-4|Crash_on_empty_input|0,p1|ada|core|1");
    assert_eq!(from_str::<Ticket>(&csf, &schema).unwrap(), ticket);
}

#[test]
fn test_prompt_accompanies_payload() {
    let schema = SchemaTable::standard();
    let text = prompt::instructions(&schema);
    assert!(text.contains("i|n|e|ia|a|s|c|st|z|pn|r|ca"));
    assert!(text.contains("id | name | email | is_active | age | street | city | state | zip_code | phone_numbers | roles | created_at"));
    assert!(text.contains("- Roles are numeric: 0 = admin, 1 = editor"));
}

#[test]
fn test_codec_is_shareable_across_threads() {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);

    std::thread::scope(|scope| {
        for id in 0..4i64 {
            let codec = &codec;
            scope.spawn(move || {
                let mut record = sample_value();
                set(&mut record, "id", Value::Integer(id));
                let csf = codec.encode(&record).unwrap();
                assert_eq!(codec.decode(&csf).unwrap(), record);
            });
        }
    });
}
