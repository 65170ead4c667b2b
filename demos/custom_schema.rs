//! Build a schema for a different record shape and pick a role policy.
//!
//! Run with: cargo run --example custom_schema

use serde::{Deserialize, Serialize};
use serde_csf::{
    from_str, to_string, to_string_with_options, CsfOptions, FieldKind, SchemaTable,
    UnknownRolePolicy,
};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Order {
    number: i64,
    customer: String,
    shipping: Shipping,
    items: Vec<String>,
    tags: Vec<String>,
    paid: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Shipping {
    carrier: String,
    country: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let schema = SchemaTable::builder()
        .field("number", "no", FieldKind::Integer)
        .field("customer", "cu", FieldKind::Text)
        .group("shipping", "sh", |g| {
            g.field("carrier", "ca", FieldKind::Plain)
                .field("country", "co", FieldKind::Plain)
        })
        .field("items", "it", FieldKind::List)
        .field("tags", "tg", FieldKind::Roles)
        .field("paid", "pd", FieldKind::Bool)
        .role("gift", 0)
        .role("express", 1)
        .build()?;

    let order = Order {
        number: 1042,
        customer: "Grace Hopper".to_string(),
        shipping: Shipping {
            carrier: "UPS".to_string(),
            country: "US".to_string(),
        },
        items: vec!["SKU-1".to_string(), "SKU-7".to_string()],
        tags: vec!["express".to_string(), "fragile".to_string()],
        paid: true,
    };

    let csf = to_string(&order, &schema)?;
    println!("Pass-through:\n{}\n", csf);
    assert_eq!(from_str::<Order>(&csf, &schema)?, order);

    let strict = CsfOptions::new().with_unknown_roles(UnknownRolePolicy::Reject);
    match to_string_with_options(&order, &schema, strict) {
        Ok(csf) => println!("Reject:\n{}", csf),
        Err(e) => println!("Reject policy refused the order: {}", e),
    }

    Ok(())
}
