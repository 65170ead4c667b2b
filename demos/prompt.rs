//! Print the instructions a model needs to read CSF records, followed by a batch.
//!
//! Run with: cargo run --example prompt

use serde_csf::{prompt, to_string, Record, SchemaTable};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let schema = SchemaTable::standard();

    let mut second = Record::sample();
    second.id = 2;
    second.name = "Jane Roe".to_string();
    second.email = "jane.roe@example.com".to_string();
    second.is_active = false;
    second.phone_numbers.clear();
    second.roles = vec!["editor".to_string(), "guest".to_string()];

    let mut out = prompt::instructions(&schema);
    out.push('\n');
    for record in [Record::sample(), second] {
        out.push_str(&to_string(&record, &schema)?);
        out.push('\n');
    }
    print!("{}", out);

    Ok(())
}
