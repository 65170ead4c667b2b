//! Encode the standard record to CSF and read it back.
//!
//! Run with: cargo run --example simple

use serde_csf::{from_str, to_string, Codec, Record, SchemaTable};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let schema = SchemaTable::standard();
    let record = Record::sample();

    let json = serde_json::to_string(&record)?;
    println!("JSON ({} chars):\n{}\n", json.len(), json);

    let short = Codec::new(&schema).to_short_keys(&serde_csf::to_value(&record)?)?;
    let short = serde_json::to_string(&short)?;
    println!("Short keys ({} chars):\n{}\n", short.len(), short);

    let csf = to_string(&record, &schema)?;
    println!("CSF ({} chars):\n{}\n", csf.len(), csf);

    let back: Record = from_str(&csf, &schema)?;
    assert_eq!(record, back);
    println!("✓ Round-trip successful");

    Ok(())
}
