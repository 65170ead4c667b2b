//! CSF Wire Format
//!
//! This module documents the Compact Serializer Format as implemented by this
//! library. It contains no code.
//!
//! # Overview
//!
//! CSF is a schema-based encoding for one fixed record shape that both ends know
//! ahead of time. Keys are never transmitted: a value is identified by its
//! position. The result is a single line of ASCII-friendly text that costs far
//! fewer tokens than the equivalent JSON.
//!
//! ```text
//! JSON: {"id":1,"name":"John Doe","email":"john.doe@example.com","is_active":true,...}
//! CSF:  1|John_Doe|john.doe@example.com|1|30|123_Main_St|Springfield|IL|62704|+1-555-123-4567,+1-555-987-6543|0,1|2025-11-11T10:00:00Z
//! ```
//!
//! # Layers
//!
//! | Layer | Example |
//! |-------|---------|
//! | Record | `{"id":1,"address":{"street":"123 Main St",...},"roles":["admin","editor"]}` |
//! | Short-key record | `{"i":1,"ad":{"s":"123 Main St",...},"r":[0,1]}` |
//! | Delimited string | `1\|...\|123_Main_St\|...\|0,1\|...` |
//!
//! # Standard Schema
//!
//! | Position | Field | Short code | Kind |
//! |----------|-------|------------|------|
//! | 0 | `id` | `i` | integer |
//! | 1 | `name` | `n` | text |
//! | 2 | `email` | `e` | plain |
//! | 3 | `is_active` | `ia` | boolean |
//! | 4 | `age` | `a` | integer |
//! | 5 | `address.street` | `s` | text |
//! | 6 | `address.city` | `c` | plain |
//! | 7 | `address.state` | `st` | plain |
//! | 8 | `address.zip_code` | `z` | plain |
//! | 9 | `phone_numbers` | `pn` | list |
//! | 10 | `roles` | `r` | roles |
//! | 11 | `created_at` | `ca` | plain |
//!
//! The `address` group has the short code `ad`; it only appears in the
//! short-key record. Roles: `admin = 0`, `editor = 1`.
//!
//! # Reserved Characters
//!
//! | Character | Meaning | In values |
//! |-----------|---------|-----------|
//! | `\|` | field delimiter | rejected everywhere |
//! | `,` | item delimiter | rejected in list items and role names |
//! | `_` | space placeholder in text fields | accepted but decodes as a space; rejected with `strict_placeholder` |
//! | `\r`, `\n` | record terminator | rejected everywhere |
//!
//! No escaping scheme exists. Inputs that would need one are refused at encode
//! time rather than producing a string with the wrong number of fields.
//!
//! # Roles
//!
//! Known roles travel as their decimal code. Under the default pass-through
//! policy unknown roles travel as their literal name, so `["admin","guest"]`
//! encodes to `0,guest`. Any all-digit token is read as a role code, which
//! makes a literal all-digit role name unrepresentable; it is rejected on both
//! sides.
//!
//! # Versioning
//!
//! The string carries no schema version. Changing a schema table changes the
//! wire format, so both ends must agree on the revision out of band.
//!
//! # Edge Cases
//!
//! - An empty list is an empty segment: `...|62704||0,1|...`
//! - An empty segment decodes to an empty list, never `[""]`
//! - Booleans are exactly `1` or `0`
//! - Integers are canonical decimal: `-3` is valid, `+3`, `03` and `-0` are not
//! - 11 or 13 segments is an error, never truncated or padded
