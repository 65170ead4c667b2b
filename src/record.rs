//! Typed form of the standard record.
//!
//! [`Record`] mirrors [`SchemaTable::standard`](crate::SchemaTable::standard)
//! field for field, so it can be passed straight to [`to_string`](crate::to_string)
//! and read back with [`from_str`](crate::from_str).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A user record in the shape of the standard schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub age: u32,
    pub address: Address,
    pub phone_numbers: Vec<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The nested `address` object of a [`Record`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Record {
    /// The reference record used throughout the documentation and tests.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_csf::{to_string, Record, SchemaTable};
    ///
    /// let csf = to_string(&Record::sample(), &SchemaTable::standard()).unwrap();
    /// assert_eq!(
    ///     csf,
    ///     "1|John_Doe|john.doe@example.com|1|30|123_Main_St|Springfield|IL|62704|+1-555-123-4567,+1-555-987-6543|0,1|2025-11-11T10:00:00Z"
    /// );
    /// ```
    #[must_use]
    pub fn sample() -> Self {
        Record {
            id: 1,
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            is_active: true,
            age: 30,
            address: Address {
                street: "123 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62704".to_string(),
            },
            phone_numbers: vec!["+1-555-123-4567".to_string(), "+1-555-987-6543".to_string()],
            roles: vec!["admin".to_string(), "editor".to_string()],
            created_at: Utc
                .with_ymd_and_hms(2025, 11, 11, 10, 0, 0)
                .single()
                .unwrap_or_default(),
        }
    }
}
