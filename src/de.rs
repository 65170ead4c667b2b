//! Serde deserialization out of [`Value`].
//!
//! [`ValueDeserializer`] feeds a decoded record into any `T: Deserialize`.
//! Most users go through [`from_str`](crate::from_str) or
//! [`from_value`](crate::from_value):
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_csf::{csf, from_value};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Badge { id: u32, roles: Vec<String>, nick: Option<String> }
//!
//! let badge: Badge = from_value(csf!({ "id": 3, "roles": ["admin"], "nick": null })).unwrap();
//! assert_eq!(badge, Badge { id: 3, roles: vec!["admin".into()], nick: None });
//! ```

use crate::{Error, Map, Result, Value};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Deserializer reading from an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            value => visitor.visit_some(ValueDeserializer::new(value)),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer { variant }),
            other => Err(Error::custom(format!(
                "expected a unit variant name, found {}",
                other.type_name()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Errors raised inside a value are qualified with its key.
struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    entry: Option<(String, Value)>,
}

impl MapDeserializer {
    fn new(map: Map) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            entry: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                let name = Value::String(key.clone());
                self.entry = Some((key, value));
                seed.deserialize(ValueDeserializer::new(name)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.entry.take() {
            Some((key, value)) => seed
                .deserialize(ValueDeserializer::new(value))
                .map_err(|err| err.in_field(&key)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Only unit variants exist on the CSF wire, spelled as their name.
struct EnumDeserializer {
    variant: String,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = UnitVariant;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, UnitVariant))
    }
}

struct UnitVariant;

impl<'de> de::VariantAccess<'de> for UnitVariant {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, _seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        Err(Error::unsupported_type("newtype variants"))
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("struct variants"))
    }
}

#[cfg(test)]
mod tests {
    use crate::{csf, from_value, Error, ErrorKind};
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Tier {
        Gold,
        Silver,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Member {
        id: u16,
        tier: Tier,
        active: bool,
    }

    #[test]
    fn test_struct_from_value() {
        let member: Member = from_value(csf!({ "id": 4, "tier": "silver", "active": false })).unwrap();
        assert_eq!(
            member,
            Member {
                id: 4,
                tier: Tier::Silver,
                active: false
            }
        );
        assert_eq!(from_value::<Tier>(csf!("gold")).unwrap(), Tier::Gold);
        assert!(from_value::<Tier>(csf!("bronze")).is_err());
    }

    #[test]
    fn test_missing_field_is_reported() {
        let err = from_value::<Member>(csf!({ "id": 4, "tier": "gold" })).unwrap_err();
        assert_eq!(err, Error::missing_field("active"));
    }

    #[test]
    fn test_out_of_range_integer() {
        let err = from_value::<Member>(csf!({ "id": 70000, "tier": "gold", "active": true }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.field(), Some("id"));
    }

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Badge {
        member: Member,
    }

    #[test]
    fn test_nested_errors_carry_the_path() {
        let err = from_value::<Badge>(csf!({ "member": { "id": 1, "tier": "bronze", "active": true } }))
            .unwrap_err();
        assert_eq!(err.field(), Some("member.tier"));

        let err = from_value::<Badge>(csf!({ "member": { "id": 1, "tier": "gold" } })).unwrap_err();
        assert_eq!(err, Error::missing_field("member.active"));
    }
}
