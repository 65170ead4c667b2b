/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Interpolated expressions go through [`to_value`](crate::to_value); values it
/// cannot represent, such as floats, become `Value::Null`.
///
/// ```rust
/// use serde_csf::{csf, Value};
///
/// let address = csf!({ "city": "Springfield", "state": "IL" });
/// assert!(address.is_object());
/// assert_eq!(csf!(["admin", "editor"]).as_array().map(Vec::len), Some(2));
/// assert_eq!(csf!(2.5), Value::Null);
/// ```
#[macro_export]
macro_rules! csf {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::csf!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::csf!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Anything else goes through the serde bridge; unsupported values become null.
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Map, Value};

    #[test]
    fn test_csf_macro_primitives() {
        assert_eq!(csf!(null), Value::Null);
        assert_eq!(csf!(true), Value::Bool(true));
        assert_eq!(csf!(false), Value::Bool(false));
        assert_eq!(csf!(42), Value::Integer(42));
        assert_eq!(csf!("hello"), Value::String("hello".to_string()));
        // No float representation
        assert_eq!(csf!(3.5), Value::Null);
    }

    #[test]
    fn test_csf_macro_arrays() {
        assert_eq!(csf!([]), Value::Array(vec![]));
        assert_eq!(
            csf!([0, "guest"]),
            Value::Array(vec![Value::Integer(0), Value::from("guest")])
        );
    }

    #[test]
    fn test_csf_macro_nested_objects() {
        assert_eq!(csf!({}), Value::Object(Map::new()));

        let record = csf!({
            "id": 1,
            "address": { "city": "Springfield" }
        });

        let obj = record.as_object().unwrap();
        let keys: Vec<_> = obj.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "address"]);
        assert_eq!(
            obj.get("address")
                .and_then(Value::as_object)
                .and_then(|a| a.get("city")),
            Some(&Value::from("Springfield"))
        );
    }
}
