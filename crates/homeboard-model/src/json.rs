//! Field-by-field construction of resource values through JSON.
//!
//! Form inputs and command-line `field=value` pairs arrive as loose strings
//! keyed by field name. These helpers convert them into typed resources by
//! going through the resource's own JSON shape.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ModelError, Result};

/// Convert a raw string into the JSON kind `template` holds for that field.
///
/// Strings stay strings, arrays are split on commas, everything else is
/// parsed as JSON when possible and kept as a string otherwise.
pub fn coerce_field_value(template: Option<&Value>, raw: &str) -> Value {
    match template {
        Some(Value::String(_)) => Value::String(raw.to_string()),
        Some(Value::Array(_)) => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        ),
        _ => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

/// Build a value of type `T` from `field=value` pairs.
///
/// `template` is a serialized default of the resource and decides which
/// fields exist and how each raw value is coerced.
pub fn fields_from_pairs<T: DeserializeOwned>(
    resource: &'static str,
    template: &Value,
    pairs: &[(String, String)],
) -> Result<T> {
    let mut object = Map::new();
    for (field, raw) in pairs {
        let slot = lookup(resource, template, field)?;
        object.insert(field.clone(), coerce_field_value(slot, raw));
    }
    serde_json::from_value(Value::Object(object))
        .map_err(|source| ModelError::InvalidFields { resource, source })
}

/// Return a copy of `target` with one field replaced.
///
/// Fails when the field does not exist or the value has the wrong type for
/// it; `target` itself is never touched.
pub fn merge_field<T>(resource: &'static str, target: &T, field: &str, value: Value) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut current = serde_json::to_value(target)
        .map_err(|source| ModelError::InvalidFields { resource, source })?;
    lookup(resource, &current, field)?;
    if let Value::Object(object) = &mut current {
        object.insert(field.to_string(), value);
    }
    serde_json::from_value(current).map_err(|source| ModelError::InvalidFields { resource, source })
}

fn lookup<'a>(resource: &'static str, template: &'a Value, field: &str) -> Result<Option<&'a Value>> {
    match template {
        Value::Object(object) => match object.get(field) {
            Some(slot) => Ok(Some(slot)),
            None => Err(ModelError::UnknownField {
                resource,
                field: field.to_string(),
            }),
        },
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Listing, ListingStatus};
    use serde_json::json;

    #[test]
    fn coerces_by_template_kind() {
        assert_eq!(coerce_field_value(Some(&json!("")), "2024"), json!("2024"));
        assert_eq!(coerce_field_value(Some(&json!(0)), "350000"), json!(350000));
        assert_eq!(
            coerce_field_value(Some(&json!([])), "garden, garage"),
            json!(["garden", "garage"])
        );
        assert_eq!(
            coerce_field_value(Some(&Value::Null), "2024-06-01"),
            json!("2024-06-01")
        );
    }

    #[test]
    fn builds_listing_from_pairs() {
        let template = serde_json::to_value(Listing::default()).unwrap();
        let pairs = vec![
            ("title".to_string(), "Loft".to_string()),
            ("price".to_string(), "420000".to_string()),
            ("status".to_string(), "Pending".to_string()),
        ];

        let listing: Listing = fields_from_pairs("listing", &template, &pairs).unwrap();

        assert_eq!(listing.title, "Loft");
        assert_eq!(listing.price, 420_000);
        assert_eq!(listing.status, ListingStatus::Pending);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let template = serde_json::to_value(Listing::default()).unwrap();
        let pairs = vec![("colour".to_string(), "red".to_string())];

        let result: Result<Listing> = fields_from_pairs("listing", &template, &pairs);
        assert!(matches!(result, Err(ModelError::UnknownField { .. })));
    }

    #[test]
    fn merge_field_rejects_wrong_type_without_touching_target() {
        let listing = Listing {
            title: "Loft".to_string(),
            ..Listing::default()
        };

        let result = merge_field("listing", &listing, "price", json!("a lot"));

        assert!(matches!(result, Err(ModelError::InvalidFields { .. })));
        assert_eq!(listing.title, "Loft");
    }
}
