//! Parameter allow-listing and required-field validation
//!
//! Pure helpers shared by every service operation. Filtering never
//! inspects value shape; coercion happens later at bind time.

use crate::error::AppError;
use crate::properties::models::PropertyField;
use serde_json::{Map, Value};

/// Project an arbitrary input mapping down to the allow-listed fields
///
/// Output contains only the allow-listed keys present (non-null) in the
/// input, values unchanged, in allow-list order. Unknown keys are silently
/// dropped.
pub fn build_params(
    allowed: &[PropertyField],
    params: &Map<String, Value>,
) -> Vec<(PropertyField, Value)> {
    allowed
        .iter()
        .filter_map(|&field| {
            params
                .get(field.query_key())
                .filter(|v| !v.is_null())
                .map(|v| (field, v.clone()))
        })
        .collect()
}

/// Fail on the first required field that is absent or falsy
///
/// Falsy means `null`, `false`, `0` or `""`; those are rejected along with
/// missing fields. Production callers pass the full allow-list here, so
/// every allowed field is mandatory on creation.
pub fn validate_required_params(
    required: &[PropertyField],
    params: &[(PropertyField, Value)],
) -> Result<(), AppError> {
    for &field in required {
        let value = params.iter().find(|(f, _)| *f == field).map(|(_, v)| v);
        match value {
            Some(v) if !is_falsy(v) => {}
            _ => {
                return Err(AppError::FieldsRequired(field.query_key().to_string()));
            }
        }
    }

    Ok(())
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_build_params_drops_unknown_keys() {
        let params = input(&[
            ("price", json!(100000)),
            ("limit", json!("5")),
            ("isApprove", json!(true)),
            ("drop table", json!("properties")),
        ]);

        let filtered = build_params(&PropertyField::ALL, &params);
        assert_eq!(filtered, vec![(PropertyField::Price, json!(100000))]);
    }

    #[test]
    fn test_build_params_preserves_allowed_keys_unchanged() {
        let params = input(&[
            ("rooms", json!("3")),
            ("address.postalCode", json!("06100")),
            ("furnish", json!(false)),
        ]);

        let filtered = build_params(&PropertyField::ALL, &params);

        // Allow-list order, values untouched
        assert_eq!(
            filtered,
            vec![
                (PropertyField::AddressPostalCode, json!("06100")),
                (PropertyField::Rooms, json!("3")),
                (PropertyField::Furnish, json!(false)),
            ]
        );
    }

    #[test]
    fn test_build_params_skips_null_values() {
        let params = input(&[("price", Value::Null)]);
        assert!(build_params(&PropertyField::ALL, &params).is_empty());
    }

    #[test]
    fn test_build_params_output_is_subset_of_allow_list() {
        let params = input(&[
            ("price", json!(1)),
            ("offerer", json!("O1")),
            ("id", json!("p1")),
            ("rooms", json!(2)),
        ]);

        for (field, _) in build_params(&PropertyField::ALL, &params) {
            assert!(PropertyField::ALL.contains(&field));
        }
    }

    #[test]
    fn test_validate_required_missing_field() {
        let filtered = vec![(PropertyField::Price, json!(100000))];
        let err =
            validate_required_params(&[PropertyField::Price, PropertyField::Rooms], &filtered)
                .unwrap_err();
        assert_eq!(err.to_string(), "Field rooms is required");
    }

    #[test]
    fn test_validate_required_rejects_falsy_values() {
        for falsy in [json!(null), json!(false), json!(0), json!("")] {
            let filtered = vec![(PropertyField::Furnish, falsy)];
            assert!(validate_required_params(&[PropertyField::Furnish], &filtered).is_err());
        }
    }

    #[test]
    fn test_validate_required_accepts_truthy_values() {
        let filtered = vec![
            (PropertyField::Price, json!(100000)),
            (PropertyField::Furnish, json!(true)),
            (PropertyField::MediaFiles, json!([])),
        ];
        let required = [
            PropertyField::Price,
            PropertyField::Furnish,
            PropertyField::MediaFiles,
        ];
        assert!(validate_required_params(&required, &filtered).is_ok());
    }
}
