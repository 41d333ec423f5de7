// Write-body cleanup applied to every POST/PUT/PATCH payload.
//
// Null-valued fields are omitted so the server applies its own defaults
// instead of receiving explicit nulls. Relationship objects whose `id` is
// an unset placeholder (`""` or `-1`, what an empty selection produces)
// are dropped for the same reason.

use serde_json::Value;

/// Strip null fields and placeholder relationship references from a record.
///
/// Only the top level of an object is cleaned; nested records are sent
/// as the caller built them. Non-object values pass through unchanged.
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null() && !is_placeholder_reference(v))
                .collect(),
        ),
        other => other,
    }
}

fn is_placeholder_reference(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    match map.get("id") {
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_i64() == Some(-1),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_fields_are_omitted() {
        let cleaned = strip_nulls(json!({ "name": "sp1", "credential": null }));
        assert_eq!(cleaned, json!({ "name": "sp1" }));
    }

    #[test]
    fn empty_values_that_are_not_null_survive() {
        let cleaned = strip_nulls(json!({ "name": "", "enabled": false, "serviceProviders": [] }));
        assert_eq!(
            cleaned,
            json!({ "name": "", "enabled": false, "serviceProviders": [] })
        );
    }

    #[test]
    fn placeholder_references_are_dropped() {
        let cleaned = strip_nulls(json!({
            "profile": "p1",
            "identityProvider": { "id": "" },
            "other": { "id": -1 },
            "kept": { "id": 7 }
        }));
        assert_eq!(cleaned, json!({ "profile": "p1", "kept": { "id": 7 } }));
    }

    #[test]
    fn nested_nulls_are_left_alone() {
        let cleaned = strip_nulls(json!({ "credential": { "id": 3, "profile": null } }));
        assert_eq!(cleaned, json!({ "credential": { "id": 3, "profile": null } }));
    }

    #[test]
    fn non_objects_pass_through() {
        assert_eq!(strip_nulls(json!([1, null])), json!([1, null]));
    }
}
