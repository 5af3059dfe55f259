//! Safe path reads over decoded JSON trees.
//!
//! Every projector reads resource fields through these helpers, so the
//! missing-data policy lives in one place: an absent key, a missing
//! intermediate level, an out-of-range index or a value of the wrong shape
//! all resolve to `None` (or an empty slice), never to a panic.
//!
//! Paths are dot-separated. A segment is used as an object key when the
//! current node is an object and as an index when it is an array:
//!
//! ```
//! use octofhir_extract::tree;
//! use serde_json::json;
//!
//! let patient = json!({"address": [{"line": ["1 Main St"], "city": "Boston"}]});
//! assert_eq!(tree::get_str(&patient, "address.0.line.0"), Some("1 Main St"));
//! assert_eq!(tree::get_str(&patient, "address.1.city"), None);
//! assert_eq!(tree::get_str(&patient, "maritalStatus.text"), None);
//! ```

use serde_json::Value;

/// Resolve `path` against `root`.
///
/// An empty path returns `root` itself.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, step)
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// String value at `path`, if the node exists and is a string.
pub fn get_str<'a>(root: &'a Value, path: &str) -> Option<&'a str> {
    get(root, path).and_then(Value::as_str)
}

/// Owned string value at `path`.
pub fn get_string(root: &Value, path: &str) -> Option<String> {
    get_str(root, path).map(str::to_owned)
}

/// Array elements at `path`; empty when the node is absent or not an array.
pub fn get_array<'a>(root: &'a Value, path: &str) -> &'a [Value] {
    get(root, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn condition() -> Value {
        json!({
            "resourceType": "Condition",
            "subject": {"reference": "urn:uuid:p1"},
            "code": {
                "coding": [{"system": "http://snomed.info/sct", "code": "38341003"}],
                "text": "Hypertension"
            },
            "note": null
        })
    }

    #[test]
    fn test_get_nested_keys() {
        let c = condition();
        assert_eq!(get_str(&c, "subject.reference"), Some("urn:uuid:p1"));
        assert_eq!(get_str(&c, "code.text"), Some("Hypertension"));
    }

    #[test]
    fn test_get_array_index() {
        let c = condition();
        assert_eq!(get_str(&c, "code.coding.0.code"), Some("38341003"));
        assert_eq!(get(&c, "code.coding.1"), None);
        assert_eq!(get(&c, "code.coding.first"), None);
    }

    #[test]
    fn test_missing_intermediate_levels() {
        let c = condition();
        assert_eq!(get(&c, "encounter.reference"), None);
        assert_eq!(get(&c, "subject.reference.value"), None);
        assert_eq!(get(&c, "code.text.0"), None);
    }

    #[test]
    fn test_empty_path_returns_root() {
        let c = condition();
        assert_eq!(get(&c, ""), Some(&c));
    }

    #[test]
    fn test_null_and_wrong_types() {
        let c = condition();
        assert_eq!(get(&c, "note"), Some(&Value::Null));
        assert_eq!(get_str(&c, "note"), None);
        assert_eq!(get_str(&c, "code"), None);
        assert!(get_array(&c, "code.text").is_empty());
    }

    #[test]
    fn test_defaults() {
        let c = condition();
        assert_eq!(get_string(&c, "code.text"), Some("Hypertension".to_string()));
        assert_eq!(get_string(&c, "abatementDateTime"), None);
        assert_eq!(get_string(&c, "resourceType"), Some("Condition".to_string()));
        assert_eq!(get_array(&c, "code.coding").len(), 1);
        assert!(get_array(&c, "extension").is_empty());
    }
}
