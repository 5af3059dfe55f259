//! Reference resolution for Bundle-internal links.
//!
//! Resources inside a transaction Bundle point at each other with
//! `urn:uuid:` references (for example `Condition.subject.reference =
//! "urn:uuid:9c1f..."`). The referenced resource's `id` is the part after the
//! prefix. References in any other form (`Patient/123`, absolute URLs,
//! contained `#id`) are kept verbatim.
//!
//! ```
//! use octofhir_extract::reference::resolve;
//!
//! assert_eq!(resolve("urn:uuid:p1"), "p1");
//! assert_eq!(resolve("Patient/123"), "Patient/123");
//! ```

use serde_json::Value;

use crate::tree;

/// Prefix carried by Bundle-internal references.
pub const URN_UUID_PREFIX: &str = "urn:uuid:";

/// Strip the `urn:uuid:` prefix from a reference.
///
/// Repeated prefixes are stripped as well, which makes the function
/// idempotent: `resolve(resolve(x)) == resolve(x)`.
pub fn resolve(reference: &str) -> &str {
    reference.trim_start_matches(URN_UUID_PREFIX)
}

/// Read the reference string at `path` (e.g. `"subject"`) and resolve it.
///
/// `path` names the Reference element; `.reference` is appended. An empty
/// reference counts as absent.
pub fn resolve_at(resource: &Value, path: &str) -> Option<String> {
    tree::get_str(resource, &format!("{path}.reference"))
        .filter(|r| !r.is_empty())
        .map(|r| resolve(r).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_prefix() {
        assert_eq!(
            resolve("urn:uuid:7e2d1a40-1111-2222-3333-444455556666"),
            "7e2d1a40-1111-2222-3333-444455556666"
        );
    }

    #[test]
    fn test_keeps_other_forms() {
        assert_eq!(resolve("Patient/123"), "Patient/123");
        assert_eq!(resolve("#contained"), "#contained");
        assert_eq!(resolve("urn:oid:1.2.3"), "urn:oid:1.2.3");
        assert_eq!(resolve(""), "");
        // prefix only counts at the start
        assert_eq!(resolve("x-urn:uuid:p1"), "x-urn:uuid:p1");
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "urn:uuid:p1",
            "urn:uuid:urn:uuid:p1",
            "Patient/1",
            "urn:uuid:",
            "p1",
        ] {
            let once = resolve(input);
            assert_eq!(resolve(once), once, "input: {input}");
        }
    }

    #[test]
    fn test_resolve_at() {
        let encounter = json!({
            "subject": {"reference": "urn:uuid:p1"},
            "serviceProvider": {"display": "General Hospital"}
        });
        assert_eq!(resolve_at(&encounter, "subject"), Some("p1".to_string()));
        assert_eq!(resolve_at(&encounter, "serviceProvider"), None);
        assert_eq!(resolve_at(&encounter, "encounter"), None);
    }

    #[test]
    fn test_resolve_at_empty_reference() {
        let condition = json!({"subject": {"reference": ""}});
        assert_eq!(resolve_at(&condition, "subject"), None);
    }
}
