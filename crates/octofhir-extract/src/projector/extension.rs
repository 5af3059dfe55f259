//! Lookups inside generic `extension` arrays.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tree;

pub const US_CORE_RACE: &str = "http://hl7.org/fhir/us/core/StructureDefinition/us-core-race";
pub const US_CORE_ETHNICITY: &str =
    "http://hl7.org/fhir/us/core/StructureDefinition/us-core-ethnicity";
pub const US_CORE_BIRTHSEX: &str =
    "http://hl7.org/fhir/us/core/StructureDefinition/us-core-birthsex";

/// Sub-extension URL carrying the free-text rendering of race and ethnicity.
const TEXT_URL: &str = "text";

/// Which entry wins when several extension entries match the same URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionMatch {
    /// The first match in document order.
    #[default]
    First,
    /// The last match in document order (what a plain overwrite loop yields).
    Last,
}

impl ExtensionMatch {
    fn pick<T>(self, mut candidates: impl Iterator<Item = T>) -> Option<T> {
        match self {
            Self::First => candidates.next(),
            Self::Last => candidates.last(),
        }
    }
}

fn has_url(extension: &Value, url: &str) -> bool {
    tree::get_str(extension, "url") == Some(url)
}

fn with_url<'a>(extensions: &'a [Value], url: &'a str) -> impl Iterator<Item = &'a Value> {
    extensions.iter().filter(move |ext| has_url(ext, url))
}

/// `valueString` of the `text` sub-extension of the extension with `url`.
///
/// A `text` sub-extension without `valueString` counts as a match with an
/// empty value.
pub fn nested_text<'a>(
    extensions: &'a [Value],
    url: &'a str,
    policy: ExtensionMatch,
) -> Option<&'a str> {
    let candidates = with_url(extensions, url)
        .flat_map(|ext| tree::get_array(ext, "extension"))
        .filter(|sub| has_url(sub, TEXT_URL))
        .map(|sub| tree::get_str(sub, "valueString").unwrap_or(""));
    policy.pick(candidates)
}

/// `valueCode` read directly from the extension with `url`.
pub fn direct_code<'a>(
    extensions: &'a [Value],
    url: &'a str,
    policy: ExtensionMatch,
) -> Option<&'a str> {
    let candidates = with_url(extensions, url).map(|ext| tree::get_str(ext, "valueCode"));
    policy.pick(candidates).flatten()
}
