//! Validated Bundle documents and read-only resource views.

use serde_json::Value;

use crate::diagnostics::FileError;
use crate::tree;

/// `resourceType` a document root must carry to be processed.
pub const BUNDLE_RESOURCE_TYPE: &str = "Bundle";

/// A decoded Bundle with at least one entry.
#[derive(Debug, Clone)]
pub struct Bundle {
    file_name: String,
    entries: Vec<Value>,
}

impl Bundle {
    /// Validate a decoded document.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::NotAnObject`] when the root is not a JSON object and
    /// [`FileError::NotABundle`] when it is not a Bundle or has no entries.
    pub fn from_value(file_name: impl Into<String>, value: Value) -> Result<Self, FileError> {
        let Value::Object(mut root) = value else {
            return Err(FileError::NotAnObject);
        };

        if root.get("resourceType").and_then(Value::as_str) != Some(BUNDLE_RESOURCE_TYPE) {
            return Err(FileError::NotABundle);
        }

        match root.remove("entry") {
            Some(Value::Array(entries)) if !entries.is_empty() => Ok(Self {
                file_name: file_name.into(),
                entries,
            }),
            _ => Err(FileError::NotABundle),
        }
    }

    /// Name of the file this Bundle was read from.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Raw entry envelopes, in document order.
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Resources carried by the entries, in document order.
    ///
    /// Envelopes without an object `resource` are skipped.
    pub fn resources(&self) -> impl Iterator<Item = Resource<'_>> {
        self.entries
            .iter()
            .filter_map(|entry| entry.get("resource"))
            .filter_map(Resource::new)
    }
}

/// A borrowed view over one resource object.
#[derive(Debug, Clone, Copy)]
pub struct Resource<'a> {
    value: &'a Value,
}

impl<'a> Resource<'a> {
    /// Wrap `value` if it is a JSON object.
    pub fn new(value: &'a Value) -> Option<Self> {
        value.is_object().then_some(Self { value })
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn resource_type(&self) -> Option<&'a str> {
        self.str("resourceType")
    }

    pub fn id(&self) -> Option<&'a str> {
        self.str("id")
    }

    /// Whether the `resourceType` tag equals `resource_type`.
    pub fn is(&self, resource_type: &str) -> bool {
        self.resource_type() == Some(resource_type)
    }

    /// `Type/id` label for diagnostics.
    pub fn label(&self) -> String {
        format!(
            "{}/{}",
            self.resource_type().unwrap_or("Resource"),
            self.id().unwrap_or("-")
        )
    }

    pub fn get(&self, path: &str) -> Option<&'a Value> {
        tree::get(self.value, path)
    }

    pub fn str(&self, path: &str) -> Option<&'a str> {
        tree::get_str(self.value, path)
    }

    pub fn string(&self, path: &str) -> Option<String> {
        tree::get_string(self.value, path)
    }

    pub fn array(&self, path: &str) -> &'a [Value] {
        tree::get_array(self.value, path)
    }
}
