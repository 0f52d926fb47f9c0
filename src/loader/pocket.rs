//! Page result types handed to the template engine.
//!
//! A [`Pocket`] always carries the page's `filename`. Page data appears under
//! the configured entry key only when the page's sidecar declared `imports`:
//!
//! ```json
//! {
//!   "filename": "about",
//!   "data": {
//!     "name": "About Us",
//!     "imports": { "genres": [{ "href": "#href1", "name": "Caption1" }] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Import name → parsed fragment, shared with the import cache.
pub type ImportMap = BTreeMap<String, Arc<Value>>;

/// Key under which the resolved imports are attached to page data.
pub const IMPORTS_KEY: &str = "imports";

/// Key holding the page name on every pocket.
pub const FILENAME_KEY: &str = "filename";

/// Sidecar `data` object merged with its resolved imports.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PageData {
    #[serde(flatten)]
    fields: Map<String, Value>,
    imports: ImportMap,
}

impl PageData {
    /// Merge sidecar fields with resolved imports.
    ///
    /// An `imports` field already present in `fields` is replaced.
    pub fn new(mut fields: Map<String, Value>, imports: ImportMap) -> Self {
        fields.remove(IMPORTS_KEY);
        Self { fields, imports }
    }

    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub const fn imports(&self) -> &ImportMap {
        &self.imports
    }

    /// Plain JSON object with `imports` as one more field.
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        let imports = self
            .imports
            .iter()
            .map(|(name, value)| (name.clone(), Value::clone(value)))
            .collect();
        object.insert(IMPORTS_KEY.to_owned(), Value::Object(imports));
        Value::Object(object)
    }
}

/// Per-page result record.
#[derive(Debug, Clone, PartialEq)]
pub struct Pocket {
    filename: String,
    entry: String,
    data: Option<PageData>,
}

impl Pocket {
    /// Pocket without page data.
    pub fn new(filename: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            entry: entry.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: PageData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Name of the key page data is exposed under.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub const fn data(&self) -> Option<&PageData> {
        self.data.as_ref()
    }

    pub const fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Plain nested structure for template binding.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(FILENAME_KEY.to_owned(), Value::String(self.filename.clone()));
        if let Some(data) = &self.data {
            object.insert(self.entry.clone(), data.to_value());
        }
        Value::Object(object)
    }
}

impl Serialize for Pocket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.data.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(FILENAME_KEY, &self.filename)?;
        if let Some(data) = &self.data {
            map.serialize_entry(&self.entry, data)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn genres() -> ImportMap {
        let mut imports = ImportMap::new();
        imports.insert(
            "genres".into(),
            Arc::new(json!([{ "href": "#href1", "name": "Caption1" }])),
        );
        imports
    }

    #[test]
    fn test_bare_pocket_has_no_entry() {
        let pocket = Pocket::new("contact", "data");
        assert!(!pocket.has_data());
        assert_eq!(pocket.to_value(), json!({ "filename": "contact" }));
        assert_eq!(serde_json::to_value(&pocket).unwrap(), json!({ "filename": "contact" }));
    }

    #[test]
    fn test_pocket_with_custom_entry() {
        let fields = json!({ "name": "About Us", "visible": true });
        let Value::Object(fields) = fields else { unreachable!() };
        let pocket = Pocket::new("about", "$").with_data(PageData::new(fields, genres()));

        let expected = json!({
            "filename": "about",
            "$": {
                "name": "About Us",
                "visible": true,
                "imports": { "genres": [{ "href": "#href1", "name": "Caption1" }] }
            }
        });
        assert_eq!(pocket.to_value(), expected);
        assert_eq!(serde_json::to_value(&pocket).unwrap(), expected);
    }

    #[test]
    fn test_page_data_replaces_existing_imports_field() {
        let Value::Object(fields) = json!({ "imports": "stale", "a": 1 }) else {
            unreachable!()
        };
        let data = PageData::new(fields, ImportMap::new());

        assert!(!data.fields().contains_key("imports"));
        assert_eq!(data.to_value(), json!({ "a": 1, "imports": {} }));
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({ "a": 1, "imports": {} }));
    }
}
