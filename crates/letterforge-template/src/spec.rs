//! Template specification supplied by the caller per generation request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where a placeholder draws its value from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldMapping {
    /// Substitute the named spreadsheet column of the current row
    Column {
        /// Column name as it appears in the header row
        column: String,
    },
    /// Substitute a fixed value, identical for every row
    Static {
        /// The literal replacement text
        value: String,
    },
}

/// A letter template: body text with `{{TOKEN}}` placeholders plus optional
/// explicit mappings.
///
/// Tokens without a mapping fall back to run statics, then to a column of
/// the same name. The spec is caller-supplied and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateSpec {
    /// Letter title shown in the rendered document's title block
    #[serde(default)]
    pub title: Option<String>,

    /// Template body containing zero or more `{{TOKEN}}` placeholders
    pub body: String,

    /// Explicit placeholder -> source mappings
    #[serde(default)]
    pub mappings: BTreeMap<String, FieldMapping>,
}

impl TemplateSpec {
    /// Create a spec with just a body and no explicit mappings
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
            mappings: BTreeMap::new(),
        }
    }

    /// Add a column mapping
    pub fn map_column(mut self, token: impl Into<String>, column: impl Into<String>) -> Self {
        self.mappings.insert(
            token.into(),
            FieldMapping::Column {
                column: column.into(),
            },
        );
        self
    }

    /// Add a static value mapping
    pub fn map_static(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.mappings.insert(
            token.into(),
            FieldMapping::Static {
                value: value.into(),
            },
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_mappings() {
        let spec = TemplateSpec::from_body("Dear {{NAME}}")
            .map_column("NAME", "Customer Name")
            .map_static("COMPANY", "Acme Holding");

        assert_eq!(spec.mappings.len(), 2);
        assert_eq!(
            spec.mappings.get("NAME"),
            Some(&FieldMapping::Column {
                column: "Customer Name".to_string()
            })
        );
    }

    #[test]
    fn test_field_mapping_untagged_deserialization() {
        let column: FieldMapping = serde_json::from_str(r#"{"column": "Balance"}"#).unwrap();
        assert_eq!(
            column,
            FieldMapping::Column {
                column: "Balance".to_string()
            }
        );

        let fixed: FieldMapping = serde_json::from_str(r#"{"value": "Acme"}"#).unwrap();
        assert_eq!(
            fixed,
            FieldMapping::Static {
                value: "Acme".to_string()
            }
        );
    }
}
