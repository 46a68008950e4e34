use serde::{Deserialize, Serialize};

use crate::Schema;

/// A versioned group of schemas compiled in one generation run.
///
/// Each generated accessor gets its own module; the package additionally
/// drives the module index listing every generated type.
///
/// # Examples
///
/// ```
/// use paramspec_core::*;
///
/// let mut package = SchemaPackage::new("1.0.0", "2024-01-15T10:30:00Z");
/// package.name = Some("account".into());
/// package.schemas.push(Schema::builder("Login").build().unwrap());
/// package.schemas.push(Schema::builder("Signup").build().unwrap());
///
/// assert_eq!(package.schema_count(), 2);
/// assert!(package.find("Signup").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPackage {
    /// Document format version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Package version (semver string).
    pub version: String,
    /// Optional package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional package description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 timestamp for package creation.
    #[serde(default)]
    pub generated_at: String,
    /// Optional hash of the serialized schemas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_hash: Option<String>,
    /// Schemas included in this package.
    #[serde(default)]
    pub schemas: Vec<Schema>,
}

impl SchemaPackage {
    /// Creates an empty package.
    pub fn new(version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            schema_version: Some(crate::SCHEMA_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            generated_at: generated_at.into(),
            bundle_hash: None,
            schemas: Vec::new(),
        }
    }

    /// Returns the number of schemas in this package.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Finds a schema by name.
    pub fn find(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name() == name)
    }
}
