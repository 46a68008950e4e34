//! Project configuration.
//!
//! Loaded from a YAML file (typically `paramspec.yml`) that names the
//! whitelist for runtime checks, the default output directory for
//! `generate`, and the custom validators available to schemas.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! whitelist: [cachebuster]
//! output: generated/
//! validators:
//!   - id: length_3_20
//!     kind: string_length
//!     min: 3
//!     max: 20
//!   - id: good_password
//!     kind: common_passwords
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use paramspec_core::{
    CommonPasswords, ParamsWhitelist, ResolveError, StringLength, ValidatorRegistry,
};
use serde::{Deserialize, Serialize};

use crate::loader::LoadError;

/// One configured custom validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatorSpec {
    /// [`StringLength`] with optional bounds.
    StringLength {
        /// Identifier schemas refer to.
        id: String,
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    /// [`CommonPasswords`].
    CommonPasswords {
        /// Identifier schemas refer to.
        id: String,
    },
}

impl ValidatorSpec {
    /// The identifier schemas refer to.
    pub fn id(&self) -> &str {
        match self {
            ValidatorSpec::StringLength { id, .. } | ValidatorSpec::CommonPasswords { id } => id,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamspecConfig {
    /// Configuration format version (e.g., `"1.0"`).
    #[serde(default)]
    pub version: String,
    /// Names always permitted by `check`.
    #[serde(default)]
    pub whitelist: Vec<String>,
    /// Default output directory for `generate`.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Custom validators available to schemas.
    #[serde(default)]
    pub validators: Vec<ValidatorSpec>,
}

impl ParamspecConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] if the file cannot be read, [`LoadError::Yaml`] if
    /// parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|e| LoadError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads `path` if given, otherwise returns the empty configuration.
    ///
    /// # Errors
    ///
    /// As [`load`](ParamspecConfig::load).
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, LoadError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Builds the validator registry.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidLengthBounds`] for a length validator whose
    /// maximum does not exceed its minimum.
    pub fn registry(&self) -> Result<ValidatorRegistry, ResolveError> {
        let mut registry = ValidatorRegistry::new();
        for spec in &self.validators {
            match spec {
                ValidatorSpec::StringLength { id, min, max } => {
                    registry.register(id.clone(), StringLength::new(*min, *max)?);
                }
                ValidatorSpec::CommonPasswords { id } => {
                    registry.register(id.clone(), CommonPasswords);
                }
            }
        }
        Ok(registry)
    }

    /// The whitelist for runtime checks.
    pub fn whitelist(&self) -> ParamsWhitelist {
        ParamsWhitelist::new(self.whitelist.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramspec_core::{Resolver, Whitelist};

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
whitelist: [cachebuster, _]
output: generated/
validators:
  - id: length_3_20
    kind: string_length
    min: 3
    max: 20
  - id: good_password
    kind: common_passwords
"#
    }

    #[test]
    fn test_parse_sample() {
        let config: ParamspecConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.output, Some(PathBuf::from("generated/")));
        assert_eq!(config.validators.len(), 2);
        assert_eq!(config.validators[0].id(), "length_3_20");

        let registry = config.registry().unwrap();
        assert!(registry.resolve("length_3_20").is_ok());
        assert!(registry.resolve("good_password").is_ok());
        assert!(config.whitelist().names().contains("cachebuster"));
    }

    #[test]
    fn test_minimal_config() {
        let config: ParamspecConfig = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
        assert!(config.validators.is_empty());
        assert!(config.registry().unwrap().is_empty());
        assert!(config.whitelist().names().is_empty());
    }

    #[test]
    fn test_bad_length_bounds() {
        let yaml = r#"
validators:
  - id: broken
    kind: string_length
    min: 5
    max: 5
"#;
        let config: ParamspecConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.registry().unwrap_err(),
            ResolveError::InvalidLengthBounds { min: 5, max: 5 }
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let yaml = "validators:\n  - id: x\n    kind: regex\n";
        assert!(serde_yaml::from_str::<ParamspecConfig>(yaml).is_err());
    }
}
