//! Generator configuration.
//!
//! The toggles are read once per pass from an optional `valuegen.toml`
//! next to the consumer's `Cargo.toml`:
//!
//! ```toml
//! generate_relational_adapter = false
//! generate_document_store_adapter = true
//! ```
//!
//! A missing file, or a missing key, means `true`.

use std::path::Path;

use serde::Deserialize;

use crate::error::{GenerateError, GenerateResult};

/// Name of the configuration file looked up in the manifest directory.
pub const CONFIG_FILE: &str = "valuegen.toml";

/// Adapter toggles for one generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Emit serde/BSON serializers and the registration function.
    pub generate_document_store_adapter: bool,
    /// Emit value converters, sqlx impls and entity registrations.
    pub generate_relational_adapter: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generate_document_store_adapter: true,
            generate_relational_adapter: true,
        }
    }
}

impl GeneratorConfig {
    /// Toggle the document-store adapter.
    pub fn with_document_store_adapter(mut self, enabled: bool) -> Self {
        self.generate_document_store_adapter = enabled;
        self
    }

    /// Toggle the relational adapter.
    pub fn with_relational_adapter(mut self, enabled: bool) -> Self {
        self.generate_relational_adapter = enabled;
        self
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> GenerateResult<Self> {
        toml::from_str(text).map_err(|source| GenerateError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `path`; defaults when the file does not exist.
    pub fn load(path: &Path) -> GenerateResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml_str(&text, path)?;
                tracing::debug!(path = %path.display(), ?config, "loaded generator config");
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no generator config, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(GenerateError::io(path)(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_enable_both_adapters() {
        let config = GeneratorConfig::default();
        assert!(config.generate_document_store_adapter);
        assert!(config.generate_relational_adapter);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = GeneratorConfig::from_toml_str("", Path::new("valuegen.toml")).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_default() {
        let config = GeneratorConfig::from_toml_str(
            "generate_relational_adapter = false",
            Path::new("valuegen.toml"),
        )
        .unwrap();
        assert!(!config.generate_relational_adapter);
        assert!(config.generate_document_store_adapter);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = GeneratorConfig::from_toml_str("generate_everything = true", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, GenerateError::Config { .. }));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "generate_document_store_adapter = false\n").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(
            config,
            GeneratorConfig::default().with_document_store_adapter(false)
        );
    }
}
