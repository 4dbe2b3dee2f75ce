//! Error type for discovery and emission.

use std::path::PathBuf;

/// Standard result type for generator operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Everything that can go wrong while generating.
///
/// Discovery never fails because of one bad declaration; the variants
/// below are either I/O problems of the pass as a whole or
/// generation-fatal problems of a single unit.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Reading or writing a file failed.
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// `valuegen.toml` exists but is not valid.
    #[error("invalid configuration in `{}`: {source}", path.display())]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// Neither `lib.rs` nor `main.rs` exists in the source directory.
    #[error("no crate root (lib.rs or main.rs) in `{}`", .0.display())]
    MissingCrateRoot(PathBuf),

    /// A Cargo-provided environment variable is missing.
    #[error("environment variable `{0}` is not set; is this running from a build script?")]
    MissingEnv(&'static str),

    /// A descriptor names something that is not a Rust identifier.
    #[error("`{name}` is not a valid Rust identifier (in {context})")]
    InvalidIdentifier {
        /// Offending text.
        name: String,
        /// Where it came from.
        context: String,
    },

    /// A descriptor's payload display does not parse as a Rust type.
    #[error("payload type `{display}` of `{type_name}` is not a valid Rust type")]
    InvalidPayloadType {
        /// Wrapper type name.
        type_name: String,
        /// Payload display string.
        display: String,
    },

    /// An emitter produced text that does not parse as a Rust file.
    #[error("generated unit `{unit}` is not valid Rust: {message}")]
    InvalidOutput {
        /// Unit name.
        unit: String,
        /// Parser message.
        message: String,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    /// Whether the error concerns one generated unit only.
    pub fn is_unit_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::InvalidPayloadType { .. } | Self::InvalidOutput { .. }
        )
    }
}
