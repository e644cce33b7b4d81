//! Loading the source of included templates.
//!
//! A [`TemplateSource`] maps a logical template name, as written in an
//! include, to template text. Three sources are provided:
//!
//! - [`LocalFileSystem`] reads partials from a root directory, formatting the
//!   last path segment with a [`Pattern`] such as `_%s.liquid`.
//! - [`ScopedFileSystem`] does the same but resolves bare names inside the
//!   default directory set in the [`Registers`].
//! - [`BlankFileSystem`] refuses all includes.
//!
//! Template names may only contain ASCII letters, digits, `_` and `/`. Any
//! other name is rejected with [`ErrorKind::AccessDenied`] before the
//! filesystem is touched.
//!
//! [`ErrorKind::AccessDenied`]: crate::ErrorKind::AccessDenied

mod local;
mod scoped;

use std::path::PathBuf;

pub use crate::source::local::{LocalFileSystem, Pattern};
pub use crate::source::scoped::ScopedFileSystem;

use crate::context::Registers;
use crate::{Error, Result};

/// The default template file name pattern.
pub const DEFAULT_PATTERN: &str = "_%s.liquid";

/// Resolves logical template names to template source text.
pub trait TemplateSource: Send + Sync {
    /// Returns the source of the named template.
    ///
    /// Implementations must be stateless: calling this again with the same
    /// name and registers against an unchanged filesystem returns the same
    /// text or the same kind of error.
    fn read_template_file(&self, name: &str, registers: &Registers) -> Result<String>;
}

/// A template source that does not allow includes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankFileSystem;

impl TemplateSource for BlankFileSystem {
    fn read_template_file(&self, _name: &str, _registers: &Registers) -> Result<String> {
        Err(Error::includes_disabled())
    }
}

/// Configuration for a [`LocalFileSystem`].
///
/// With the `serde` feature this can be deserialized from any configuration
/// format, the `pattern` field is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SourceConfig {
    /// The directory templates are read from.
    pub root: PathBuf,

    /// The file name pattern, with exactly one `%s`.
    #[cfg_attr(feature = "serde", serde(default = "default_pattern"))]
    pub pattern: String,
}

fn default_pattern() -> String {
    String::from(DEFAULT_PATTERN)
}

impl SourceConfig {
    /// Construct a config with the default pattern.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pattern: default_pattern(),
        }
    }
}

/// Checks a logical template name against the allowed grammar.
///
/// The name must be non-empty, only contain `[A-Za-z0-9_/]` and have no empty
/// path segments.
pub(crate) fn check_name(name: &str) -> Result<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '/';
    if name.is_empty() || !name.chars().all(allowed) || name.split('/').any(str::is_empty) {
        tracing::warn!(name, "rejected template name");
        return Err(Error::access_denied(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ErrorKind;

    #[test]
    fn check_name_allows_words_and_slashes() {
        for name in ["header", "partials/footer", "a/b/c_d", "X1"] {
            assert!(check_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn check_name_rejects_everything_else() {
        for name in [
            "",
            "../etc/passwd",
            "a;rm -rf",
            "with space",
            "dot.liquid",
            "/absolute",
            "trailing/",
            "double//slash",
            "caf\u{e9}",
            "back\\slash",
        ] {
            let err = check_name(name).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AccessDenied, "{name}");
        }
    }

    #[test]
    fn blank_file_system_refuses() {
        let err = BlankFileSystem
            .read_template_file("header", &Registers::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncludesDisabled);
        assert_eq!(err.to_string(), "this context does not allow includes");
    }
}
