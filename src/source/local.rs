use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::context::Registers;
use crate::source::{check_name, SourceConfig, TemplateSource, DEFAULT_PATTERN};
use crate::{Error, Result};

/// The slot in a [`Pattern`] that is replaced by the template name.
const SLOT: &str = "%s";

/// A template file name pattern with exactly one `%s` slot.
///
/// # Examples
///
/// ```
/// use drip::source::Pattern;
///
/// let pattern: Pattern = "%s.html".parse()?;
/// assert_eq!(pattern.format("index"), "index.html");
/// # Ok::<(), drip::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    prefix: String,
    suffix: String,
}

impl Pattern {
    /// Parse a pattern, failing with a configuration error unless it contains
    /// exactly one `%s`.
    pub fn new(pattern: &str) -> Result<Self> {
        match pattern.split_once(SLOT) {
            Some((prefix, suffix)) if !suffix.contains(SLOT) => Ok(Self {
                prefix: prefix.to_owned(),
                suffix: suffix.to_owned(),
            }),
            _ => Err(Error::config(format!(
                "template name pattern `{pattern}` must contain exactly one `{SLOT}`"
            ))),
        }
    }

    /// Substitute the name into the pattern.
    pub fn format(&self, name: &str) -> String {
        let mut s = String::with_capacity(self.prefix.len() + name.len() + self.suffix.len());
        s.push_str(&self.prefix);
        s.push_str(name);
        s.push_str(&self.suffix);
        s
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            prefix: String::from("_"),
            suffix: String::from(".liquid"),
        }
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SLOT}{}", self.prefix, self.suffix)
    }
}

/// Reads templates from a directory, named like partials.
///
/// The template name is split on `/`, the last segment is formatted with the
/// pattern and the other segments are directories under the root.
///
/// ```
/// use std::path::Path;
/// use drip::source::LocalFileSystem;
///
/// let fs = LocalFileSystem::new("/some/path");
/// assert_eq!(fs.full_path("mypartial")?, Path::new("/some/path/_mypartial.liquid"));
/// assert_eq!(fs.full_path("dir/mypartial")?, Path::new("/some/path/dir/_mypartial.liquid"));
/// # Ok::<(), drip::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileSystem {
    root: PathBuf,
    pattern: Pattern,
}

impl LocalFileSystem {
    /// Construct a file system with the default `_%s.liquid` pattern.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_pattern(root, Pattern::default())
    }

    /// Construct a file system with a custom pattern.
    pub fn with_pattern(root: impl Into<PathBuf>, pattern: Pattern) -> Self {
        Self {
            root: root.into(),
            pattern,
        }
    }

    /// Construct a file system from configuration.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let pattern = if config.pattern == DEFAULT_PATTERN {
            Pattern::default()
        } else {
            Pattern::new(&config.pattern)?
        };
        Ok(Self::with_pattern(&config.root, pattern))
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the path the named template is read from.
    ///
    /// Fails with [`ErrorKind::AccessDenied`][crate::ErrorKind::AccessDenied]
    /// if the name is not allowed. This never touches the filesystem.
    pub fn full_path(&self, name: &str) -> Result<PathBuf> {
        check_name(name)?;
        let (dirs, file) = match name.rsplit_once('/') {
            Some((dirs, file)) => (Some(dirs), file),
            None => (None, name),
        };
        let mut path = self.root.clone();
        if let Some(dirs) = dirs {
            path.extend(dirs.split('/'));
        }
        path.push(self.pattern.format(file));
        Ok(path)
    }

    /// Reads the named template.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.full_path(name)?;
        debug!(name, path = %path.display(), "reading template");
        fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::not_found(name),
            _ => Error::io(name, err),
        })
    }
}

impl TemplateSource for LocalFileSystem {
    fn read_template_file(&self, name: &str, _registers: &Registers) -> Result<String> {
        self.read(name)
    }
}
