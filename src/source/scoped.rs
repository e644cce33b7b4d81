use std::borrow::Cow;
use std::path::PathBuf;

use crate::context::Registers;
use crate::source::{LocalFileSystem, TemplateSource};
use crate::Result;

/// A [`LocalFileSystem`] that resolves bare names in a default directory.
///
/// A name without a `/` is prefixed with the default directory from the
/// [`Registers`], so templates can include their siblings by name. A name
/// containing a `/` is always a full path from the root. Without a default
/// directory bare names resolve from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedFileSystem {
    inner: LocalFileSystem,
}

impl ScopedFileSystem {
    pub fn new(inner: LocalFileSystem) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn inner(&self) -> &LocalFileSystem {
        &self.inner
    }

    fn qualify<'a>(name: &'a str, registers: &Registers) -> Cow<'a, str> {
        match registers.default_dir() {
            Some(dir) if !name.contains('/') => Cow::Owned(format!("{dir}/{name}")),
            _ => Cow::Borrowed(name),
        }
    }

    /// Returns the path the named template is read from.
    ///
    /// The default directory is checked against the same grammar as the
    /// name.
    pub fn full_path(&self, name: &str, registers: &Registers) -> Result<PathBuf> {
        self.inner.full_path(&Self::qualify(name, registers))
    }
}

impl From<LocalFileSystem> for ScopedFileSystem {
    fn from(inner: LocalFileSystem) -> Self {
        Self::new(inner)
    }
}

impl TemplateSource for ScopedFileSystem {
    fn read_template_file(&self, name: &str, registers: &Registers) -> Result<String> {
        self.inner.read(&Self::qualify(name, registers))
    }
}
