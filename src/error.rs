use std::fmt;
use std::io;
use std::sync::Arc;

/// A convenient type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while converting values or loading templates.
///
/// Looking up a variable that does not exist is never an error, it simply
/// resolves to [`Value::None`][crate::Value::None].
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    source: Option<Arc<io::Error>>,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The template name contains characters outside `[A-Za-z0-9_/]` or has
    /// an empty path segment.
    AccessDenied,

    /// The template name is well-formed but no file exists for it.
    NotFound,

    /// The template source does not allow includes at all.
    IncludesDisabled,

    /// A host type has no registered or derivable drop. This is a setup
    /// defect and should not be suppressed.
    Config,

    /// Reading a template failed for a reason other than it not existing.
    Io,

    /// A value could not be converted to or from another representation.
    Serialize,
}

impl Error {
    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            source: None,
        }
    }

    pub(crate) fn access_denied(name: &str) -> Self {
        Self::new(
            ErrorKind::AccessDenied,
            format!("illegal template name `{name}`"),
        )
    }

    pub(crate) fn not_found(name: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("no such template `{name}`"))
    }

    pub(crate) fn includes_disabled() -> Self {
        Self::new(
            ErrorKind::IncludesDisabled,
            "this context does not allow includes",
        )
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, msg)
    }

    pub(crate) fn io(name: &str, err: io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: format!("failed to read template `{name}`: {err}"),
            source: Some(Arc::new(err)),
        }
    }

    pub(crate) fn serialize(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Serialize, msg.to_string())
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.msg)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}
