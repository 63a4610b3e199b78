use std::fmt;

/// Coarse classification shared by every error type in this crate.
///
/// Errors are wrapped with context as they travel outwards, but the kind of
/// the innermost failure is preserved, so callers can branch on it without
/// matching the whole chain.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// No current project, application or component could be resolved, or
    /// the named entity does not exist in the cluster.
    NotFound,

    /// The resources of one component disagree on a label value.
    Inconsistent,

    /// A build source is neither a git repository nor a local binary upload.
    UnsupportedSource,

    /// A call to the cluster failed.
    Upstream,

    /// The local context file could not be read or written.
    ConfigIo,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::NotFound => "not found",
            Self::Inconsistent => "inconsistent",
            Self::UnsupportedSource => "unsupported source",
            Self::Upstream => "upstream",
            Self::ConfigIo => "config I/O",
        };
        f.write_str(kind)
    }
}
