use std::{borrow::Cow, fmt, path::PathBuf};

const FILE_SCHEME: &str = "file";

/// Where the code of a component comes from.
///
/// Stored in the `source-url` annotation of the component's resources. A
/// local directory is written as a `file://` URI so the kind of source can be
/// recovered from the scheme alone.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ComponentSource {
    Git { uri: String },
    Local { path: PathBuf },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceType {
    Git,
    Local,
}

impl ComponentSource {
    /// Value of the `source-url` annotation.
    ///
    /// Local paths are percent-encoded segment by segment. Returns `None` for
    /// a local path that is not valid UTF-8, since it cannot be written as a
    /// URI without changing it.
    #[must_use]
    pub fn to_annotation_value(&self) -> Option<String> {
        match self {
            Self::Git { uri } => Some(uri.clone()),
            Self::Local { path } => {
                let encoded = path
                    .to_str()?
                    .split('/')
                    .map(urlencoding::encode)
                    .collect::<Vec<_>>()
                    .join("/");
                Some(format!("{FILE_SCHEME}://{encoded}"))
            }
        }
    }

    #[must_use]
    pub fn from_annotation_value(value: &str) -> Self {
        match value.split_once(':') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case(FILE_SCHEME) => {
                let path = rest.strip_prefix("//").unwrap_or(rest);
                let path = urlencoding::decode(path)
                    .map_or_else(|_| path.to_string(), Cow::into_owned);
                Self::Local { path: PathBuf::from(path) }
            }
            _ => Self::Git { uri: value.to_string() },
        }
    }

    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        match self {
            Self::Git { .. } => SourceType::Git,
            Self::Local { .. } => SourceType::Local,
        }
    }
}

impl fmt::Display for ComponentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Git { uri } => f.write_str(uri),
            Self::Local { path } => write!(f, "{}", path.display()),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Git => f.write_str("git"),
            Self::Local => f.write_str("local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_local_directory_is_encoded_as_file_uri() {
        let source = ComponentSource::Local { path: PathBuf::from("/home/u/proj") };
        let value = source.to_annotation_value().unwrap();
        assert_eq!(value, "file:///home/u/proj");

        let decoded = ComponentSource::from_annotation_value(&value);
        assert_eq!(decoded.source_type(), SourceType::Local);
        assert_eq!(decoded, ComponentSource::Local { path: Path::new("/home/u/proj").into() });
        assert_eq!(decoded.source_type().to_string(), "local");
    }

    #[test]
    fn test_git_uri_is_stored_verbatim() {
        let uri = "https://example.com/r.git";
        let source = ComponentSource::Git { uri: uri.to_string() };
        assert_eq!(source.to_annotation_value().as_deref(), Some(uri));

        let decoded = ComponentSource::from_annotation_value(uri);
        assert_eq!(decoded.source_type(), SourceType::Git);
        assert_eq!(decoded.to_string(), uri);
        assert_eq!(decoded.source_type().to_string(), "git");
    }

    #[test]
    fn test_local_path_is_percent_encoded() {
        let source = ComponentSource::Local { path: PathBuf::from("/home/u/my proj#1") };
        let value = source.to_annotation_value().unwrap();
        assert_eq!(value, "file:///home/u/my%20proj%231");
        assert_eq!(ComponentSource::from_annotation_value(&value), source);

        assert_eq!(
            ComponentSource::from_annotation_value("file:///home/u/my%20proj"),
            ComponentSource::Local { path: PathBuf::from("/home/u/my proj") }
        );
        assert_eq!(
            ComponentSource::from_annotation_value("file:///srv/what%3F"),
            ComponentSource::Local { path: PathBuf::from("/srv/what?") }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_has_no_annotation() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let path = PathBuf::from(OsStr::from_bytes(b"/home/u/\xff"));
        assert_eq!(ComponentSource::Local { path }.to_annotation_value(), None);
    }

    #[test]
    fn test_scheme_decides_source_type() {
        assert_eq!(
            ComponentSource::from_annotation_value("git@github.com:org/repo.git").source_type(),
            SourceType::Git
        );
        assert_eq!(
            ComponentSource::from_annotation_value("FILE:/srv/app"),
            ComponentSource::Local { path: PathBuf::from("/srv/app") }
        );
    }
}
