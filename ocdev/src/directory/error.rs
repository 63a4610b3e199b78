use snafu::Snafu;

use crate::{error::ErrorKind, platform};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to query resources matching '{selector}', error: {source}"))]
    Platform { selector: String, source: platform::Error },

    #[snafu(display(
        "Resources disagree on label {label}, found: {}",
        values.iter().map(|v| if v.is_empty() { "<missing>" } else { v.as_str() })
            .collect::<Vec<_>>().join(", ")
    ))]
    InconsistentLabel { label: String, values: Vec<String> },

    #[snafu(display("No resources to read label {label} from"))]
    EmptyGroup { label: String },
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Platform { source, .. } => source.kind(),
            Self::InconsistentLabel { .. } => ErrorKind::Inconsistent,
            Self::EmptyGroup { .. } => ErrorKind::NotFound,
        }
    }
}
