//! Supported container formats.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A textual container format records can be exchanged through.
///
/// The canonical name doubles as the file extension the format is inferred from.
///
/// ```rust
/// use dataio::FileFormat;
///
/// assert_eq!(FileFormat::Csv.name(), "CSV");
/// assert_eq!("json".parse::<FileFormat>().unwrap(), FileFormat::Json);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FileFormat {
    /// Row-oriented tabular format with a header line.
    Csv,
    /// Hierarchical document format.
    #[default]
    Json,
}

impl FileFormat {
    pub const ALL: [FileFormat; 2] = [FileFormat::Csv, FileFormat::Json];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Json => "JSON",
        }
    }

    /// Returns `true` if `extension` names this format, ignoring ASCII case.
    #[must_use]
    pub fn matches_extension(&self, extension: &str) -> bool {
        self.name().eq_ignore_ascii_case(extension)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().trim_start_matches('.');
        FileFormat::ALL
            .into_iter()
            .find(|format| format.matches_extension(s))
            .ok_or_else(|| Error::configuration(&format!("unknown file format '{}'", s)))
    }
}
