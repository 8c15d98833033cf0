use std::collections::BTreeSet;
use std::fmt;

use crate::consistency::Source;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required key or field is missing from one of the JSON APIs.
    #[error("malformed {source_name} response: {detail}")]
    MalformedSource {
        source_name: &'static str,
        detail: String,
    },

    /// An HTML page does not have the tables/elements the parser relies on.
    #[error("unexpected layout of {page}: {detail}")]
    UnexpectedLayout { page: &'static str, detail: String },

    #[error("organization names differ between sources:\n{0}")]
    NameMismatch(MissingNames),

    #[error("cannot split person name {0:?} into surname, name and patronymic")]
    PersonName(String),

    #[error("organization {name:?} has no record from {missing}")]
    IncompleteMerge { name: String, missing: String },
}

impl Error {
    pub(crate) fn layout(page: &'static str, detail: impl Into<String>) -> Self {
        Error::UnexpectedLayout {
            page,
            detail: detail.into(),
        }
    }

    pub(crate) fn malformed(source_name: &'static str, detail: impl Into<String>) -> Self {
        Error::MalformedSource {
            source_name,
            detail: detail.into(),
        }
    }
}

/// Per-source names that the other sources know about but this one lacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingNames(pub Vec<(Source, BTreeSet<String>)>);

impl MissingNames {
    pub fn get(&self, source: Source) -> Option<&BTreeSet<String>> {
        self.0.iter().find(|(s, _)| *s == source).map(|(_, names)| names)
    }
}

impl fmt::Display for MissingNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (source, names) in &self.0 {
            let joined: Vec<&str> = names.iter().map(String::as_str).collect();
            writeln!(f, "  {} is missing: {}", source, joined.join(", "))?;
        }
        Ok(())
    }
}
