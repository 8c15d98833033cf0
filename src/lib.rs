//! Collects the organizational structure of Tver State University (faculties,
//! institutes and their departments) from four independently maintained
//! sources and merges them into one record per organization.
//!
//! The pipeline is: parse each source → check that all sources name the same
//! organizations → merge field by field.

pub mod consistency;
pub mod error;
pub mod merge;
pub mod model;
pub mod parser;
pub mod settings;

use serde_json::Value;

pub use error::{Error, Result};
pub use model::CanonicalOrganization;
pub use parser::ParseOptions;

use consistency::SourceNames;
use merge::SourceRecords;

/// The four raw documents, fetched and decoded by the caller.
#[derive(Debug, Clone)]
pub struct SourceDocuments {
    pub directory_html: String,
    pub about_html: String,
    pub catalog: Value,
    pub groups: Value,
}

/// Produce the canonical organization list from the four raw documents.
pub fn collect_organizations(
    docs: &SourceDocuments,
    opts: &ParseOptions,
) -> Result<Vec<CanonicalOrganization>> {
    let directory = parser::directory::parse(&docs.directory_html, opts)?;
    let about = parser::about::parse(&docs.about_html, opts)?;
    let short_names = parser::catalog::parse(&docs.catalog, opts)?;
    let groups = parser::groups::parse(&docs.groups, opts)?;

    let records = SourceRecords {
        organizations: directory.organizations,
        departments: directory.departments,
        about,
        short_names,
        groups,
    };

    consistency::check(&source_names(&records))?;
    merge::merge(records)
}

fn source_names(records: &SourceRecords) -> SourceNames {
    SourceNames {
        directory: records.organizations.iter().map(|o| o.name.clone()).collect(),
        about: records.about.iter().map(|o| o.name.clone()).collect(),
        catalog: records.short_names.iter().map(|o| o.name.clone()).collect(),
        groups: records.groups.iter().map(|o| o.name.clone()).collect(),
        department_owners: records
            .departments
            .iter()
            .map(|d| d.organization.clone())
            .collect(),
    }
}
