use std::collections::BTreeSet;
use std::fmt;

use tracing::{error, info};

use crate::error::{Error, MissingNames, Result};

/// Where an organization name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Directory,
    About,
    Catalog,
    Groups,
}

impl Source {
    pub const ALL: [Source; 4] = [Source::Directory, Source::About, Source::Catalog, Source::Groups];
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Directory => "directory page",
            Source::About => "about page",
            Source::Catalog => "catalog API",
            Source::Groups => "group-listing API",
        })
    }
}

/// Organization names seen by each source.
#[derive(Debug, Default)]
pub struct SourceNames {
    pub directory: BTreeSet<String>,
    pub about: BTreeSet<String>,
    pub catalog: BTreeSet<String>,
    pub groups: BTreeSet<String>,
    /// Owners named in the departments table. Reported, never compared.
    pub department_owners: BTreeSet<String>,
}

impl SourceNames {
    pub fn get(&self, source: Source) -> &BTreeSet<String> {
        match source {
            Source::Directory => &self.directory,
            Source::About => &self.about,
            Source::Catalog => &self.catalog,
            Source::Groups => &self.groups,
        }
    }
}

/// Fail the whole run unless all four sources list the same organizations.
pub fn check(names: &SourceNames) -> Result<()> {
    let reference = names.get(Source::Directory);
    if Source::ALL.iter().all(|s| names.get(*s) == reference) {
        info!("All sources agree on {} organizations", reference.len());
        return Ok(());
    }

    let all: BTreeSet<String> = Source::ALL
        .iter()
        .flat_map(|s| names.get(*s).iter().cloned())
        .collect();

    let mut missing = Vec::new();
    for source in Source::ALL {
        let lacking: BTreeSet<String> = all.difference(names.get(source)).cloned().collect();
        if !lacking.is_empty() {
            error!("{} has no organizations: {:?}", source, lacking);
            missing.push((source, lacking));
        }
    }

    let owners_lacking: Vec<&String> = all.difference(&names.department_owners).collect();
    if !owners_lacking.is_empty() {
        error!("departments table has no sections for: {:?}", owners_lacking);
    }

    Err(Error::NameMismatch(MissingNames(missing)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn agreeing() -> SourceNames {
        let names = set(&["Биологический факультет", "Институт экономики и управления"]);
        SourceNames {
            directory: names.clone(),
            about: names.clone(),
            catalog: names.clone(),
            groups: names.clone(),
            department_owners: names,
        }
    }

    #[test]
    fn equal_sets_pass() {
        assert!(check(&agreeing()).is_ok());
    }

    #[test]
    fn department_owners_do_not_gate() {
        let mut names = agreeing();
        names.department_owners = set(&["Биологический факультет"]);
        assert!(check(&names).is_ok());
    }

    #[test]
    fn one_source_missing_a_name() {
        let mut names = agreeing();
        names.catalog.remove("Биологический факультет");

        let Err(Error::NameMismatch(missing)) = check(&names) else {
            panic!("expected a name mismatch");
        };
        assert_eq!(missing.get(Source::Catalog), Some(&set(&["Биологический факультет"])));
        assert_eq!(missing.get(Source::Directory), None);
        assert_eq!(missing.get(Source::About), None);
        assert_eq!(missing.get(Source::Groups), None);
    }

    #[test]
    fn extra_name_in_one_source() {
        let mut names = agreeing();
        names.groups.insert("Философский факультет".to_string());

        let Err(Error::NameMismatch(missing)) = check(&names) else {
            panic!("expected a name mismatch");
        };
        for source in [Source::Directory, Source::About, Source::Catalog] {
            assert_eq!(missing.get(source), Some(&set(&["Философский факультет"])));
        }
        assert_eq!(missing.get(Source::Groups), None);
        assert!(missing.to_string().contains("catalog API is missing: Философский факультет"));
    }
}
