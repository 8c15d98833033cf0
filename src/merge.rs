use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::{
    CanonicalOrganization, Department, OrganizationAbout, OrganizationCore,
    OrganizationGroupInfo, OrganizationShortName,
};

/// Everything known about one organization before the merge.
#[derive(Debug, Default)]
struct PartialRecord {
    core: Option<OrganizationCore>,
    about: Option<OrganizationAbout>,
    short: Option<OrganizationShortName>,
    groups: Option<OrganizationGroupInfo>,
    departments: Vec<Department>,
}

impl PartialRecord {
    fn into_canonical(self, name: String) -> Result<CanonicalOrganization> {
        let incomplete = |missing: &str| Error::IncompleteMerge {
            name: name.clone(),
            missing: missing.to_string(),
        };
        let core = self.core.ok_or_else(|| incomplete("the directory page"))?;
        let about = self.about.ok_or_else(|| incomplete("the about page"))?;
        let short = self.short.ok_or_else(|| incomplete("the catalog API"))?;
        let groups = self.groups.ok_or_else(|| incomplete("the group-listing API"))?;

        let email = if core.email.is_empty() {
            about.email
        } else {
            core.email
        };

        Ok(CanonicalOrganization {
            short_name: short.short_name,
            description: about.description,
            code: groups.code,
            kind: core.kind,
            address: core.address.or(Some(about.address).filter(|a| !a.is_empty())),
            postal_code: about.postal_code.or(core.postal_code),
            website: core.website.or(about.website),
            email,
            phones: core.phones,
            video_url: about.video_url,
            departments: self.departments,
            groups: groups.groups,
            head: core.head,
            name,
        })
    }
}

/// Intermediate records from all four sources, as produced by the parsers.
#[derive(Debug, Default)]
pub struct SourceRecords {
    pub organizations: Vec<OrganizationCore>,
    pub departments: Vec<Department>,
    pub about: Vec<OrganizationAbout>,
    pub short_names: Vec<OrganizationShortName>,
    pub groups: Vec<OrganizationGroupInfo>,
}

fn slot<T>(slot: &mut Option<T>, value: T, name: &str, source: &str) {
    if slot.is_some() {
        warn!("{:?} listed twice by the {}, keeping the last one", name, source);
    }
    *slot = Some(value);
}

/// Join the four sources by organization name into canonical records.
pub fn merge(records: SourceRecords) -> Result<Vec<CanonicalOrganization>> {
    let mut index: IndexMap<String, PartialRecord> = IndexMap::new();

    // Department owners seed the index, so they lead the output order
    for dep in records.departments {
        index
            .entry(dep.organization.clone())
            .or_default()
            .departments
            .push(dep);
    }

    for org in records.organizations {
        let entry = index.entry(org.name.clone()).or_default();
        let name = org.name.clone();
        slot(&mut entry.core, org, &name, "directory page");
    }

    for about in records.about {
        let entry = index.entry(about.name.clone()).or_default();
        let name = about.name.clone();
        slot(&mut entry.about, about, &name, "about page");
    }

    for short in records.short_names {
        let entry = index.entry(short.name.clone()).or_default();
        let name = short.name.clone();
        slot(&mut entry.short, short, &name, "catalog API");
    }

    for groups in records.groups {
        let entry = index.entry(groups.name.clone()).or_default();
        let name = groups.name.clone();
        slot(&mut entry.groups, groups, &name, "group-listing API");
    }

    let mut merged = Vec::with_capacity(index.len());
    for (name, mut partial) in index {
        dedup_departments(&name, &mut partial.departments);
        merged.push(partial.into_canonical(name)?);
    }

    info!("Merged {} organizations", merged.len());
    Ok(merged)
}

/// Rows with the same identity describe the same department; first one wins.
fn dedup_departments(org: &str, departments: &mut Vec<Department>) {
    let mut seen = HashSet::new();
    departments.retain(|d| {
        let fresh = seen.insert(d.identity());
        if !fresh {
            warn!("Duplicate department {:?} in {:?}", d.name, org);
        }
        fresh
    });
}

// ── Tests ──
