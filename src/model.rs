use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgKind {
    Faculty,
    Institute,
}

impl OrgKind {
    /// Faculties are the only units that carry the word in their name.
    pub fn from_name(name: &str) -> Self {
        if name.to_lowercase().contains("факультет") {
            OrgKind::Faculty
        } else {
            OrgKind::Institute
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrgKind::Faculty => "faculty",
            OrgKind::Institute => "institute",
        }
    }
}

/// Head of a unit. All parts are `None` when the page says nobody is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadName {
    #[serde(rename = "boss_surname")]
    pub surname: Option<String>,
    #[serde(rename = "boss_name")]
    pub name: Option<String>,
    #[serde(rename = "boss_patronymic")]
    pub patronymic: Option<String>,
}

impl HeadName {
    pub fn is_assigned(&self) -> bool {
        self.surname.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
}

impl From<PersonName> for HeadName {
    fn from(p: PersonName) -> Self {
        HeadName {
            surname: Some(p.surname),
            name: Some(p.name),
            patronymic: Some(p.patronymic),
        }
    }
}

/// Positionally paired phone numbers and extension codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Phones {
    #[serde(rename = "phones")]
    pub numbers: Option<Vec<String>>,
    #[serde(rename = "phones_additional_codes")]
    pub extensions: Option<Vec<Option<String>>>,
}

// ── Intermediate records ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationCore {
    pub name: String,
    pub kind: OrgKind,
    pub head: HeadName,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub email: String,
    pub phones: Phones,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    pub name: String,
    #[serde(rename = "struct_name")]
    pub organization: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub email: String,
    #[serde(rename = "division_clause_url")]
    pub regulation_url: Option<String>,
    #[serde(flatten)]
    pub phones: Phones,
    #[serde(rename = "boss_jobs")]
    pub head_jobs: Option<Vec<String>>,
    #[serde(flatten)]
    pub head: HeadName,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepartmentKey {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

impl Department {
    pub fn identity(&self) -> DepartmentKey {
        DepartmentKey {
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationAbout {
    pub name: String,
    pub description: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub email: String,
    pub website: Option<String>,
    pub phone: String,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationShortName {
    pub name: String,
    pub short_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationGroupInfo {
    pub name: String,
    pub code: String,
    pub groups: Vec<String>,
}

// ── Merge output ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalOrganization {
    pub name: String,
    #[serde(rename = "shortname")]
    pub short_name: String,
    pub description: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: OrgKind,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub email: String,
    #[serde(flatten)]
    pub phones: Phones,
    pub video_url: Option<String>,
    pub departments: Vec<Department>,
    pub groups: Vec<String>,
    #[serde(flatten)]
    pub head: HeadName,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganizationKey {
    pub name: String,
    pub short_name: String,
    pub kind: OrgKind,
    pub code: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

impl CanonicalOrganization {
    /// Two organizations with the same key are the same unit even if
    /// their contacts or department lists differ.
    pub fn identity(&self) -> OrganizationKey {
        OrganizationKey {
            name: self.name.clone(),
            short_name: self.short_name.clone(),
            kind: self.kind,
            code: self.code.clone(),
            address: self.address.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}
