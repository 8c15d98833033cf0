use std::collections::VecDeque;

use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use super::html::{extract_expandable_panel, find_prop, flatten, is_tag, text_of};
use super::text::{
    extract_address_and_postal_code, extract_phones_with_extensions, is_absent_marker,
    parse_head,
};
use super::ParseOptions;
use crate::error::{Error, Result};
use crate::model::{Department, OrgKind, OrganizationCore, Phones};

const PAGE: &str = "directory page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPage {
    pub organizations: Vec<OrganizationCore>,
    pub departments: Vec<Department>,
}

struct Table<'a> {
    heading: String,
    body: ElementRef<'a>,
}

/// Parse the structure page: governing bodies, faculties/institutes and
/// departments, in that order.
pub fn parse(html: &str, opts: &ParseOptions) -> Result<DirectoryPage> {
    let doc = Html::parse_document(html);
    let flat = flatten(doc.root_element());

    let headings: Vec<_> = flat.iter().filter(|el| is_tag(el, "h4")).collect();
    let heads = flat.iter().filter(|el| is_tag(el, "thead")).count();
    let bodies: Vec<_> = flat.iter().filter(|el| is_tag(el, "tbody")).collect();

    if heads != bodies.len() {
        return Err(Error::layout(
            PAGE,
            format!("{} table heads but {} table bodies", heads, bodies.len()),
        ));
    }

    let mut tables: VecDeque<Table> = headings
        .iter()
        .zip(bodies.iter())
        .map(|(h, b)| Table {
            heading: text_of(**h).to_lowercase(),
            body: **b,
        })
        .collect();

    let labels = &opts.labels;

    let governing = next_table(&mut tables, "governing bodies")?;
    if !governing.heading.contains(&labels.governing_heading.to_lowercase()) {
        warn!("Unexpected governing bodies table heading: {:?}", governing.heading);
    }

    let faculties = next_table(&mut tables, "faculties")?;
    if !faculties.heading.contains(&labels.faculties_heading.to_lowercase()) {
        return Err(Error::layout(
            PAGE,
            format!("faculties table not found, got heading {:?}", faculties.heading),
        ));
    }
    let organizations = parse_organizations(faculties.body, opts)?;

    let departments_table = next_table(&mut tables, "departments")?;
    if !departments_table
        .heading
        .contains(&labels.departments_heading.to_lowercase())
    {
        return Err(Error::layout(
            PAGE,
            format!("departments table not found, got heading {:?}", departments_table.heading),
        ));
    }
    let departments = parse_departments(departments_table.body, opts)?;

    info!(
        "Directory page: {} organizations, {} departments",
        organizations.len(),
        departments.len()
    );

    Ok(DirectoryPage {
        organizations,
        departments,
    })
}

fn next_table<'a>(tables: &mut VecDeque<Table<'a>>, which: &str) -> Result<Table<'a>> {
    tables
        .pop_front()
        .ok_or_else(|| Error::layout(PAGE, format!("{} table is missing", which)))
}

fn parse_organizations(body: ElementRef<'_>, opts: &ParseOptions) -> Result<Vec<OrganizationCore>> {
    let rows = flatten(body)
        .into_iter()
        .filter(|el| el.value().attr("itemprop") == Some("structOrgUprav"));

    let mut organizations = Vec::new();
    for row in rows {
        let name = required_text(row, "name")?;
        if name.is_empty() {
            return Err(Error::layout(PAGE, "organization row with an empty name"));
        }
        if opts.skip.is_skipped(&name) {
            debug!("Skipping organization {:?}", name);
            continue;
        }

        let head = parse_head(&required_text(row, "fio")?)?;
        let (postal_code, address) = extract_address_and_postal_code(&required_text(row, "addressStr")?);

        let site = required_text(row, "site")?;
        let website = if site.to_lowercase().contains("нет") {
            None
        } else {
            Some(site.trim_matches('/').to_string()).filter(|s| !s.is_empty())
        };

        let phones = phones_after_regulation_cell(row)?;

        organizations.push(OrganizationCore {
            kind: OrgKind::from_name(&name),
            head,
            address: Some(address).filter(|a| !a.is_empty()),
            postal_code,
            website,
            email: required_text(row, "email")?,
            phones,
            name,
        });
    }

    Ok(organizations)
}

fn parse_departments(body: ElementRef<'_>, opts: &ParseOptions) -> Result<Vec<Department>> {
    let rows = flatten(body).into_iter().filter(|el| is_tag(el, "tr"));

    let mut departments = Vec::new();
    let mut current_org = String::from("unknown");

    for row in rows {
        // Rows without itemprop are section headers naming the organization
        if row.value().attr("itemprop").is_none() {
            current_org = text_of(row);
            continue;
        }
        if opts.skip.is_skipped(&current_org) {
            continue;
        }

        let name = required_text(row, "name")?;
        let head = parse_head(&required_text(row, "fio")?)?;

        let post = required(row, "post")?;
        let head_jobs = if is_absent_marker(&text_of(post)) {
            None
        } else {
            Some(
                extract_expandable_panel(post, &[",", ";"])
                    .into_iter()
                    .map(|job| job.replace("И. о.", "И.о."))
                    .collect(),
            )
        };

        let (postal_code, address) = extract_address_and_postal_code(&required_text(row, "addressStr")?);

        let site = required_text(row, "site")?;
        let website = if site.to_lowercase().contains("нет") || site.is_empty() {
            None
        } else {
            Some(site)
        };

        let regulation = required(row, "divisionClauseDocLink")?;
        let regulation_url = if text_of(regulation).to_lowercase() == "нет" {
            None
        } else {
            regulation_link(regulation, opts)?
        };

        departments.push(Department {
            name,
            organization: current_org.clone(),
            address: Some(address).filter(|a| !a.is_empty()),
            postal_code,
            website,
            email: required_text(row, "email")?,
            regulation_url,
            phones: phones_after_regulation_cell(row)?,
            head_jobs,
            head,
        });
    }

    Ok(departments)
}

fn regulation_link(cell: ElementRef<'_>, opts: &ParseOptions) -> Result<Option<String>> {
    let href = flatten(cell)
        .into_iter()
        .find(|el| is_tag(el, "a"))
        .and_then(|a| a.value().attr("href"));
    match href {
        Some(href) => opts
            .site_base
            .join(href.trim())
            .map(|u| Some(u.to_string()))
            .map_err(|e| Error::layout(PAGE, format!("bad document link {:?}: {}", href, e))),
        None => Ok(None),
    }
}

/// The phone column has no itemprop; it is the cell right after the one
/// holding the regulation document link.
fn phones_after_regulation_cell(row: ElementRef<'_>) -> Result<Phones> {
    let cells: Vec<_> = flatten(row).into_iter().filter(|el| is_tag(el, "td")).collect();
    let regulation = required(row, "divisionClauseDocLink")?;

    let idx = cells
        .iter()
        .position(|cell| cell.descendants().any(|n| n.id() == regulation.id()))
        .ok_or_else(|| Error::layout(PAGE, "regulation link is not inside a table cell"))?;

    let phone_cell = cells
        .get(idx + 1)
        .ok_or_else(|| Error::layout(PAGE, "no phone cell after the regulation link"))?;

    Ok(extract_phones_with_extensions(Some(&text_of(*phone_cell))))
}

fn required<'a>(row: ElementRef<'a>, prop: &str) -> Result<ElementRef<'a>> {
    find_prop(row, prop).ok_or_else(|| {
        Error::layout(
            PAGE,
            format!("row {:?} has no {:?} cell", text_of(row), prop),
        )
    })
}

fn required_text(row: ElementRef<'_>, prop: &str) -> Result<String> {
    required(row, prop).map(text_of)
}

// ── Tests ──
