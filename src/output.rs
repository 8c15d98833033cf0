use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use tversu_structs::CanonicalOrganization;

/// `structs-2024-09-01.json`
pub fn auto_file_name(date: NaiveDate) -> String {
    format!("structs-{}.json", date.format("%Y-%m-%d"))
}

/// Join `file` onto `dir`, creating `dir` if needed.
pub fn resolve_path(dir: Option<&Path>, file: &str) -> Result<PathBuf> {
    match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            Ok(dir.join(file))
        }
        None => Ok(PathBuf::from(file)),
    }
}

pub fn to_json(orgs: &[CanonicalOrganization], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(orgs)?
    } else {
        serde_json::to_string(orgs)?
    };
    Ok(json)
}

pub fn write_json(path: &Path, orgs: &[CanonicalOrganization], pretty: bool) -> Result<()> {
    std::fs::write(path, to_json(orgs, pretty)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} organizations to {}", orgs.len(), path.display());
    Ok(())
}

pub fn print_table(orgs: &[CanonicalOrganization]) {
    println!(
        "{:>3} | {:<48} | {:<9} | {:<8} | {:<8} | {:>5} | {:>6}",
        "#", "Organization", "Type", "Code", "Short", "Deps", "Groups"
    );
    println!("{}", "-".repeat(104));

    for (i, org) in orgs.iter().enumerate() {
        println!(
            "{:>3} | {:<48} | {:<9} | {:<8} | {:<8} | {:>5} | {:>6}",
            i + 1,
            truncate(&org.name, 45),
            org.kind.as_str(),
            truncate(&org.code, 8),
            truncate(&org.short_name, 8),
            org.departments.len(),
            org.groups.len()
        );
    }

    let departments: usize = orgs.iter().map(|o| o.departments.len()).sum();
    println!("\n{} organizations | {} departments", orgs.len(), departments);
}

/// Cut to `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}
