use serde_json::Value;
use tracing::{debug, info};

use super::text::normalize_whitespace;
use super::ParseOptions;
use crate::error::{Error, Result};
use crate::model::OrganizationShortName;

const SOURCE: &str = "catalog API";

/// Parse `{"data": [{"facultyName": ..., "facultyShort": ...}, ...]}`.
pub fn parse(response: &Value, opts: &ParseOptions) -> Result<Vec<OrganizationShortName>> {
    let entries = response
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::malformed(SOURCE, "no \"data\" list"))?;

    let mut organizations = Vec::new();
    for entry in entries {
        let name = entry.get("facultyName").and_then(Value::as_str);
        let short = entry.get("facultyShort").and_then(Value::as_str);
        let (Some(name), Some(short)) = (name, short) else {
            return Err(Error::malformed(SOURCE, format!("incomplete entry {}", entry)));
        };

        let name = normalize_whitespace(name);
        if name.is_empty() {
            return Err(Error::malformed(SOURCE, format!("empty name in {}", entry)));
        }
        if opts.skip.is_skipped(&name) {
            debug!("Skipping organization {:?}", name);
            continue;
        }

        organizations.push(OrganizationShortName {
            name,
            short_name: normalize_whitespace(short),
        });
    }

    info!("Catalog API: {} organizations", organizations.len());
    Ok(organizations)
}
