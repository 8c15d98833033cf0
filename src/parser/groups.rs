use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use super::text::normalize_whitespace;
use super::ParseOptions;
use crate::error::{Error, Result};
use crate::model::OrganizationGroupInfo;

const SOURCE: &str = "group-listing API";

/// Organization code is the prefix of a group name: "ПМиК-11" → "ПМиК".
pub fn code_from_group(group: &str) -> String {
    group.split('-').next().unwrap_or_default().trim().to_string()
}

/// Parse `{"groups": [{"facultyName": ..., "groupName": ...}, ...]}`,
/// bucketing groups by organization in first-seen order.
pub fn parse(response: &Value, opts: &ParseOptions) -> Result<Vec<OrganizationGroupInfo>> {
    let entries = response
        .get("groups")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::malformed(SOURCE, "no \"groups\" list"))?;

    let mut buckets: IndexMap<String, OrganizationGroupInfo> = IndexMap::new();
    for entry in entries {
        let org = entry.get("facultyName").and_then(Value::as_str);
        let group = entry.get("groupName").and_then(Value::as_str);
        let (Some(org), Some(group)) = (org, group) else {
            return Err(Error::malformed(SOURCE, format!("incomplete group {}", entry)));
        };

        let org = normalize_whitespace(org);
        if org.is_empty() {
            return Err(Error::malformed(SOURCE, format!("empty organization in {}", entry)));
        }
        if opts.skip.is_skipped(&org) {
            debug!("Skipping group {:?} of {:?}", group, org);
            continue;
        }

        let group = normalize_whitespace(group);
        // The code is fixed by the first group seen
        let bucket = buckets
            .entry(org.clone())
            .or_insert_with(|| OrganizationGroupInfo {
                name: org,
                code: code_from_group(&group),
                groups: Vec::new(),
            });
        bucket.groups.push(group);
    }

    info!(
        "Group-listing API: {} organizations, {} groups",
        buckets.len(),
        buckets.values().map(|b| b.groups.len()).sum::<usize>()
    );
    Ok(buckets.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::test_options;
    use serde_json::json;

    fn fixture() -> Value {
        let raw = std::fs::read_to_string("tests/fixtures/groups.json").unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn buckets_from_fixture() {
        let orgs = parse(&fixture(), &test_options()).unwrap();
        assert_eq!(orgs.len(), 2);

        assert_eq!(orgs[0].name, "Факультет прикладной математики и кибернетики");
        assert_eq!(orgs[0].code, "ПМиК");
        assert_eq!(orgs[0].groups, vec!["ПМиК-11", "ПМиК-21", "ФИиИТ-12"]);

        assert_eq!(orgs[1].name, "Институт экономики и управления");
        assert_eq!(orgs[1].code, "ИЭУ");
        assert_eq!(orgs[1].groups, vec!["ИЭУ-31"]);
    }

    #[test]
    fn code_never_recomputed() {
        let response = json!({"groups": [
            {"facultyName": "Исторический факультет", "groupName": "И-11"},
            {"facultyName": "Исторический факультет", "groupName": "ИСТ-12"}
        ]});
        let orgs = parse(&response, &test_options()).unwrap();
        assert_eq!(orgs[0].code, "И");
    }

    #[test]
    fn skipped_before_bucketing() {
        let response = json!({"groups": [
            {"facultyName": "Аспирантура", "groupName": "А-1"},
            {"facultyName": "Юридический факультет", "groupName": "Ю-11"}
        ]});
        let orgs = parse(&response, &test_options()).unwrap();
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].name, "Юридический факультет");
    }

    #[test]
    fn missing_groups_key() {
        assert!(matches!(
            parse(&json!({"data": []}), &test_options()),
            Err(Error::MalformedSource { .. })
        ));
    }

    #[test]
    fn missing_group_name_is_fatal() {
        let response = json!({"groups": [{"facultyName": "Юридический факультет"}]});
        assert!(matches!(
            parse(&response, &test_options()),
            Err(Error::MalformedSource { .. })
        ));
    }

    #[test]
    fn code_prefix() {
        assert_eq!(code_from_group("ПМиК-11"), "ПМиК");
        assert_eq!(code_from_group(" М -21"), "М");
        assert_eq!(code_from_group("БФ"), "БФ");
    }
}
