use config::{Config, Environment};
use serde::Deserialize;
use url::Url;

use crate::parser::{Labels, ParseOptions, SkipList};

pub const DEFAULT_SKIP: &[&str] = &[
    "Аспирантура",
    "Институт непрерывного образования",
    // Empty placeholder unit, has no page of its own
    "Отделение общеуниверситетских кафедр",
    "Другие кафедры",
];

/// Runtime settings: defaults overridden by `TVERSU_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub directory_url: String,
    pub about_url: String,
    pub catalog_url: String,
    /// The only endpoint that exposes organization codes (inside group names).
    pub groups_url: String,
    pub site_base: String,
    pub skip: Vec<String>,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let settings = Config::builder()
            .set_default("directory_url", "https://tversu.ru/sveden/struct")?
            .set_default("about_url", "https://tversu.ru/pages/2182")?
            .set_default(
                "catalog_url",
                "https://abiturient.tversu.ru/api/catalog/faculties",
            )?
            .set_default("groups_url", "https://timetable.tversu.ru/api/v3/groups")?
            .set_default("site_base", "https://tversu.ru")?
            .set_default(
                "skip",
                DEFAULT_SKIP.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            )?
            .set_default("timeout_secs", 30)?
            .add_source(
                Environment::with_prefix("TVERSU")
                    .try_parsing(true)
                    .list_separator(";")
                    .with_list_parse_key("skip"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn parse_options(&self) -> anyhow::Result<ParseOptions> {
        Ok(ParseOptions {
            skip: SkipList::new(&self.skip),
            labels: Labels::default(),
            site_base: Url::parse(&self.site_base)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let s = Settings::load().unwrap();
        assert!(s.directory_url.starts_with("https://"));
        assert!(s.timeout_secs > 0);
        let opts = s.parse_options().unwrap();
        assert_eq!(opts.site_base.as_str(), "https://tversu.ru/");
    }

    #[test]
    fn default_skip_list_covers_aspirantura() {
        let skip = SkipList::new(DEFAULT_SKIP);
        assert!(skip.is_skipped("Аспирантура"));
        assert!(skip.is_skipped("Другие кафедры"));
    }
}
