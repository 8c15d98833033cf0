pub mod about;
pub mod catalog;
pub mod directory;
pub mod groups;
pub mod html;
pub mod text;

use url::Url;

/// Organization-name substrings excluded from every source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    lowered: Vec<String>,
}

impl SkipList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SkipList {
            lowered: names
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.lowered.iter().any(|skip| name.contains(skip.as_str()))
    }
}

/// Fixed texts the pages are known to carry.
#[derive(Debug, Clone)]
pub struct Labels {
    pub governing_heading: String,
    pub faculties_heading: String,
    pub departments_heading: String,
    pub address: String,
    pub website: String,
    pub email: String,
    pub phone: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            governing_heading: "Органы управления".into(),
            faculties_heading: "Факультеты".into(),
            departments_heading: "Кафедр".into(),
            address: "Адрес:".into(),
            website: "Сайт:".into(),
            email: "Электронная почта:".into(),
            phone: "Телефон:".into(),
        }
    }
}

/// Everything a parser needs besides the document itself.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub skip: SkipList,
    pub labels: Labels,
    /// Relative document links on the directory page resolve against this.
    pub site_base: Url,
}

#[cfg(test)]
pub(crate) fn test_options() -> ParseOptions {
    ParseOptions {
        skip: SkipList::new(crate::settings::DEFAULT_SKIP),
        labels: Labels::default(),
        site_base: Url::parse("https://tversu.ru").unwrap(),
    }
}
