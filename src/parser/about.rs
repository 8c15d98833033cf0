use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::html::{flatten, free_text_of, is_tag, next_tag, text_of};
use super::text::{extract_address_and_postal_code, strip_label, EXTENSION_MARKER};
use super::ParseOptions;
use crate::error::{Error, Result};
use crate::model::OrganizationAbout;

static CONTENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".tvsu-ck-content").unwrap());

const PAGE: &str = "about page";
const HEADING: &str = "h4";

/// Parse the "about" page: one `h4` per organization followed by a
/// description paragraph, an optional video and a contact list.
pub fn parse(html: &str, opts: &ParseOptions) -> Result<Vec<OrganizationAbout>> {
    let doc = Html::parse_document(html);
    let container = doc
        .select(&CONTENT_SEL)
        .next()
        .ok_or_else(|| Error::layout(PAGE, "content container not found"))?;

    let flat = flatten(doc.root_element());
    let container_idx = position(&flat, container)?;
    let first_heading = next_tag(&flat, container_idx, flat.len(), HEADING)
        .ok_or_else(|| Error::layout(PAGE, "no organization headings"))?;

    let mut headings = vec![first_heading];
    for sibling in flat[first_heading].next_siblings().filter_map(ElementRef::wrap) {
        if is_tag(&sibling, HEADING) {
            headings.push(position(&flat, sibling)?);
        }
    }

    let mut organizations = Vec::new();
    for (n, &h) in headings.iter().enumerate() {
        let name = text_of(flat[h]);
        if name.is_empty() {
            return Err(Error::layout(PAGE, "organization heading is empty"));
        }
        if opts.skip.is_skipped(&name) {
            debug!("Skipping organization {:?}", name);
            continue;
        }
        let section_end = headings.get(n + 1).copied().unwrap_or(flat.len());
        organizations.push(parse_section(&flat, h, section_end, name, opts)?);
    }

    info!("About page: {} organizations", organizations.len());
    Ok(organizations)
}

fn parse_section(
    flat: &[ElementRef<'_>],
    heading: usize,
    section_end: usize,
    name: String,
    opts: &ParseOptions,
) -> Result<OrganizationAbout> {
    let missing = |what: &str| Error::layout(PAGE, format!("{:?} has no {}", name, what));
    let labels = &opts.labels;

    let desc_idx = next_tag(flat, heading, flat.len(), "p").ok_or_else(|| missing("description"))?;
    let description = free_text_of(flat[desc_idx]);

    let video_url = next_tag(flat, heading, section_end, "figure").and_then(|fig| {
        let until = fig + flatten(flat[fig]).len();
        next_tag(flat, fig, until, "oembed")
            .and_then(|i| flat[i].value().attr("url"))
            .map(|u| u.trim().to_string())
    });

    let list_idx = next_tag(flat, desc_idx, flat.len(), "ul").ok_or_else(|| missing("contact list"))?;
    let mut items = Vec::with_capacity(4);
    let mut cursor = list_idx;
    for field in ["address", "website", "email", "phone"] {
        cursor = next_tag(flat, cursor, flat.len(), "li").ok_or_else(|| missing(field))?;
        items.push(text_of(flat[cursor]));
    }

    let (postal_code, address) = extract_address_and_postal_code(&strip_label(&items[0], &labels.address));

    let website = strip_label(&items[1], &labels.website);
    let website = Some(website.trim_matches('/').to_string()).filter(|w| !w.is_empty());

    let email = strip_label(&items[2], &labels.email);
    let phone = clean_phone(&strip_label(&items[3], &labels.phone));

    Ok(OrganizationAbout {
        name,
        description,
        address,
        postal_code,
        email,
        website,
        phone,
        video_url,
    })
}

/// Digits as written, extension dropped.
fn clean_phone(text: &str) -> String {
    let lower = text.to_lowercase();
    let main = lower.split(EXTENSION_MARKER).next().unwrap_or_default();
    main.chars()
        .filter(|c| !c.is_whitespace() && !matches!(*c, '+' | '-' | '(' | ')'))
        .collect()
}

fn position(flat: &[ElementRef<'_>], el: ElementRef<'_>) -> Result<usize> {
    flat.iter()
        .position(|e| e.id() == el.id())
        .ok_or_else(|| Error::layout(PAGE, "element outside the document"))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::test_options;

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/about.html").unwrap()
    }

    #[test]
    fn organizations_from_fixture() {
        let orgs = parse(&fixture(), &test_options()).unwrap();
        assert_eq!(orgs.len(), 2);

        let pmk = &orgs[0];
        assert_eq!(pmk.name, "Факультет прикладной математики и кибернетики");
        assert_eq!(pmk.description, "Факультет готовит математиков и программистов.");
        assert_eq!(pmk.video_url.as_deref(), Some("https://www.youtube.com/watch?v=pmk"));
        assert_eq!(pmk.postal_code.as_deref(), Some("170002"));
        assert_eq!(pmk.address, "г. Тверь, Садовый пер., 35");
        assert_eq!(pmk.website.as_deref(), Some("https://pmk.tversu.ru"));
        assert_eq!(pmk.email, "pmk@tversu.ru");
        assert_eq!(pmk.phone, "74822585318");

        let ieu = &orgs[1];
        assert_eq!(ieu.name, "Институт экономики и управления");
        assert_eq!(ieu.description, "Институт готовит экономистов и менеджеров.");
        assert_eq!(ieu.video_url, None);
        assert_eq!(ieu.postal_code.as_deref(), Some("170100"));
        assert_eq!(ieu.website.as_deref(), Some("https://ieu.tversu.ru"));
        assert_eq!(ieu.email, "ieu@tversu.ru");
        assert_eq!(ieu.phone, "84822777777");
    }

    #[test]
    fn empty_website_is_none() {
        let html = fixture().replace("Сайт: https://ieu.tversu.ru/", "Сайт:");
        let orgs = parse(&html, &test_options()).unwrap();
        assert_eq!(orgs[1].website, None);
    }

    #[test]
    fn description_keeps_line_breaks() {
        let html = fixture().replace(
            "Институт готовит экономистов и менеджеров.",
            "Институт готовит экономистов\n  и менеджеров.",
        );
        let orgs = parse(&html, &test_options()).unwrap();
        assert_eq!(orgs[1].description, "Институт готовит экономистов\n  и менеджеров.");
        assert_eq!(orgs[1].name, "Институт экономики и управления");
    }

    #[test]
    fn deterministic() {
        let a = parse(&fixture(), &test_options()).unwrap();
        let b = parse(&fixture(), &test_options()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_container() {
        let html = fixture().replace("tvsu-ck-content", "other-content");
        assert!(matches!(
            parse(&html, &test_options()),
            Err(Error::UnexpectedLayout { .. })
        ));
    }

    #[test]
    fn missing_contact_items() {
        let html = r#"<div class="tvsu-ck-content"><h4>Биологический факультет</h4><p>Описание</p><ul><li>Адрес: 170100, г. Тверь</li></ul></div>"#;
        assert!(matches!(
            parse(html, &test_options()),
            Err(Error::UnexpectedLayout { .. })
        ));
    }

    #[test]
    fn phone_cleanup() {
        assert_eq!(clean_phone("+7 (4822) 58-53-18 доб. 101"), "74822585318");
        assert_eq!(clean_phone("8\u{a0}(4822)\u{a0}77-77-77"), "84822777777");
    }
}
