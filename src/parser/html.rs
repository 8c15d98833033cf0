use scraper::ElementRef;

use super::text::{capitalize_first, clean_text, normalize_whitespace, split_labeled_list};

const PANEL_CLASS: &str = "showpart-container-modal";

/// All elements under `root` (itself included) in document order.
pub fn flatten(root: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    root.descendants().filter_map(ElementRef::wrap).collect()
}

pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Like `text_of`, but line breaks and inner spacing survive.
pub fn free_text_of(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

pub fn is_tag(el: &ElementRef<'_>, tag: &str) -> bool {
    el.value().name() == tag
}

/// First descendant carrying `itemprop="<prop>"`.
pub fn find_prop<'a>(root: ElementRef<'a>, prop: &str) -> Option<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().attr("itemprop") == Some(prop))
}

/// First element after `from` in `flat` with the given tag, before `until`.
pub fn next_tag(flat: &[ElementRef<'_>], from: usize, until: usize, tag: &str) -> Option<usize> {
    let end = until.min(flat.len());
    (from + 1..end).find(|&i| is_tag(&flat[i], tag))
}

/// Some cells hide long lists behind a "Показать" toggle; the full list then
/// lives in a modal panel inside the cell.
pub fn extract_expandable_panel(container: ElementRef<'_>, separators: &[&str]) -> Vec<String> {
    let panel = container
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().classes().any(|c| c == PANEL_CLASS));

    let Some(panel) = panel else {
        return split_labeled_list(&text_of(container), separators);
    };

    let flat = flatten(panel);
    let items: Vec<String> = flat
        .iter()
        .filter(|el| is_tag(el, "li"))
        .map(|li| capitalize_first(text_of(*li).trim_matches(';').trim()))
        .filter(|s| !s.is_empty())
        .collect();
    if !items.is_empty() {
        return items;
    }

    match flat.iter().find(|el| is_tag(el, "p")) {
        Some(p) => split_labeled_list(&text_of(*p), separators),
        None => split_labeled_list(&text_of(panel), separators),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_td(doc: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("td").unwrap();
        doc.select(&sel).next().unwrap()
    }

    fn cell(inner: &str) -> Html {
        Html::parse_document(&format!("<table><tr><td>{inner}</td></tr></table>"))
    }

    #[test]
    fn panel_list_items() {
        let doc = cell(
            r#"Заведующий <a>Показать</a><div class="showpart-container-modal"><ul><li> заведующий кафедрой;</li><li>профессор </li></ul></div>"#,
        );
        let items = extract_expandable_panel(first_td(&doc), &[",", ";"]);
        assert_eq!(items, vec!["Заведующий кафедрой", "Профессор"]);
    }

    #[test]
    fn panel_paragraph() {
        let doc = cell(r#"<div class="showpart-container-modal"><p>доцент; профессор (0,5 ставки)</p></div>"#);
        let items = extract_expandable_panel(first_td(&doc), &[",", ";"]);
        assert_eq!(items, vec!["Доцент", "Профессор (0,5 ставки)"]);
    }

    #[test]
    fn panel_plain_text() {
        let doc = cell(r#"<div class="modal showpart-container-modal">декан, профессор</div>"#);
        let items = extract_expandable_panel(first_td(&doc), &[",", ";"]);
        assert_eq!(items, vec!["Декан", "Профессор"]);
    }

    #[test]
    fn no_panel_falls_back_to_cell_text() {
        let doc = cell("заведующий кафедрой, доцент");
        let items = extract_expandable_panel(first_td(&doc), &[",", ";"]);
        assert_eq!(items, vec!["Заведующий кафедрой", "Доцент"]);
    }

    #[test]
    fn find_prop_and_flatten() {
        let doc = cell(r#"<span itemprop="email"> a@tversu.ru </span>"#);
        let td = first_td(&doc);
        assert_eq!(text_of(find_prop(td, "email").unwrap()), "a@tversu.ru");
        assert!(find_prop(td, "site").is_none());
        let flat = flatten(td);
        assert!(is_tag(&flat[0], "td"));
        assert_eq!(next_tag(&flat, 0, flat.len(), "span"), Some(1));
        assert_eq!(next_tag(&flat, 0, 1, "span"), None);
    }
}
