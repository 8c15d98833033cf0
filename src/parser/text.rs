use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{HeadName, PersonName, Phones};

static PERSON_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([a-zA-ZёЁа-яА-Я\-]+(?:\s+[a-zA-ZёЁа-яА-Я\-]*)?)\s+([a-zA-ZёЁа-яА-Я\-]+)\s+([a-zA-ZёЁа-яА-Я\-]+)",
    )
    .unwrap()
});

pub const EXTENSION_MARKER: &str = "доб";

/// Collapse every whitespace run (non-breaking spaces included) into one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn strip_label(text: &str, label: &str) -> String {
    normalize_whitespace(&normalize_whitespace(text).replace(label, " "))
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First character of every hyphen-separated part upper-case, the rest
/// lower-case: "бородулина-ИВАНОВА" → "Бородулина-Иванова".
fn capitalize_word(s: &str) -> String {
    s.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

/// Replace non-breaking spaces and trim, keeping line breaks and runs of
/// spaces inside the text.
pub fn clean_text(text: &str) -> String {
    text.replace('\u{a0}', " ").trim().to_string()
}

/// Split `text` on any of `separators`, except where the separator sits
/// inside a parenthesized group (the next parenthesis after it closes).
pub fn split_labeled_list(text: &str, separators: &[&str]) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < text.len() {
        let matched = separators
            .iter()
            .find(|sep| !sep.is_empty() && text[i..].starts_with(**sep));
        match matched {
            Some(sep) if !inside_parens(&text[i + sep.len()..]) => {
                pieces.push(&text[start..i]);
                i += sep.len();
                start = i;
            }
            _ => {
                i += text[i..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(|p| capitalize_first(&normalize_whitespace(p)))
        .filter(|p| !p.is_empty())
        .collect()
}

fn inside_parens(rest: &str) -> bool {
    rest.chars().find(|c| *c == '(' || *c == ')') == Some(')')
}

/// Phone numbers with their positional extension codes.
pub fn extract_phones_with_extensions(text: Option<&str>) -> Phones {
    let text = match text.map(normalize_whitespace) {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return Phones::default(),
    };

    let mut numbers = Vec::new();
    let mut extensions = Vec::new();

    for fragment in split_labeled_list(&text, &[",", ";"]) {
        let fragment = fragment.to_lowercase();
        let mut parts = fragment.split(EXTENSION_MARKER).map(digits_only);
        let number = parts.next().unwrap_or_default();
        let extension = parts.next().filter(|ext| !number.is_empty() && !ext.is_empty());
        numbers.push(number);
        extensions.push(extension);
    }

    Phones {
        numbers: Some(numbers),
        extensions: Some(extensions),
    }
}

pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// `"170100, г. Тверь, ..."` → `(Some("170100"), "г. Тверь, ...")`.
/// The leading segment counts as a postal code only when it is all digits.
pub fn extract_address_and_postal_code(text: &str) -> (Option<String>, String) {
    let text = normalize_whitespace(text);
    match text.split_once(',') {
        Some((postal, address)) if is_postal_code(postal.trim()) => {
            (Some(postal.trim().to_string()), address.trim().to_string())
        }
        _ => (None, text),
    }
}

fn is_postal_code(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub fn split_person_name(full_name: &str) -> Result<PersonName> {
    let caps = PERSON_NAME_RE
        .captures(full_name)
        .ok_or_else(|| Error::PersonName(full_name.to_string()))?;
    Ok(PersonName {
        surname: capitalize_word(&normalize_whitespace(&caps[1])),
        name: capitalize_word(&caps[2]),
        patronymic: capitalize_word(&caps[3]),
    })
}

/// "нет" / "отсутствует": the page explicitly says there is nothing here.
pub fn is_absent_marker(text: &str) -> bool {
    let lower = normalize_whitespace(text).to_lowercase();
    lower == "нет" || lower.contains("отсутствует")
}

/// Head name cell: absent markers yield an unassigned head.
pub fn parse_head(text: &str) -> Result<HeadName> {
    if is_absent_marker(text) {
        Ok(HeadName::default())
    } else {
        split_person_name(text).map(HeadName::from)
    }
}

// ── Tests ──
