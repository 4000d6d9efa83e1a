use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref LEADING_WHITESPACE: Regex = Regex::new(r"^\s*").unwrap();
}

/// Collapses insignificant whitespace in markup text the way browsers render
/// it: carriage returns dropped, lines joined on single spaces with their
/// leading indentation removed, interior runs collapsed to one space.
pub fn trim_whitespace(text: &str) -> String {
    let text = text.replace('\r', "");
    let text = if text.contains('\n') {
        text.split('\n')
            .enumerate()
            .map(|(i, line)| {
                if i > 0 {
                    LEADING_WHITESPACE.replace(line, "").into_owned()
                } else {
                    line.to_string()
                }
            })
            .filter(|line| !is_blank(line))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text
    };
    WHITESPACE_RUN.replace_all(&text, " ").into_owned()
}

/// Decodes HTML character references (`&amp;`, `&#x27;`, ...) in text content.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

pub fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// True when `name` can appear bare as a JS identifier or property key.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Renders a JS double-quoted string literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
