//! Parsing of textual paths and `path:value` pairs supplied by operators.
//!
//! Malformed input is rejected here, before a [`Path`] ever reaches the
//! server-side translator.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, Result};
use crate::path::{Path, PathElem};
use crate::value::TypedValue;

/// Parse an xpath-like string (`/a/b[k=v][k2=v2]/c`) into a [`Path`].
///
/// Inside a key value, `\` escapes the following character so `]` and `\`
/// can appear literally. A leading `/` is optional; `/` and the empty string
/// both denote the root.
pub fn parse_xpath(input: &str) -> Result<Path> {
    let body = input.strip_prefix('/').unwrap_or(input);
    if body.is_empty() {
        return Ok(Path::root());
    }

    let mut chars = body.chars().peekable();
    let mut elems = Vec::new();
    loop {
        elems.push(parse_elem(input, &mut chars)?);
        match chars.next() {
            None => break,
            Some('/') => continue,
            Some(c) => {
                return Err(Error::invalid_path(
                    input,
                    format!("unexpected '{}' after key list", c),
                ))
            }
        }
    }

    Ok(Path::new(elems))
}

fn parse_elem(input: &str, chars: &mut Peekable<Chars<'_>>) -> Result<PathElem> {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        match c {
            '/' | '[' => break,
            ']' => return Err(Error::invalid_path(input, "unbalanced ']'")),
            _ => {
                name.push(c);
                chars.next();
            }
        }
    }
    if name.is_empty() {
        return Err(Error::invalid_path(input, "empty element name"));
    }

    let mut elem = PathElem::new(name);
    while chars.peek() == Some(&'[') {
        chars.next();
        let (key, value) = parse_key(input, chars)?;
        if elem.key.contains_key(&key) {
            return Err(Error::invalid_path(
                input,
                format!("duplicate key '{}' in element '{}'", key, elem.name),
            ));
        }
        elem.key.insert(key, value);
    }
    Ok(elem)
}

fn parse_key(input: &str, chars: &mut Peekable<Chars<'_>>) -> Result<(String, String)> {
    let mut key = String::new();
    loop {
        match chars.next() {
            Some('=') => break,
            Some(']') => return Err(Error::invalid_path(input, "key without '='")),
            Some(c) => key.push(c),
            None => return Err(Error::invalid_path(input, "unterminated '['")),
        }
    }
    if key.is_empty() {
        return Err(Error::invalid_path(input, "empty key name"));
    }

    let mut value = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some(c) => value.push(c),
                None => return Err(Error::invalid_path(input, "unterminated '['")),
            },
            Some(']') => break,
            Some(c) => value.push(c),
            None => return Err(Error::invalid_path(input, "unterminated '['")),
        }
    }
    Ok((key, value))
}

/// A parsed `path:value` pair, ready to become an update.
#[derive(Debug, Clone, PartialEq)]
pub struct PathValue {
    /// Where the value goes.
    pub path: Path,
    /// The value itself.
    pub value: TypedValue,
}

/// Parse a `path:value` pair such as `/openconfig-system:system/config/hostname:"sw1"`.
///
/// The separator is the last `:` outside brackets that follows the first path
/// segment, so module prefixes on the first segment are kept with the path.
/// A `:` directly followed by `"` or `` ` `` opens a quoted value and ends the
/// search, so colons inside quoted values stay with the value.
/// The value is classified with [`parse_value`].
pub fn parse_path_value(item: &str) -> Result<PathValue> {
    let split = separator_index(item).ok_or_else(|| Error::InvalidPathValue(item.to_string()))?;
    let (path_str, raw) = (&item[..split], &item[split + 1..]);
    if raw.is_empty() {
        return Err(Error::InvalidPathValue(item.to_string()));
    }

    Ok(PathValue {
        path: parse_xpath(path_str)?,
        value: parse_value(raw)?,
    })
}

fn separator_index(item: &str) -> Option<usize> {
    let body_start = usize::from(item.starts_with('/'));
    let mut in_brackets = false;
    let mut escaped = false;
    let mut first_segment_done = false;
    let mut candidate = None;
    let mut prev = None;

    for (idx, c) in item.char_indices().skip(body_start) {
        if in_brackets {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                ']' => in_brackets = false,
                _ => {}
            }
            prev = Some(c);
            continue;
        }
        match c {
            '[' => in_brackets = true,
            '/' => first_segment_done = true,
            '"' | '`' if first_segment_done && prev == Some(':') => return Some(idx - 1),
            ':' if first_segment_done => candidate = Some(idx),
            _ => {}
        }
        prev = Some(c);
    }
    candidate
}

/// Classify a raw value string.
///
/// - `@file` reads JSON-IETF content from `file` (surrounding whitespace trimmed)
/// - `"..."` (JSON escapes) or `` `...` `` (raw) is a string
/// - otherwise integer, then float, then boolean, falling back to a literal string
pub fn parse_value(raw: &str) -> Result<TypedValue> {
    if let Some(file) = raw.strip_prefix('@') {
        let content = std::fs::read(file).map_err(|source| Error::Io {
            path: file.to_string(),
            source,
        })?;
        let trimmed = trim_ascii_whitespace(&content);
        return Ok(TypedValue::json_ietf(trimmed));
    }

    if let Some(s) = unquote(raw) {
        return Ok(TypedValue::StringVal(s));
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(TypedValue::IntVal(i));
    }
    if let Some(f) = raw.parse::<f32>().ok().filter(|f| f.is_finite()) {
        return Ok(TypedValue::FloatVal(f));
    }
    if let Some(b) = parse_bool(raw) {
        return Ok(TypedValue::BoolVal(b));
    }
    Ok(TypedValue::StringVal(raw.to_string()))
}

fn unquote(raw: &str) -> Option<String> {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return serde_json::from_str::<String>(raw).ok();
    }
    if raw.len() >= 2 && raw.starts_with('`') && raw.ends_with('`') {
        let inner = &raw[1..raw.len() - 1];
        if !inner.contains('`') {
            return Some(inner.to_string());
        }
    }
    None
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(b, b' ' | b'\r' | b'\n' | b'\t');
    let start = bytes.iter().position(|b| !is_ws(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_ws(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}
