// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Heuristic `metadata.name` lookup over manifest text.
//!
//! Documents are not parsed as YAML. Each line is classified as a `key: value`
//! field (with its indentation) or ignored, then two passes run over the fields:
//!
//! 1. after the first top-level `metadata:` line, the first `name:` field at any depth;
//! 2. failing that, the first `name:` field anywhere in the document.
//!
//! Pass 2 can pick up a `name:` belonging to an unrelated block when no
//! `metadata:` line precedes it. Callers rely on that behavior.

/// A `key: value` line
#[derive(Debug, PartialEq, Eq)]
struct Field<'a> {
    indent: usize,
    key: &'a str,
    value: &'a str,
}

impl Field<'_> {
    fn is_metadata_marker(&self) -> bool {
        self.indent == 0 && self.key == "metadata"
    }

    fn is_name(&self) -> bool {
        self.key == "name"
    }
}

/// Classify one line. Keys are bare words directly followed by a colon.
fn parse_field(line: &str) -> Option<Field<'_>> {
    let body = line.trim_start_matches([' ', '\t']);
    let indent = line.len() - body.len();
    let colon = body.find(':')?;
    let key = &body[..colon];
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return None;
    }
    Some(Field {
        indent,
        key,
        value: &body[colon + 1..],
    })
}

/// Trim whitespace and one pair of enclosing double quotes
fn clean_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(trimmed);
    (!unquoted.is_empty()).then(|| unquoted.to_string())
}

/// Return the resource name of a manifest, or `None` when it cannot be found
pub fn extract_name(content: &str) -> Option<String> {
    let fields: Vec<Field<'_>> = content.lines().filter_map(parse_field).collect();

    let after_metadata = fields
        .iter()
        .position(Field::is_metadata_marker)
        .and_then(|start| fields[start + 1..].iter().find(|f| f.is_name()))
        .and_then(|f| clean_value(f.value));

    after_metadata.or_else(|| {
        fields
            .iter()
            .find(|f| f.is_name())
            .and_then(|f| clean_value(f.value))
    })
}
