// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Named placeholder substitution for watch templates.
//!
//! Placeholders take the form `{name}`. A doubled brace (`{{` or `}}`)
//! produces a literal brace. Every placeholder must resolve, there is no
//! pass-through of unknown names.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors raised while rendering a template
#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    /// The template references a field the context does not provide
    #[error("missing template field `{0}`")]
    MissingField(String),

    /// A brace at the given byte offset is not part of a placeholder or escape
    #[error("unbalanced brace at offset {0}")]
    Unbalanced(usize),
}

/// Renders `template`, replacing each `{name}` with `fields[name]`.
pub fn render(template: &str, fields: &BTreeMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            offset += pos + 2;
            continue;
        }

        if tail.starts_with('}') {
            return Err(TemplateError::Unbalanced(offset + pos));
        }

        let close = tail.find('}').ok_or(TemplateError::Unbalanced(offset + pos))?;
        let name = &tail[1..close];
        if name.is_empty() || name.contains('{') {
            return Err(TemplateError::Unbalanced(offset + pos));
        }

        let value = fields
            .get(name)
            .ok_or_else(|| TemplateError::MissingField(name.to_string()))?;
        out.push_str(value);

        rest = &tail[close + 1..];
        offset += pos + close + 1;
    }

    out.push_str(rest);
    Ok(out)
}
