//! Placeholder substitution.
//!
//! Pure text transformation: no I/O, no shared state, identical inputs
//! always produce identical output. Substituted values are inserted as
//! literal text; escaping for the rendering markup is the renderer's job.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use letterforge_sheet::RowRecord;

use crate::spec::{FieldMapping, TemplateSpec};

/// Matches `{{TOKEN}}` where the token is anything up to the next `}}`.
/// Lazy matching keeps a stray single brace inside the name intact.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").unwrap());

/// What to do with a token that matches no mapping, static, or column.
///
/// The source system this replaces was inconsistent here, so the policy is
/// explicit. `Blank` is the default: unresolved tokens disappear rather than
/// leaking raw `{{...}}` markers into finished letters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedTokenPolicy {
    /// Replace the token with the empty string (default)
    #[default]
    Blank,
    /// Leave the raw `{{TOKEN}}` text in place
    Literal,
}

/// Resolve a template body against one row, with no explicit mappings.
///
/// Lookup order per token: run statics first, then the row column of the
/// same name. Unresolved tokens become empty strings.
pub fn resolve(body: &str, row: &RowRecord, statics: &BTreeMap<String, String>) -> String {
    let spec = TemplateSpec::from_body(body);
    resolve_with(&spec, row, statics, UnresolvedTokenPolicy::default())
}

/// Resolve a full [`TemplateSpec`] against one row.
///
/// Lookup order per token:
/// 1. an explicit [`FieldMapping`] (column or static value),
/// 2. the run statics map,
/// 3. a row column matching the token name.
///
/// Token names are trimmed, so `{{ Name }}` and `{{Name}}` are equivalent.
pub fn resolve_with(
    spec: &TemplateSpec,
    row: &RowRecord,
    statics: &BTreeMap<String, String>,
    policy: UnresolvedTokenPolicy,
) -> String {
    TOKEN_RE
        .replace_all(&spec.body, |caps: &Captures| {
            let name = caps[1].trim();
            match lookup(name, spec, row, statics) {
                Some(value) => value,
                None => match policy {
                    UnresolvedTokenPolicy::Blank => String::new(),
                    UnresolvedTokenPolicy::Literal => caps[0].to_string(),
                },
            }
        })
        .into_owned()
}

fn lookup(
    name: &str,
    spec: &TemplateSpec,
    row: &RowRecord,
    statics: &BTreeMap<String, String>,
) -> Option<String> {
    if let Some(mapping) = spec.mappings.get(name) {
        return match mapping {
            FieldMapping::Column { column } => row.get(column).map(|cell| cell.to_text()),
            FieldMapping::Static { value } => Some(value.clone()),
        };
    }

    if let Some(value) = statics.get(name) {
        return Some(value.clone());
    }

    row.get(name).map(|cell| cell.to_text())
}
