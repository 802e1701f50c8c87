//! Placeholder substitution for template text
//!
//! `{name}` tokens resolve from caller overrides, then the template's own
//! variables, then values derived from the template fields. Anything left
//! unresolved stays in the text verbatim.

use crate::templates::catalog::QuestTemplate;
use crate::templates::matcher::display_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rendered quest text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestText {
    pub title: String,
    pub description: String,
}

/// Minutes rounded to the nearest 5 (never below 5)
pub fn round_to_five(minutes: u32) -> u32 {
    (minutes.saturating_add(2) / 5 * 5).max(5)
}

/// Value derived from the template's own fields
fn builtin_value(template: &QuestTemplate, key: &str) -> Option<String> {
    match key {
        "duration" => Some(round_to_five(template.time_estimate_minutes).to_string()),
        "difficulty" => Some(template.difficulty.to_string()),
        "focus" => Some(template.focus_required.to_string()),
        "energy" => Some(format!("{}%", (template.energy_level * 100.0).round() as i64)),
        "category" => Some(template.category.clone()),
        "skill" => template.skills.iter().next().map(|s| display_name(s.as_str())),
        "skills" if !template.skills.is_empty() => Some(
            template
                .skills
                .iter()
                .map(|s| display_name(s.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Placeholder names appearing in `pattern`, in order of first appearance
pub fn placeholders(pattern: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder_key(&after[..close]) => {
                let key = &after[..close];
                if !found.iter().any(|k| k == key) {
                    found.push(key.to_string());
                }
                rest = &after[close + 1..];
            }
            Some(_) => rest = after,
            None => break,
        }
    }
    found
}

/// Replace every resolvable `{key}` in `pattern` using `resolve`
pub fn substitute<F>(pattern: &str, resolve: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let resolved = after.find('}').and_then(|close| {
            let key = &after[..close];
            if is_placeholder_key(key) {
                resolve(key).map(|value| (value, close))
            } else {
                None
            }
        });
        match resolved {
            Some((value, close)) => {
                out.push_str(&value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render a template with its own variables
pub fn interpolate(template: &QuestTemplate) -> QuestText {
    interpolate_with(template, &BTreeMap::new())
}

/// Render a template, preferring `overrides` over its own variables
pub fn interpolate_with(template: &QuestTemplate, overrides: &BTreeMap<String, String>) -> QuestText {
    let resolve = |key: &str| {
        overrides
            .get(key)
            .or_else(|| template.variables.get(key))
            .cloned()
            .or_else(|| builtin_value(template, key))
    };

    QuestText {
        title: substitute(&template.title_pattern, resolve),
        description: substitute(&template.description_pattern, resolve),
    }
}
