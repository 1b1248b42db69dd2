//! Render3 View Utilities
//!
//! Helpers shared by the directive and component definition builders.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::output::output_ast::{self as o, Expression, LiteralMapEntry};

/// Checks whether an object key contains potentially unsafe chars
pub static UNSAFE_OBJECT_KEY_NAME_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-.']").expect("object key regex is valid"));

/// Name of the temporary to use during data binding
pub const TEMPORARY_NAME: &str = "_t";

/// Name of the context parameter passed into a template function
pub const CONTEXT_NAME: &str = "ctx";

/// Name of the RenderFlag passed into a template function
pub const RENDER_FLAGS: &str = "rf";

/// Name of the directive instance passed into a query function
pub const DIRECTIVE_INDEX: &str = "dirIndex";

pub fn as_literal(value: &str) -> Expression {
    *o::literal(value)
}

/// How a directive input is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMapping {
    /// `prop: "publicName"`
    Simple(String),
    /// `prop: ["publicName", "declaredName"]`
    Aliased {
        public_name: String,
        declared_name: String,
    },
}

/// Serializes an `inputs` map for `defineDirective` and `defineComponent`.
///
/// Aliased inputs whose public and declared names differ keep both names so the runtime can
/// write to the declared property.
pub fn conditionally_create_input_map(inputs: &IndexMap<String, InputMapping>) -> Option<Expression> {
    if inputs.is_empty() {
        return None;
    }
    let entries = inputs
        .iter()
        .map(|(key, mapping)| {
            let value = match mapping {
                InputMapping::Simple(public_name) => as_literal(public_name),
                InputMapping::Aliased {
                    public_name,
                    declared_name,
                } if public_name != declared_name => {
                    *o::literal_arr(vec![as_literal(public_name), as_literal(declared_name)])
                }
                InputMapping::Aliased { public_name, .. } => as_literal(public_name),
            };
            LiteralMapEntry::new(key.clone(), value, UNSAFE_OBJECT_KEY_NAME_REGEXP.is_match(key))
        })
        .collect();
    Some(*o::literal_map(entries))
}

/// Serializes a plain `{key: "value"}` map, omitting it entirely when empty.
pub fn conditionally_create_string_map(map: &IndexMap<String, String>) -> Option<Expression> {
    if map.is_empty() {
        return None;
    }
    let entries = map
        .iter()
        .map(|(key, value)| {
            LiteralMapEntry::new(key.clone(), as_literal(value), UNSAFE_OBJECT_KEY_NAME_REGEXP.is_match(key))
        })
        .collect();
    Some(*o::literal_map(entries))
}

/// Parses a `style` attribute value into `[prop, value, prop, value, ...]`.
///
/// Semicolons and colons inside quotes or parentheses (e.g. `url(a;b)`) do not split.
pub fn parse_style(value: &str) -> Vec<String> {
    let mut styles = Vec::new();
    let mut paren_depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prop: Option<String> = None;
    let mut value_start = 0usize;

    let mut push_value = |prop: &mut Option<String>, text: &str| {
        if let Some(p) = prop.take() {
            let v = text.trim();
            if !p.is_empty() && !v.is_empty() {
                styles.push(hyphenate(&p));
                styles.push(v.to_string());
            }
        }
    };

    for (i, ch) in value.char_indices() {
        match ch {
            '(' if quote.is_none() => paren_depth += 1,
            ')' if quote.is_none() => paren_depth = paren_depth.saturating_sub(1),
            '"' | '\'' => match quote {
                None => quote = Some(ch),
                Some(q) if q == ch => quote = None,
                _ => {}
            },
            ':' if prop.is_none() && paren_depth == 0 && quote.is_none() => {
                prop = Some(value[value_start..i].trim().to_string());
                value_start = i + 1;
            }
            ';' if paren_depth == 0 && quote.is_none() => {
                push_value(&mut prop, &value[value_start..i]);
                value_start = i + 1;
            }
            _ => {}
        }
    }
    push_value(&mut prop, &value[value_start..]);
    styles
}

fn hyphenate(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// A representation for an object literal used during codegen of definition objects.
#[derive(Debug, Clone, Default)]
pub struct DefinitionMap {
    pub values: Vec<DefinitionMapEntry>,
}

#[derive(Debug, Clone)]
pub struct DefinitionMapEntry {
    pub key: String,
    pub quoted: bool,
    pub value: Expression,
}

impl DefinitionMap {
    pub fn new() -> Self {
        DefinitionMap { values: vec![] }
    }

    /// Sets `key`, keeping its original position when already present. `None` is a no-op.
    pub fn set(&mut self, key: &str, value: Option<Expression>) {
        if let Some(val) = value {
            if let Some(existing) = self.values.iter_mut().find(|v| v.key == key) {
                existing.value = val;
            } else {
                self.values.push(DefinitionMapEntry {
                    key: key.to_string(),
                    value: val,
                    quoted: false,
                });
            }
        }
    }

    pub fn to_literal_map(&self) -> Expression {
        let entries = self
            .values
            .iter()
            .map(|entry| LiteralMapEntry::new(entry.key.clone(), entry.value.clone(), entry.quoted))
            .collect();
        *o::literal_map(entries)
    }
}
