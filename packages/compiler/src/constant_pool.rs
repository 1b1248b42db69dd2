//! Constant Pool
//!
//! ConstantPool tries to reuse literal factories when two or more literals are identical.
//! This optimizes the generated code by avoiding duplicate constant definitions.

use crate::output::output_ast as o;
use std::collections::HashMap;

const CONSTANT_PREFIX: &str = "_c";

/// String literals at least this long are always worth pooling.
const POOL_INCLUSION_LENGTH_THRESHOLD_FOR_STRINGS: usize = 50;

/// Generic key function (for expression deduplication)
pub struct GenericKeyFn;

impl GenericKeyFn {
    pub const INSTANCE: GenericKeyFn = GenericKeyFn;

    /// Structural key: two expressions share a key iff they would emit the same code.
    pub fn key_of(&self, expr: &o::Expression) -> String {
        match expr {
            o::Expression::Literal(lit) => match &lit.value {
                o::LiteralValue::String(s) => format!("\"{}\"", s),
                o::LiteralValue::Number(n) => format!("{}", n),
                o::LiteralValue::Bool(b) => format!("{}", b),
                o::LiteralValue::Null => "null".to_string(),
                o::LiteralValue::Undefined => "undefined".to_string(),
            },
            o::Expression::LiteralArray(arr) => {
                let entries: Vec<String> = arr.entries.iter().map(|e| self.key_of(e)).collect();
                format!("[{}]", entries.join(","))
            }
            o::Expression::LiteralMap(map) => {
                let entries: Vec<String> = map
                    .entries
                    .iter()
                    .map(|entry| {
                        let key = if entry.quoted {
                            format!("\"{}\"", entry.key)
                        } else {
                            entry.key.clone()
                        };
                        format!("{}:{}", key, self.key_of(&entry.value))
                    })
                    .collect();
                format!("{{{}}}", entries.join(","))
            }
            o::Expression::External(ext) => format!(
                "import(\"{}\", {})",
                ext.value.module_name.as_deref().unwrap_or(""),
                ext.value.name.as_deref().unwrap_or("*")
            ),
            o::Expression::ReadVar(var) => format!("read({})", var.name),
            o::Expression::TypeOf(typeof_expr) => {
                format!("typeof({})", self.key_of(&typeof_expr.expr))
            }
            o::Expression::WrappedNode(node) => format!("wrapped#{:x}", node.node_id()),
            o::Expression::Fixup(fixup) => self.key_of(&fixup.resolved()),
            other => format!("{:?}", other),
        }
    }
}

pub struct ConstantPool {
    pub statements: Vec<o::Statement>,
    literals: HashMap<String, o::FixupExpr>,
    claimed_names: HashMap<String, u32>,
    next_name_index: u32,
}

impl ConstantPool {
    pub fn new() -> Self {
        ConstantPool {
            statements: Vec::new(),
            literals: HashMap::new(),
            claimed_names: HashMap::new(),
            next_name_index: 0,
        }
    }

    /// Returns a placeholder for `literal`.
    ///
    /// The first request for a literal is not hoisted. A second request for a structurally
    /// identical literal (or any request with `force_shared`) declares a `const _cN` in
    /// `statements`, and every placeholder for that literal then resolves to `_cN`.
    pub fn get_const_literal(&mut self, literal: o::Expression, force_shared: bool) -> o::Expression {
        if (is_literal(&literal) && !is_long_string_literal(&literal))
            || matches!(literal, o::Expression::Fixup(_))
        {
            return literal;
        }

        let key = GenericKeyFn::INSTANCE.key_of(&literal);
        let (fixup, new_value) = match self.literals.get(&key) {
            Some(existing) => (existing.clone(), false),
            None => {
                let fixup = o::FixupExpr::new(literal.clone());
                self.literals.insert(key, fixup.clone());
                (fixup, true)
            }
        };

        if (!new_value && !fixup.is_shared()) || (new_value && force_shared) {
            let name = self.fresh_name();
            self.statements.push(literal.to_const_decl(name.clone()));
            fixup.fixup(*o::variable(name));
        }

        o::Expression::Fixup(fixup)
    }

    /// Claims `preferred_name`, suffixing it when already taken.
    pub fn unique_name(&mut self, preferred_name: &str) -> String {
        let count = self.claimed_names.get(preferred_name).copied().unwrap_or(0);
        self.claimed_names.insert(preferred_name.to_string(), count + 1);
        if count == 0 {
            preferred_name.to_string()
        } else {
            format!("{}_{}", preferred_name, count)
        }
    }

    fn fresh_name(&mut self) -> String {
        let name = format!("{}{}", CONSTANT_PREFIX, self.next_name_index);
        self.next_name_index += 1;
        name
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

fn is_literal(expr: &o::Expression) -> bool {
    matches!(expr, o::Expression::Literal(_))
}

fn is_long_string_literal(expr: &o::Expression) -> bool {
    match expr {
        o::Expression::Literal(lit) => match &lit.value {
            o::LiteralValue::String(s) => s.len() >= POOL_INCLUSION_LENGTH_THRESHOLD_FOR_STRINGS,
            _ => false,
        },
        _ => false,
    }
}
