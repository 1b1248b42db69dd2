//! Options that tune how declarations are linked.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkerOptions {
    /// Whether linked files are parsed as ES modules rather than scripts.
    pub is_es_module: bool,
    /// Render `$localize` messages with legacy format ids.
    pub enable_i18n_legacy_message_id_format: bool,
    /// Whether line endings in ICU expressions are normalized before computing message ids.
    pub i18n_normalize_line_endings_in_icus: bool,
    /// Link NgModules for JIT compilation, keeping their declarations, imports and exports.
    pub linker_jit_mode: bool,
}

impl Default for LinkerOptions {
    fn default() -> Self {
        Self {
            is_es_module: true,
            enable_i18n_legacy_message_id_format: true,
            i18n_normalize_line_endings_in_icus: false,
            linker_jit_mode: false,
        }
    }
}
