//! Configuration of the numbering engine.

use serde::{Deserialize, Serialize};

/// Features for the numbering engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberingFeat {
    /// The left indentation added per list level, in twips.
    pub indent_unit: i32,
    /// The hanging indentation of list levels, in twips.
    pub hanging_indent: i32,
    /// The number of levels of a promoted definition.
    pub level_count: usize,
    /// Seeds the suffix generator of cloned definition names.
    ///
    /// Without a seed the suffixes are random.
    pub name_seed: Option<u64>,
}

impl Default for NumberingFeat {
    fn default() -> Self {
        Self {
            indent_unit: 720,
            hanging_indent: 360,
            level_count: 10,
            name_seed: None,
        }
    }
}
