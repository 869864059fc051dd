use std::collections::HashMap;

use super::ItemKind;

pub const DEFAULT_MAX_STACK: u32 = 64;

/// Per-item stack limits. Both endpoints must hold the same catalog or
/// merges computed by the client will not match the host.
#[derive(Clone, Debug)]
pub struct ItemCatalog {
    default_max: u32,
    max_counts: HashMap<ItemKind, u32>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self {
            default_max: DEFAULT_MAX_STACK,
            max_counts: HashMap::new(),
        }
    }
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default_max(&mut self, max: u32) {
        self.default_max = max.max(1);
    }

    pub fn set_max_count(&mut self, kind: ItemKind, max: u32) {
        self.max_counts.insert(kind, max.max(1));
    }

    pub fn max_count(&self, kind: ItemKind) -> u32 {
        self.max_counts
            .get(&kind)
            .copied()
            .unwrap_or(self.default_max)
    }
}
