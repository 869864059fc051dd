use std::{fmt, sync::Arc};

use crate::{ItemCatalog, ItemKind, ItemStack, DEFAULT_MAX_STACK};

pub type SlotPredicate = Arc<dyn Fn(&ItemStack) -> bool + Send + Sync>;

/// Decides which stacks a slot accepts (insertion) or releases (taking)
#[derive(Clone)]
pub enum SlotFilter {
    Any,
    Nothing,
    Kinds(Vec<ItemKind>),
    Custom(SlotPredicate),
}

impl SlotFilter {
    pub fn custom<F: Fn(&ItemStack) -> bool + Send + Sync + 'static>(predicate: F) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    pub fn allows(&self, stack: &ItemStack) -> bool {
        match self {
            SlotFilter::Any => true,
            SlotFilter::Nothing => false,
            SlotFilter::Kinds(kinds) => kinds.contains(&stack.kind()),
            SlotFilter::Custom(predicate) => predicate(stack),
        }
    }
}

impl fmt::Debug for SlotFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotFilter::Any => write!(f, "Any"),
            SlotFilter::Nothing => write!(f, "Nothing"),
            SlotFilter::Kinds(kinds) => f.debug_tuple("Kinds").field(kinds).finish(),
            SlotFilter::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Construction-time rules for one slot
#[derive(Clone, Debug)]
pub struct SlotRules {
    insert: SlotFilter,
    take: SlotFilter,
    max_count: u32,
}

impl Default for SlotRules {
    fn default() -> Self {
        Self {
            insert: SlotFilter::Any,
            take: SlotFilter::Any,
            max_count: DEFAULT_MAX_STACK,
        }
    }
}

impl SlotRules {
    /// Accepts and releases anything
    pub fn open() -> Self {
        Self::default()
    }

    /// Never accepts insertion, only taking. Results of processing land here.
    pub fn output() -> Self {
        Self::default().with_insert(SlotFilter::Nothing)
    }

    pub fn with_insert(mut self, filter: SlotFilter) -> Self {
        self.insert = filter;
        self
    }

    pub fn with_take(mut self, filter: SlotFilter) -> Self {
        self.take = filter;
        self
    }

    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count.max(1);
        self
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }
}

/// One addressable position in a StateContainer
#[derive(Clone, Debug)]
pub struct Slot {
    index: usize,
    stack: ItemStack,
    rules: SlotRules,
}

impl Slot {
    pub(crate) fn new(index: usize, rules: SlotRules) -> Self {
        Self {
            index,
            stack: ItemStack::empty(),
            rules,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stack(&self) -> &ItemStack {
        &self.stack
    }

    pub fn rules(&self) -> &SlotRules {
        &self.rules
    }

    pub(crate) fn replace(&mut self, stack: ItemStack) -> ItemStack {
        std::mem::replace(&mut self.stack, stack)
    }

    pub fn can_insert(&self, stack: &ItemStack) -> bool {
        !stack.is_empty() && self.rules.insert.allows(stack)
    }

    pub fn can_take(&self) -> bool {
        !self.stack.is_empty() && self.rules.take.allows(&self.stack)
    }

    /// How many of `stack`'s item this slot may hold in total
    pub fn capacity_for(&self, stack: &ItemStack, catalog: &ItemCatalog) -> u32 {
        self.rules.max_count.min(catalog.max_count(stack.kind()))
    }
}
