use std::sync::{Arc, RwLock};

/// Several related integers exposed through one indexed accessor.
///
/// A group owns no storage of its own as far as the tracker is concerned:
/// it bridges indices 0..len to wherever the owner keeps the values.
pub trait PropertyGroup: Send + Sync {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> i32;

    fn set(&mut self, index: usize, value: i32);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub type SharedPropertyGroup = Arc<RwLock<dyn PropertyGroup>>;

/// The simplest group, a plain array. Clients typically view their mirrored
/// properties through one of these.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrayPropertyGroup {
    values: Vec<i32>,
}

impl ArrayPropertyGroup {
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![0; len],
        }
    }

    pub fn shared(len: usize) -> Arc<RwLock<ArrayPropertyGroup>> {
        Arc::new(RwLock::new(Self::new(len)))
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }
}

impl PropertyGroup for ArrayPropertyGroup {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn get(&self, index: usize) -> i32 {
        self.values.get(index).copied().unwrap_or_default()
    }

    fn set(&mut self, index: usize, value: i32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }
}
