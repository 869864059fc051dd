use std::collections::HashMap;

use crate::{ProtocolError, SessionLayout};

/// Registry of session shapes keyed by type tag. Both endpoints resolve the
/// tag carried by an open message to the same layout.
#[derive(Clone, Debug, Default)]
pub struct SessionKinds {
    layouts: HashMap<String, SessionLayout>,
}

impl SessionKinds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_kind(&mut self, type_tag: &str, layout: SessionLayout) -> Result<(), ProtocolError> {
        if self.layouts.contains_key(type_tag) {
            return Err(ProtocolError::DuplicateTypeTag {
                type_tag: type_tag.to_string(),
            });
        }
        self.layouts.insert(type_tag.to_string(), layout);
        Ok(())
    }

    pub fn layout(&self, type_tag: &str) -> Result<&SessionLayout, ProtocolError> {
        self.layouts
            .get(type_tag)
            .ok_or_else(|| ProtocolError::UnknownTypeTag {
                type_tag: type_tag.to_string(),
            })
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.layouts.contains_key(type_tag)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
