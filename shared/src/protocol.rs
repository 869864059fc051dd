use crate::{ItemCatalog, ItemKind, SessionKinds, SessionLayout};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

// Protocol
/// Everything both endpoints must agree on: the session kinds that can be
/// opened and the stack limits of every item kind. Build it identically on
/// server and client, then lock it.
#[derive(Default)]
pub struct Protocol {
    pub session_kinds: SessionKinds,
    pub item_catalog: ItemCatalog,
    locked: bool,
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    /// # Panics
    ///
    /// Panics if the protocol is locked or the tag is already registered.
    pub fn add_session_kind(&mut self, type_tag: &str, layout: SessionLayout) -> &mut Self {
        self.check_lock();
        if let Err(error) = self.session_kinds.add_kind(type_tag, layout) {
            panic!("{}", error);
        }
        self
    }

    pub fn max_stack(&mut self, kind: ItemKind, max: u32) -> &mut Self {
        self.check_lock();
        self.item_catalog.set_max_count(kind, max);
        self
    }

    pub fn default_max_stack(&mut self, max: u32) -> &mut Self {
        self.check_lock();
        self.item_catalog.set_default_max(max);
        self
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    pub fn try_add_session_kind(
        &mut self,
        type_tag: &str,
        layout: SessionLayout,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.session_kinds.add_kind(type_tag, layout)?;
        Ok(self)
    }

    pub fn try_max_stack(&mut self, kind: ItemKind, max: u32) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.item_catalog.set_max_count(kind, max);
        Ok(self)
    }

    pub fn try_default_max_stack(&mut self, max: u32) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.item_catalog.set_default_max(max);
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Panics if protocol is locked
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn layout(&self, type_tag: &str) -> Result<&SessionLayout, ProtocolError> {
        self.session_kinds.layout(type_tag)
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.item_catalog
    }
}
