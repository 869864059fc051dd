use slotsync_shared::ItemStack;

use super::SessionContext;

/// Host-side behaviour of one session kind. Every method has a no-op
/// default, so a plain storage view needs no handler at all.
pub trait SessionHandler: Send + Sync {
    /// Called once, before the open message is built. Fill initial slots
    /// and bind property groups here.
    fn init(&mut self, _context: &mut SessionContext) {}

    /// Opaque bootstrap bytes sent along with the open message
    fn extra_payload(&self) -> Option<Vec<u8>> {
        None
    }

    fn on_signal(&mut self, _context: &mut SessionContext, _signal_id: u32) {}

    /// Items left `slot` through a client action
    fn on_take(&mut self, _context: &mut SessionContext, _slot: usize, _taken: &ItemStack) {}

    /// Items were discarded through a client action
    fn on_throw(&mut self, _context: &mut SessionContext, _thrown: &ItemStack) {}

    /// Background processing, once per `Server::tick()`
    fn tick(&mut self, _context: &mut SessionContext) {}

    fn on_close(&mut self, _context: &mut SessionContext) {}
}

pub type HandlerFactory = Box<dyn Fn() -> Box<dyn SessionHandler> + Send + Sync>;
