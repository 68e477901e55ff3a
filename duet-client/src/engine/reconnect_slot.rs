/// Single-slot guard for reconnection attempts.
#[derive(Debug, Default)]
pub struct ReconnectSlot {
    held: bool,
}

impl ReconnectSlot {
    /// Takes the slot. Returns `false` if an attempt already holds it.
    pub fn try_acquire(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        true
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}
