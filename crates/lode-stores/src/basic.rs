//! The smallest possible store: two counters and a handful of updates,
//! including one (`feed_bears`) that reads the current state to decide
//! whether the update is allowed at all.

use lode_core::Store;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BearsState {
    pub bears: u32,
    pub fish: u32,
}

#[derive(Clone)]
pub struct BearsStore(Store<BearsState>);

impl BearsStore {
    pub fn new() -> Self {
        Self(Store::new(BearsState::default()).logged("basic"))
    }

    pub fn increase_bears(&self) {
        self.0.update(|s| BearsState {
            bears: s.bears + 1,
            ..*s
        });
    }

    pub fn increase_by(&self, amount: u32) {
        self.0.update(|s| BearsState {
            bears: s.bears + amount,
            ..*s
        });
    }

    pub fn remove_all_bears(&self) {
        self.0.update(|s| BearsState { bears: 0, ..*s });
    }

    /// Feeding takes one fish and adds one bear; with no fish left it is a
    /// policy no-op, not an error.
    pub fn feed_bears(&self) {
        self.0.update(|s| {
            if s.fish > 0 {
                BearsState {
                    bears: s.bears + 1,
                    fish: s.fish - 1,
                }
            } else {
                *s
            }
        });
    }

    pub fn add_fish(&self, count: u32) {
        self.0.update(|s| BearsState {
            fish: s.fish + count,
            ..*s
        });
    }

    pub fn state(&self) -> BearsState {
        self.0.get()
    }

    pub fn store(&self) -> &Store<BearsState> {
        &self.0
    }
}

impl Default for BearsStore {
    fn default() -> Self {
        Self::new()
    }
}
