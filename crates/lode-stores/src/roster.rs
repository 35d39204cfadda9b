//! A collection-backed store written in the draft-editing style: updates
//! look like in-place field edits but go through [`Store::produce`], and all
//! counts are derived from the collection on every read rather than stored.

use lode_core::Store;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub active: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterState {
    pub users: Vec<User>,
}

#[derive(Clone)]
pub struct RosterStore(Store<RosterState>);

impl RosterStore {
    pub fn new() -> Self {
        Self(Store::new(RosterState::default()).logged("roster"))
    }

    /// New users start inactive, with an id one past the largest seen so far.
    pub fn add_user(&self, name: &str) {
        let name = name.to_string();
        self.0.produce(move |s| {
            let id = s.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            s.users.push(User {
                id,
                name,
                active: false,
            });
        });
    }

    /// Toggling an id that does not exist is a silent no-op.
    pub fn toggle_user(&self, id: u32) {
        self.0.produce(|s| {
            if let Some(user) = s.users.iter_mut().find(|u| u.id == id) {
                user.active = !user.active;
            }
        });
    }

    pub fn user(&self, id: u32) -> Option<User> {
        self.0.select(|s| s.users.iter().find(|u| u.id == id).cloned())
    }

    pub fn users(&self) -> Vec<User> {
        self.0.select(|s| s.users.clone())
    }

    pub fn count(&self) -> usize {
        self.0.select(|s| s.users.len())
    }

    pub fn active_count(&self) -> usize {
        self.0.select(|s| s.users.iter().filter(|u| u.active).count())
    }

    pub fn inactive_count(&self) -> usize {
        self.count() - self.active_count()
    }

    pub fn store(&self) -> &Store<RosterState> {
        &self.0
    }
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new()
    }
}
