//! Task lists as scoped store instances.
//!
//! Unlike the other tutorial stores, there is no single tasks store:
//! [`task_store_factory`] yields an independent instance per call, and a
//! [`StoreScope`] binds one instance to a region so that two task lists can
//! coexist without sharing a single todo. [`TasksStore::current`] is the
//! in-scope lookup; outside any scope it fails loudly instead of inventing a
//! default list.

use lode_core::scope;
use lode_core::{ScopeError, Store, StoreFactory};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub done: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Done,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskState {
    pub todos: Vec<Todo>,
    pub filter: Filter,
    /// Free-form marker distinguishing one scope's instance from another.
    pub scope_note: String,
}

impl Default for TaskState {
    fn default() -> Self {
        let seed = |id, text: &str| Todo {
            id,
            text: text.to_string(),
            done: false,
        };
        Self {
            todos: vec![
                seed(1, "Learn the store container"),
                seed(2, "Understand provisioning scopes"),
                seed(3, "Combine stores and scopes"),
            ],
            filter: Filter::All,
            scope_note: "per-scope note".to_string(),
        }
    }
}

/// Every call to `make` yields a fresh list seeded with the tutorial todos.
pub fn task_store_factory() -> StoreFactory<TaskState> {
    StoreFactory::new(|| Store::new(TaskState::default()).logged("tasks"))
}

#[derive(Clone)]
pub struct TasksStore(Store<TaskState>);

impl TasksStore {
    /// Resolves the nearest enclosing scope's task list.
    pub fn current() -> Result<Self, ScopeError> {
        Ok(Self(scope::current::<TaskState>()?))
    }

    pub fn from_store(store: Store<TaskState>) -> Self {
        Self(store)
    }

    pub fn add_todo(&self, text: &str) {
        let text = text.to_string();
        self.0.produce(move |s| {
            let id = s.todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            s.todos.push(Todo {
                id,
                text,
                done: false,
            });
        });
    }

    pub fn toggle_todo(&self, id: u64) {
        self.0.produce(|s| {
            if let Some(todo) = s.todos.iter_mut().find(|t| t.id == id) {
                todo.done = !todo.done;
            }
        });
    }

    pub fn remove_todo(&self, id: u64) {
        self.0.produce(|s| s.todos.retain(|t| t.id != id));
    }

    pub fn set_filter(&self, filter: Filter) {
        self.0.produce(|s| s.filter = filter);
    }

    pub fn set_scope_note(&self, note: &str) {
        let note = note.to_string();
        self.0.produce(move |s| s.scope_note = note);
    }

    /// Todos passing the current filter, computed on every read.
    pub fn visible(&self) -> Vec<Todo> {
        self.0.select(|s| {
            s.todos
                .iter()
                .filter(|t| match s.filter {
                    Filter::All => true,
                    Filter::Active => !t.done,
                    Filter::Done => t.done,
                })
                .cloned()
                .collect()
        })
    }

    pub fn active_count(&self) -> usize {
        self.0.select(|s| s.todos.iter().filter(|t| !t.done).count())
    }

    pub fn state(&self) -> TaskState {
        self.0.get()
    }

    pub fn store(&self) -> &Store<TaskState> {
        &self.0
    }
}
