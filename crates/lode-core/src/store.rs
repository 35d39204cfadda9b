use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Key identifying a single subscriber inside a store.
    pub struct SubKey;
}

/// Shared handle to one unit of state plus its subscribers.
///
/// Cloning the handle never clones the state; every clone addresses the same
/// instance. Updates construct a complete next value and swap it in, so no
/// observer ever sees a half-applied change.
pub struct Store<S: 'static>(Rc<StoreInner<S>>);

struct StoreInner<S> {
    value: RefCell<S>,
    subs: RefCell<SlotMap<SubKey, Rc<dyn Fn(&S)>>>,
}

/// Handle returned by `subscribe*`; pass it back to [`Store::unsubscribe`]
/// to detach the callback. Dropping it leaves the subscriber attached.
#[must_use]
pub struct Subscription(SubKey);

impl<S: 'static> Store<S> {
    pub fn new(value: S) -> Self {
        Self(Rc::new(StoreInner {
            value: RefCell::new(value),
            subs: RefCell::new(SlotMap::with_key()),
        }))
    }

    /// Clones out the current state.
    pub fn get(&self) -> S
    where
        S: Clone,
    {
        self.0.value.borrow().clone()
    }

    /// Reads through a selection function without cloning the whole state.
    pub fn select<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.0.value.borrow())
    }

    /// Swaps in a completely new value and notifies subscribers.
    pub fn replace(&self, next: S) {
        *self.0.value.borrow_mut() = next;
        self.notify();
    }

    /// Transforms the current state into a new one. The transform receives a
    /// shared reference only; the next value is built explicitly and swapped
    /// in atomically.
    pub fn update(&self, f: impl FnOnce(&S) -> S) {
        let next = f(&self.0.value.borrow());
        self.replace(next);
    }

    /// Draft-style update: clones the current state, lets `f` edit the draft
    /// as if mutating in place, then swaps the draft in. Holders of handles
    /// never observe the intermediate edits.
    pub fn produce(&self, f: impl FnOnce(&mut S))
    where
        S: Clone,
    {
        let mut draft = self.0.value.borrow().clone();
        f(&mut draft);
        self.replace(draft);
    }

    /// Registers a callback run after every swap.
    pub fn subscribe(&self, f: impl Fn(&S) + 'static) -> Subscription {
        let key = self.0.subs.borrow_mut().insert(Rc::new(f));
        Subscription(key)
    }

    /// Registers a callback that only fires when the selected projection
    /// actually changes. A swap that leaves the projection value-equal is
    /// invisible to the callback, so no-op updates are cheap to ignore.
    pub fn subscribe_select<R, F, G>(&self, selector: F, on_change: G) -> Subscription
    where
        R: PartialEq + 'static,
        F: Fn(&S) -> R + 'static,
        G: Fn(&R) + 'static,
    {
        let memo = RefCell::new(self.select(&selector));
        self.subscribe(move |s| {
            let next = selector(s);
            if *memo.borrow() != next {
                on_change(&next);
                *memo.borrow_mut() = next;
            }
        })
    }

    pub fn unsubscribe(&self, sub: Subscription) {
        self.0.subs.borrow_mut().remove(sub.0);
    }

    /// Attaches a named transition logger and returns the store, so it can be
    /// chained onto construction.
    pub fn logged(self, name: &'static str) -> Self
    where
        S: Debug,
    {
        let _ = self.subscribe(move |s| {
            log::debug!(target: "lode::store", "[{name}] -> {s:?}");
        });
        self
    }

    pub fn downgrade(&self) -> WeakStore<S> {
        WeakStore(Rc::downgrade(&self.0))
    }

    /// True when both handles address the same instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    fn notify(&self) {
        let subs: Vec<Rc<dyn Fn(&S)>> = self.0.subs.borrow().values().cloned().collect();
        let value = self.0.value.borrow();
        for sub in &subs {
            sub(&value);
        }
    }
}

impl<S: 'static> Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl<S: 'static> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Non-owning handle; upgrading fails once every strong handle is gone.
pub struct WeakStore<S: 'static>(Weak<StoreInner<S>>);

impl<S: 'static> WeakStore<S> {
    pub fn upgrade(&self) -> Option<Store<S>> {
        self.0.upgrade().map(Store)
    }
}

impl<S: 'static> Clone for WeakStore<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
