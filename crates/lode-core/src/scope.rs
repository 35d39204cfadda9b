use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::Store;
use crate::error::ScopeError;

thread_local! {
    static PROVIDERS: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

/// Produces a brand new, fully independent [`Store`] on every call.
///
/// This replaces the process-wide singleton store: callers that need several
/// coexisting instances of the same state shape call `make` once per
/// instance, or hand the factory to a [`StoreScope`] which does it for them.
pub struct StoreFactory<S: 'static>(Rc<dyn Fn() -> Store<S>>);

impl<S: 'static> StoreFactory<S> {
    pub fn new(make: impl Fn() -> Store<S> + 'static) -> Self {
        Self(Rc::new(make))
    }

    pub fn make(&self) -> Store<S> {
        (self.0)()
    }
}

impl<S: 'static> Clone for StoreFactory<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Binds one factory-produced store to a region of the program.
///
/// The first [`enter`](StoreScope::enter) invokes the factory exactly once;
/// every later `enter` reuses the same instance, so repeated passes over the
/// same region never reset its state. The instance lives until the scope is
/// dropped. While inside `enter`, [`current`] resolves to this scope's
/// instance, shadowing any outer scope that provides the same state type.
pub struct StoreScope<S: 'static> {
    factory: StoreFactory<S>,
    slot: RefCell<Option<Store<S>>>,
}

impl<S: 'static> StoreScope<S> {
    pub fn new(factory: StoreFactory<S>) -> Self {
        Self {
            factory,
            slot: RefCell::new(None),
        }
    }

    /// Runs `f` with this scope's store provided for lookup. Lazily creates
    /// the store on the first call; never on later ones.
    pub fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        let store = self
            .slot
            .borrow_mut()
            .get_or_insert_with(|| self.factory.make())
            .clone();

        // Frame guard pops on unwind as well.
        struct Frame;
        impl Drop for Frame {
            fn drop(&mut self) {
                PROVIDERS.with(|st| {
                    st.borrow_mut().pop();
                });
            }
        }

        PROVIDERS.with(|st| {
            let mut frame: HashMap<TypeId, Box<dyn Any>> = HashMap::new();
            frame.insert(TypeId::of::<S>(), Box::new(store));
            st.borrow_mut().push(frame);
        });
        let _frame = Frame;
        f()
    }

    /// The bound store, if the scope has been entered at least once.
    pub fn store(&self) -> Option<Store<S>> {
        self.slot.borrow().clone()
    }
}

/// Resolves the nearest enclosing scope providing a `Store<S>`.
///
/// Fails loudly outside any such scope: a missing provider is a structural
/// wiring mistake, and handing out a default instance would hide it.
pub fn current<S: 'static>() -> Result<Store<S>, ScopeError> {
    PROVIDERS.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<S>())
                && let Some(store) = v.downcast_ref::<Store<S>>()
            {
                return Ok(store.clone());
            }
        }
        Err(ScopeError::NotProvided {
            state: type_name::<S>(),
        })
    })
}
