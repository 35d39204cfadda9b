use std::fmt::Display;
use std::future::Future;

use crate::Store;

/// Busy/error pair carried by every state that runs tracked async operations.
///
/// Valid transitions: `idle -> pending -> {idle-with-data, idle-with-error}`,
/// and `idle-with-error -> idle` via [`dismiss_error`]. No operation leaves
/// `busy` set after it settles, on either path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AsyncStatus {
    pub busy: bool,
    pub error: Option<String>,
}

/// State types that embed an [`AsyncStatus`].
pub trait Tracked {
    fn status(&self) -> &AsyncStatus;
    fn status_mut(&mut self) -> &mut AsyncStatus;
}

/// Runs one asynchronous update against `store` under the three-phase
/// contract:
///
/// 1. synchronously (before the returned future is first polled) set `busy`
///    and clear any prior error;
/// 2. await `effect`;
/// 3. on success apply the result to a draft of the state, on failure record
///    the error message; clear `busy` either way.
///
/// The returned future holds only a weak handle, so an operation whose store
/// was torn down while in flight completes without touching anything.
/// Interleaved operations against the same store are not coordinated; the
/// last one to settle wins.
pub fn run_tracked<S, T, E, F, A>(
    store: &Store<S>,
    effect: F,
    apply: A,
) -> impl Future<Output = ()> + use<S, T, E, F, A>
where
    S: Tracked + Clone + 'static,
    E: Display,
    F: Future<Output = Result<T, E>>,
    A: FnOnce(&mut S, T),
{
    store.produce(|s| {
        let status = s.status_mut();
        status.busy = true;
        status.error = None;
    });
    let weak = store.downgrade();

    async move {
        let out = effect.await;
        let Some(store) = weak.upgrade() else {
            log::debug!(target: "lode::task", "store dropped while operation was in flight; discarding result");
            return;
        };
        match out {
            Ok(value) => store.produce(|s| {
                apply(s, value);
                s.status_mut().busy = false;
            }),
            Err(err) => store.produce(|s| {
                let status = s.status_mut();
                status.error = Some(err.to_string());
                status.busy = false;
            }),
        }
    }
}

/// Explicit `idle-with-error -> idle` transition; leaves every other field
/// untouched.
pub fn dismiss_error<S>(store: &Store<S>)
where
    S: Tracked + Clone + 'static,
{
    store.produce(|s| {
        s.status_mut().error = None;
    });
}
