use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Store;
use crate::error::PersistError;

/// External key-value store a persisted store writes through to.
pub trait Storage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, payload: &str);
}

/// In-memory [`Storage`]. Clones share the same map, so handing the same
/// handle to a second store simulates a restart against surviving storage.
#[derive(Clone, Default)]
pub struct MemoryStorage(Rc<RefCell<HashMap<String, String>>>);

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, payload: &str) {
        self.0.borrow_mut().insert(key.to_string(), payload.to_string());
    }
}

pub struct PersistOptions {
    /// Fixed name of the record inside the storage.
    pub key: &'static str,
    /// Version written alongside the record. A stored record with any other
    /// version is discarded on restore rather than merged over fresh
    /// defaults.
    pub version: u32,
}

#[derive(serde::Deserialize)]
struct Envelope<R> {
    version: u32,
    data: R,
}

#[derive(serde::Serialize)]
struct EnvelopeRef<'a, R> {
    version: u32,
    data: &'a R,
}

/// Wires a store to external storage.
///
/// `project` names the persisted subset of the state; `fold` merges a
/// restored subset back into the defaults. Restore runs once, here, before
/// any operation can touch the store; a corrupt or version-mismatched record
/// is reported to the log and the compiled-in defaults stand. Afterwards
/// every update that changes the projected subset writes back synchronously,
/// and updates that leave it value-equal do not touch storage at all.
pub fn persisted<S, R>(
    store: Store<S>,
    storage: impl Storage + 'static,
    options: PersistOptions,
    project: impl Fn(&S) -> R + 'static,
    fold: impl FnOnce(&mut S, R),
) -> Store<S>
where
    S: Clone + 'static,
    R: Serialize + DeserializeOwned + PartialEq + 'static,
{
    if let Some(payload) = storage.read(options.key) {
        match decode::<R>(&payload, options.version) {
            Ok(data) => store.produce(|s| fold(s, data)),
            Err(err) => {
                log::warn!(target: "lode::persist", "discarding stored record `{}`: {err}", options.key);
            }
        }
    }

    let key = options.key;
    let version = options.version;
    let _ = store.subscribe_select(project, move |subset| match encode(subset, version) {
        Ok(payload) => storage.write(key, &payload),
        Err(err) => log::warn!(target: "lode::persist", "failed to serialize record `{key}`: {err}"),
    });

    store
}

fn decode<R: DeserializeOwned>(payload: &str, current: u32) -> Result<R, PersistError> {
    let envelope: Envelope<R> = serde_json::from_str(payload)?;
    if envelope.version != current {
        return Err(PersistError::VersionMismatch {
            found: envelope.version,
            current,
        });
    }
    Ok(envelope.data)
}

fn encode<R: Serialize>(data: &R, version: u32) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&EnvelopeRef { version, data })?)
}
