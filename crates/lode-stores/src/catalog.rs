//! Product catalog backed by a remote collaborator.
//!
//! Every remote operation follows the tracked three-phase contract: the
//! store goes busy before the request starts, and on settlement either the
//! product list is replaced or a readable error is recorded — the busy flag
//! never survives settlement. Requests are not cancelled or retried, and two
//! in-flight operations against the same store are not coordinated: the last
//! one to settle wins.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use thiserror::Error;
use web_time::Duration;

use lode_core::task::{AsyncStatus, Tracked, dismiss_error, run_tracked};
use lode_core::time::delay;
use lode_core::Store;

use crate::clock::now_ms;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price_cents: u64,
    pub in_stock: bool,
}

/// A product-to-be; the remote side assigns the id.
#[derive(Clone, Debug)]
pub struct ProductDraft {
    pub name: String,
    pub price_cents: u64,
    pub in_stock: bool,
}

/// Partial update; `None` fields keep their current value.
#[derive(Clone, Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price_cents: Option<u64>,
    pub in_stock: Option<bool>,
}

pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub fetched_at: u64,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("catalog request failed: {0}")]
pub struct ApiError(pub String);

/// Remote endpoints the catalog store talks to. Injectable so tests can
/// substitute a failing collaborator.
pub trait CatalogApi {
    fn fetch_all(&self) -> LocalBoxFuture<'static, Result<CatalogSnapshot, ApiError>>;
    fn create(&self, draft: ProductDraft) -> LocalBoxFuture<'static, Result<Product, ApiError>>;
    fn update(&self, id: u32, patch: ProductPatch)
    -> LocalBoxFuture<'static, Result<Product, ApiError>>;
    fn remove(&self, id: u32) -> LocalBoxFuture<'static, Result<(), ApiError>>;
}

/// Stand-in for a real backend: fixed artificial latency per endpoint,
/// canned data, and no failure path.
pub struct SimulatedCatalog {
    next_seed: Cell<u32>,
}

impl SimulatedCatalog {
    pub fn new() -> Self {
        Self {
            next_seed: Cell::new(0x2545),
        }
    }

    fn next_id(&self) -> u32 {
        // Small LCG; ids land in 10..=1009 like a backend handing out
        // arbitrary keys would.
        let seed = self.next_seed.get().wrapping_mul(1_103_515_245).wrapping_add(12_345);
        self.next_seed.set(seed);
        10 + (seed >> 16) % 1000
    }

    fn demo_products() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Laptop".to_string(),
                price_cents: 75_000_00,
                in_stock: true,
            },
            Product {
                id: 2,
                name: "Smartphone".to_string(),
                price_cents: 45_000_00,
                in_stock: true,
            },
            Product {
                id: 3,
                name: "Headphones".to_string(),
                price_cents: 12_000_00,
                in_stock: false,
            },
        ]
    }
}

impl Default for SimulatedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogApi for SimulatedCatalog {
    fn fetch_all(&self) -> LocalBoxFuture<'static, Result<CatalogSnapshot, ApiError>> {
        Box::pin(async {
            delay(Duration::from_millis(1000)).await;
            Ok(CatalogSnapshot {
                products: Self::demo_products(),
                fetched_at: now_ms(),
            })
        })
    }

    fn create(&self, draft: ProductDraft) -> LocalBoxFuture<'static, Result<Product, ApiError>> {
        let id = self.next_id();
        Box::pin(async move {
            delay(Duration::from_millis(800)).await;
            Ok(Product {
                id,
                name: draft.name,
                price_cents: draft.price_cents,
                in_stock: draft.in_stock,
            })
        })
    }

    fn update(
        &self,
        id: u32,
        patch: ProductPatch,
    ) -> LocalBoxFuture<'static, Result<Product, ApiError>> {
        Box::pin(async move {
            delay(Duration::from_millis(800)).await;
            // The backend returns the full updated row; unpatched fields come
            // back as its placeholder values.
            Ok(Product {
                id,
                name: patch.name.unwrap_or_else(|| "Updated product".to_string()),
                price_cents: patch.price_cents.unwrap_or(0),
                in_stock: patch.in_stock.unwrap_or(true),
            })
        })
    }

    fn remove(&self, id: u32) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        Box::pin(async move {
            delay(Duration::from_millis(500)).await;
            log::info!(target: "lode::catalog", "product {id} deleted");
            Ok(())
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub last_fetched: Option<u64>,
    pub status: AsyncStatus,
}

impl Tracked for CatalogState {
    fn status(&self) -> &AsyncStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut AsyncStatus {
        &mut self.status
    }
}

#[derive(Clone)]
pub struct CatalogStore {
    store: Store<CatalogState>,
    api: Rc<dyn CatalogApi>,
}

impl CatalogStore {
    pub fn new(api: Rc<dyn CatalogApi>) -> Self {
        Self {
            store: Store::new(CatalogState::default()).logged("catalog"),
            api,
        }
    }

    pub fn simulated() -> Self {
        Self::new(Rc::new(SimulatedCatalog::new()))
    }

    pub fn fetch_products(&self) -> impl Future<Output = ()> + 'static {
        run_tracked(&self.store, self.api.fetch_all(), |s, snapshot| {
            s.products = snapshot.products;
            s.last_fetched = Some(snapshot.fetched_at);
        })
    }

    /// If the product disappeared locally while the request was in flight,
    /// the returned row is dropped; the fetch timestamp still advances.
    pub fn update_product(&self, id: u32, patch: ProductPatch) -> impl Future<Output = ()> + 'static {
        run_tracked(&self.store, self.api.update(id, patch), move |s, updated| {
            if let Some(slot) = s.products.iter_mut().find(|p| p.id == id) {
                *slot = updated;
            }
            s.last_fetched = Some(now_ms());
        })
    }

    pub fn add_product(&self, draft: ProductDraft) -> impl Future<Output = ()> + 'static {
        run_tracked(&self.store, self.api.create(draft), |s, product| {
            s.products.push(product);
            s.last_fetched = Some(now_ms());
        })
    }

    pub fn remove_product(&self, id: u32) -> impl Future<Output = ()> + 'static {
        run_tracked(&self.store, self.api.remove(id), move |s, ()| {
            s.products.retain(|p| p.id != id);
            s.last_fetched = Some(now_ms());
        })
    }

    pub fn dismiss_error(&self) {
        dismiss_error(&self.store);
    }

    pub fn product_by_id(&self, id: u32) -> Option<Product> {
        self.store
            .select(|s| s.products.iter().find(|p| p.id == id).cloned())
    }

    pub fn state(&self) -> CatalogState {
        self.store.get()
    }

    pub fn store(&self) -> &Store<CatalogState> {
        &self.store
    }
}
