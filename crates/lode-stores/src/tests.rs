use std::rc::Rc;

use futures::executor::block_on;
use futures::future::LocalBoxFuture;

use lode_core::persist::{MemoryStorage, Storage};
use lode_core::scope;
use lode_core::StoreScope;

use crate::basic::BearsStore;
use crate::catalog::{
    ApiError, CatalogApi, CatalogSnapshot, CatalogStore, Product, ProductDraft, ProductPatch,
};
use crate::roster::RosterStore;
use crate::settings::{STORAGE_KEY, SettingsStore, Theme};
use crate::tasks::{Filter, TaskState, TasksStore, task_store_factory};

#[test]
fn bears_counters() {
    let store = BearsStore::new();

    store.increase_bears();
    store.increase_by(3);
    assert_eq!(store.state().bears, 4);

    store.add_fish(2);
    store.feed_bears();
    let state = store.state();
    assert_eq!((state.bears, state.fish), (5, 1));

    store.remove_all_bears();
    assert_eq!(store.state().bears, 0);
}

#[test]
fn feeding_without_fish_is_a_noop() {
    let store = BearsStore::new();
    store.increase_bears();

    store.feed_bears();
    let state = store.state();
    assert_eq!((state.bears, state.fish), (1, 0));
}

#[test]
fn roster_counts_always_match_the_collection() {
    let store = RosterStore::new();
    store.add_user("ada");
    store.add_user("grace");
    store.add_user("edsger");

    let check = |store: &RosterStore| {
        let users = store.users();
        let active = users.iter().filter(|u| u.active).count();
        assert_eq!(store.active_count(), active);
        assert_eq!(store.inactive_count(), users.len() - active);
        assert_eq!(store.count(), users.len());
    };

    check(&store);
    store.toggle_user(1);
    check(&store);
    store.toggle_user(2);
    store.toggle_user(1);
    check(&store);
    store.toggle_user(42); // unknown id, silent no-op
    check(&store);
    store.add_user("barbara");
    check(&store);
}

#[test]
fn roster_ids_continue_from_the_largest() {
    let store = RosterStore::new();
    store.add_user("ada");
    store.add_user("grace");

    let users = store.users();
    assert_eq!(users[0].id, 1);
    assert_eq!(users[1].id, 2);
    assert!(users.iter().all(|u| !u.active));
    assert_eq!(store.user(2).unwrap().name, "grace");
    assert!(store.user(99).is_none());
}

#[test]
fn settings_round_trip_survives_a_restart() {
    let storage = MemoryStorage::new();

    let first = SettingsStore::new(storage.clone());
    first.toggle_theme(); // light -> dark
    first.toggle_setting("sounds"); // false -> true
    first.toggle_setting("sounds"); // back to false
    drop(first);

    let second = SettingsStore::new(storage);
    let snapshot = second.snapshot();
    assert_eq!(snapshot.theme, Theme::Dark);
    assert_eq!(snapshot.settings.get("notifications"), Some(&true));
    assert_eq!(snapshot.settings.get("sounds"), Some(&false));
    assert!(snapshot.last_updated.is_some());

    // The history trail is session-only and must not round-trip.
    assert!(second.state().history.is_empty());
}

#[test]
fn unknown_setting_key_is_rejected_silently() {
    let store = SettingsStore::new(MemoryStorage::new());
    let before = store.snapshot();

    store.toggle_setting("does-not-exist");

    assert_eq!(store.snapshot(), before);
    assert!(store.state().history.is_empty());
}

#[test]
fn adding_an_existing_setting_only_refreshes_the_timestamp() {
    let store = SettingsStore::new(MemoryStorage::new());

    store.add_setting("autoplay");
    let added = store.snapshot();
    assert_eq!(added.settings.get("autoplay"), Some(&false));
    let history_len = store.state().history.len();

    store.add_setting("autoplay");
    let again = store.snapshot();
    assert_eq!(again.settings, added.settings);
    assert_eq!(store.state().history.len(), history_len);
}

#[test]
fn corrupt_settings_record_falls_back_to_defaults() {
    let storage = MemoryStorage::new();
    storage.write(STORAGE_KEY, "{broken");

    let store = SettingsStore::new(storage);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.theme, Theme::Light);
    assert_eq!(snapshot.settings.get("notifications"), Some(&true));
}

struct FakeCatalog;

impl FakeCatalog {
    fn canned() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Laptop".to_string(),
                price_cents: 100,
                in_stock: true,
            },
            Product {
                id: 2,
                name: "Headphones".to_string(),
                price_cents: 50,
                in_stock: false,
            },
        ]
    }
}

impl CatalogApi for FakeCatalog {
    fn fetch_all(&self) -> LocalBoxFuture<'static, Result<CatalogSnapshot, ApiError>> {
        Box::pin(async {
            Ok(CatalogSnapshot {
                products: Self::canned(),
                fetched_at: 1,
            })
        })
    }

    fn create(&self, draft: ProductDraft) -> LocalBoxFuture<'static, Result<Product, ApiError>> {
        Box::pin(async move {
            Ok(Product {
                id: 99,
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
            Ok(Product {
                id,
                name: patch.name.unwrap_or_default(),
                price_cents: patch.price_cents.unwrap_or(0),
                in_stock: patch.in_stock.unwrap_or(true),
            })
        })
    }

    fn remove(&self, _id: u32) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        Box::pin(async { Ok(()) })
    }
}

struct FailingCatalog;

impl CatalogApi for FailingCatalog {
    fn fetch_all(&self) -> LocalBoxFuture<'static, Result<CatalogSnapshot, ApiError>> {
        Box::pin(async { Err(ApiError("network down".to_string())) })
    }
    fn create(&self, _draft: ProductDraft) -> LocalBoxFuture<'static, Result<Product, ApiError>> {
        Box::pin(async { Err(ApiError("network down".to_string())) })
    }
    fn update(
        &self,
        _id: u32,
        _patch: ProductPatch,
    ) -> LocalBoxFuture<'static, Result<Product, ApiError>> {
        Box::pin(async { Err(ApiError("network down".to_string())) })
    }
    fn remove(&self, _id: u32) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        Box::pin(async { Err(ApiError("network down".to_string())) })
    }
}

#[test]
fn fetch_goes_busy_then_settles_with_data() {
    let store = CatalogStore::new(Rc::new(FakeCatalog));

    let fut = store.fetch_products();
    assert!(store.state().status.busy);

    block_on(fut);
    let state = store.state();
    assert!(!state.status.busy);
    assert_eq!(state.status.error, None);
    assert_eq!(state.products.len(), 2);
    assert_eq!(state.last_fetched, Some(1));
}

#[test]
fn failed_fetch_records_error_and_settles() {
    let store = CatalogStore::new(Rc::new(FailingCatalog));

    block_on(store.fetch_products());
    let state = store.state();
    assert!(!state.status.busy);
    assert_eq!(
        state.status.error.as_deref(),
        Some("catalog request failed: network down")
    );
    assert!(state.products.is_empty());
}

#[test]
fn every_operation_clears_busy_on_failure() {
    let store = CatalogStore::new(Rc::new(FailingCatalog));

    block_on(store.fetch_products());
    block_on(store.add_product(ProductDraft {
        name: "Keyboard".to_string(),
        price_cents: 10,
        in_stock: true,
    }));
    block_on(store.update_product(1, ProductPatch::default()));
    block_on(store.remove_product(1));

    assert!(!store.state().status.busy);
    assert!(store.state().status.error.is_some());
}

#[test]
fn dismissing_the_error_keeps_the_collection() {
    let store = CatalogStore::new(Rc::new(FailingCatalog));
    // Seed the collection directly so there is unrelated state to preserve.
    store.store().produce(|s| s.products = FakeCatalog::canned());

    block_on(store.fetch_products());
    assert!(store.state().status.error.is_some());

    store.dismiss_error();
    let state = store.state();
    assert_eq!(state.status.error, None);
    assert_eq!(state.products, FakeCatalog::canned());
}

#[test]
fn add_update_remove_cycle() {
    let store = CatalogStore::new(Rc::new(FakeCatalog));
    block_on(store.fetch_products());

    block_on(store.add_product(ProductDraft {
        name: "Keyboard".to_string(),
        price_cents: 10,
        in_stock: true,
    }));
    assert_eq!(store.state().products.len(), 3);
    assert_eq!(store.product_by_id(99).unwrap().name, "Keyboard");

    block_on(store.update_product(
        99,
        ProductPatch {
            name: Some("Mechanical keyboard".to_string()),
            ..Default::default()
        },
    ));
    assert_eq!(store.product_by_id(99).unwrap().name, "Mechanical keyboard");

    block_on(store.remove_product(99));
    assert!(store.product_by_id(99).is_none());
    assert_eq!(store.state().products.len(), 2);
}

#[test]
fn updating_a_locally_missing_product_changes_nothing_but_the_timestamp() {
    let store = CatalogStore::new(Rc::new(FakeCatalog));
    block_on(store.fetch_products());
    let before = store.state().products.clone();

    block_on(store.update_product(777, ProductPatch::default()));
    let state = store.state();
    assert_eq!(state.products, before);
    assert!(state.last_fetched.is_some());
}

#[test]
fn task_scopes_are_isolated_even_from_the_same_factory() {
    let factory = task_store_factory();
    let left = StoreScope::new(factory.clone());
    let right = StoreScope::new(factory);

    left.enter(|| {
        let tasks = TasksStore::current().unwrap();
        tasks.add_todo("only on the left");
        tasks.toggle_todo(1);
    });
    right.enter(|| {
        let tasks = TasksStore::current().unwrap();
        assert_eq!(tasks.state().todos.len(), 3);
        assert!(tasks.state().todos.iter().all(|t| !t.done));
    });

    let left_tasks = TasksStore::from_store(left.store().unwrap());
    assert_eq!(left_tasks.state().todos.len(), 4);
}

#[test]
fn task_scope_survives_repeated_entries() {
    let region = StoreScope::new(task_store_factory());

    for i in 0..4 {
        region.enter(|| {
            let tasks = TasksStore::current().unwrap();
            tasks.add_todo(&format!("todo {i}"));
        });
    }

    let tasks = TasksStore::from_store(region.store().unwrap());
    assert_eq!(tasks.state().todos.len(), 7);
}

#[test]
fn task_lookup_outside_any_scope_fails() {
    assert!(TasksStore::current().is_err());
    assert!(scope::current::<TaskState>().is_err());
}

#[test]
fn nested_task_scopes_shadow_by_note() {
    let outer = StoreScope::new(task_store_factory());
    let inner = StoreScope::new(task_store_factory());

    outer.enter(|| {
        TasksStore::current().unwrap().set_scope_note("outer");
        inner.enter(|| {
            let tasks = TasksStore::current().unwrap();
            tasks.set_scope_note("inner");
            assert_eq!(tasks.state().scope_note, "inner");
        });
        assert_eq!(TasksStore::current().unwrap().state().scope_note, "outer");
    });
}

#[test]
fn visible_respects_the_filter() {
    let region = StoreScope::new(task_store_factory());
    region.enter(|| {
        let tasks = TasksStore::current().unwrap();
        tasks.toggle_todo(2);

        tasks.set_filter(Filter::Active);
        let active = tasks.visible();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|t| !t.done));

        tasks.set_filter(Filter::Done);
        let done = tasks.visible();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, 2);

        tasks.set_filter(Filter::All);
        assert_eq!(tasks.visible().len(), 3);
        assert_eq!(tasks.active_count(), 2);
    });
}

#[test]
fn new_todo_ids_continue_from_the_largest_remaining() {
    let region = StoreScope::new(task_store_factory());
    region.enter(|| {
        let tasks = TasksStore::current().unwrap();
        tasks.remove_todo(3);
        tasks.add_todo("replacement");

        let state = tasks.state();
        assert_eq!(state.todos.last().unwrap().id, 3);
        assert_eq!(state.todos.len(), 3);
    });
}
