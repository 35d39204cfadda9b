//! Terminal walkthrough of every tutorial store. Run with
//! `RUST_LOG=debug` to watch each transition go by.

use futures::executor::block_on;

use lode_core::persist::MemoryStorage;
use lode_core::StoreScope;
use lode_stores::basic::BearsStore;
use lode_stores::catalog::{CatalogStore, ProductDraft, ProductPatch};
use lode_stores::roster::RosterStore;
use lode_stores::settings::SettingsStore;
use lode_stores::tasks::{Filter, TasksStore, task_store_factory};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    counters();
    roster();
    settings();
    block_on(catalog());
    scoped_tasks();

    Ok(())
}

fn counters() {
    println!("== basic counters ==");
    let store = BearsStore::new();
    store.increase_bears();
    store.increase_by(2);
    store.add_fish(1);
    store.feed_bears();
    store.feed_bears(); // out of fish, no-op
    let state = store.state();
    println!("bears: {}, fish: {}", state.bears, state.fish);
}

fn roster() {
    println!("== roster ==");
    let store = RosterStore::new();
    store.add_user("ada");
    store.add_user("grace");
    store.add_user("edsger");
    store.toggle_user(2);
    println!(
        "{} users, {} active, {} inactive",
        store.count(),
        store.active_count(),
        store.inactive_count()
    );
}

fn settings() {
    println!("== persisted settings ==");
    let storage = MemoryStorage::new();

    let store = SettingsStore::new(storage.clone());
    store.toggle_theme();
    store.add_setting("autoplay");
    store.toggle_setting("autoplay");
    drop(store);

    // Same storage, fresh store: the persisted subset comes back.
    let restored = SettingsStore::new(storage);
    let snapshot = restored.snapshot();
    println!("restored theme: {:?}", snapshot.theme);
    for (key, value) in &snapshot.settings {
        println!("  {key}: {value}");
    }
}

async fn catalog() {
    println!("== async catalog ==");
    let store = CatalogStore::simulated();

    println!("fetching (simulated latency)...");
    store.fetch_products().await;
    for product in &store.state().products {
        println!(
            "  #{} {} — {} cents, in stock: {}",
            product.id, product.name, product.price_cents, product.in_stock
        );
    }

    store
        .add_product(ProductDraft {
            name: "Monitor".to_string(),
            price_cents: 30_000_00,
            in_stock: true,
        })
        .await;
    store
        .update_product(
            3,
            ProductPatch {
                in_stock: Some(true),
                ..Default::default()
            },
        )
        .await;
    store.remove_product(1).await;

    let state = store.state();
    println!(
        "{} products after add/update/remove, error: {:?}",
        state.products.len(),
        state.status.error
    );
}

fn scoped_tasks() {
    println!("== scoped task lists ==");
    let factory = task_store_factory();
    let left = StoreScope::new(factory.clone());
    let right = StoreScope::new(factory);

    left.enter(|| {
        let tasks = TasksStore::current().expect("inside the left scope");
        tasks.set_scope_note("left");
        tasks.add_todo("only the left list sees this");
        tasks.toggle_todo(1);
    });

    right.enter(|| {
        let tasks = TasksStore::current().expect("inside the right scope");
        tasks.set_scope_note("right");
        tasks.set_filter(Filter::Active);
        println!(
            "right list: {} visible of {} (untouched by the left scope)",
            tasks.visible().len(),
            tasks.state().todos.len()
        );
    });

    // Re-entering reuses the same instance; nothing resets.
    left.enter(|| {
        let tasks = TasksStore::current().expect("inside the left scope");
        println!(
            "left list ({}): {} todos, {} active",
            tasks.state().scope_note,
            tasks.state().todos.len(),
            tasks.active_count()
        );
    });

    if let Err(err) = TasksStore::current() {
        println!("outside any scope: {err}");
    }
}
