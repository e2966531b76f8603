//! Behavior every `ProductStore` must share, run against both the SQLite
//! store and the in-memory fake.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use shelflife_db::{
    CancellationToken, DbConfig, DbError, DynProductStore, InMemoryProductStore,
    MissingRowPolicy, NewProduct, SqliteProductStore,
};

async fn sqlite() -> DynProductStore {
    Arc::new(
        SqliteProductStore::connect(DbConfig::in_memory())
            .await
            .expect("in-memory database"),
    )
}

async fn memory() -> DynProductStore {
    Arc::new(InMemoryProductStore::new())
}

fn product(name: &str, product_type: &str, expires_in: Duration) -> NewProduct {
    NewProduct::new(100, name, product_type, Utc::now() + expires_in)
}

// =============================================================================
// Shared scenarios
// =============================================================================

async fn save_then_find_round_trip(store: DynProductStore) {
    let cancel = CancellationToken::new();
    let milk = product("Milk", "FOOD", Duration::days(4));

    store.save(&cancel, &milk).await.unwrap();

    let fresh = store.find_all_order_by_exp(&cancel, false).await.unwrap();
    assert_eq!(fresh.len(), 1);
    assert!(fresh[0].fields_match(&milk));
    assert!(fresh[0].id > 0);
}

async fn free_text_fields_round_trip(store: DynProductStore) {
    let cancel = CancellationToken::new();
    let cheese = product("", "DAIRY PRODUCTS", Duration::days(2));
    let spread = product("  Peanut butter (crunchy!)  ", "spreads & jams", Duration::days(9));

    store.save(&cancel, &cheese).await.unwrap();
    store.save(&cancel, &spread).await.unwrap();

    let fresh = store.find_all_order_by_exp(&cancel, false).await.unwrap();
    assert_eq!(fresh.len(), 2);
    assert!(fresh[0].fields_match(&spread));
    assert!(fresh[1].fields_match(&cheese));

    let dairy = store
        .find_by_expired_time(&cancel, Duration::days(3), "DAIRY PRODUCTS")
        .await
        .unwrap();
    assert_eq!(dairy.len(), 1);
    assert_eq!(dairy[0].name, "");
}

async fn out_of_range_expiration_is_rejected(store: DynProductStore) {
    let cancel = CancellationToken::new();
    let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
    let last = Utc.with_ymd_and_hms(9999, 12, 31, 0, 0, 0).unwrap();

    let err = store
        .save(&cancel, &NewProduct::new(1, "Honey", "FOOD", far))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
    assert!(store
        .find_all_order_by_exp(&cancel, false)
        .await
        .unwrap()
        .is_empty());

    store
        .save(&cancel, &NewProduct::new(1, "Honey", "FOOD", last))
        .await
        .unwrap();
    let id = store.find_all_order_by_exp(&cancel, false).await.unwrap()[0].id;

    let err = store
        .update(&cancel, id, &NewProduct::new(1, "Honey", "FOOD", far))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
}

async fn ordering_latest_expiration_first(store: DynProductStore) {
    let cancel = CancellationToken::new();

    for (name, days) in [("t2", 2), ("t1", 1), ("t3", 3)] {
        store
            .save(&cancel, &product(name, "FOOD", Duration::days(days)))
            .await
            .unwrap();
    }

    let names: Vec<String> = store
        .find_all_order_by_exp(&cancel, false)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();

    assert_eq!(names, ["t3", "t2", "t1"]);
}

async fn past_expiration_is_flagged_on_save(store: DynProductStore) {
    let cancel = CancellationToken::new();

    store
        .save(&cancel, &product("Old bread", "FOOD", -Duration::hours(3)))
        .await
        .unwrap();

    let expired = store.find_all_order_by_exp(&cancel, true).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].name, "Old bread");
    assert!(store
        .find_all_order_by_exp(&cancel, false)
        .await
        .unwrap()
        .is_empty());
}

async fn sweep_is_idempotent(store: DynProductStore) {
    let cancel = CancellationToken::new();

    store
        .save(&cancel, &product("Fresh", "FOOD", Duration::days(1)))
        .await
        .unwrap();
    store
        .save(&cancel, &product("Stale", "FOOD", -Duration::days(1)))
        .await
        .unwrap();

    store.set_expired(&cancel).await.unwrap();
    let first = (
        store.find_all_expired(&cancel).await.unwrap(),
        store.find_all_order_by_exp(&cancel, false).await.unwrap(),
    );

    assert_eq!(store.set_expired(&cancel).await.unwrap(), 0);
    let second = (
        store.find_all_expired(&cancel).await.unwrap(),
        store.find_all_order_by_exp(&cancel, false).await.unwrap(),
    );

    assert_eq!(first, second);
    assert_eq!(first.0.len(), 1);
    assert_eq!(first.1.len(), 1);
}

async fn lookahead_window(store: DynProductStore) {
    let cancel = CancellationToken::new();

    store
        .save(&cancel, &product("Soon", "FOOD", Duration::minutes(30)))
        .await
        .unwrap();
    store
        .save(&cancel, &product("Later", "FOOD", Duration::hours(2)))
        .await
        .unwrap();
    store
        .save(&cancel, &product("Pills", "MEDICINE", Duration::minutes(10)))
        .await
        .unwrap();
    store
        .save(&cancel, &product("Gone", "FOOD", -Duration::days(2)))
        .await
        .unwrap();

    let due: Vec<String> = store
        .find_by_expired_time(&cancel, Duration::hours(1), "FOOD")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();

    // flag state does not matter, only the raw timestamp
    assert_eq!(due, ["Gone", "Soon"]);

    assert!(store
        .find_by_expired_time(&cancel, Duration::hours(1), "COSMETICS")
        .await
        .unwrap()
        .is_empty());
}

async fn delete_removes_row(store: DynProductStore) {
    let cancel = CancellationToken::new();

    store
        .save(&cancel, &product("Eggs", "FOOD", Duration::days(1)))
        .await
        .unwrap();
    store
        .save(&cancel, &product("Ham", "FOOD", -Duration::days(1)))
        .await
        .unwrap();

    let eggs = store.find_all_order_by_exp(&cancel, false).await.unwrap()[0].clone();
    store.delete(&cancel, eggs.id).await.unwrap();

    let mut seen = store.find_all_order_by_exp(&cancel, false).await.unwrap();
    seen.extend(store.find_all_expired(&cancel).await.unwrap());
    seen.extend(
        store
            .find_by_expired_time(&cancel, Duration::days(365), "FOOD")
            .await
            .unwrap(),
    );
    assert!(seen.iter().all(|p| p.id != eggs.id));

    // absent ids are fine under the default policy
    store.delete(&cancel, eggs.id).await.unwrap();
    store.delete(&cancel, 9_999).await.unwrap();
}

async fn update_replaces_fields(store: DynProductStore) {
    let cancel = CancellationToken::new();

    store
        .save(&cancel, &product("Cream", "FOOD", Duration::days(5)))
        .await
        .unwrap();
    let id = store.find_all_order_by_exp(&cancel, false).await.unwrap()[0].id;

    let replacement = NewProduct::new(7, "Sour cream", "DAIRY", Utc::now() - Duration::hours(1));
    store.update(&cancel, id, &replacement).await.unwrap();

    let expired = store.find_all_expired(&cancel).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].id, id);
    assert!(expired[0].fields_match(&replacement));

    // zero rows matched is not an error by default
    store.update(&cancel, id + 1000, &replacement).await.unwrap();
}

async fn cancellation_surfaces_as_error(store: DynProductStore) {
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(matches!(
        store.find_all_order_by_exp(&cancel, false).await,
        Err(DbError::Cancelled)
    ));
    assert!(matches!(
        store.set_expired(&cancel).await,
        Err(DbError::Cancelled)
    ));
    assert!(matches!(
        store.delete(&cancel, 1).await,
        Err(DbError::Cancelled)
    ));
}

async fn empty_results_are_empty_vecs(store: DynProductStore) {
    let cancel = CancellationToken::new();

    assert!(store.find_all_order_by_exp(&cancel, false).await.unwrap().is_empty());
    assert!(store.find_all_expired(&cancel).await.unwrap().is_empty());
    assert!(store
        .find_by_expired_time(&cancel, Duration::hours(1), "FOOD")
        .await
        .unwrap()
        .is_empty());
    assert_eq!(store.set_expired(&cancel).await.unwrap(), 0);
}

// =============================================================================
// Wiring
// =============================================================================

macro_rules! store_contract {
    ($($scenario:ident),* $(,)?) => {
        mod sqlite_store {
            use super::*;
            $(
                #[tokio::test]
                async fn $scenario() {
                    super::$scenario(sqlite().await).await;
                }
            )*
        }

        mod in_memory_store {
            use super::*;
            $(
                #[tokio::test]
                async fn $scenario() {
                    super::$scenario(memory().await).await;
                }
            )*
        }
    };
}

store_contract!(
    save_then_find_round_trip,
    free_text_fields_round_trip,
    out_of_range_expiration_is_rejected,
    ordering_latest_expiration_first,
    past_expiration_is_flagged_on_save,
    sweep_is_idempotent,
    lookahead_window,
    delete_removes_row,
    update_replaces_fields,
    cancellation_surfaces_as_error,
    empty_results_are_empty_vecs,
);

#[tokio::test]
async fn stores_are_usable_from_many_tasks() {
    for store in [sqlite().await, memory().await] {
        let mut handles = Vec::new();

        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let cancel = CancellationToken::new();
                let item = NewProduct::new(
                    i,
                    format!("item-{i}"),
                    "FOOD",
                    Utc::now() + Duration::days(1),
                );
                store.save(&cancel, &item).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let cancel = CancellationToken::new();
        assert_eq!(
            store.find_all_order_by_exp(&cancel, false).await.unwrap().len(),
            8
        );
    }
}

#[tokio::test]
async fn missing_rows_are_reported_when_configured() {
    let sqlite: DynProductStore = Arc::new(
        SqliteProductStore::connect(DbConfig::in_memory().on_missing_row(MissingRowPolicy::NotFound))
            .await
            .expect("in-memory database"),
    );
    let memory: DynProductStore =
        Arc::new(InMemoryProductStore::new().on_missing_row(MissingRowPolicy::NotFound));

    for store in [sqlite, memory] {
        let cancel = CancellationToken::new();
        let milk = product("Milk", "FOOD", Duration::days(1));

        let err = store.update(&cancel, 404, &milk).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = store.delete(&cancel, 404).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // present rows are unaffected by the policy
        store.save(&cancel, &milk).await.unwrap();
        let id = store.find_all_order_by_exp(&cancel, false).await.unwrap()[0].id;
        store.update(&cancel, id, &milk).await.unwrap();
        store.delete(&cancel, id).await.unwrap();
    }
}
