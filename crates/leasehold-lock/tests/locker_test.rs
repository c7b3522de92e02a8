//! Lock Protocol Tests
//!
//! Runs over the in-memory store. Each locker built on a clone of the store
//! stands in for a separate process.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use leasehold_lock::{LockError, Locker, MemoryLockStore, OwnerToken, StoreLocker};

const PREFIX: &str = "it:lock:";

fn process_locker(store: &MemoryLockStore) -> Arc<dyn Locker> {
    Arc::new(StoreLocker::new(store.clone(), PREFIX))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mutual_exclusion_under_contention() {
    let store = MemoryLockStore::new();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let locker = process_locker(&store);
            tokio::spawn(async move {
                let token = OwnerToken::generate();
                let acquired = locker
                    .lock("contended", token.as_str(), Duration::from_secs(30))
                    .await
                    .unwrap();
                (acquired, token)
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let winners: Vec<_> = results
        .into_iter()
        .map(|r| r.unwrap())
        .filter(|(acquired, _)| *acquired)
        .collect();

    assert_eq!(winners.len(), 1, "exactly one caller may win the race");
    assert_eq!(
        store.get("it:lock:contended"),
        Some(winners[0].1.to_string())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_critical_section_never_overlaps() {
    let store = MemoryLockStore::new();
    let inside = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let locker = process_locker(&store);
            let inside = inside.clone();
            let completed = completed.clone();
            tokio::spawn(async move {
                let token = OwnerToken::generate();
                loop {
                    if locker
                        .lock("section", token.as_str(), Duration::from_secs(5))
                        .await
                        .unwrap()
                    {
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        tokio::time::sleep(Duration::from_millis(2)).await;
                        inside.fetch_sub(1, Ordering::SeqCst);
                        locker.unlock("section", token.as_str()).await.unwrap();
                        completed.fetch_add(1, Ordering::SeqCst);
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        result.unwrap();
    }
    assert_eq!(completed.load(Ordering::SeqCst), 8);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_lease_expiry_frees_lock() {
    let store = MemoryLockStore::new();
    let crashed = process_locker(&store);
    let survivor = process_locker(&store);

    assert!(
        crashed
            .lock("job", "token-a", Duration::from_millis(30))
            .await
            .unwrap()
    );
    assert!(
        !survivor
            .lock("job", "token-b", Duration::from_secs(30))
            .await
            .unwrap()
    );

    // The holder never releases; its lease runs out
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(
        survivor
            .lock("job", "token-b", Duration::from_secs(30))
            .await
            .unwrap()
    );

    // The stale holder can no longer release what it lost
    let err = crashed.unlock("job", "token-a").await.unwrap_err();
    assert!(matches!(err, LockError::OwnershipMismatch));
    survivor.unlock("job", "token-b").await.unwrap();
}

#[tokio::test]
async fn test_ownership_gated_release_across_processes() {
    let store = MemoryLockStore::new();
    let holder = process_locker(&store);
    let intruder = process_locker(&store);

    holder
        .lock("res", "token-a", Duration::from_secs(30))
        .await
        .unwrap();

    let err = intruder.unlock("res", "token-b").await.unwrap_err();
    assert!(matches!(err, LockError::OwnershipMismatch));
    assert_eq!(store.get("it:lock:res"), Some("token-a".to_string()));

    holder.unlock("res", "token-a").await.unwrap();
    assert!(store.get("it:lock:res").is_none());
}

#[tokio::test]
async fn test_independent_names_do_not_contend() {
    let store = MemoryLockStore::new();
    let locker = process_locker(&store);

    for name in ["alpha", "beta", "gamma"] {
        assert!(
            locker
                .lock(name, "same-owner", Duration::from_secs(30))
                .await
                .unwrap()
        );
    }
    assert_eq!(store.len(), 3);
}
