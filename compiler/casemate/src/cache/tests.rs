#![allow(clippy::unwrap_used, reason = "tests unwrap for concise assertions")]

use super::*;
use std::thread;

#[test]
fn compiles_once_per_text() {
    let cache = PatternCache::new();
    let first = cache.get_or_compile("[x, *rest]").unwrap();
    let second = cache.get_or_compile("[x, *rest]").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.compilations(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn keys_are_exact_text() {
    let cache = PatternCache::new();
    let a = cache.get_or_compile("[x]").unwrap();
    let b = cache.get_or_compile("[ x ]").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a, b);
    assert_eq!(cache.len(), 2);
}

#[test]
fn errors_are_not_cached() {
    let cache = PatternCache::new();
    assert!(cache.get_or_compile("[x, x]").is_err());
    assert!(cache.get_or_compile("[x, x]").is_err());
    assert!(cache.is_empty());
    assert_eq!(cache.get("[x, x]"), None);
}

#[test]
fn concurrent_callers_share_one_entry() {
    let cache = PatternCache::new();
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| cache.get_or_compile("Point(x=0, y=y)").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(cache.compilations(), 1);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
}
