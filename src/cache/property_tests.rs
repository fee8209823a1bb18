//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple reference model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::clock::ManualClock;

// == Test Configuration ==
const TEST_TTL_MS: u64 = 1_000;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = u32> {
    any::<u32>()
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Advance { ms: u64 },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        (0u64..700).prop_map(|ms| CacheOp::Advance { ms }),
        Just(CacheOp::Sweep),
    ]
}

fn new_cache(max: Option<usize>) -> (TtlCache<u32>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let cache = TtlCache::with_clock(Duration::from_millis(TEST_TTL_MS), max, clock.clone());
    (cache, clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Reads agree with a model that remembers the last write and its time.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let (mut cache, clock) = new_cache(None);
        let mut model: HashMap<String, (u32, u64)> = HashMap::new();
        let mut now = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value);
                    model.insert(key, (value, now));
                }
                CacheOp::Get { key } => {
                    let expected = match model.get(&key) {
                        Some((value, at)) if now - at <= TEST_TTL_MS => Some(*value),
                        _ => None,
                    };
                    prop_assert_eq!(cache.get(&key), expected);
                }
                CacheOp::Advance { ms } => {
                    now += ms;
                    clock.set(now);
                }
                CacheOp::Sweep => {
                    cache.sweep_expired();
                }
            }
        }
    }

    // Immediately after a set the value is readable.
    #[test]
    fn prop_set_then_get(key in key_strategy(), value in value_strategy()) {
        let (mut cache, _) = new_cache(None);

        cache.set(key.clone(), value);
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // Any read strictly after ttl misses.
    #[test]
    fn prop_absent_after_ttl(
        key in key_strategy(),
        value in value_strategy(),
        epsilon in 1u64..10_000
    ) {
        let (mut cache, clock) = new_cache(None);

        cache.set(key.clone(), value);
        clock.set(TEST_TTL_MS + epsilon);
        prop_assert_eq!(cache.get(&key), None);
    }

    // Last write wins.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        v1 in value_strategy(),
        v2 in value_strategy()
    ) {
        let (mut cache, _) = new_cache(None);

        cache.set(key.clone(), v1);
        cache.set(key.clone(), v2);
        prop_assert_eq!(cache.get(&key), Some(v2));
        prop_assert_eq!(cache.len(), 1);
    }

    // A bounded cache never holds more than its bound.
    #[test]
    fn prop_capacity_enforcement(
        max in 1usize..8,
        keys in prop::collection::vec("[a-z]{1,3}", 1..60)
    ) {
        let (mut cache, _) = new_cache(Some(max));

        for (i, key) in keys.into_iter().enumerate() {
            cache.set(key, i as u32);
            prop_assert!(cache.len() <= max);
        }
    }

    // Sweeping leaves only live entries behind.
    #[test]
    fn prop_sweep_leaves_only_live(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut cache, clock) = new_cache(None);
        let mut now = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Advance { ms } => {
                    now += ms;
                    clock.set(now);
                }
                _ => {}
            }
        }

        let before = cache.len();
        let removed = cache.sweep_expired();
        prop_assert_eq!(cache.len(), before - removed);
        prop_assert_eq!(cache.sweep_expired(), 0);
    }
}
