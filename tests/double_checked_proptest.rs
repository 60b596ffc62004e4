#![cfg(not(loom))]

use proptest::prelude::*;
use sole::DoubleChecked;
use std::sync::atomic::{AtomicUsize, Ordering};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_constructor_runs_once_for_any_call_pattern(
        threads in 1usize..8,
        calls_per_thread in 1usize..32,
        seed in any::<u32>(),
    ) {
        let cell = DoubleChecked::new();
        let constructions = AtomicUsize::new(0);

        let observed: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let cell = &cell;
                    let constructions = &constructions;
                    s.spawn(move || {
                        let mut addrs = Vec::with_capacity(calls_per_thread);
                        for _ in 0..calls_per_thread {
                            let value = cell.get_or_init(|| {
                                constructions.fetch_add(1, Ordering::SeqCst);
                                seed.wrapping_add(t as u32)
                            });
                            addrs.push(value as *const u32 as usize);
                        }
                        addrs
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        prop_assert_eq!(constructions.load(Ordering::SeqCst), 1);
        prop_assert_eq!(observed.len(), threads * calls_per_thread);
        prop_assert!(observed.windows(2).all(|w| w[0] == w[1]));

        let published = *cell.get().unwrap();
        prop_assert!((0..threads as u32).any(|t| published == seed.wrapping_add(t)));
    }

    #[test]
    fn test_failures_before_success_are_retried(failures in 0usize..10) {
        let cell: DoubleChecked<usize> = DoubleChecked::new();
        let mut attempts = 0usize;

        loop {
            let res = cell.get_or_try_init(|| {
                attempts += 1;
                if attempts <= failures { Err(attempts) } else { Ok(attempts) }
            });
            if let Ok(value) = res {
                prop_assert_eq!(*value, failures + 1);
                break;
            }
            prop_assert!(!cell.is_initialized());
        }

        prop_assert_eq!(cell.get_or_init(|| 0), &(failures + 1));
        prop_assert_eq!(attempts, failures + 1);
    }
}
