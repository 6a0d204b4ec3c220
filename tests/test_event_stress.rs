use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use rand::Rng;

use synckit::log;
use synckit::sync::Event;
use synckit::test_utils::run_with_timeout;

#[test]
fn no_lost_wakeups() {
    log::setup_logging("debug", log::LogType::Tests);

    // A waiter whose registration precedes set() is always woken. The jitter
    // varies which side wins the race between registration and broadcast.
    run_with_timeout(Duration::from_secs(120), || {
        let ev = Event::new();
        let mut rng = rand::rng();

        for _ in 0..1000 {
            ev.clear();

            let barrier = Arc::new(Barrier::new(2));
            let waiter = {
                let ev = ev.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    ev.wait();
                })
            };

            barrier.wait();
            let jitter = rng.random_range(0..200u64);
            if jitter > 0 {
                thread::sleep(Duration::from_micros(jitter));
            }
            ev.set();

            waiter.join().unwrap();
        }
    })
    .unwrap();
}

#[test]
fn mixed_waiters_all_wake_on_one_set() {
    log::setup_logging("debug", log::LogType::Tests);

    run_with_timeout(Duration::from_secs(60), || {
        let ev = Event::new();
        let woken = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for i in 0..200 {
            let ev = ev.clone();
            let woken = woken.clone();
            handles.push(thread::spawn(move || {
                if i % 2 == 0 {
                    ev.wait();
                } else {
                    assert!(ev.wait_timeout(Duration::from_secs(3600)));
                }
                woken.fetch_add(1, Ordering::SeqCst);
            }));
        }

        thread::sleep(Duration::from_millis(200));
        ev.set();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(woken.load(Ordering::SeqCst), 200);
    })
    .unwrap();
}

#[test]
fn concurrent_set_transitions_once() {
    run_with_timeout(Duration::from_secs(60), || {
        for _ in 0..50 {
            let ev = Event::new();

            let waiter = {
                let ev = ev.clone();
                thread::spawn(move || {
                    ev.wait();
                })
            };
            thread::sleep(Duration::from_millis(5));

            // All setters fire together; exactly one performs the transition
            // and the waiter wakes exactly once.
            let barrier = Arc::new(Barrier::new(8));
            let mut setters = vec![];
            for _ in 0..8 {
                let ev = ev.clone();
                let barrier = barrier.clone();
                setters.push(thread::spawn(move || {
                    barrier.wait();
                    ev.set();
                }));
            }

            for s in setters {
                s.join().unwrap();
            }
            waiter.join().unwrap();
            assert!(ev.is_set());
        }
    })
    .unwrap();
}

#[test]
fn set_clear_storm_never_wedges() {
    // Cycles of set/clear with waiters pinned on superseded gates must not
    // deadlock, leak waiter registrations or wake anyone into a wrong result.
    run_with_timeout(Duration::from_secs(60), || {
        let ev = Event::new();
        let stop = Event::new();

        let mut togglers = vec![];
        for _ in 0..2 {
            let ev = ev.clone();
            let stop = stop.clone();
            togglers.push(thread::spawn(move || {
                while !stop.is_set() {
                    ev.set();
                    ev.clear();
                }
            }));
        }

        let mut waiters = vec![];
        for _ in 0..8 {
            let ev = ev.clone();
            let stop = stop.clone();
            waiters.push(thread::spawn(move || {
                let mut hits = 0usize;
                while !stop.is_set() {
                    if ev.wait_timeout(Duration::from_millis(5)) {
                        hits += 1;
                    }
                }
                hits
            }));
        }

        thread::sleep(Duration::from_millis(500));
        stop.set();

        for t in togglers {
            t.join().unwrap();
        }
        // Any waiter still parked on a superseded gate gets released here.
        ev.set();
        for w in waiters {
            w.join().unwrap();
        }
    })
    .unwrap();
}
