//! Getting Started - Wiring an abstract capability, a shared component, and
//! a construction hook.
//!
//! This example demonstrates:
//! - A `#[capability]` trait with a declared default implementation
//! - A runtime override replacing that default
//! - A `#[shared]` component handed to two different dependents
//! - A hook firing for every component that implements a capability
//!
//! # Running This Example
//!
//! ```bash
//! cargo run --example getting_started
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use componentry::prelude::*;

#[capability(default = SystemClock)]
pub trait Clock {
    fn now_millis(&self) -> u64;
}

#[derive(Component)]
#[implements(Clock)]
struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        0
    }
}

#[derive(Component)]
#[implements(Clock)]
struct FrozenClock;

impl Clock for FrozenClock {
    fn now_millis(&self) -> u64 {
        1_700_000_000_000
    }
}

/// A `#[shared]` component: every dependent gets a handle to the same
/// instance, not its own copy.
#[derive(Component)]
#[shared]
#[construct]
struct RequestCounter {
    count: u32,
}

impl Construct for RequestCounter {
    fn construct(&mut self) {
        self.count = 0;
    }
}

impl RequestCounter {
    fn record(&mut self) {
        self.count += 1;
    }
}

#[derive(Component)]
struct ReportGenerator {
    #[dependency(shared)]
    counter: Dep<Rc<RefCell<RequestCounter>>>,
}

#[derive(Component)]
struct AlertDispatcher {
    #[dependency(shared)]
    counter: Dep<Rc<RefCell<RequestCounter>>>,
}

fn main() {
    let container = Container::new();

    let clock = container.load_capability::<dyn Clock>().unwrap();
    println!("default clock reads: {}", clock.now_millis());

    container.set_override::<dyn Clock, FrozenClock>();
    let overridden = container.load_capability::<dyn Clock>().unwrap();
    println!("overridden clock reads: {}", overridden.now_millis());

    container.register_hook::<dyn Clock>(|_clock: &mut dyn Clock| {
        println!("a Clock implementation just finished construction");
    });
    let _ = container.load_capability::<dyn Clock>().unwrap();

    let reports: ReportGenerator = container.load().unwrap();
    let alerts: AlertDispatcher = container.load().unwrap();
    reports.counter.borrow_mut().record();
    alerts.counter.borrow_mut().record();
    println!(
        "shared counter after two dependents recorded once each: {}",
        reports.counter.borrow().count
    );
    assert_eq!(reports.counter.borrow().count, 2);
    assert!(Rc::ptr_eq(&reports.counter, &alerts.counter));
}
