//! End-to-end exercise of a declarative configuration document: install an
//! override, then retain two named components from the `services` and
//! `plugins` buckets — which must behave identically, since both are
//! resolved through the same code path — and confirm each directive
//! actually took effect.

use std::cell::RefCell;

use componentry_config::Loader;
use componentry_core::{Construct, Container, Dep};
use componentry_macros::{capability, Component};

#[capability(default = SystemClock)]
pub trait Clock {
    fn now(&self) -> u64;
}

#[derive(Component)]
#[implements(Clock)]
struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        1
    }
}

#[derive(Component)]
#[implements(Clock)]
struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        42
    }
}

thread_local! {
    static STARTUP_LOG: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

#[derive(Component)]
struct StartupProbe {
    #[base]
    clock: SystemClockUser,
}

#[derive(Component)]
#[construct]
struct SystemClockUser {
    #[dependency]
    clock: Dep<SystemClock>,
}

impl Construct for SystemClockUser {
    fn construct(&mut self) {
        STARTUP_LOG.with(|log| log.borrow_mut().push("system-clock-user-started"));
    }
}

#[derive(Component)]
#[construct]
struct AuditTrail {
    #[dependency]
    clock: Dep<SystemClock>,
}

impl Construct for AuditTrail {
    fn construct(&mut self) {
        STARTUP_LOG.with(|log| log.borrow_mut().push("audit-trail-started"));
    }
}

#[test]
fn override_then_services_and_plugins_both_retain_in_order() {
    let container = Container::new();

    let json = r#"{
        "overrides": [ { "capability": "Clock", "component": "FixedClock" } ],
        "services": [ { "component": "StartupProbe" } ],
        "plugins": [ { "component": "AuditTrail" } ]
    }"#;

    let applied = Loader::load_document(&container, json).unwrap();
    assert!(applied);

    let clock = container.load_capability::<dyn Clock>().unwrap();
    assert_eq!(clock.now(), 42, "override should have won for every subsequent capability resolution");

    assert_eq!(container.retained_root_count(), 2, "services and plugins entries both retain a root");

    STARTUP_LOG.with(|log| {
        assert_eq!(log.borrow().as_slice(), ["system-clock-user-started", "audit-trail-started"]);
    });
}
