//! Six concrete end-to-end scenarios, driven entirely through
//! `#[derive(Component)]`/`#[capability]`-generated code rather than
//! hand-written `Component` impls (unlike the unit tests colocated with each
//! module, which exercise the engine directly). The sixth scenario
//! (declarative config) lives in `componentry-config/tests/end_to_end.rs`
//! instead, since it needs that crate's JSON loader.

use std::cell::RefCell;
use std::rc::Rc;

use componentry_core::{Construct, Container, Dep};
use componentry_macros::{capability, Component};

// Scenario 1 — Shared uniqueness: a shared type with no slots resolved
// twice returns the same instance identity.

#[derive(Component)]
#[shared]
struct Bus;

#[test]
fn scenario_1_shared_uniqueness() {
    let container = Container::new();
    let first = container.load_shared::<Bus>().unwrap();
    let second = container.load_shared::<Bus>().unwrap();
    assert!(Rc::ptr_eq(&first, &second));
}

// Scenario 2 — Default implementation: `Clock` defaults to `SystemClock`;
// setting an override switches every subsequent resolution to it.

#[capability(default = SystemClock)]
pub trait Clock {
    fn label(&self) -> &'static str;
}

#[derive(Component)]
#[implements(Clock)]
struct SystemClock;

impl Clock for SystemClock {
    fn label(&self) -> &'static str {
        "system"
    }
}

#[derive(Component)]
#[implements(Clock)]
struct FakeClock;

impl Clock for FakeClock {
    fn label(&self) -> &'static str {
        "fake"
    }
}

#[test]
fn scenario_2_default_implementation_then_override() {
    let container = Container::new();
    assert_eq!(container.load_capability::<dyn Clock>().unwrap().label(), "system");

    container.set_override::<dyn Clock, FakeClock>();
    assert_eq!(container.load_capability::<dyn Clock>().unwrap().label(), "fake");
}

// Scenario 3 — Ancestor-slot ordering: `Base` declares slot `a`; `Child`
// embeds `Base` via `#[base]` and declares its own slot `b`. Construction
// of `Child` observes both assigned, `a` written before `b`.

thread_local! {
    static FILL_ORDER: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

#[derive(Component)]
struct A;

#[derive(Component)]
struct B;

#[derive(Component)]
#[construct]
struct Base {
    #[dependency]
    a: Dep<A>,
}

impl Construct for Base {
    fn construct(&mut self) {
        FILL_ORDER.with(|order| order.borrow_mut().push("a"));
    }
}

#[derive(Component)]
#[construct]
struct Child {
    #[base]
    base: Base,
    #[dependency]
    b: Dep<B>,
}

impl Construct for Child {
    fn construct(&mut self) {
        FILL_ORDER.with(|order| order.borrow_mut().push("b"));
    }
}

#[test]
fn scenario_3_ancestor_slot_ordering() {
    FILL_ORDER.with(|order| order.borrow_mut().clear());
    let container = Container::new();
    let child: Child = container.load().unwrap();

    assert!(child.base.a.is_filled());
    assert!(child.b.is_filled());
    FILL_ORDER.with(|order| assert_eq!(order.borrow().as_slice(), ["a", "b"]));
}

// Scenario 4 — Hook fan-out: a hook registered for `HasActivity` fires
// exactly once per resolution of each implementing type, against that
// type's own instance.

#[capability]
pub trait HasActivity {
    fn activity_name(&self) -> &'static str;
}

#[derive(Component)]
#[implements(HasActivity)]
struct Player1;

impl HasActivity for Player1 {
    fn activity_name(&self) -> &'static str {
        "player-1"
    }
}

#[derive(Component)]
#[implements(HasActivity)]
struct Player2;

impl HasActivity for Player2 {
    fn activity_name(&self) -> &'static str {
        "player-2"
    }
}

#[test]
fn scenario_4_hook_fan_out() {
    let container = Container::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let recorder = seen.clone();
    container.register_hook::<dyn HasActivity>(move |activity: &mut dyn HasActivity| {
        recorder.borrow_mut().push(activity.activity_name());
    });

    let _p1: Player1 = container.load().unwrap();
    let _p2: Player2 = container.load().unwrap();

    assert_eq!(*seen.borrow(), vec!["player-1", "player-2"]);
}

// Scenario 5 — Shared cycle terminates: shared `Cyclic1`/`Cyclic2` each
// depend (shared) on the other. `load_shared(Cyclic1)` terminates; both
// instances exist; each slot refers to the container's unique peer.

#[derive(Component)]
#[shared]
struct Cyclic1 {
    #[dependency(shared)]
    peer: Dep<Rc<RefCell<Cyclic2>>>,
}

#[derive(Component)]
#[shared]
struct Cyclic2 {
    #[dependency(shared)]
    peer: Dep<Rc<RefCell<Cyclic1>>>,
}

#[test]
fn scenario_5_shared_cycle_terminates() {
    let container = Container::new();
    let one = container.load_shared::<Cyclic1>().unwrap();

    let two_via_one = Rc::clone(&one.borrow().peer);
    let two_direct = container.load_shared::<Cyclic2>().unwrap();
    assert!(Rc::ptr_eq(&two_via_one, &two_direct));

    let one_via_two = Rc::clone(&two_direct.borrow().peer);
    assert!(Rc::ptr_eq(&one_via_two, &one));
}

// Ancestor inheritance — not one of the six named scenarios above, but
// exercises the rule that a `#[base]` ancestor's own sharing and capability
// membership extend to the descendant embedding it, not just the ancestor
// resolved on its own.

#[derive(Component)]
#[shared]
struct SharedAncestor;

#[derive(Component)]
struct DescendantOfShared {
    #[base]
    ancestor: SharedAncestor,
}

#[test]
fn descendant_is_shared_when_its_base_ancestor_is() {
    assert!(<DescendantOfShared as componentry_core::Component>::is_shared());
}

#[derive(Component)]
#[implements(HasActivity)]
struct AncestorActivity;

impl HasActivity for AncestorActivity {
    fn activity_name(&self) -> &'static str {
        "ancestor-activity"
    }
}

#[derive(Component)]
struct DescendantOfCapable {
    #[base]
    ancestor: AncestorActivity,
}

#[test]
fn hook_registered_for_an_ancestor_capability_fires_when_resolving_the_descendant() {
    let container = Container::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let recorder = seen.clone();
    container.register_hook::<dyn HasActivity>(move |activity: &mut dyn HasActivity| {
        recorder.borrow_mut().push(activity.activity_name());
    });

    let _descendant: DescendantOfCapable = container.load().unwrap();

    assert_eq!(*seen.borrow(), vec!["ancestor-activity"]);
}
