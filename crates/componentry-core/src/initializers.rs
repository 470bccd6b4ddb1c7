//! Capability-indexed hook dispatch: the callback registered against a
//! capability fires for every constructed component that implements it,
//! right after that component's own `construct`.
//!
//! Hooks are stored type-erased the same way [`crate::overrides`] stores
//! builders: a single hook is boxed as `Box<dyn Any>` under the capability's
//! `TypeId`, and is only ever downcast back to the one concrete
//! `Box<dyn Fn(&mut I)>` type it was created with. A single hook per
//! capability: registering a second one for the same `I` replaces the
//! first, the same `HashMap::insert` semantics `OverrideTable` already gets
//! for free.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::log::{LogLevel, Logger};

type Hook<I> = Box<dyn Fn(&mut I)>;

/// The container's registered hooks, at most one per capability.
#[derive(Default)]
pub struct InitializerIndex {
    hooks: HashMap<TypeId, Box<dyn Any>>,
}

impl InitializerIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` to run for every component implementing capability
    /// `I`, right after that component finishes its own construction.
    /// Replaces whatever hook was previously registered for `I`, if any.
    pub fn register<I>(&mut self, hook: impl Fn(&mut I) + 'static)
    where
        I: ?Sized + 'static,
    {
        self.hooks.insert(TypeId::of::<I>(), Box::new(Box::new(hook) as Hook<I>) as Box<dyn Any>);
    }

    #[must_use]
    pub fn hook_count<I: ?Sized + 'static>(&self) -> usize {
        usize::from(self.hooks.contains_key(&TypeId::of::<I>()))
    }

    /// Fires the hook registered for capability `I` against `target`, if
    /// any. A capability with no registered hook is a no-op, not an error —
    /// most capabilities have none.
    pub fn fire<I>(&self, target: &mut I, logger: &Logger)
    where
        I: ?Sized + 'static,
    {
        let Some(entry) = self.hooks.get(&TypeId::of::<I>()) else {
            return;
        };
        let Some(hook) = entry.downcast_ref::<Hook<I>>() else {
            return;
        };
        hook(target);
        logger.log_with(
            LogLevel::Debug,
            "hook_fired",
            "capability hook fired",
            &[("capability", std::any::type_name::<I>().to_string())],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    trait Named {
        fn set_name(&mut self, name: &str);
    }

    struct Widget {
        name: String,
    }

    impl Named for Widget {
        fn set_name(&mut self, name: &str) {
            self.name = name.to_string();
        }
    }

    #[test]
    fn second_registration_replaces_the_first() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut index = InitializerIndex::new();

        let first = order.clone();
        index.register::<dyn Named>(move |_widget: &mut dyn Named| first.borrow_mut().push(1));
        let second = order.clone();
        index.register::<dyn Named>(move |_widget: &mut dyn Named| second.borrow_mut().push(2));

        let mut widget = Widget { name: String::new() };
        index.fire::<dyn Named>(&mut widget, &Logger::silent());

        assert_eq!(*order.borrow(), vec![2]);
    }

    #[test]
    fn capability_with_no_hook_is_a_silent_no_op() {
        let index = InitializerIndex::new();
        let mut widget = Widget { name: "untouched".to_string() };
        index.fire::<dyn Named>(&mut widget, &Logger::silent());
        assert_eq!(widget.name, "untouched");
    }

    #[test]
    fn hook_count_reflects_registrations() {
        let mut index = InitializerIndex::new();
        assert_eq!(index.hook_count::<dyn Named>(), 0);
        index.register::<dyn Named>(|widget: &mut dyn Named| widget.set_name("a"));
        assert_eq!(index.hook_count::<dyn Named>(), 1);
    }
}
