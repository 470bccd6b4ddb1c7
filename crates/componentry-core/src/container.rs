//! The container: the per-assembly owner of the shared-instance cache, the
//! override and default-implementation tables, the hook index, and the
//! retained-root list. Registry entries (component and capability
//! descriptors) are process-wide and shared by every container; everything
//! mutable here is per-container.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::component::{CapabilityFor, Component};
use crate::engine::Engine;
use crate::error::ResolveError;
use crate::initializers::InitializerIndex;
use crate::log::{LogLevel, Logger};
use crate::overrides::{DefaultImplTable, OverrideTable};
use crate::registry;

/// An assembly root. Construction and resolution always go through one of
/// these; it owns the one shared-instance cache that makes `#[shared]`
/// components singletons within its lifetime.
///
/// Deliberately `!Sync`: every table here is a [`RefCell`], not a `RwLock`,
/// because assembly is a single-threaded, synchronous protocol — see
/// `DESIGN.md` for the reasoning.
pub struct Container {
    pub(crate) overrides: RefCell<OverrideTable>,
    pub(crate) defaults: RefCell<DefaultImplTable>,
    pub(crate) shared_cache: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
    pub(crate) initializers: RefCell<InitializerIndex>,
    retained_roots: RefCell<Vec<Box<dyn Any>>>,
    logger: Logger,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Builds a container with the process-wide `#[capability(default = X)]`
    /// bindings pre-installed and a stderr logger.
    #[must_use]
    pub fn new() -> Self {
        Self::with_logger(Logger::default())
    }

    #[must_use]
    pub fn with_logger(logger: Logger) -> Self {
        let mut defaults = DefaultImplTable::new();
        registry::global().install_declared_defaults(&mut defaults);
        Self {
            overrides: RefCell::new(OverrideTable::new()),
            defaults: RefCell::new(defaults),
            shared_cache: RefCell::new(HashMap::new()),
            initializers: RefCell::new(InitializerIndex::new()),
            retained_roots: RefCell::new(Vec::new()),
            logger,
        }
    }

    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Builds a non-shared component from scratch. Panics in debug builds
    /// if `C` is `#[shared]` — use [`Container::load_shared`] for those.
    pub fn load<C: Component>(&self) -> Result<C, ResolveError> {
        let span = crate::log::AutoSpan::start("load", &self.logger);
        let mut engine = Engine::new(self);
        let result = engine.resolve::<C>();
        drop(span);
        result
    }

    /// Resolves a `#[shared]` component, returning the container's single
    /// cached instance (building it on first use).
    pub fn load_shared<C: Component>(&self) -> Result<Rc<RefCell<C>>, ResolveError> {
        let mut engine = Engine::new(self);
        engine.resolve_shared::<C>()
    }

    /// Resolves an abstract capability through the override table, falling
    /// back to the declared default implementation.
    pub fn load_capability<I: ?Sized + 'static>(&self) -> Result<Box<I>, ResolveError> {
        let mut engine = Engine::new(self);
        engine.resolve_capability::<I>()
    }

    /// Looks a component up by its registered name and builds it, for
    /// callers that only have a textual name (a declarative document's
    /// `services`/`plugins` directives, mainly).
    pub fn load_by_name(&self, name: &str) -> Result<Box<dyn Any>, ResolveError> {
        let registration = registry::global()
            .component_by_name(name)
            .ok_or_else(|| ResolveError::TypeNotFound { qualified_name: name.to_string() })?;
        let mut engine = Engine::new(self);
        (registration.build)(&mut engine)
    }

    /// Builds `C` and keeps it alive for the container's own lifetime,
    /// independent of anything the caller does with its own handle.
    pub fn retain<C: Component>(&self) -> Result<(), ResolveError> {
        let built: C = self.load()?;
        self.retained_roots.borrow_mut().push(Box::new(built));
        Ok(())
    }

    /// Looks a component up by name, builds it, and keeps it alive for the
    /// container's own lifetime — the primitive a declarative document's
    /// `services`/`plugins` directives build on, since neither wants the
    /// built value back, only the construction side effect and the
    /// guarantee it outlives the call.
    pub fn retain_by_name(&self, name: &str) -> Result<(), ResolveError> {
        let built = self.load_by_name(name)?;
        self.retained_roots.borrow_mut().push(built);
        Ok(())
    }

    /// Number of roots retained so far, in first-insertion order.
    #[must_use]
    pub fn retained_root_count(&self) -> usize {
        self.retained_roots.borrow().len()
    }

    /// Re-runs injection and construction against an already-allocated
    /// value, for hosts that build a component's shell themselves (test
    /// fixtures, mostly) and only want the container to fill its slots.
    pub fn resolve_into<C: Component>(&self, target: &mut C) -> Result<(), ResolveError> {
        let mut engine = Engine::new(self);
        target.inject(&mut engine)?;
        target.construct();
        engine.fire_hooks(target);
        Ok(())
    }

    /// Installs `C` as the override for capability `I`, effective
    /// immediately for every subsequent resolution.
    pub fn set_override<I, C>(&self)
    where
        I: ?Sized + 'static,
        C: CapabilityFor<I> + Component,
    {
        self.overrides.borrow_mut().set_override::<I, C>();
        self.logger.log_with(
            LogLevel::Info,
            "override_installed",
            "capability override installed",
            &[("capability", std::any::type_name::<I>().to_string())],
        );
    }

    pub fn clear_override<I: ?Sized + 'static>(&self) {
        self.overrides.borrow_mut().clear::<I>();
    }

    /// Applies a registered capability binding's override side, by name —
    /// the primitive a declarative loader builds its `overrides` section on.
    pub fn apply_override_binding(&self, binding: &crate::component::CapabilityBinding) {
        (binding.install_override)(&mut self.overrides.borrow_mut());
        self.logger.log_with(
            LogLevel::Info,
            "override_installed",
            "capability override installed from configuration",
            &[
                ("capability", binding.capability_name.to_string()),
                ("component", binding.component_name.to_string()),
            ],
        );
    }

    /// Applies a registered capability binding's default-implementation
    /// side, by name — the programmatic counterpart to
    /// [`Container::apply_override_binding`], for hosts that want to swap a
    /// capability's default implementation without a declarative document
    /// (the document's `services`/`plugins` directives retain named
    /// components, not capability defaults — see `componentry-config`).
    pub fn apply_default_binding(&self, binding: &crate::component::CapabilityBinding) {
        (binding.install_default)(&mut self.defaults.borrow_mut());
        self.logger.log_with(
            LogLevel::Info,
            "default_installed",
            "capability default implementation installed from configuration",
            &[
                ("capability", binding.capability_name.to_string()),
                ("component", binding.component_name.to_string()),
            ],
        );
    }

    #[must_use]
    pub fn override_count(&self) -> usize {
        self.overrides.borrow().len()
    }

    /// Registers a hook to fire for every future component implementing
    /// capability `I`, replacing whatever hook was previously registered for
    /// `I`. Hooks registered after a matching component was already built do
    /// not retroactively fire against it.
    pub fn register_hook<I>(&self, hook: impl Fn(&mut I) + 'static)
    where
        I: ?Sized + 'static,
    {
        self.initializers.borrow_mut().register::<I>(hook);
    }

    #[must_use]
    pub fn shared_instance_count(&self) -> usize {
        self.shared_cache.borrow().len()
    }
}

thread_local! {
    static AMBIENT_CONTAINER: RefCell<Option<Rc<Container>>> = const { RefCell::new(None) };
}

/// Sets the calling thread's ambient container, used by code (derived
/// `construct` bodies, mostly) that needs to reach the container without a
/// handle threaded all the way down. Most-recent-call wins; there is no
/// stack of prior containers to restore.
pub fn set_ambient(container: Rc<Container>) {
    AMBIENT_CONTAINER.with(|cell| *cell.borrow_mut() = Some(container));
}

#[must_use]
pub fn ambient() -> Option<Rc<Container>> {
    AMBIENT_CONTAINER.with(|cell| cell.borrow().clone())
}

pub fn clear_ambient() {
    AMBIENT_CONTAINER.with(|cell| *cell.borrow_mut() = None);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf;

    impl Component for Leaf {
        fn allocate() -> Self {
            Self
        }
        fn inject(&mut self, _engine: &mut Engine<'_>) -> Result<(), ResolveError> {
            Ok(())
        }
    }

    #[test]
    fn fresh_container_has_no_shared_instances() {
        let container = Container::new();
        assert_eq!(container.shared_instance_count(), 0);
        assert_eq!(container.override_count(), 0);
    }

    #[test]
    fn load_builds_a_non_shared_component() {
        let container = Container::new();
        let _leaf: Leaf = container.load().unwrap();
    }

    #[test]
    fn retain_keeps_roots_alive_in_insertion_order() {
        let container = Container::new();
        assert_eq!(container.retained_root_count(), 0);
        container.retain::<Leaf>().unwrap();
        container.retain::<Leaf>().unwrap();
        assert_eq!(container.retained_root_count(), 2);
    }

    #[test]
    fn ambient_container_round_trips_per_thread() {
        clear_ambient();
        assert!(ambient().is_none());
        set_ambient(Rc::new(Container::new()));
        assert!(ambient().is_some());
        clear_ambient();
    }
}
