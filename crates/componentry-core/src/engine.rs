//! The resolution engine: one per top-level `load`/`resolve` call, threading
//! a borrowed [`Container`] and a stack of concrete type names used only to
//! detect non-shared cycles.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::component::Component;
use crate::container::Container;
use crate::error::{ResolutionChain, ResolveError};
use crate::log::{LogLevel, Logger};

/// Drives one resolution: allocates, injects, constructs, and fires hooks
/// for whatever the call graph touches.
///
/// Borrowed, not owned: `#[dependency]` slots that need to pull in further
/// dependencies do so by calling back into the same `Engine` that is
/// injecting them, so the whole call graph for one `load` shares one
/// resolution chain.
pub struct Engine<'a> {
    container: &'a Container,
    chain: Vec<&'static str>,
}

impl<'a> Engine<'a> {
    #[must_use]
    pub fn new(container: &'a Container) -> Self {
        Self { container, chain: Vec::new() }
    }

    #[must_use]
    pub fn logger(&self) -> &Logger {
        self.container.logger()
    }

    #[must_use]
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// Builds a non-shared component: allocate, inject, construct, fire
    /// hooks.
    ///
    /// Also the only path capability overrides and defaults build through
    /// (see `componentry-core::overrides`) — a `#[shared]` component cannot
    /// be registered as a capability's override or default implementation,
    /// which `componentry-macros` rejects at expansion time. Debug builds
    /// still assert it here as a second line of defense.
    pub fn resolve<C: Component>(&mut self) -> Result<C, ResolveError> {
        debug_assert!(
            !C::is_shared(),
            "Engine::resolve does not support #[shared] components; use resolve_shared"
        );

        let name = C::type_name();
        if self.chain.contains(&name) {
            let mut chain = self.chain.clone();
            chain.push(name);
            return Err(ResolveError::CyclicNonSharedDependency {
                chain: ResolutionChain::from_names(chain),
            });
        }

        self.chain.push(name);
        let mut instance = C::allocate();
        let injected = instance.inject(self);
        self.chain.pop();
        injected?;

        instance.construct();
        self.fire_hooks(&mut instance);
        Ok(instance)
    }

    /// Resolves a `#[shared]` component, publishing its `Rc<RefCell<C>>`
    /// into the container's cache *before* running `inject`, so that a
    /// cycle among shared components — the one cycle shape this runtime
    /// allows — terminates: the second time the cycle reaches `C`, the
    /// cache already holds its (possibly still-injecting) handle.
    pub fn resolve_shared<C: Component>(&mut self) -> Result<Rc<RefCell<C>>, ResolveError> {
        let type_id = std::any::TypeId::of::<C>();

        if let Some(existing) = self.container.shared_cache.borrow().get(&type_id) {
            return Ok(existing.clone().downcast::<RefCell<C>>().unwrap_or_else(|_| {
                unreachable!("shared cache entry keyed by TypeId::of::<C>() always downcasts to C")
            }));
        }

        let instance = Rc::new(RefCell::new(C::allocate()));
        self.container
            .shared_cache
            .borrow_mut()
            .insert(type_id, instance.clone() as Rc<dyn Any>);
        self.logger().log_with(
            LogLevel::Debug,
            "shared_publish",
            "published shared instance before injection",
            &[("component", C::type_name().to_string())],
        );

        {
            let mut borrowed = instance.borrow_mut();
            borrowed.inject(self)?;
            borrowed.construct();
            self.fire_hooks(&mut *borrowed);
        }

        Ok(instance)
    }

    /// Resolves an abstract capability: override table first, declared
    /// default second, error if neither is registered.
    pub fn resolve_capability<I: ?Sized + 'static>(&mut self) -> Result<Box<I>, ResolveError> {
        let container = self.container;

        if let Some(built) = container.overrides.borrow().build::<I>(self)? {
            self.logger().log_with(
                LogLevel::Debug,
                "override_hit",
                "resolved capability via override",
                &[("capability", std::any::type_name::<I>().to_string())],
            );
            return Ok(built);
        }

        if let Some(built) = container.defaults.borrow().build::<I>(self)? {
            self.logger().log_with(
                LogLevel::Debug,
                "default_hit",
                "resolved capability via default implementation",
                &[("capability", std::any::type_name::<I>().to_string())],
            );
            return Ok(built);
        }

        Err(ResolveError::UnresolvableAbstract {
            capability: std::any::type_name::<I>(),
        })
    }

    /// Fires every hook registered against each capability `instance`
    /// implements, using the trampolines its capability chain carries.
    pub(crate) fn fire_hooks<C: Component>(&self, instance: &mut C) {
        let initializers = self.container.initializers.borrow();
        for entry in C::capability_chain() {
            (entry.fire)(instance as &mut dyn Any, &initializers, self.logger());
        }
    }
}
