//! The override table and the default-implementation table: two parallel
//! capability-keyed lookups consulted, in that order, whenever an abstract
//! capability is resolved.
//!
//! Both use the same `TypeId`-keyed `Box<dyn Any>` erasure pattern: a
//! capability builder stored under the capability's `TypeId`, called back
//! into the engine to produce the boxed trait object.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::component::{CapabilityFor, Component};
use crate::engine::Engine;
use crate::error::ResolveError;

/// Builds the override/default value for one capability, given a live
/// engine to resolve the chosen concrete type's own dependencies through.
///
/// Returns `Box<dyn Any>` wrapping a `Box<I>` rather than `I` directly,
/// since `I` is unsized; the table's `build` methods immediately downcast
/// back to `Box<I>`, which is always sound because a builder is only ever
/// stored under `TypeId::of::<I>()` for the exact `I` it was created with.
type CapabilityBuilder = fn(&mut Engine<'_>) -> Result<Box<dyn Any>, ResolveError>;

fn make_builder<I, C>() -> CapabilityBuilder
where
    I: ?Sized + 'static,
    C: CapabilityFor<I> + Component,
{
    |engine| {
        let built = engine.resolve::<C>()?;
        let upcast: Box<I> = Box::new(built).upcast();
        Ok(Box::new(upcast) as Box<dyn Any>)
    }
}

fn downcast_builder_result<I: ?Sized + 'static>(boxed_any: Box<dyn Any>) -> Box<I> {
    *boxed_any
        .downcast::<Box<I>>()
        .unwrap_or_else(|_| panic!("capability builder produced the wrong boxed type"))
}

/// Explicit `capability -> concrete type` substitutions installed at
/// runtime, e.g. by a declarative configuration document's `overrides`
/// section. Consulted before [`DefaultImplTable`]; an empty table falls
/// straight through to it.
#[derive(Default)]
pub struct OverrideTable {
    builders: HashMap<TypeId, CapabilityBuilder>,
}

impl OverrideTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `C` as the override for capability `I`.
    ///
    /// `I` must be named at the call site (a trait object type such as
    /// `dyn Clock`) so the `Box<C> -> Box<I>` upcast in
    /// [`CapabilityFor::upcast`] is resolved at compile time rather than
    /// through any runtime type lookup.
    pub fn set_override<I, C>(&mut self)
    where
        I: ?Sized + 'static,
        C: CapabilityFor<I> + Component,
    {
        self.builders.insert(TypeId::of::<I>(), make_builder::<I, C>());
    }

    pub fn clear<I: ?Sized + 'static>(&mut self) {
        self.builders.remove(&TypeId::of::<I>());
    }

    pub fn clear_all(&mut self) {
        self.builders.clear();
    }

    pub(crate) fn build<I: ?Sized + 'static>(
        &self,
        engine: &mut Engine<'_>,
    ) -> Result<Option<Box<I>>, ResolveError> {
        let Some(builder) = self.builders.get(&TypeId::of::<I>()) else {
            return Ok(None);
        };
        Ok(Some(downcast_builder_result(builder(engine)?)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

/// Per-capability fallback used when no override is registered. Populated
/// once at startup by `#[capability(default = X)]`. A declarative
/// document's `services`/
/// `plugins` sections never touch this table — they retain named
/// components, not capability defaults — but [`Container::apply_default_binding`]
/// is available for hosts that want to change it programmatically.
#[derive(Default)]
pub struct DefaultImplTable {
    builders: HashMap<TypeId, CapabilityBuilder>,
}

impl DefaultImplTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default<I, C>(&mut self)
    where
        I: ?Sized + 'static,
        C: CapabilityFor<I> + Component,
    {
        self.builders.insert(TypeId::of::<I>(), make_builder::<I, C>());
    }

    pub(crate) fn build<I: ?Sized + 'static>(
        &self,
        engine: &mut Engine<'_>,
    ) -> Result<Option<Box<I>>, ResolveError> {
        let Some(builder) = self.builders.get(&TypeId::of::<I>()) else {
            return Ok(None);
        };
        Ok(Some(downcast_builder_result(builder(engine)?)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}
