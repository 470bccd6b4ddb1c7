//! The component manifest: what `#[derive(Component)]` generates, and the
//! registration records gathered via `inventory` that stand in for
//! reflective classloading and dynamic lookup by name.

use std::any::{Any, TypeId};
use std::ops::{Deref, DerefMut};

use crate::engine::Engine;
use crate::error::ResolveError;
use crate::initializers::InitializerIndex;
use crate::log::Logger;
use crate::overrides::{DefaultImplTable, OverrideTable};

/// A dependency slot, holding its value once the engine has injected it.
///
/// Reading a `Dep<T>` before injection panics — the construction protocol
/// guarantees this never happens for a component built through
/// [`Engine::resolve`](crate::engine::Engine::resolve), since `inject` always
/// runs before `construct`.
pub struct Dep<T>(Option<T>);

impl<T> Dep<T> {
    /// The not-yet-injected state an `allocate()` puts every slot in.
    #[must_use]
    pub fn empty() -> Self {
        Self(None)
    }

    /// Fills the slot. Called exactly once, by generated `inject` code.
    pub fn fill(&mut self, value: T) {
        self.0 = Some(value);
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.0.is_some()
    }

    /// Unwraps the slot, consuming it.
    ///
    /// # Panics
    /// Panics if the slot was never injected.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0.expect("dependency slot read before injection")
    }
}

impl<T> Default for Dep<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for Dep<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.0.as_ref().expect("dependency slot read before injection")
    }
}

impl<T> DerefMut for Dep<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.0.as_mut().expect("dependency slot read before injection")
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Dep<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(value) => f.debug_tuple("Dep").field(value).finish(),
            None => write!(f, "Dep(<uninjected>)"),
        }
    }
}

/// A component's own post-injection construction logic.
///
/// `#[derive(Component)]` never detects an inherent method by name — there's
/// nothing for it to inspect, since a separate `impl Foo { .. }` block is
/// invisible at the derive's expansion site. A type that needs construction
/// logic implements this trait instead and marks the struct `#[construct]`;
/// the derive then emits a `Component::construct` override that calls
/// through to it. Getting the attribute wrong (present without an `impl`, or
/// an `impl` without the attribute) is a compile error, not a silent no-op
/// or a runtime recursion.
pub trait Construct {
    fn construct(&mut self);
}

/// One entry in a concrete type's capability chain: a single capability it
/// implements, plus a trampoline that upcasts a type-erased `&mut dyn Any`
/// (known to hold some concrete type) into `&mut dyn Capability` and fires
/// every hook registered for that capability.
///
/// Generated by `#[derive(Component)]` for each `#[implements(Capability)]`
/// entry; it never appears as hand-written code. A derived type that embeds
/// a `#[base]` ancestor re-wraps each of the ancestor's own entries so the
/// trampoline downcasts to the *descendant's* type and navigates to the
/// ancestor field before dispatching — which is why `fire` is boxed rather
/// than a bare fn pointer: the wrapper closure captures the ancestor's own
/// entry.
pub struct CapabilityEntry {
    pub capability_id: TypeId,
    pub capability_name: &'static str,
    pub fire: Box<dyn Fn(&mut dyn Any, &InitializerIndex, &Logger)>,
}

/// Links a concrete component to one capability it implements, letting the
/// engine perform the `Box<Concrete> -> Box<dyn Capability>` upcast needed
/// by [`crate::overrides::OverrideTable::set_override`] and
/// [`crate::overrides::DefaultImplTable::set_default`].
///
/// `#[derive(Component)] #[implements(Clock)] struct SystemClock` generates
/// `impl CapabilityFor<dyn Clock> for SystemClock { .. }` automatically.
pub trait CapabilityFor<I: ?Sized>: Component {
    fn upcast(self: Box<Self>) -> Box<I>;
}

/// The component manifest, realized without reflection.
///
/// Everything here is generated by `#[derive(Component)]`; see
/// `componentry-macros` for the codegen and `DESIGN.md` for why each method
/// is shaped the way it is.
pub trait Component: Any {
    /// Allocates an instance with every slot empty and no construction
    /// logic run.
    fn allocate() -> Self
    where
        Self: Sized;

    /// Fills every `#[dependency]` (and, recursively, `#[base]`) slot by
    /// calling back into the engine.
    fn inject(&mut self, engine: &mut Engine<'_>) -> Result<(), ResolveError>
    where
        Self: Sized;

    /// The component's own zero-argument construction logic. Runs after
    /// every slot is filled. Default: no-op; `#[derive(Component)]` overrides
    /// this to call through to `Construct::construct` for any type marked
    /// `#[construct]`.
    fn construct(&mut self) {}

    /// Whether at most one instance of this concrete type may exist per
    /// container. True if the type itself carries `#[shared]`, or if any
    /// `#[base]` ancestor does.
    fn is_shared() -> bool
    where
        Self: Sized,
    {
        false
    }

    /// The capabilities this concrete type implements, for hook fan-out:
    /// its own `#[implements(..)]` entries, plus every `#[base]` ancestor's
    /// own capability chain.
    fn capability_chain() -> Vec<CapabilityEntry>
    where
        Self: Sized,
    {
        Vec::new()
    }

    #[must_use]
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}

/// A `#[derive(Component)]` type's entry in the process-wide name registry.
pub struct ComponentRegistration {
    pub name: &'static str,
    pub type_id: fn() -> TypeId,
    pub is_shared: fn() -> bool,
    pub capability_chain: fn() -> Vec<CapabilityEntry>,
    pub build: fn(&mut Engine<'_>) -> Result<Box<dyn Any>, ResolveError>,
}

inventory::collect!(ComponentRegistration);

/// A `#[capability]`-attributed trait's entry, naming its default
/// implementation (if any).
pub struct CapabilityDescriptor {
    pub name: &'static str,
    pub id: fn() -> TypeId,
    pub default_component_name: Option<&'static str>,
}

inventory::collect!(CapabilityDescriptor);

/// Links one `(capability, concrete component)` pair so the declarative
/// loader can install an override or default implementation purely from
/// the textual names in a configuration document.
pub struct CapabilityBinding {
    pub capability_name: &'static str,
    pub component_name: &'static str,
    pub install_override: fn(&mut OverrideTable),
    pub install_default: fn(&mut DefaultImplTable),
}

inventory::collect!(CapabilityBinding);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dep_read_before_injection_panics() {
        let dep: Dep<u32> = Dep::empty();
        let result = std::panic::catch_unwind(|| {
            let _ = &*dep;
        });
        assert!(result.is_err());
    }

    #[test]
    fn dep_fill_then_deref() {
        let mut dep: Dep<u32> = Dep::empty();
        assert!(!dep.is_filled());
        dep.fill(7);
        assert!(dep.is_filled());
        assert_eq!(*dep, 7);
    }
}
