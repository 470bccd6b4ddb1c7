//! The process-wide type registry: a name-indexed directory of every
//! `#[derive(Component)]` type and `#[capability]` trait linked into the
//! binary, built once from the `inventory` records that `componentry-macros`
//! emits at each type's definition site.
//!
//! This is the load-time substitute for a reflective classloader scan: where
//! a JVM walks the classpath at startup, linking in this crate's `inventory`
//! plugin walks the binary's `.init_array`/equivalent section once, lazily,
//! the first time the registry is touched.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::component::{CapabilityBinding, CapabilityDescriptor, ComponentRegistration};
use crate::overrides::DefaultImplTable;

/// Directory of every linked-in component, capability, and capability
/// binding, keyed by the names `#[derive(Component)]` and `#[capability]`
/// assign them.
pub struct TypeRegistry {
    components_by_name: HashMap<&'static str, &'static ComponentRegistration>,
    components_by_type: HashMap<TypeId, &'static ComponentRegistration>,
    capabilities_by_name: HashMap<&'static str, &'static CapabilityDescriptor>,
    bindings: HashMap<(&'static str, &'static str), &'static CapabilityBinding>,
}

impl TypeRegistry {
    fn build() -> Self {
        let mut components_by_name = HashMap::new();
        let mut components_by_type = HashMap::new();
        for registration in inventory::iter::<ComponentRegistration> {
            components_by_name.insert(registration.name, registration);
            components_by_type.insert((registration.type_id)(), registration);
        }

        let mut capabilities_by_name = HashMap::new();
        for descriptor in inventory::iter::<CapabilityDescriptor> {
            capabilities_by_name.insert(descriptor.name, descriptor);
        }

        let mut bindings = HashMap::new();
        for binding in inventory::iter::<CapabilityBinding> {
            bindings.insert((binding.capability_name, binding.component_name), binding);
        }

        Self {
            components_by_name,
            components_by_type,
            capabilities_by_name,
            bindings,
        }
    }

    #[must_use]
    pub fn component_by_name(&self, name: &str) -> Option<&'static ComponentRegistration> {
        self.components_by_name.get(name).copied()
    }

    #[must_use]
    pub fn component_by_type(&self, type_id: TypeId) -> Option<&'static ComponentRegistration> {
        self.components_by_type.get(&type_id).copied()
    }

    #[must_use]
    pub fn capability_by_name(&self, name: &str) -> Option<&'static CapabilityDescriptor> {
        self.capabilities_by_name.get(name).copied()
    }

    #[must_use]
    pub fn binding(&self, capability_name: &str, component_name: &str) -> Option<&'static CapabilityBinding> {
        self.bindings.get(&(capability_name, component_name)).copied()
    }

    /// Installs every capability's `#[capability(default = X)]` binding into
    /// `table`. Called once when a container is built; a capability whose
    /// named default has no matching `#[implements]` binding is skipped
    /// (inconsistent linkage between two macro invocations, not something
    /// this crate can repair at runtime).
    pub fn install_declared_defaults(&self, table: &mut DefaultImplTable) {
        for descriptor in self.capabilities_by_name.values() {
            let Some(component_name) = descriptor.default_component_name else {
                continue;
            };
            if let Some(binding) = self.binding(descriptor.name, component_name) {
                (binding.install_default)(table);
            }
        }
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components_by_name.len()
    }

    #[must_use]
    pub fn capability_count(&self) -> usize {
        self.capabilities_by_name.len()
    }
}

static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

/// The lazily-built, process-wide registry. Every [`crate::container::Container`]
/// shares this same directory; only the mutable override/default tables and
/// shared-instance cache are per-container.
pub fn global() -> &'static TypeRegistry {
    REGISTRY.get_or_init(TypeRegistry::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_has_no_entries_until_something_links_it() {
        // This crate's own test binary links no `#[derive(Component)]` types,
        // so the registry built here is legitimately empty; it still must
        // not panic to build.
        let registry = TypeRegistry::build();
        assert_eq!(registry.component_by_name("nonexistent"), None);
        assert_eq!(registry.capability_by_name("nonexistent"), None);
    }
}
