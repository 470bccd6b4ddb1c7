//! Procedural macros for the componentry dependency-injection runtime.
//!
//! `#[derive(Component)]` and `#[capability]` are where metadata discovery
//! actually happens: since Rust has no reflective classloader to scan at
//! startup, every fact the engine needs about a type (its dependency slots,
//! whether it's shared, which capabilities it implements) is worked out
//! here, at expansion time, and baked into plain fn pointers and
//! `inventory` registrations.

mod capability;
mod component;
mod field;

use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use proc_macro_crate::{crate_name, FoundCrate};
use syn::{parse_macro_input, DeriveInput, ItemTrait};

/// Implements `Component` for a struct made of `#[base]` ancestor fields,
/// `#[dependency]`/`#[dependency(shared)]` slot fields, and ordinary
/// untagged fields (plain `Default`-initialized state `inject` leaves
/// alone); a unit struct with no fields at all is also accepted, for
/// components that carry no state of their own. See `field.rs` for exactly
/// what's allowed. A `#[construct]`-marked struct must `impl Construct for`
/// itself; the generated `Component::construct` delegates to it. Registers
/// the type in the process-wide type registry.
#[proc_macro_derive(Component, attributes(base, dependency, shared, implements, construct))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::expand(input, &crate_root_ident())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Marks a trait as a capability: something concrete components can
/// `#[implements(..)]` and abstract dependency slots can be resolved
/// against. `#[capability(default = SomeComponent)]` additionally records
/// which component backs it when no override is installed.
#[proc_macro_attribute]
pub fn capability(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemTrait);
    capability::expand(attr.into(), item, &crate_root_ident())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

const CRATE_NAME: &str = "componentry-core";

/// Resolves the identifier generated code should use to refer back to
/// `componentry-core`: `crate` when expanding inside that crate's own
/// tests, the dependency's rename otherwise.
fn crate_root_ident() -> Ident {
    let found = crate_name(CRATE_NAME).unwrap_or_else(|_| {
        panic!("`{CRATE_NAME}` must be a dependency of any crate using componentry-macros")
    });
    let name = match found {
        FoundCrate::Itself => "crate".to_string(),
        FoundCrate::Name(name) => name,
    };
    Ident::new(&name, Span::call_site())
}
