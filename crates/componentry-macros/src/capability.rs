//! Expansion of `#[capability]`.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{Expr, ExprPath, ItemTrait, LitStr};

pub(crate) fn expand(attr: TokenStream, item: ItemTrait, crate_root: &Ident) -> syn::Result<TokenStream> {
    let default_component = parse_default(attr)?;
    let trait_name = &item.ident;
    let capability_name = LitStr::new(&trait_name.to_string(), trait_name.span());

    let default_component_name = match &default_component {
        Some(name) => quote! { Some(#name) },
        None => quote! { None },
    };

    Ok(quote! {
        #item

        #crate_root::inventory::submit! {
            #crate_root::CapabilityDescriptor {
                name: #capability_name,
                id: || std::any::TypeId::of::<dyn #trait_name>(),
                default_component_name: #default_component_name,
            }
        }
    })
}

/// Parses `default = SomeComponent` out of `#[capability(default = SomeComponent)]`,
/// recording just the name (the matching `#[implements]` binding is looked
/// up by name at registry build time, not linked directly).
fn parse_default(attr: TokenStream) -> syn::Result<Option<LitStr>> {
    if attr.is_empty() {
        return Ok(None);
    }

    let assign: syn::ExprAssign = syn::parse2(attr)?;
    let syn::Expr::Path(ExprPath { path, .. }) = *assign.left else {
        return Err(syn::Error::new_spanned(assign.left, "expected `default = ComponentName`"));
    };
    if !path.is_ident("default") {
        return Err(syn::Error::new_spanned(path, "expected `default = ComponentName`"));
    }

    let Expr::Path(ExprPath { path: component_path, .. }) = *assign.right else {
        return Err(syn::Error::new_spanned(
            assign.right,
            "`default` must name a `#[derive(Component)]` type",
        ));
    };
    let ident = &component_path.segments.last().expect("non-empty path").ident;
    Ok(Some(LitStr::new(&ident.to_string(), ident.span())))
}
