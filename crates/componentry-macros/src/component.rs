//! Expansion of `#[derive(Component)]`.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Path};

use crate::field::{classify, FieldPlan};

pub(crate) fn expand(input: DeriveInput, crate_root: &Ident) -> syn::Result<TokenStream> {
    let type_name = &input.ident;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input, "#[derive(Component)] only supports structs"));
    };

    let is_unit = matches!(data.fields, Fields::Unit);
    let plans = match &data.fields {
        Fields::Named(named) => named.named.iter().map(classify).collect::<syn::Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                &input,
                "#[derive(Component)] does not support tuple structs; use named `#[base]`/`#[dependency]` \
                 fields, or no fields at all for a stateless component",
            ));
        }
    };

    let is_shared = input.attrs.iter().any(|attr| attr.path().is_ident("shared"));
    let has_construct = input.attrs.iter().any(|attr| attr.path().is_ident("construct"));
    let implements = parse_implements(&input)?;

    if is_shared && !implements.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "a `#[shared]` component cannot carry `#[implements(..)]`: capability overrides and \
             defaults build owned values, which a shared component cannot hand out without breaking \
             its single-instance guarantee. Depend on it directly with `Dep<Rc<RefCell<Self>>>` instead.",
        ));
    }

    let component_name = component_name_literal(type_name);

    let base_tys: Vec<&syn::Type> = plans
        .iter()
        .filter_map(|plan| match plan {
            FieldPlan::Base { field } => Some(&field.ty),
            _ => None,
        })
        .collect();

    let base_fields: Vec<(&Ident, &syn::Type)> = plans
        .iter()
        .filter_map(|plan| match plan {
            FieldPlan::Base { field } => Some((field.ident.as_ref().expect("named field"), &field.ty)),
            _ => None,
        })
        .collect();

    let allocate_fields = plans.iter().map(|plan| {
        let name = plan.field().ident.as_ref().expect("named field");
        match plan {
            FieldPlan::Base { .. } => {
                let ty = &plan.field().ty;
                quote! { #name: <#ty as #crate_root::Component>::allocate() }
            }
            FieldPlan::Owned { .. } | FieldPlan::Shared { .. } => {
                quote! { #name: #crate_root::Dep::empty() }
            }
            FieldPlan::Plain { .. } => {
                quote! { #name: Default::default() }
            }
        }
    });

    let inject_statements = plans.iter().filter_map(|plan| {
        let name = plan.field().ident.as_ref().expect("named field");
        let slot_name = field_name_literal(name);
        match plan {
            FieldPlan::Base { .. } => {
                let ty = &plan.field().ty;
                Some(quote! {
                    <#ty as #crate_root::Component>::inject(&mut self.#name, engine).map_err(|source| {
                        #crate_root::ResolveError::InjectionFailure {
                            owner: #component_name,
                            slot: #slot_name,
                            source: Box::new(source),
                        }
                    })?;
                    <#ty as #crate_root::Component>::construct(&mut self.#name);
                })
            }
            FieldPlan::Owned { inner, .. } => Some(quote! {
                self.#name.fill(engine.resolve::<#inner>().map_err(|source| {
                    #crate_root::ResolveError::InjectionFailure {
                        owner: #component_name,
                        slot: #slot_name,
                        source: Box::new(source),
                    }
                })?);
            }),
            FieldPlan::Shared { inner, .. } => Some(quote! {
                self.#name.fill(engine.resolve_shared::<#inner>().map_err(|source| {
                    #crate_root::ResolveError::InjectionFailure {
                        owner: #component_name,
                        slot: #slot_name,
                        source: Box::new(source),
                    }
                })?);
            }),
            FieldPlan::Plain { .. } => None,
        }
    });

    let allocate_body = if is_unit {
        quote! { Self }
    } else {
        quote! { Self { #(#allocate_fields,)* } }
    };

    let construct_method = if has_construct {
        quote! {
            fn construct(&mut self) {
                <#type_name as #crate_root::Construct>::construct(self);
            }
        }
    } else {
        quote! {}
    };

    let is_shared_lit = is_shared;

    let capability_entries = implements.iter().map(|path| capability_entry(type_name, path, crate_root));
    let base_field_names: Vec<&Ident> = base_fields.iter().map(|(name, _)| *name).collect();
    let base_field_tys: Vec<&syn::Type> = base_fields.iter().map(|(_, ty)| *ty).collect();
    let capability_for_impls = implements.iter().map(|path| {
        quote! {
            impl #crate_root::CapabilityFor<dyn #path> for #type_name {
                fn upcast(self: Box<Self>) -> Box<dyn #path> {
                    self
                }
            }
        }
    });
    let capability_bindings = implements.iter().map(|path| capability_binding(type_name, path, crate_root));

    let build_fn = if is_shared {
        quote! {
            |engine| {
                let built = engine.resolve_shared::<#type_name>()?;
                Ok(Box::new(built) as Box<dyn std::any::Any>)
            }
        }
    } else {
        quote! {
            |engine| {
                let built = engine.resolve::<#type_name>()?;
                Ok(Box::new(built) as Box<dyn std::any::Any>)
            }
        }
    };

    Ok(quote! {
        impl #crate_root::Component for #type_name {
            fn allocate() -> Self {
                #allocate_body
            }

            fn inject(&mut self, engine: &mut #crate_root::Engine<'_>) -> Result<(), #crate_root::ResolveError> {
                #(#inject_statements)*
                Ok(())
            }

            #construct_method

            fn is_shared() -> bool {
                #is_shared_lit #(|| <#base_tys as #crate_root::Component>::is_shared())*
            }

            fn capability_chain() -> Vec<#crate_root::CapabilityEntry> {
                let mut chain = vec![ #(#capability_entries,)* ];
                #(
                    chain.extend(
                        <#base_field_tys as #crate_root::Component>::capability_chain()
                            .into_iter()
                            .map(|entry| {
                                let capability_id = entry.capability_id;
                                let capability_name = entry.capability_name;
                                #crate_root::CapabilityEntry {
                                    capability_id,
                                    capability_name,
                                    fire: Box::new(move |any: &mut dyn std::any::Any,
                                                          index: &#crate_root::InitializerIndex,
                                                          logger: &#crate_root::Logger| {
                                        if let Some(concrete) = any.downcast_mut::<#type_name>() {
                                            (entry.fire)(&mut concrete.#base_field_names as &mut dyn std::any::Any, index, logger);
                                        }
                                    }),
                                }
                            }),
                    );
                )*
                chain
            }
        }

        #(#capability_for_impls)*

        #crate_root::inventory::submit! {
            #crate_root::ComponentRegistration {
                name: #component_name,
                type_id: || std::any::TypeId::of::<#type_name>(),
                is_shared: || <#type_name as #crate_root::Component>::is_shared(),
                capability_chain: || <#type_name as #crate_root::Component>::capability_chain(),
                build: #build_fn,
            }
        }

        #(#capability_bindings)*
    })
}

fn parse_implements(input: &DeriveInput) -> syn::Result<Vec<Path>> {
    let mut paths = Vec::new();
    for attr in &input.attrs {
        if !attr.path().is_ident("implements") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            paths.push(meta.path);
            Ok(())
        })?;
    }
    Ok(paths)
}

fn field_name_literal(name: &Ident) -> syn::LitStr {
    syn::LitStr::new(&name.to_string(), name.span())
}

fn component_name_literal(type_name: &Ident) -> syn::LitStr {
    syn::LitStr::new(&type_name.to_string(), type_name.span())
}

fn capability_name_literal(path: &Path) -> syn::LitStr {
    let ident = &path.segments.last().expect("non-empty path").ident;
    syn::LitStr::new(&ident.to_string(), ident.span())
}

fn capability_entry(type_name: &Ident, path: &Path, crate_root: &Ident) -> TokenStream {
    let capability_name = capability_name_literal(path);
    quote! {
        #crate_root::CapabilityEntry {
            capability_id: std::any::TypeId::of::<dyn #path>(),
            capability_name: #capability_name,
            fire: Box::new(|any: &mut dyn std::any::Any, index: &#crate_root::InitializerIndex, logger: &#crate_root::Logger| {
                if let Some(concrete) = any.downcast_mut::<#type_name>() {
                    index.fire::<dyn #path>(concrete as &mut dyn #path, logger);
                }
            }),
        }
    }
}

fn capability_binding(type_name: &Ident, path: &Path, crate_root: &Ident) -> TokenStream {
    let capability_name = capability_name_literal(path);
    let component_name = component_name_literal(type_name);

    quote! {
        #crate_root::inventory::submit! {
            #crate_root::CapabilityBinding {
                capability_name: #capability_name,
                component_name: #component_name,
                install_override: |table| table.set_override::<dyn #path, #type_name>(),
                install_default: |table| table.set_default::<dyn #path, #type_name>(),
            }
        }
    }
}
