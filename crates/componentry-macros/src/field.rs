//! Classifies a `#[derive(Component)]` struct's fields into base slots,
//! owned dependency slots, shared dependency slots, and plain state.

use syn::{Field, GenericArgument, PathArguments, Type};

pub(crate) enum FieldPlan<'a> {
    /// `#[base] field: Ancestor` — an embedded ancestor component, injected
    /// and constructed before any other field.
    Base { field: &'a Field },
    /// `#[dependency] field: Dep<T>` — filled by a fresh, non-shared build
    /// of `T`.
    Owned { field: &'a Field, inner: Type },
    /// `#[dependency(shared)] field: Dep<Rc<RefCell<T>>>` — filled from the
    /// container's shared-instance cache.
    Shared { field: &'a Field, inner: Type },
    /// An untagged field: ordinary owned state, `Default`-initialized by
    /// `allocate()` and left untouched by `inject()`. `construct()` is the
    /// usual place to give it a real starting value.
    Plain { field: &'a Field },
}

impl FieldPlan<'_> {
    pub(crate) fn field(&self) -> &Field {
        match self {
            Self::Base { field }
            | Self::Owned { field, .. }
            | Self::Shared { field, .. }
            | Self::Plain { field } => field,
        }
    }
}

pub(crate) fn classify(field: &Field) -> syn::Result<FieldPlan<'_>> {
    let is_base = field.attrs.iter().any(|attr| attr.path().is_ident("base"));
    let dependency_attr = field.attrs.iter().find(|attr| attr.path().is_ident("dependency"));

    match (is_base, dependency_attr) {
        (true, Some(_)) => Err(syn::Error::new_spanned(
            field,
            "a field cannot be both `#[base]` and `#[dependency]`",
        )),
        (true, None) => Ok(FieldPlan::Base { field }),
        (false, Some(attr)) => {
            let shared = attr_marks_shared(attr)?;
            if shared {
                let inner = innermost_of_rc_refcell(&field.ty).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &field.ty,
                        "`#[dependency(shared)]` fields must be typed `Dep<Rc<RefCell<T>>>`",
                    )
                })?;
                Ok(FieldPlan::Shared { field, inner })
            } else {
                let inner = generic_arg_of(&field.ty, "Dep").ok_or_else(|| {
                    syn::Error::new_spanned(&field.ty, "`#[dependency]` fields must be typed `Dep<T>`")
                })?;
                Ok(FieldPlan::Owned { field, inner })
            }
        }
        (false, None) => Ok(FieldPlan::Plain { field }),
    }
}

fn attr_marks_shared(attr: &syn::Attribute) -> syn::Result<bool> {
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(false);
    }
    let mut shared = false;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("shared") {
            shared = true;
            Ok(())
        } else {
            Err(meta.error("unrecognized `#[dependency(..)]` argument, expected `shared`"))
        }
    })?;
    Ok(shared)
}

/// Returns `T` from a type written as `Outer<T>`, for a one-segment
/// `Outer` matching `expected_ident`.
fn generic_arg_of(ty: &Type, expected_ident: &str) -> Option<Type> {
    let Type::Path(type_path) = ty else { return None };
    let segment = type_path.path.segments.last()?;
    if segment.ident != expected_ident {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty.clone()),
        _ => None,
    })
}

/// Peels `Dep<Rc<RefCell<T>>>` down to `T`.
fn innermost_of_rc_refcell(ty: &Type) -> Option<Type> {
    let dep_inner = generic_arg_of(ty, "Dep")?;
    let rc_inner = generic_arg_of(&dep_inner, "Rc")?;
    generic_arg_of(&rc_inner, "RefCell")
}
