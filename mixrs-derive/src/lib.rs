//! Derive macros for MixRS.
//!
//! This crate provides the `#[derive(Host)]` macro for turning arbitrary
//! structs into composition targets for MixRS emitters.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

/// Derives the `Host` trait for a struct.
///
/// A host is any value an emitter can be composed onto. The only requirement
/// is a field of type `Slots`, which backs slot-scoped handler storage; the
/// macro locates that field by type and delegates to it.
///
/// # Examples
///
/// ```ignore
/// use mixrs::{Host, Slots};
///
/// #[derive(Host)]
/// struct Sensor {
///     id: String,
///     slots: Slots,
/// }
/// ```
///
/// Deriving fails with a compile error when the struct has no `Slots` field,
/// or when applied to an enum or union.
#[proc_macro_derive(Host)]
pub fn derive_host(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_host(&input) {
        Ok(expanded) => expanded.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand_host(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let field = slots_field(input)?;

    Ok(quote! {
        impl #impl_generics ::mixrs::Host for #name #ty_generics #where_clause {
            fn slots(&self) -> &::mixrs::Slots {
                &self.#field
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    })
}

/// Finds the named field backing slot storage.
///
/// The first field whose type path ends in `Slots` wins, so both `Slots` and
/// `mixrs::Slots` spellings are recognized.
fn slots_field(input: &DeriveInput) -> syn::Result<syn::Ident> {
    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Host can only be derived for structs",
            ))
        }
    };

    let fields = match &data.fields {
        Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Host can only be derived for structs with named fields",
            ))
        }
    };

    for field in &fields.named {
        if is_slots_type(&field.ty) {
            return Ok(field.ident.clone().expect("named field has an ident"));
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "deriving Host requires a field of type `Slots`",
    ))
}

fn is_slots_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Slots")
            .unwrap_or(false),
        _ => false,
    }
}
