//! Derive macro for raw SQL finder models.
//!
//! This crate provides `#[derive(Model)]`, which implements
//! `oxide_finder_core::Model` from a struct definition.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Meta};

/// Derives `oxide_finder_core::Model` for a struct with named fields.
///
/// # Attributes
///
/// - `#[model(table = "users")]` - The SQL table name (optional, defaults to
///   the snake_case struct name)
///
/// # Field Attributes
///
/// - `#[property(key)]` - Marks the property as part of the model key
/// - `#[property(field = "column")]` - Stores the property in a differently
///   named column
/// - `#[property(computed)]` - Not a column; a value produced by raw SQL,
///   resolved by table aliases as a bare quoted identifier
///
/// # Example
///
/// ```ignore
/// #[derive(Model)]
/// #[model(table = "users")]
/// struct User {
///     #[property(key)]
///     id: i64,
///     username: String,
///     #[property(computed)]
///     post_count: i64,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model, property))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_model_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_model_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let storage_name = storage_name(&input.attrs, struct_name)?;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Model derive only supports structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "Model derive only supports structs with named fields",
        ));
    };

    let mut properties: Vec<TokenStream2> = Vec::new();
    let mut computed: Vec<String> = Vec::new();
    for field in &fields.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = ident.to_string();
        let attrs = property_attrs(&field.attrs)?;

        if attrs.computed {
            if attrs.key || attrs.field.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "a computed property cannot be a key or have a column",
                ));
            }
            computed.push(name);
            continue;
        }

        let column = attrs.field.unwrap_or_else(|| name.clone());
        let key = attrs.key;
        properties.push(quote! {
            ::oxide_finder_core::schema::Property {
                name: #name,
                field: #column,
                key: #key,
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::oxide_finder_core::schema::Model
            for #struct_name #ty_generics #where_clause
        {
            const STORAGE_NAME: &'static str = #storage_name;
            const PROPERTIES: &'static [::oxide_finder_core::schema::Property] = &[
                #(#properties),*
            ];
            const COMPUTED: &'static [&'static str] = &[#(#computed),*];
        }
    })
}

#[derive(Default)]
struct PropertyAttrs {
    key: bool,
    computed: bool,
    field: Option<String>,
}

fn string_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn storage_name(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<String> {
    let mut table = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                table = Some(string_value(&meta)?);
                Ok(())
            } else {
                Err(meta.error("unsupported model attribute"))
            }
        })?;
    }
    Ok(table.unwrap_or_else(|| to_snake_case(&struct_name.to_string())))
}

fn property_attrs(attrs: &[Attribute]) -> syn::Result<PropertyAttrs> {
    let mut result = PropertyAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("property")) {
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                result.key = true;
            } else if meta.path.is_ident("computed") {
                result.computed = true;
            } else if meta.path.is_ident("field") {
                result.field = Some(string_value(&meta)?);
            } else {
                return Err(meta.error("unsupported property attribute"));
            }
            Ok(())
        })?;
    }
    Ok(result)
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
