//! `#[derive(Injectable)]` 实现

use crate::utils::{service_slot, FieldSlot};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    spanned::Spanned, Attribute, Data, DeriveInput, Error, Fields, Ident, LitBool, LitStr, Meta,
    Result, Type,
};

/// `#[dependency(...)]` 参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyArgs {
    pub optional: bool,
}

/// `#[injectable(property(...))]` 参数
pub struct PropertyArgs {
    pub name: String,
    pub ty: Type,
    pub getter: Option<Ident>,
    pub setter: Option<Ident>,
    pub optional: bool,
}

/// 解析 `#[dependency]`、`#[dependency(optional)]`、`#[dependency(optional = false)]`
/// 和 `#[dependency(required)]`
pub fn parse_dependency_attr(attr: &Attribute) -> Result<DependencyArgs> {
    let mut args = DependencyArgs::default();
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(args);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("optional") {
            args.optional = if meta.input.peek(syn::Token![=]) {
                meta.value()?.parse::<LitBool>()?.value
            } else {
                true
            };
            Ok(())
        } else if meta.path.is_ident("required") {
            args.optional = false;
            Ok(())
        } else {
            Err(meta.error("unsupported dependency argument, expected `optional` or `required`"))
        }
    })?;
    Ok(args)
}

/// 解析结构体上的 `#[injectable(property(...))]`
pub fn parse_property_attrs(attrs: &[Attribute]) -> Result<Vec<PropertyArgs>> {
    let mut properties = Vec::new();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("injectable")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("property") {
                return Err(meta.error("unsupported injectable argument, expected `property(...)`"));
            }

            let span = meta.path.span();
            let mut name = None;
            let mut ty = None;
            let mut getter = None;
            let mut setter = None;
            let mut optional = false;

            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("name") {
                    name = Some(inner.value()?.parse::<LitStr>()?.value());
                } else if inner.path.is_ident("ty") {
                    ty = Some(inner.value()?.parse::<LitStr>()?.parse::<Type>()?);
                } else if inner.path.is_ident("getter") {
                    getter = Some(inner.value()?.parse::<LitStr>()?.parse::<Ident>()?);
                } else if inner.path.is_ident("setter") {
                    setter = Some(inner.value()?.parse::<LitStr>()?.parse::<Ident>()?);
                } else if inner.path.is_ident("optional") {
                    optional = true;
                } else if inner.path.is_ident("required") {
                    optional = false;
                } else {
                    return Err(inner.error("unsupported property argument"));
                }
                Ok(())
            })?;

            let name = name.ok_or_else(|| Error::new(span, "property requires `name = \"...\"`"))?;
            let ty = ty.ok_or_else(|| Error::new(span, "property requires `ty = \"...\"`"))?;
            properties.push(PropertyArgs {
                name,
                ty,
                getter,
                setter,
                optional,
            });
            Ok(())
        })?;
    }

    Ok(properties)
}

fn marker_call(optional: bool) -> TokenStream {
    if optional {
        quote! { .optional() }
    } else {
        quote! { .required() }
    }
}

/// 展开 `#[derive(Injectable)]`
pub fn expand_injectable(input: &DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    input.span(),
                    "Injectable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Injectable can only be derived for structs",
            ))
        }
    };

    let mut field_members = Vec::new();
    for field in fields {
        let Some(attr) = field.attrs.iter().find(|attr| attr.path().is_ident("dependency")) else {
            continue;
        };
        let args = parse_dependency_attr(attr)?;
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected a named field"))?;
        let (slot, service) = service_slot(&field.ty).ok_or_else(|| {
            Error::new(
                field.ty.span(),
                "dependency fields must be `Arc<T>` or `Option<Arc<T>>`",
            )
        })?;

        let name = ident.to_string();
        let value = match slot {
            FieldSlot::Direct => quote! { value },
            FieldSlot::Optional => quote! { ::core::option::Option::Some(value) },
        };
        let marker = marker_call(args.optional);
        field_members.push(quote! {
            ::arbor_di_abstractions::MemberDescriptor::field::<#service, _>(
                #name,
                |target: &mut Self, value| {
                    target.#ident = #value;
                },
            )
            #marker
        });
    }

    let mut property_members = Vec::new();
    let mut getter_checks = Vec::new();
    for property in parse_property_attrs(&input.attrs)? {
        let name = &property.name;
        let ty = &property.ty;
        let marker = marker_call(property.optional);

        if let Some(getter) = &property.getter {
            getter_checks.push(quote! { let _ = Self::#getter; });
        }

        let descriptor = match (&property.getter, &property.setter) {
            (Some(_), Some(setter)) => quote! {
                ::arbor_di_abstractions::MemberDescriptor::property::<#ty, _>(
                    #name,
                    |target: &mut Self, value| target.#setter(value),
                )
            },
            (None, Some(setter)) => quote! {
                ::arbor_di_abstractions::MemberDescriptor::write_only_property::<#ty, _>(
                    #name,
                    |target: &mut Self, value| target.#setter(value),
                )
            },
            (_, None) => quote! {
                ::arbor_di_abstractions::MemberDescriptor::read_only_property::<#ty>(#name)
            },
        };
        property_members.push(quote! { #descriptor #marker });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::arbor_di_abstractions::Injectable for #struct_name #ty_generics #where_clause {
            fn describe_members() -> ::std::vec::Vec<::arbor_di_abstractions::MemberDescriptor<Self>> {
                #(#getter_checks)*
                let mut members = ::std::vec::Vec::new();
                #( members.push(#field_members); )*
                #( members.push(#property_members); )*
                members
            }
        }
    })
}
