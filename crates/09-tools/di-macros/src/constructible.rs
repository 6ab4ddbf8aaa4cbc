//! `#[derive(Constructible)]` 实现

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Attribute, Data, DeriveInput, Error, Ident, LitStr, Result, Type};

/// 实例的创建方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Creation {
    /// `Default::default()`
    Default,
    /// `Self::new()`
    New,
    /// `Self::<fn>(scope)`，返回 `DependencyResult<Self>`
    WithScope(Ident),
}

/// `#[constructible(...)]` 参数
pub struct ConstructibleArgs {
    pub creation: Creation,
    pub inject: bool,
    pub provides: Vec<Type>,
}

impl Default for ConstructibleArgs {
    fn default() -> Self {
        Self {
            creation: Creation::Default,
            inject: false,
            provides: Vec::new(),
        }
    }
}

/// 解析结构体上的全部 `#[constructible(...)]`
pub fn parse_constructible_attrs(attrs: &[Attribute]) -> Result<ConstructibleArgs> {
    let mut args = ConstructibleArgs::default();
    let mut creation_set = false;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("constructible")) {
        attr.parse_nested_meta(|meta| {
            let creation = if meta.path.is_ident("default") {
                Some(Creation::Default)
            } else if meta.path.is_ident("new") {
                Some(Creation::New)
            } else if meta.path.is_ident("with_scope") {
                let function = meta.value()?.parse::<LitStr>()?.parse::<Ident>()?;
                Some(Creation::WithScope(function))
            } else if meta.path.is_ident("inject") {
                args.inject = true;
                None
            } else if meta.path.is_ident("provides") {
                args.provides
                    .push(meta.value()?.parse::<LitStr>()?.parse::<Type>()?);
                None
            } else {
                return Err(meta.error(
                    "unsupported constructible argument, expected `default`, `new`, `with_scope`, `inject` or `provides`",
                ));
            };

            if let Some(creation) = creation {
                if creation_set {
                    return Err(meta.error("constructor already specified"));
                }
                creation_set = true;
                args.creation = creation;
            }
            Ok(())
        })?;
    }

    Ok(args)
}

/// 展开 `#[derive(Constructible)]`
pub fn expand_constructible(input: &DeriveInput) -> Result<TokenStream> {
    if !matches!(input.data, Data::Struct(_)) {
        return Err(Error::new(
            input.span(),
            "Constructible can only be derived for structs",
        ));
    }

    let struct_name = &input.ident;
    let args = parse_constructible_attrs(&input.attrs)?;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let create = match &args.creation {
        Creation::Default => quote! { <Self as ::core::default::Default>::default() },
        Creation::New => quote! { Self::new() },
        Creation::WithScope(function) => quote! { Self::#function(scope)? },
    };

    let body = if args.inject {
        quote! {
            let mut instance = #create;
            scope.resolve_dependencies(&mut instance)?;
            ::core::result::Result::Ok(instance)
        }
    } else {
        quote! { ::core::result::Result::Ok(#create) }
    };

    let provides = args.provides.iter().map(|service| {
        quote! {
            impl #impl_generics ::arbor_di_impl::Provides<#service> for #struct_name #ty_generics #where_clause {
                fn provide(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<#service> {
                    self
                }
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::arbor_di_impl::Constructible for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn construct(
                scope: &::arbor_di_impl::Scope,
            ) -> ::arbor_di_impl::DependencyResult<Self> {
                #body
            }
        }

        #(#provides)*
    })
}
