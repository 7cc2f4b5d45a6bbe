use crate::{column_matches, decode_entity::EntityMetadata};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

pub(crate) fn from_row_trait(entity: &EntityMetadata) -> TokenStream {
    let struct_name = &entity.item.ident;
    let holders: Vec<_> = entity
        .columns
        .iter()
        .map(|c| format_ident!("__{}__", c.ident))
        .collect();
    let holder_declarations = entity.columns.iter().zip(&holders).map(|(c, holder)| {
        let ty = &c.ty;
        quote!(let mut #holder: ::std::option::Option<#ty> = None;)
    });
    let assignments = entity.columns.iter().zip(&holders).map(|(c, holder)| {
        let ty = &c.ty;
        let matches = column_matches(c, quote!(__column__));
        quote! {
            if #matches {
                #holder = Some(::takeo::assign_field::<#ty>(entity, &__column__, __value__)?);
                continue;
            }
        }
    });
    let create_result = entity.columns.iter().zip(&holders).map(|(c, holder)| {
        let ident = &c.ident;
        let name = &c.name;
        quote! {
            #ident: match #holder {
                Some(v) => v,
                None => return Err(::takeo::missing_field(entity, #name)),
            }
        }
    });
    quote! {
        impl ::takeo::FromRow for #struct_name {
            fn from_columns(
                entity: &str,
                columns: ::std::vec::Vec<(::std::string::String, ::takeo::Value)>,
            ) -> ::takeo::Result<Self> {
                #(#holder_declarations)*
                for (__column__, __value__) in columns {
                    #(#assignments)*
                }
                Ok(#struct_name {
                    #(#create_result,)*
                })
            }
        }
    }
}
