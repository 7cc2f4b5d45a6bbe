use crate::{column_matches, decode_entity::EntityMetadata};
use proc_macro2::TokenStream;
use quote::quote;

pub(crate) fn record_trait(entity: &EntityMetadata) -> TokenStream {
    let struct_name = &entity.item.ident;
    let lookups = entity.columns.iter().map(|c| {
        let ident = &c.ident;
        let matches = column_matches(c, quote!(__name__));
        quote! {
            if #matches {
                return Some(::takeo::AsValue::as_value(::std::clone::Clone::clone(&self.#ident)));
            }
        }
    });
    quote! {
        impl ::takeo::Record for #struct_name {
            fn kind(&self) -> ::takeo::RecordKind {
                ::takeo::RecordKind::Structured
            }

            fn value_of(&self, column: &::takeo::ColumnDef) -> ::std::option::Option<::takeo::Value> {
                let __name__ = column.name();
                #(#lookups)*
                None
            }
        }
    }
}
