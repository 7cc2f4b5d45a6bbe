mod decode_column;
mod decode_entity;
mod encode_column_def;
mod from_row_trait;
mod record_trait;

use decode_column::ColumnMetadata;
use decode_entity::decode_entity;
use encode_column_def::encode_column_def;
use from_row_trait::from_row_trait;
use proc_macro::TokenStream;
use quote::quote;
use record_trait::record_trait;
use syn::{ItemStruct, parse_macro_input};

/// Expression testing whether the column name held by `name` designates `column`.
///
/// A `#[column_name(..)]` override matches exactly, a name derived from the
/// field matches case insensitively.
pub(crate) fn column_matches(
    column: &ColumnMetadata,
    name: proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    let column_name = &column.name;
    if column.renamed {
        quote!(#name == #column_name)
    } else {
        quote!(#name.eq_ignore_ascii_case(#column_name))
    }
}

#[proc_macro_derive(
    Entity,
    attributes(
        entity_name,
        table_name,
        column_name,
        column_type,
        default_value,
        primary_key,
        auto_increment,
    )
)]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    let entity = decode_entity(item);
    let name = &entity.item.ident;
    let entity_name = &entity.entity_name;
    let table_name = &entity.table_name;
    let record = record_trait(&entity);
    let from_row = from_row_trait(&entity);
    let column_defs = entity.columns.iter().map(encode_column_def);
    quote! {
        #record
        #from_row
        impl ::takeo::Entity for #name {
            fn entity_name() -> &'static str {
                #entity_name
            }

            fn entity_metadata() -> ::takeo::Result<::takeo::EntityMetadata> {
                ::takeo::EntityMetadata::new(#table_name, [#(#column_defs),*])
            }
        }
    }
    .into()
}
