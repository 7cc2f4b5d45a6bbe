use crate::decode_column::ColumnMetadata;
use proc_macro2::TokenStream;
use quote::quote;

pub(crate) fn encode_column_def(column: &ColumnMetadata) -> TokenStream {
    let name = &column.name;
    let ty = &column.ty;
    let primary_key = column.primary_key;
    let auto_increment = column.auto_increment;
    let nullable = column.nullable;
    let declared_type = match &column.column_type {
        Some(v) => quote!(#v.to_string()),
        None => {
            let suffix = match (column.primary_key, column.nullable) {
                (true, _) => " PRIMARY KEY",
                (false, false) => " NOT NULL",
                (false, true) => "",
            };
            quote! {
                format!(
                    "{}{}",
                    ::takeo::declared_type(
                        &<#ty as ::takeo::AsValue>::as_empty_value(),
                        #auto_increment,
                    ),
                    #suffix,
                )
            }
        }
    };
    let default = match &column.default {
        Some(v) => quote!(Some(::takeo::Value::from(#v))),
        None => quote!(None),
    };
    quote! {
        {
            let mut column = ::takeo::ColumnDef::new(#name, #declared_type);
            column.is_primary_key = #primary_key;
            column.is_auto_increment = #auto_increment;
            column.is_nullable = #nullable;
            column.default = #default;
            column
        }
    }
}
