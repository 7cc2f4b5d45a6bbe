use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Expr, Field, Ident, LitStr, Meta, PathArguments, Type};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    /// Set by `#[column_name(..)]`, the name is then matched exactly.
    pub(crate) renamed: bool,
    pub(crate) column_type: Option<String>,
    pub(crate) nullable: bool,
    pub(crate) default: Option<TokenStream>,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.qself.is_none()
        && path.path.segments.last().is_some_and(|v| {
            v.ident == "Option" && matches!(v.arguments, PathArguments::AngleBracketed(..))
        })
}

fn require_flag(meta: &Meta, name: &str) {
    let Meta::Path(..) = meta else {
        panic!("Error while parsing `{name}`, use it like: `#[{name}]`");
    };
}

pub(crate) fn decode_column(field: &Field) -> ColumnMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Entity fields are expected to have a name");
    let mut name = ident.to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        renamed: false,
        column_type: None,
        nullable: is_option(&field.ty),
        default: None,
        primary_key: false,
        auto_increment: false,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("column_name") {
            let Ok(v) = attr.parse_args::<LitStr>() else {
                panic!("Error while parsing `column_name`, use it like: `#[column_name(\"my_column\")]`");
            };
            metadata.name = v.value();
            metadata.renamed = true;
        } else if meta.path().is_ident("column_type") {
            let Ok(v) = attr.parse_args::<LitStr>() else {
                panic!("Error while parsing `column_type`, use it like: `#[column_type(\"VARCHAR(64) UNIQUE\")]`");
            };
            metadata.column_type = Some(v.value());
        } else if meta.path().is_ident("default_value") {
            let Ok(v) = attr.parse_args::<Expr>() else {
                panic!("Error while parsing `default_value`, use it like: `#[default_value(some_expression)]`");
            };
            metadata.default = Some(v.to_token_stream());
        } else if meta.path().is_ident("primary_key") {
            require_flag(meta, "primary_key");
            metadata.primary_key = true;
            metadata.nullable = false;
        } else if meta.path().is_ident("auto_increment") {
            require_flag(meta, "auto_increment");
            metadata.auto_increment = true;
        }
    }
    if metadata.name.is_empty() {
        panic!("Field `{}` maps to an empty column name", metadata.ident);
    }
    metadata
}
