use crate::decode_column::{ColumnMetadata, decode_column};
use convert_case::{Case, Casing};
use syn::{Fields, ItemStruct, LitStr};

pub(crate) struct EntityMetadata {
    pub(crate) item: ItemStruct,
    pub(crate) entity_name: String,
    pub(crate) table_name: String,
    pub(crate) columns: Vec<ColumnMetadata>,
}

fn string_attribute(item: &ItemStruct, name: &str) -> Option<String> {
    item.attrs.iter().find_map(|attr| {
        if !attr.meta.path().is_ident(name) {
            return None;
        }
        let Ok(v) = attr.parse_args::<LitStr>() else {
            panic!("Error while parsing `{name}`, use it like: `#[{name}(\"value\")]`");
        };
        Some(v.value())
    })
}

pub(crate) fn decode_entity(item: ItemStruct) -> EntityMetadata {
    let Fields::Named(fields) = &item.fields else {
        panic!("Entity `{}` must be a struct with named fields", item.ident);
    };
    let columns: Vec<_> = fields.named.iter().map(decode_column).collect();
    if columns.is_empty() {
        panic!("Entity `{}` must have at least one field", item.ident);
    }
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].iter().any(|c| c.name == column.name) {
            panic!(
                "Entity `{}` maps column `{}` twice",
                item.ident, column.name
            );
        }
    }
    match columns.iter().filter(|c| c.primary_key).count() {
        1 => {}
        0 => panic!(
            "Entity `{}` must mark exactly one field with `#[primary_key]`",
            item.ident
        ),
        _ => panic!(
            "Entity `{}` declares more than one `#[primary_key]`, composite keys are not supported",
            item.ident
        ),
    }
    let entity_name = string_attribute(&item, "entity_name").unwrap_or(item.ident.to_string());
    let table_name = string_attribute(&item, "table_name").unwrap_or_else(|| {
        let mut name = item.ident.to_string().to_case(Case::Snake);
        if name.starts_with('_') {
            name.remove(0);
        }
        name
    });
    EntityMetadata {
        item,
        entity_name,
        table_name,
        columns,
    }
}
