use crate::{ColumnDef, Error, OrmError, Result};
use std::collections::{BTreeMap, HashSet};

/// Compiled description of one record shape.
///
/// Invariants, enforced by the constructors:
/// * `column_order` lists every key of `columns` exactly once;
/// * exactly one column is the primary key and its name is `primary_key`.
///
/// The value is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadata {
    table_name: String,
    primary_key: String,
    columns: BTreeMap<String, ColumnDef>,
    column_order: Vec<String>,
}

impl EntityMetadata {
    /// Build from column definitions, keeping their order.
    pub fn new(
        table_name: impl Into<String>,
        columns: impl IntoIterator<Item = ColumnDef>,
    ) -> Result<Self> {
        let table_name = table_name.into();
        let invalid = |reason: String| Error::new(OrmError::validation(&table_name, reason));
        if table_name.trim().is_empty() {
            return Err(invalid("the table name is empty".into()));
        }
        let mut by_name = BTreeMap::new();
        let mut column_order = Vec::new();
        let mut primary_keys = Vec::new();
        for column in columns {
            if column.name.trim().is_empty() {
                return Err(invalid("a column has an empty name".into()));
            }
            if by_name.contains_key(&column.name) {
                return Err(invalid(format!("column `{}` is declared twice", column.name)));
            }
            if column.is_primary_key {
                primary_keys.push(column.name.clone());
            }
            column_order.push(column.name.clone());
            by_name.insert(column.name.clone(), column);
        }
        if column_order.is_empty() {
            return Err(invalid("no columns were declared".into()));
        }
        let primary_key = match primary_keys.as_slice() {
            [pk] => pk.clone(),
            [] => return Err(invalid("no primary key column".into())),
            many => {
                return Err(invalid(format!(
                    "only one primary key column is supported, found {}",
                    many.join(", ")
                )));
            }
        };
        Ok(Self {
            table_name,
            primary_key,
            columns: by_name,
            column_order,
        })
    }

    /// Build from the registration shape: `name → declared type` pairs, the
    /// primary key name and the auto increment column names.
    ///
    /// Column order follows the iteration order of `columns`. A column is
    /// nullable unless it is the primary key or its type says `NOT NULL`.
    pub fn from_declared<N, T, A>(
        table_name: impl Into<String>,
        columns: impl IntoIterator<Item = (N, T)>,
        primary_key: &str,
        auto_increment: impl IntoIterator<Item = A>,
    ) -> Result<Self>
    where
        N: Into<String>,
        T: Into<String>,
        A: AsRef<str>,
    {
        let table_name = table_name.into();
        let columns: Vec<ColumnDef> = columns
            .into_iter()
            .map(|(name, declared_type)| {
                let mut column = ColumnDef::new(name, declared_type);
                column.is_primary_key = column.name == primary_key;
                column.is_nullable = !column.is_primary_key
                    && !column.declared_type.to_ascii_uppercase().contains("NOT NULL");
                column
            })
            .collect();
        if !columns.iter().any(|c| c.is_primary_key) {
            return Err(Error::new(OrmError::validation(
                &table_name,
                format!("primary key `{primary_key}` is not one of the columns"),
            )));
        }
        let mut auto: HashSet<String> = auto_increment
            .into_iter()
            .map(|v| v.as_ref().to_owned())
            .collect();
        let columns: Vec<ColumnDef> = columns
            .into_iter()
            .map(|mut column| {
                column.is_auto_increment = auto.remove(&column.name);
                column
            })
            .collect();
        if let Some(unknown) = auto.into_iter().next() {
            return Err(Error::new(OrmError::validation(
                &table_name,
                format!("auto increment column `{unknown}` is not one of the columns"),
            )));
        }
        Self::new(table_name, columns)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }
    pub fn primary_key_column(&self) -> &ColumnDef {
        &self.columns[&self.primary_key]
    }
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.get(name)
    }
    pub fn column_order(&self) -> &[String] {
        &self.column_order
    }
    /// Columns in column order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &ColumnDef> + Clone {
        self.column_order.iter().map(|name| &self.columns[name])
    }
    /// Columns of the `INSERT` value list, in column order.
    pub fn insert_columns(&self) -> impl Iterator<Item = &ColumnDef> + Clone {
        self.columns().filter(|c| !c.is_auto_increment)
    }
    /// Columns of the `UPDATE ... SET` list, in column order.
    pub fn settable_columns(&self) -> impl Iterator<Item = &ColumnDef> + Clone {
        self.columns().filter(|c| c.is_settable())
    }
}
