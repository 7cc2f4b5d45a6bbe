use crate::{
    AsValue, ColumnDef, Conditions, EntityMetadata, Error, OrmError, Result, RowLabeled, Value,
};
use std::collections::{BTreeMap, btree_map};

/// How a record is shaped in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A struct with a generated field accessor table.
    Structured,
    /// An untyped `column → value` map.
    Dynamic,
}

/// Source of column values for `INSERT` and `UPDATE`.
pub trait Record: Send + Sync {
    fn kind(&self) -> RecordKind;
    /// The value for `column`, `None` when the record does not carry it.
    fn value_of(&self, column: &ColumnDef) -> Option<Value>;
}

/// Target of a fetched row.
pub trait FromRow: Sized {
    /// Build from `(column, value)` pairs in column order.
    fn from_columns(entity: &str, columns: Vec<(String, Value)>) -> Result<Self>;
}

/// Untyped record: an ordered map from column name to value.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct DynamicRecord(BTreeMap<String, Value>);

impl DynamicRecord {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(column.into(), value.into())
    }
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.0.remove(column)
    }
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
    /// Take the value of `column` converted into `T`.
    pub fn get_as<T: AsValue>(&self, column: &str) -> Result<T> {
        let value = self
            .0
            .get(column)
            .cloned()
            .ok_or_else(|| Error::msg(format!("The record has no column `{column}`")))?;
        T::try_from_value(value)
            .map_err(|e| e.context(format!("While reading column `{column}` of the record")))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DynamicRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for DynamicRecord {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Record for DynamicRecord {
    fn kind(&self) -> RecordKind {
        RecordKind::Dynamic
    }
    fn value_of(&self, column: &ColumnDef) -> Option<Value> {
        self.0.get(column.name()).cloned()
    }
}

impl FromRow for DynamicRecord {
    fn from_columns(_entity: &str, columns: Vec<(String, Value)>) -> Result<Self> {
        Ok(columns.into_iter().collect())
    }
}

impl<R: Record> Record for &R {
    fn kind(&self) -> RecordKind {
        (**self).kind()
    }
    fn value_of(&self, column: &ColumnDef) -> Option<Value> {
        (**self).value_of(column)
    }
}

/// A record whose primary key column reads `key`, whatever the inner record holds.
pub struct WithPrimaryKey<'a, R> {
    key: &'a Value,
    record: &'a R,
}

impl<'a, R: Record> WithPrimaryKey<'a, R> {
    pub fn new(key: &'a Value, record: &'a R) -> Self {
        Self { key, record }
    }
}

impl<R: Record> Record for WithPrimaryKey<'_, R> {
    fn kind(&self) -> RecordKind {
        self.record.kind()
    }
    fn value_of(&self, column: &ColumnDef) -> Option<Value> {
        if column.is_primary_key {
            Some(self.key.clone())
        } else {
            self.record.value_of(column)
        }
    }
}

/// Build a [`DynamicRecord`] from `column => value` pairs.
#[macro_export]
macro_rules! record {
    ($($column:expr => $value:expr),* $(,)?) => {
        $crate::DynamicRecord::new()$(.with($column, $value))*
    };
}

/// Parameter vector shape, paired with the statement it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLayout {
    /// The columns [`record_to_insert`] keeps, matching `write_insert_columns`.
    Insert,
    /// Settable columns then the primary key, matching `write_update`.
    Update,
}

/// Flatten `record` into the positional parameters of the `layout` statement.
///
/// For [`ParamLayout::Insert`] a dynamic record may leave columns out and the
/// vector is shorter, see [`record_to_insert`]. For [`ParamLayout::Update`]
/// every column must be present: a missing value is a [`OrmError::Mapping`],
/// nothing is ever bound in its place.
pub fn record_to_params(
    entity: &str,
    record: &impl Record,
    metadata: &EntityMetadata,
    layout: ParamLayout,
) -> Result<Vec<Value>> {
    match layout {
        ParamLayout::Insert => Ok(record_to_insert(entity, record, metadata)?
            .into_iter()
            .map(|(_, v)| v)
            .collect()),
        ParamLayout::Update => metadata
            .settable_columns()
            .chain([metadata.primary_key_column()])
            .map(|column| {
                record.value_of(column).ok_or_else(|| {
                    Error::new(OrmError::mapping(
                        entity,
                        column.name(),
                        "the record has no value for this column",
                    ))
                })
            })
            .collect(),
    }
}

/// Insertable columns `record` provides, with their values, in column order.
///
/// A dynamic record missing a column binds the column default when there is
/// one, otherwise the column is left out of the statement so the store
/// assigns it. Leaving out a `NOT NULL` column without any default is a
/// [`OrmError::Mapping`]. A structured record missing a column fails
/// immediately.
pub fn record_to_insert<'m>(
    entity: &str,
    record: &impl Record,
    metadata: &'m EntityMetadata,
) -> Result<Vec<(&'m ColumnDef, Value)>> {
    let mut values = Vec::new();
    for column in metadata.insert_columns() {
        let value = match (record.value_of(column), record.kind()) {
            (Some(v), ..) => v,
            (None, RecordKind::Structured) => {
                return Err(Error::new(OrmError::mapping(
                    entity,
                    column.name(),
                    "the record has no field for this column",
                )));
            }
            (None, RecordKind::Dynamic) => match &column.default {
                Some(default) => default.clone(),
                None if column.is_nullable || column.has_store_default() => continue,
                None => {
                    return Err(Error::new(OrmError::mapping(
                        entity,
                        column.name(),
                        "missing value for a NOT NULL column without a default",
                    )));
                }
            },
        };
        values.push((column, value));
    }
    Ok(values)
}

/// Settable columns `record` carries, with their values, in column order.
pub fn record_to_assignments<'m>(
    record: &impl Record,
    metadata: &'m EntityMetadata,
) -> Vec<(&'m ColumnDef, Value)> {
    metadata
        .settable_columns()
        .filter_map(|c| record.value_of(c).map(|v| (c, v)))
        .collect()
}

/// Parameters bound by a `WHERE` clause written from `conditions`.
///
/// Every condition must name a column of the entity.
pub fn condition_params(
    entity: &str,
    metadata: &EntityMetadata,
    conditions: &Conditions,
) -> Result<Vec<Value>> {
    conditions
        .iter()
        .filter_map(|(column, value)| {
            if metadata.column(column).is_none() {
                return Some(Err(Error::new(OrmError::mapping(
                    entity,
                    column,
                    format!("not a column of table `{}`", metadata.table_name()),
                ))));
            }
            (!value.is_null()).then(|| Ok(value.clone()))
        })
        .collect()
}

/// Zip `metadata`'s column order against the row values and build `R`.
pub fn row_to_record<R: FromRow>(
    entity: &str,
    row: RowLabeled,
    metadata: &EntityMetadata,
) -> Result<R> {
    let values = row.values;
    if values.len() != metadata.column_order().len() {
        return Err(Error::new(OrmError::mapping(
            entity,
            metadata.primary_key(),
            format!(
                "the row has {} values but the entity has {} columns",
                values.len(),
                metadata.column_order().len()
            ),
        )));
    }
    let columns = metadata
        .column_order()
        .iter()
        .cloned()
        .zip(values)
        .collect();
    R::from_columns(entity, columns)
}

/// Assign `value` to a structured field of type `T`, used by derived entities.
pub fn assign_field<T: AsValue>(entity: &str, column: &str, value: Value) -> Result<T> {
    T::try_from_value(value).map_err(|e| Error::new(OrmError::mapping(entity, column, e)))
}

/// Error for a structured field with no column in the fetched row.
pub fn missing_field(entity: &str, column: &str) -> Error {
    Error::new(OrmError::mapping(
        entity,
        column,
        "the row does not contain this column",
    ))
}
