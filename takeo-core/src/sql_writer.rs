use crate::{ColumnDef, EntityMetadata, Value, separated_by};
use std::{collections::BTreeMap, fmt::Write, sync::Arc};

/// Equality predicates joined by `AND`, keyed by column name.
///
/// Keys are kept sorted: the statement text and the bound parameters both
/// walk this same order, so the generated SQL is stable across calls.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Conditions(BTreeMap<String, Value>);

impl Conditions {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + Clone {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Dialect printer turning entity metadata into SQL text.
///
/// All methods append to `out` and are pure: the same metadata always yields
/// the same text. Placeholders are numbered from 1 and contiguous.
pub trait SqlWriter {
    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push_str(value);
    }

    fn write_placeholder(&self, out: &mut String, index: usize) {
        let _ = write!(out, "${index}");
    }

    /// `SELECT <columns> FROM <table>`
    fn write_select(&self, out: &mut String, metadata: &EntityMetadata) {
        out.push_str("SELECT ");
        separated_by(
            out,
            metadata.columns(),
            |out, c| self.write_identifier(out, c.name()),
            ", ",
        );
        out.push_str(" FROM ");
        self.write_identifier(out, metadata.table_name());
    }

    /// `SELECT ... WHERE <primary_key> = $1`
    fn write_select_by_id(&self, out: &mut String, metadata: &EntityMetadata) {
        self.write_select(out, metadata);
        self.write_primary_key_filter(out, metadata, 1);
    }

    /// `SELECT ... WHERE a = $1 AND b = $2 ...`
    fn write_select_where(
        &self,
        out: &mut String,
        metadata: &EntityMetadata,
        conditions: &Conditions,
    ) {
        self.write_select(out, metadata);
        self.write_where(out, conditions);
    }

    /// `INSERT INTO <table> (<non auto increment columns>) VALUES ($1, ...)`
    fn write_insert(&self, out: &mut String, metadata: &EntityMetadata) {
        self.write_insert_columns(out, metadata, metadata.insert_columns());
    }

    /// `INSERT` restricted to `columns`, `DEFAULT VALUES` when there are none.
    fn write_insert_columns<'c>(
        &self,
        out: &mut String,
        metadata: &EntityMetadata,
        columns: impl IntoIterator<Item = &'c ColumnDef>,
    ) {
        out.push_str("INSERT INTO ");
        self.write_identifier(out, metadata.table_name());
        let mut count = 0;
        let mut names = String::new();
        separated_by(
            &mut names,
            columns,
            |out, c| {
                count += 1;
                self.write_identifier(out, c.name());
            },
            ", ",
        );
        if count == 0 {
            out.push_str(" DEFAULT VALUES");
            return;
        }
        out.push_str(" (");
        out.push_str(&names);
        out.push_str(") VALUES (");
        separated_by(out, 1..=count, |out, i| self.write_placeholder(out, i), ", ");
        out.push(')');
    }

    /// `INSERT ... RETURNING <primary_key>`
    fn write_insert_returning(&self, out: &mut String, metadata: &EntityMetadata) {
        self.write_insert(out, metadata);
        self.write_returning(out, metadata);
    }

    fn write_returning(&self, out: &mut String, metadata: &EntityMetadata) {
        out.push_str(" RETURNING ");
        self.write_identifier(out, metadata.primary_key());
    }

    /// `UPDATE <table> SET a = $1, ... WHERE <primary_key> = $n+1` over every settable column.
    fn write_update(&self, out: &mut String, metadata: &EntityMetadata) {
        self.write_update_columns(out, metadata, metadata.settable_columns());
    }

    /// `UPDATE` restricted to `columns`, the primary key placeholder comes last.
    fn write_update_columns<'c>(
        &self,
        out: &mut String,
        metadata: &EntityMetadata,
        columns: impl IntoIterator<Item = &'c ColumnDef>,
    ) {
        out.push_str("UPDATE ");
        self.write_identifier(out, metadata.table_name());
        out.push_str(" SET ");
        let mut index = 0;
        separated_by(
            out,
            columns,
            |out, c| {
                index += 1;
                self.write_identifier(out, c.name());
                out.push_str(" = ");
                self.write_placeholder(out, index);
            },
            ", ",
        );
        self.write_primary_key_filter(out, metadata, index + 1);
    }

    /// `DELETE FROM <table> WHERE <primary_key> = $1`
    fn write_delete(&self, out: &mut String, metadata: &EntityMetadata) {
        out.push_str("DELETE FROM ");
        self.write_identifier(out, metadata.table_name());
        self.write_primary_key_filter(out, metadata, 1);
    }

    fn write_delete_where(
        &self,
        out: &mut String,
        metadata: &EntityMetadata,
        conditions: &Conditions,
    ) {
        out.push_str("DELETE FROM ");
        self.write_identifier(out, metadata.table_name());
        self.write_where(out, conditions);
    }

    fn write_primary_key_filter(&self, out: &mut String, metadata: &EntityMetadata, index: usize) {
        out.push_str(" WHERE ");
        self.write_identifier(out, metadata.primary_key());
        out.push_str(" = ");
        self.write_placeholder(out, index);
    }

    /// ` WHERE ...`, a `NULL` condition is rendered as `IS NULL` and takes no placeholder.
    fn write_where(&self, out: &mut String, conditions: &Conditions) {
        if conditions.is_empty() {
            return;
        }
        out.push_str(" WHERE ");
        let mut index = 0;
        separated_by(
            out,
            conditions.iter(),
            |out, (column, value)| {
                self.write_identifier(out, column);
                if value.is_null() {
                    out.push_str(" IS NULL");
                } else {
                    index += 1;
                    out.push_str(" = ");
                    self.write_placeholder(out, index);
                }
            },
            " AND ",
        );
    }

    /// `CREATE TABLE IF NOT EXISTS <table> (<column> <declared type>, ...)`
    fn write_create_table(&self, out: &mut String, metadata: &EntityMetadata) {
        out.push_str("CREATE TABLE IF NOT EXISTS ");
        self.write_identifier(out, metadata.table_name());
        out.push_str(" (");
        separated_by(
            out,
            metadata.columns(),
            |out, c| {
                self.write_identifier(out, c.name());
                out.push(' ');
                out.push_str(&c.declared_type);
            },
            ", ",
        );
        out.push(')');
    }

    /// `DROP TABLE IF EXISTS <table> CASCADE`
    fn write_drop_table(&self, out: &mut String, metadata: &EntityMetadata) {
        out.push_str("DROP TABLE IF EXISTS ");
        self.write_identifier(out, metadata.table_name());
        out.push_str(" CASCADE");
    }
}

/// Writer emitting `$n` placeholders and bare identifiers.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter {}

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {}

/// The fixed statements of one entity, written once per metadata value.
#[derive(Debug)]
pub struct Statements {
    pub metadata: Arc<EntityMetadata>,
    pub select: String,
    pub select_by_id: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
    pub create_table: String,
    pub drop_table: String,
}

impl Statements {
    pub fn new(writer: &impl SqlWriter, metadata: Arc<EntityMetadata>) -> Self {
        let write = |f: &dyn Fn(&mut String)| {
            let mut out = String::with_capacity(128);
            f(&mut out);
            out
        };
        Self {
            select: write(&|out| writer.write_select(out, &metadata)),
            select_by_id: write(&|out| writer.write_select_by_id(out, &metadata)),
            insert: write(&|out| writer.write_insert_returning(out, &metadata)),
            update: write(&|out| writer.write_update(out, &metadata)),
            delete: write(&|out| writer.write_delete(out, &metadata)),
            create_table: write(&|out| writer.write_create_table(out, &metadata)),
            drop_table: write(&|out| writer.write_drop_table(out, &metadata)),
            metadata,
        }
    }
}
