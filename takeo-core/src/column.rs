use crate::Value;

/// Declarative description of one table column.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name as it appears in generated SQL.
    pub name: String,
    /// SQL type, passed verbatim to `CREATE TABLE`.
    pub declared_type: String,
    pub is_primary_key: bool,
    /// Assigned by the store, never part of `INSERT` or `UPDATE` value lists.
    pub is_auto_increment: bool,
    pub is_nullable: bool,
    /// Bound on insert in place of a value missing from a dynamic record.
    pub default: Option<Value>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            ..Default::default()
        }
    }
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }
    pub fn auto_increment(mut self) -> Self {
        self.is_auto_increment = true;
        self
    }
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Whether the declared type carries a `DEFAULT` clause.
    pub fn has_store_default(&self) -> bool {
        self.declared_type.to_ascii_uppercase().contains("DEFAULT")
    }
    /// Whether an `UPDATE ... SET` may assign this column.
    pub fn is_settable(&self) -> bool {
        !self.is_primary_key && !self.is_auto_increment
    }
}
