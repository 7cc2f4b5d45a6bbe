use crate::{
    Conditions, Connection, Driver, Entity, EntityMetadata, EntityRegistry, Error, Executor,
    FromRow, ManagerTransaction, Operation, OrmError, ParamLayout, PreparedCache, Query, Record,
    Result, RowLabeled, SqlWriter, Statements, Transaction, Value, WithPrimaryKey,
    condition_params, record_to_assignments, record_to_insert, record_to_params, row_to_record,
    stream::{StreamExt, TryStreamExt},
};
use anyhow::Context;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

/// CRUD, batch and transaction operations over registered entities.
///
/// The manager owns the connection, shares the [`EntityRegistry`] and keeps
/// two memos: the SQL text of each entity (rebuilt when the entity is
/// registered again) and the prepared statements, keyed by SQL text.
///
/// Batches run in one transaction, statement by statement in the order
/// given, with one prepared statement reused for every row. The first
/// failing row rolls the whole batch back.
///
/// While a transaction from [`Manager::begin_transaction`] (or a batch) is
/// open the connection belongs to it: other calls wait for it to finish.
pub struct Manager<C: Connection> {
    connection: C,
    registry: Arc<EntityRegistry>,
    statements: RwLock<HashMap<String, Arc<Statements>>>,
    cache: PreparedCache<C::Driver>,
}

impl<C: Connection> Manager<C> {
    pub fn new(connection: C) -> Self {
        Self::with_registry(connection, Default::default())
    }

    pub fn with_registry(connection: C, registry: Arc<EntityRegistry>) -> Self {
        Self {
            connection,
            registry,
            statements: Default::default(),
            cache: PreparedCache::new(),
        }
    }

    pub async fn connect(config: &crate::ConnectionConfig) -> Result<Self> {
        Ok(Self::new(C::connect(config).await?))
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    pub fn prepared_cache(&self) -> &PreparedCache<C::Driver> {
        &self.cache
    }

    /// Register `name` from its table, `column → declared type` pairs, primary
    /// key and auto increment columns. Column order is the order of `columns`.
    pub fn register_entity<N, T, A>(
        &self,
        name: &str,
        table_name: &str,
        columns: impl IntoIterator<Item = (N, T)>,
        primary_key: &str,
        auto_increment: impl IntoIterator<Item = A>,
    ) -> Result<()>
    where
        N: Into<String>,
        T: Into<String>,
        A: AsRef<str>,
    {
        let metadata =
            EntityMetadata::from_declared(table_name, columns, primary_key, auto_increment)
                .with_context(|| format!("While registering entity `{name}`"))?;
        self.registry.register(name, metadata)
    }

    /// Register a derived entity under [`Entity::entity_name`].
    pub fn register<E: Entity>(&self) -> Result<()> {
        let metadata = E::entity_metadata()
            .with_context(|| format!("While registering entity `{}`", E::entity_name()))?;
        self.registry.register(E::entity_name(), metadata)
    }

    pub fn metadata(&self, entity: &str) -> Result<Arc<EntityMetadata>> {
        self.registry.lookup(entity)
    }

    pub(crate) fn statements(&self, entity: &str) -> Result<Arc<Statements>> {
        let metadata = self.registry.lookup(entity)?;
        if let Some(statements) = self.statements.read().get(entity)
            && Arc::ptr_eq(&statements.metadata, &metadata)
        {
            return Ok(statements.clone());
        }
        let statements = Arc::new(Statements::new(
            &self.connection.driver().sql_writer(),
            metadata,
        ));
        self.statements
            .write()
            .insert(entity.to_owned(), statements.clone());
        Ok(statements)
    }

    async fn prepared(&self, sql: &str) -> Result<Query<C::Driver>> {
        self.cache
            .get_or_prepare(&self.connection, sql)
            .await
            .map(Query::Prepared)
    }

    /// Insert one record and return its primary key.
    ///
    /// Columns a dynamic record leaves out are not part of the statement.
    pub async fn create(&self, entity: &str, record: &impl Record) -> Result<Value> {
        let statements = self.statements(entity)?;
        let (sql, params) =
            insert_statement(&self.connection.driver().sql_writer(), entity, &statements, record)?;
        let query = self.prepared(&sql).await?;
        let row = self.connection.fetch_one(query, params).await?;
        returned_key(entity, row)
    }

    /// Insert all `records` in one transaction, returning their keys in input order.
    pub async fn create_batch<R: Record>(&self, entity: &str, records: &[R]) -> Result<Vec<Value>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let statements = self.statements(entity)?;
        let transaction = self.connection.begin().await?;
        let result = insert_rows(&transaction, entity, &statements, records).await;
        conclude(transaction, entity, Operation::CreateBatch, result).await
    }

    pub async fn find_by_id<R: FromRow>(&self, entity: &str, id: impl Into<Value>) -> Result<R> {
        let id = id.into();
        let statements = self.statements(entity)?;
        let query = self.prepared(&statements.select_by_id).await?;
        match self.connection.fetch_one(query, vec![id.clone()]).await? {
            Some(row) => row_to_record(entity, row, &statements.metadata),
            None => Err(Error::new(OrmError::NotFound {
                entity: entity.to_owned(),
                key: id.to_string(),
            })),
        }
    }

    pub async fn find_all<R: FromRow>(&self, entity: &str) -> Result<Vec<R>> {
        let statements = self.statements(entity)?;
        let query = self.prepared(&statements.select).await?;
        self.fetch_records(entity, &statements.metadata, query, Vec::new())
            .await
    }

    /// Rows matching every condition. An empty condition set is refused.
    pub async fn find_where<R: FromRow>(
        &self,
        entity: &str,
        conditions: &Conditions,
    ) -> Result<Vec<R>> {
        let statements = self.statements(entity)?;
        let metadata = &statements.metadata;
        let params = self.checked_conditions(entity, metadata, conditions, Operation::FindWhere)?;
        let mut sql = String::with_capacity(128);
        self.connection
            .driver()
            .sql_writer()
            .write_select_where(&mut sql, metadata, conditions);
        let query = self.prepared(&sql).await?;
        self.fetch_records(entity, metadata, query, params).await
    }

    async fn fetch_records<R: FromRow>(
        &self,
        entity: &str,
        metadata: &EntityMetadata,
        query: Query<C::Driver>,
        params: Vec<Value>,
    ) -> Result<Vec<R>> {
        self.connection
            .fetch(query, params)
            .map(|row| row.and_then(|row: RowLabeled| row_to_record(entity, row, metadata)))
            .try_collect()
            .await
    }

    fn checked_conditions(
        &self,
        entity: &str,
        metadata: &EntityMetadata,
        conditions: &Conditions,
        operation: Operation,
    ) -> Result<Vec<Value>> {
        if conditions.is_empty() {
            return Err(Error::new(OrmError::EmptyConditionSet {
                entity: entity.to_owned(),
                operation,
            }));
        }
        condition_params(entity, metadata, conditions)
    }

    /// Assign the settable columns `fields` carries to the row `id`.
    ///
    /// Unknown columns, the primary key and auto increment columns are
    /// ignored; when nothing is left the call fails without touching the store.
    pub async fn update(
        &self,
        entity: &str,
        id: impl Into<Value>,
        fields: &impl Record,
    ) -> Result<()> {
        let id = id.into();
        let statements = self.statements(entity)?;
        let metadata = &statements.metadata;
        let assignments = record_to_assignments(fields, metadata);
        if assignments.is_empty() {
            return Err(Error::new(OrmError::NoUpdatableFields {
                entity: entity.to_owned(),
                operation: Operation::Update,
            }));
        }
        let mut sql = String::with_capacity(128);
        self.connection.driver().sql_writer().write_update_columns(
            &mut sql,
            metadata,
            assignments.iter().map(|(c, _)| *c),
        );
        let mut params: Vec<Value> = assignments.into_iter().map(|(_, v)| v).collect();
        params.push(id.clone());
        let query = self.prepared(&sql).await?;
        let affected = self.connection.execute(query, params).await?;
        if affected.rows_affected == 0 {
            log::warn!("Update of `{}` {} matched no row", entity, id);
        }
        Ok(())
    }

    /// Update every `(id, record)` pair in one transaction.
    ///
    /// Each record must provide all the settable columns. Every pair is mapped
    /// before the transaction starts, so a malformed one sends nothing.
    pub async fn update_batch<R: Record>(&self, entity: &str, updates: &[(Value, R)]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }
        let statements = self.statements(entity)?;
        let metadata = &statements.metadata;
        let rows = updates
            .iter()
            .enumerate()
            .map(|(i, (id, record))| {
                if record_to_assignments(record, metadata).is_empty() {
                    return Err(Error::new(OrmError::NoUpdatableFields {
                        entity: entity.to_owned(),
                        operation: Operation::UpdateBatch,
                    })
                    .context(format!("While mapping update {} of the batch", i)));
                }
                let record = WithPrimaryKey::new(id, record);
                record_to_params(entity, &record, metadata, ParamLayout::Update)
                    .map(|params| (id, params))
                    .with_context(|| format!("While mapping update {} of the batch", i))
            })
            .collect::<Result<Vec<_>>>()?;
        let transaction = self.connection.begin().await?;
        let result = update_rows(&transaction, entity, &statements, rows).await;
        conclude(transaction, entity, Operation::UpdateBatch, result).await
    }

    pub async fn delete(&self, entity: &str, id: impl Into<Value>) -> Result<()> {
        let id = id.into();
        let statements = self.statements(entity)?;
        let query = self.prepared(&statements.delete).await?;
        let affected = self.connection.execute(query, vec![id.clone()]).await?;
        if affected.rows_affected == 0 {
            log::warn!("Delete of `{}` {} matched no row", entity, id);
        }
        Ok(())
    }

    /// Delete every id in one transaction.
    pub async fn delete_batch<V: Into<Value>>(
        &self,
        entity: &str,
        ids: impl IntoIterator<Item = V>,
    ) -> Result<()> {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Ok(());
        }
        let statements = self.statements(entity)?;
        let transaction = self.connection.begin().await?;
        let result = delete_rows(&transaction, &statements, ids).await;
        conclude(transaction, entity, Operation::DeleteBatch, result).await
    }

    /// Delete the rows matching every condition, returning how many were removed.
    pub async fn delete_where(&self, entity: &str, conditions: &Conditions) -> Result<u64> {
        let statements = self.statements(entity)?;
        let metadata = &statements.metadata;
        let params =
            self.checked_conditions(entity, metadata, conditions, Operation::DeleteWhere)?;
        let mut sql = String::with_capacity(128);
        self.connection
            .driver()
            .sql_writer()
            .write_delete_where(&mut sql, metadata, conditions);
        let query = self.prepared(&sql).await?;
        Ok(self.connection.execute(query, params).await?.rows_affected)
    }

    pub async fn create_table(&self, entity: &str) -> Result<()> {
        let statements = self.statements(entity)?;
        self.connection
            .execute(Query::Raw(statements.create_table.clone()), Vec::new())
            .await
            .map(|_| ())
    }

    pub async fn drop_table(&self, entity: &str) -> Result<()> {
        let statements = self.statements(entity)?;
        self.connection
            .execute(Query::Raw(statements.drop_table.clone()), Vec::new())
            .await
            .map(|_| ())
    }

    pub async fn begin_transaction(&self) -> Result<ManagerTransaction<'_, C>> {
        let transaction = self.connection.begin().await?;
        Ok(ManagerTransaction::new(self, transaction))
    }

    pub async fn ping(&self) -> Result<()> {
        self.connection.ping().await
    }

    /// Close every prepared statement, then the connection.
    pub async fn close(self) -> Result<()> {
        let closed = self.cache.clear().await;
        log::debug!("Closed {} prepared statements", closed);
        self.connection.disconnect().await
    }
}

pub(crate) fn returned_key(entity: &str, row: Option<RowLabeled>) -> Result<Value> {
    row.and_then(|row| row.values.into_iter().next())
        .ok_or_else(|| {
            Error::msg(format!(
                "The insert into `{}` did not return the primary key",
                entity
            ))
        })
}

/// The `INSERT ... RETURNING` for the columns `record` provides, with its parameters.
///
/// A record providing every insertable column uses the memoized statement.
pub(crate) fn insert_statement(
    writer: &impl SqlWriter,
    entity: &str,
    statements: &Statements,
    record: &impl Record,
) -> Result<(String, Vec<Value>)> {
    let metadata = &statements.metadata;
    let values = record_to_insert(entity, record, metadata)?;
    let sql = if values.len() == metadata.insert_columns().count() {
        statements.insert.clone()
    } else {
        let mut sql = String::with_capacity(128);
        writer.write_insert_columns(&mut sql, metadata, values.iter().map(|(c, _)| *c));
        writer.write_returning(&mut sql, metadata);
        sql
    };
    Ok((sql, values.into_iter().map(|(_, v)| v).collect()))
}

/// Records of the same shape share one prepared statement.
async fn insert_rows<E: Executor, R: Record>(
    executor: &E,
    entity: &str,
    statements: &Statements,
    records: &[R],
) -> Result<Vec<Value>> {
    let mut prepared: HashMap<String, Query<E::Driver>> = HashMap::new();
    let mut ids = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let (sql, params) =
            insert_statement(&executor.driver().sql_writer(), entity, statements, record)
                .with_context(|| format!("While mapping record {} of the batch", i))?;
        let query = match prepared.get(&sql) {
            Some(query) => query.clone(),
            None => {
                let query = executor.prepare(sql.clone()).await?;
                prepared.insert(sql, query.clone());
                query
            }
        };
        let row = executor.fetch_one(query, params).await?;
        ids.push(returned_key(entity, row)?);
    }
    Ok(ids)
}

async fn update_rows<E: Executor>(
    executor: &E,
    entity: &str,
    statements: &Statements,
    rows: Vec<(&Value, Vec<Value>)>,
) -> Result<()> {
    let query = executor.prepare(statements.update.clone()).await?;
    for (id, params) in rows {
        let affected = executor.execute(query.clone(), params).await?;
        if affected.rows_affected == 0 {
            log::warn!("Update of `{}` {} matched no row", entity, id);
        }
    }
    Ok(())
}

async fn delete_rows<E: Executor>(
    executor: &E,
    statements: &Statements,
    ids: Vec<Value>,
) -> Result<()> {
    let query = executor.prepare(statements.delete.clone()).await?;
    for id in ids {
        executor.execute(query.clone(), vec![id]).await?;
    }
    Ok(())
}

/// Commit on success, roll back (and keep the original error) on failure.
async fn conclude<T: Transaction, V>(
    transaction: T,
    entity: &str,
    operation: Operation,
    result: Result<V>,
) -> Result<V> {
    match result {
        Ok(value) => {
            transaction
                .commit()
                .await
                .with_context(|| format!("While committing {} on `{}`", operation, entity))?;
            log::info!("Committed {} on `{}`", operation, entity);
            Ok(value)
        }
        Err(error) => {
            log::warn!(
                "{} on `{}` failed, rolling back: {:#}",
                operation,
                entity,
                error
            );
            if let Err(e) = transaction.rollback().await {
                log::error!("Could not roll back {} on `{}`: {:#}", operation, entity, e);
            }
            Err(error)
        }
    }
}
