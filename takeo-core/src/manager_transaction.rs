use crate::{
    Connection, Driver, Error, Executor, Manager, Operation, OrmError, Query, Record, Result,
    Transaction, TransactionState, Value,
    manager::{insert_statement, returned_key},
};
use std::collections::HashMap;

/// An explicit transaction opened by [`Manager::begin_transaction`].
///
/// Once committed or rolled back every further call fails with
/// [`OrmError::TransactionFinished`]. Dropping it while still open rolls it back.
pub struct ManagerTransaction<'m, C: Connection> {
    manager: &'m Manager<C>,
    transaction: Option<C::Transaction>,
    state: TransactionState,
    prepared: HashMap<String, Query<C::Driver>>,
}

impl<'m, C: Connection> ManagerTransaction<'m, C> {
    pub(crate) fn new(manager: &'m Manager<C>, transaction: C::Transaction) -> Self {
        Self {
            manager,
            transaction: Some(transaction),
            state: TransactionState::Open,
            prepared: HashMap::new(),
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == TransactionState::Open
    }

    fn open(&self) -> Result<&C::Transaction> {
        match &self.transaction {
            Some(transaction) if self.is_open() => Ok(transaction),
            _ => Err(Error::new(OrmError::TransactionFinished { state: self.state })),
        }
    }

    fn take(&mut self) -> Result<C::Transaction> {
        self.open()?;
        self.prepared.clear();
        self.transaction
            .take()
            .ok_or_else(|| Error::new(OrmError::TransactionFinished { state: self.state }))
    }

    /// Insert one record inside the transaction and return its primary key.
    pub async fn create(&mut self, entity: &str, record: &impl Record) -> Result<Value> {
        self.open()?;
        let statements = self.manager.statements(entity)?;
        let (sql, params) = insert_statement(
            &self.manager.connection().driver().sql_writer(),
            entity,
            &statements,
            record,
        )?;
        let query = match self.prepared.get(&sql) {
            Some(query) => query.clone(),
            None => {
                let query = self.open()?.prepare(sql.clone()).await?;
                self.prepared.insert(sql, query.clone());
                query
            }
        };
        let row = self.open()?.fetch_one(query, params).await?;
        returned_key(entity, row)
    }

    pub async fn commit(&mut self) -> Result<()> {
        let transaction = self.take()?;
        match transaction.commit().await {
            Ok(()) => {
                self.state = TransactionState::Committed;
                log::info!("Transaction committed");
                Ok(())
            }
            Err(e) => {
                self.state = TransactionState::RolledBack;
                Err(e.context(format!("While committing the {}", Operation::Transaction)))
            }
        }
    }

    pub async fn rollback(&mut self) -> Result<()> {
        let transaction = self.take()?;
        self.state = TransactionState::RolledBack;
        transaction.rollback().await?;
        log::info!("Transaction rolled back");
        Ok(())
    }
}

impl<C: Connection> Drop for ManagerTransaction<'_, C> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            log::warn!("A transaction was dropped while open, it will be rolled back");
        }
    }
}
