use std::fmt::{self, Display};
use thiserror::Error;

/// The operation a failure was raised from, carried by errors and debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Create,
    CreateBatch,
    FindById,
    FindAll,
    FindWhere,
    Update,
    UpdateBatch,
    Delete,
    DeleteBatch,
    DeleteWhere,
    CreateTable,
    DropTable,
    Transaction,
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Register => "register",
            Operation::Create => "create",
            Operation::CreateBatch => "create_batch",
            Operation::FindById => "find_by_id",
            Operation::FindAll => "find_all",
            Operation::FindWhere => "find_where",
            Operation::Update => "update",
            Operation::UpdateBatch => "update_batch",
            Operation::Delete => "delete",
            Operation::DeleteBatch => "delete_batch",
            Operation::DeleteWhere => "delete_where",
            Operation::CreateTable => "create_table",
            Operation::DropTable => "drop_table",
            Operation::Transaction => "transaction",
        })
    }
}

/// Failures raised by the mapping engine itself.
///
/// Store failures are not represented here: they travel as plain
/// [`anyhow::Error`] values with the query attached as context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrmError {
    #[error("invalid metadata for `{entity}`: {reason}")]
    Validation { entity: String, reason: String },

    #[error("entity `{entity}` is not registered")]
    UnknownEntity { entity: String },

    #[error("no `{entity}` row with primary key {key}")]
    NotFound { entity: String, key: String },

    #[error("{operation} on `{entity}`: no updatable fields were supplied")]
    NoUpdatableFields { entity: String, operation: Operation },

    #[error("{operation} on `{entity}`: the condition set is empty")]
    EmptyConditionSet { entity: String, operation: Operation },

    #[error("the transaction is already {state}")]
    TransactionFinished { state: TransactionState },

    #[error("mapping `{entity}`, column `{column}`: {reason}")]
    Mapping {
        entity: String,
        column: String,
        reason: String,
    },
}

impl OrmError {
    pub fn validation(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        OrmError::Validation {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
    pub fn mapping(
        entity: impl Into<String>,
        column: impl Into<String>,
        reason: impl Display,
    ) -> Self {
        OrmError::Mapping {
            entity: entity.into(),
            column: column.into(),
            reason: reason.to_string(),
        }
    }
}

/// Lifecycle of a transaction handed out by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Open,
    Committed,
    RolledBack,
}

impl Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionState::Open => "open",
            TransactionState::Committed => "committed",
            TransactionState::RolledBack => "rolled back",
        })
    }
}

/// Coarse classification of any error returned by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    NoUpdatableFields,
    EmptyConditionSet,
    TransactionFinished,
    Mapping,
    /// Anything raised by the connection: connectivity, constraints, preparation.
    Store,
}

impl ErrorKind {
    pub fn of(error: &crate::Error) -> Self {
        match error.chain().find_map(|e| e.downcast_ref::<OrmError>()) {
            Some(OrmError::Validation { .. }) => ErrorKind::Validation,
            Some(OrmError::UnknownEntity { .. } | OrmError::NotFound { .. }) => ErrorKind::NotFound,
            Some(OrmError::NoUpdatableFields { .. }) => ErrorKind::NoUpdatableFields,
            Some(OrmError::EmptyConditionSet { .. }) => ErrorKind::EmptyConditionSet,
            Some(OrmError::TransactionFinished { .. }) => ErrorKind::TransactionFinished,
            Some(OrmError::Mapping { .. }) => ErrorKind::Mapping,
            None => ErrorKind::Store,
        }
    }
}
