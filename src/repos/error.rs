use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database uniqueness violation: {0}")]
    Constraint(String),

    #[error("database foreign key violation: {0}")]
    ForeignKey(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("database failure: {0}")]
    Database(DbErr),
}

impl From<DbErr> for RepoError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::Constraint(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::ForeignKey(msg),
            _ => {
                error!("SQL error: {}", err);
                RepoError::Database(err)
            }
        }
    }
}
