use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Storage-level failures, with constraint violations lifted out of the
/// driver error so callers can map them to HTTP semantics.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    /// Value clashes with a unique constraint. Carries the offending field.
    #[error("unique constraint violated on {0}")]
    UniqueViolation(String),

    /// Insert/update points at a row that does not exist.
    #[error("referenced record does not exist: {0}")]
    MissingReference(String),

    /// Delete blocked because other rows still point at this one.
    #[error("record is still referenced by {0}")]
    ReferencedBy(String),

    #[error("database error: {0}")]
    Database(DbErr),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Unique index that guards one signature per (document, signer, value).
pub const SIGNATURE_UNIQUE_INDEX: &str = "uq_digital_signatures_document_signer_value";

/// Field key used for constraints spanning several columns.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const TABLES: [&str; 6] = [
    "digital_signatures",
    "user_profiles",
    "transactions",
    "properties",
    "documents",
    "users",
];

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                RepositoryError::UniqueViolation(unique_field(&msg))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                if msg.contains("update or delete on table") {
                    RepositoryError::ReferencedBy(referencing_table(&msg))
                } else {
                    RepositoryError::MissingReference(constraint_name(&msg).unwrap_or(msg))
                }
            }
            _ => match err {
                DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepositoryError::NotFound,
                other => RepositoryError::Database(other),
            },
        }
    }
}

fn constraint_name(msg: &str) -> Option<String> {
    let start = msg.find("constraint \"")? + "constraint \"".len();
    let end = msg[start..].find('"')? + start;
    Some(msg[start..end].to_string())
}

/// Maps a Postgres unique constraint (`<table>_<column>_key`) back to the
/// column name.
pub fn unique_field(msg: &str) -> String {
    let Some(name) = constraint_name(msg) else {
        return NON_FIELD_ERRORS.to_string();
    };
    if name == SIGNATURE_UNIQUE_INDEX {
        return NON_FIELD_ERRORS.to_string();
    }

    let column = name.strip_suffix("_key").unwrap_or(&name);
    TABLES
        .iter()
        .find_map(|t| column.strip_prefix(&format!("{}_", t)).map(str::to_string))
        .unwrap_or_else(|| column.to_string())
}

fn referencing_table(msg: &str) -> String {
    // `... violates foreign key constraint "fk" on table "transactions"`
    msg.rsplit("on table \"")
        .next()
        .and_then(|rest| rest.split('"').next())
        .filter(|t| !t.is_empty())
        .unwrap_or("other records")
        .to_string()
}
