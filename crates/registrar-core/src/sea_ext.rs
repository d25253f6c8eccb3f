use sea_orm::{DbErr, SqlErr};

/// Constraint-violation classification on top of `DbErr::sql_err`.
pub trait DbErrExt {
    /// A unique index rejected the write.
    fn is_unique_violation(&self) -> bool;

    /// A foreign key rejected the write.
    fn is_foreign_key_violation(&self) -> bool;
}

impl DbErrExt for DbErr {
    fn is_unique_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }

    fn is_foreign_key_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
    }
}
