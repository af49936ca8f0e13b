//! Mapping sqlx failures onto store error kinds

use studentctl_core::StoreError;

/// SQLSTATE classes that mean "could not get a usable session":
/// 08 connection exception, 28 invalid authorization, 3D000 unknown database.
fn is_connection_state(code: &str) -> bool {
    code.starts_with("08") || code.starts_with("28") || code == "3D000"
}

enum Kind {
    Connection,
    Duplicate(i32),
    Query,
}

/// Classify a sqlx error. `id` is the key being written, when there is one.
pub(crate) fn classify(err: sqlx::Error, id: Option<i32>) -> StoreError {
    let kind = match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => match id {
            Some(id) => Kind::Duplicate(id),
            None => Kind::Query,
        },
        sqlx::Error::Database(db) => match db.code() {
            Some(code) if is_connection_state(&code) => Kind::Connection,
            _ => Kind::Query,
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => Kind::Connection,
        _ => Kind::Query,
    };

    match kind {
        Kind::Connection => StoreError::connection(err),
        Kind::Duplicate(id) => StoreError::Duplicate { id },
        Kind::Query => StoreError::query(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_errors_are_connection_failures() {
        let err = sqlx::Error::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert!(classify(err, None).is_connection());
    }

    #[test]
    fn pool_errors_are_connection_failures() {
        assert!(classify(sqlx::Error::PoolTimedOut, Some(1)).is_connection());
        assert!(classify(sqlx::Error::PoolClosed, None).is_connection());
    }

    #[test]
    fn other_errors_are_query_failures() {
        let err = classify(sqlx::Error::RowNotFound, Some(4));
        assert!(matches!(err, StoreError::Query { .. }));

        let err = classify(sqlx::Error::ColumnNotFound("age".into()), None);
        assert!(matches!(err, StoreError::Query { .. }));
    }

    #[test]
    fn connection_sqlstates() {
        assert!(is_connection_state("08006"));
        assert!(is_connection_state("28P01"));
        assert!(is_connection_state("3D000"));
        assert!(!is_connection_state("23505"));
        assert!(!is_connection_state("42P01"));
    }
}
