use sea_orm::{
    sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection, DbErr,
};
use std::sync::Arc;
use time::Duration;
use tower_sessions::{Expiry, Session};
use tower_sessions_sqlx_store::SqliteStore;

use crate::error::TestError;

/// Days of inactivity before a login session expires, as configured on the server's
/// session layer.
pub const SESSION_INACTIVITY_DAYS: i64 = 7;

/// An in-memory court booking database for one test.
///
/// `TestBuilder::build` connects the database and creates the requested tables up front.
/// Tests of the auth middleware additionally ask for a login session, which is stored in
/// the same database the way the server stores it.
pub struct TestContext {
    /// The test database. Always set once the context is built.
    pub db: Option<DatabaseConnection>,

    /// Login session, created by the first `db_and_session()` call.
    pub session: Option<Session>,
}

impl TestContext {
    /// Connects a fresh in-memory database and creates the given tables.
    ///
    /// Statements run in order, so tables must come after the tables their foreign keys
    /// reference.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Database ready with all tables created
    /// - `Err(TestError::Database)` - Connecting or a CREATE TABLE failed
    pub async fn with_schema(stmts: Vec<TableCreateStatement>) -> Result<Self, TestError> {
        let db = Database::connect("sqlite::memory:").await?;

        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        Ok(Self {
            db: Some(db),
            session: None,
        })
    }

    /// The database together with a login session stored in it.
    ///
    /// The session table is migrated on the first call. Later calls return the same
    /// session, so values written through it stay visible to the middleware under test.
    ///
    /// # Returns
    /// - `Ok((&DatabaseConnection, &Session))` - Database and session
    /// - `Err(TestError::Database)` - Session table migration failed
    pub async fn db_and_session(&mut self) -> Result<(&DatabaseConnection, &Session), TestError> {
        let db = self
            .db
            .as_ref()
            .ok_or_else(|| DbErr::Custom("test database not connected".to_string()))?;

        if self.session.is_none() {
            let store = SqliteStore::new(db.get_sqlite_connection_pool().clone());
            store
                .migrate()
                .await
                .map_err(|e| DbErr::Custom(e.to_string()))?;

            self.session = Some(Session::new(
                None,
                Arc::new(store),
                Some(Expiry::OnInactivity(Duration::days(SESSION_INACTIVITY_DAYS))),
            ));
        }

        match self.session.as_ref() {
            Some(session) => Ok((db, session)),
            None => Err(DbErr::Custom("test session not created".to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_persists_across_calls() {
        let mut test = TestContext::with_schema(Vec::new()).await.unwrap();

        let (_, session) = test.db_and_session().await.unwrap();
        session.insert("user_id", 7).await.unwrap();

        let (_, again) = test.db_and_session().await.unwrap();
        assert_eq!(again.get::<i32>("user_id").await.unwrap(), Some(7));
    }
}
