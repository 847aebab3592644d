//! MySQL Backend Module
//!
//! The production table adapter: three parameterized statements against a
//! two-column table `(k BIGINT PRIMARY KEY, v LONGBLOB)`. Keys bind as
//! integers and values as binary blobs, so arbitrary bytes (including
//! NULs) never meet the query parser.

use bytes::Bytes;
use mysql::prelude::Queryable;
use mysql::{Conn, Opts, OptsBuilder};
use tracing::info;

use crate::config::Config;
use crate::store::{Backend, StoreError, StoreResult};

impl From<mysql::Error> for StoreError {
    fn from(err: mysql::Error) -> Self {
        StoreError(err.to_string())
    }
}

// == MySQL Backend ==
/// Connection parameters plus the target table name. Stateless between
/// calls; every operation runs one statement on the borrowed session.
pub struct MysqlBackend {
    opts: Opts,
    table: String,
}

impl MysqlBackend {
    // == Constructor ==
    /// Builds a backend from individual connection parameters.
    ///
    /// The table name is the one string interpolated into statements, so
    /// it is restricted to identifier characters here.
    pub fn new(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        database: &str,
        table: &str,
    ) -> StoreResult<Self> {
        if !is_valid_table_name(table) {
            return Err(StoreError(format!(
                "invalid table name {table:?}: expected [A-Za-z0-9_]+"
            )));
        }

        // credentials stay out of the logs
        info!(host, port, database, user, table, "configuring MySQL backend");

        let builder = OptsBuilder::new()
            .ip_or_hostname(Some(host.to_string()))
            .tcp_port(port)
            .user(Some(user.to_string()))
            .pass(Some(password.to_string()))
            .db_name(Some(database.to_string()));

        Ok(Self {
            opts: Opts::from(builder),
            table: table.to_string(),
        })
    }

    /// Builds a backend from the service configuration.
    pub fn from_config(config: &Config) -> StoreResult<Self> {
        Self::new(
            &config.db_host,
            config.db_port,
            &config.db_user,
            &config.db_password,
            &config.db_name,
            &config.db_table,
        )
    }

    // == Schema bootstrap ==
    /// Creates the key-value table if it does not exist yet.
    pub fn ensure_schema(&self) -> StoreResult<()> {
        let mut session = self.open_session()?;
        session.query_drop(format!(
            "CREATE TABLE IF NOT EXISTS `{}` (k BIGINT PRIMARY KEY, v LONGBLOB NOT NULL)",
            self.table
        ))?;
        info!(table = %self.table, "schema ensured");
        Ok(())
    }
}

impl Backend for MysqlBackend {
    type Session = Conn;

    fn open_session(&self) -> StoreResult<Conn> {
        Ok(Conn::new(self.opts.clone())?)
    }

    fn select_value(&self, session: &mut Conn, key: i64) -> StoreResult<Option<Bytes>> {
        let row: Option<Vec<u8>> = session.exec_first(
            format!("SELECT v FROM `{}` WHERE k = ?", self.table),
            (key,),
        )?;
        Ok(row.map(Bytes::from))
    }

    fn upsert(&self, session: &mut Conn, key: i64, value: &[u8]) -> StoreResult<()> {
        session.exec_drop(
            format!(
                "INSERT INTO `{}` (k, v) VALUES (?, ?) ON DUPLICATE KEY UPDATE v = VALUES(v)",
                self.table
            ),
            (key, value.to_vec()),
        )?;
        Ok(())
    }

    fn delete(&self, session: &mut Conn, key: i64) -> StoreResult<u64> {
        session.exec_drop(format!("DELETE FROM `{}` WHERE k = ?", self.table), (key,))?;
        Ok(session.affected_rows())
    }
}

fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
