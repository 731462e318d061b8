//! Persistence of access grants.
//!
//! The relay is deliberately single-tenant: one pre-existing user row holds
//! the current access grant and every successful callback overwrites it
//! in place. The target row id is configuration (`user_row`) rather than a
//! buried constant, and a missing row is a hard [`StoreError::RowMissing`]
//! instead of a silent no-op.

// crates.io
use rusqlite::{Connection, OptionalExtension, params};
// self
use crate::{
	_prelude::*,
	auth::{AccessGrant, TokenSecret},
};

type GrantRow = (Option<String>, Option<String>, Option<String>, Option<String>);

/// Error type produced by [`GrantStore`] implementations.
#[derive(Debug, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// The fixed user row this deployment updates does not exist.
	#[error("User row {user_row} does not exist.")]
	RowMissing {
		/// Row id the store was configured to update.
		user_row: i64,
	},
}
impl From<rusqlite::Error> for StoreError {
	fn from(e: rusqlite::Error) -> Self {
		Self::Backend { message: e.to_string() }
	}
}

/// Storage contract for persisting the access grant of the fixed user row.
pub trait GrantStore
where
	Self: Send + Sync,
{
	/// Persists `grant`, replacing whatever the row held before.
	fn save(&self, grant: &AccessGrant) -> Result<(), StoreError>;
}

/// SQLite-backed grant store updating a single `tw_export` row.
pub struct SqliteStore {
	conn: Mutex<Connection>,
	user_row: i64,
}
impl SqliteStore {
	/// Opens (or creates) the database at `path` and ensures the user row exists.
	pub fn open(path: &Path, user_row: i64) -> Result<Self, StoreError> {
		let conn = Connection::open(path)?;

		conn.execute_batch("PRAGMA journal_mode=WAL;")?;

		Self::bootstrap(conn, user_row)
	}

	/// Opens an in-memory database (for tests).
	pub fn open_in_memory(user_row: i64) -> Result<Self, StoreError> {
		Self::bootstrap(Connection::open_in_memory()?, user_row)
	}

	fn bootstrap(conn: Connection, user_row: i64) -> Result<Self, StoreError> {
		conn.execute_batch(
			"CREATE TABLE IF NOT EXISTS tw_export (\
				user_id INTEGER PRIMARY KEY,\
				tw_screen_name TEXT,\
				tw_user_id TEXT,\
				real_oauth_token TEXT,\
				real_oauth_token_secret TEXT\
			);",
		)?;
		conn.execute("INSERT OR IGNORE INTO tw_export (user_id) VALUES (?1)", params![user_row])?;

		Ok(Self { conn: Mutex::new(conn), user_row })
	}

	/// Reads back the stored grant, if the row has been written at least once.
	pub fn fetch(&self) -> Result<Option<AccessGrant>, StoreError> {
		let conn = self.conn.lock();
		let row: Option<GrantRow> = conn
			.query_row(
				"SELECT tw_screen_name, tw_user_id, real_oauth_token, real_oauth_token_secret \
				 FROM tw_export WHERE user_id = ?1",
				params![self.user_row],
				|row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
			)
			.optional()?;

		match row {
			Some((Some(screen_name), Some(user_id), Some(token), Some(secret))) =>
				Ok(Some(AccessGrant {
					screen_name,
					user_id,
					token,
					secret: TokenSecret::new(secret),
				})),
			_ => Ok(None),
		}
	}
}
impl GrantStore for SqliteStore {
	fn save(&self, grant: &AccessGrant) -> Result<(), StoreError> {
		let conn = self.conn.lock();
		let updated = conn.execute(
			"UPDATE tw_export SET \
				tw_screen_name = ?1,\
				tw_user_id = ?2,\
				real_oauth_token = ?3,\
				real_oauth_token_secret = ?4 \
			 WHERE user_id = ?5",
			params![
				grant.screen_name,
				grant.user_id,
				grant.token,
				grant.secret.expose(),
				self.user_row
			],
		)?;

		if updated == 0 {
			return Err(StoreError::RowMissing { user_row: self.user_row });
		}

		Ok(())
	}
}
impl Debug for SqliteStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SqliteStore").field("user_row", &self.user_row).finish()
	}
}

/// Grant store that keeps the latest grant in process memory, for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryGrantStore(Arc<RwLock<Option<AccessGrant>>>);
impl MemoryGrantStore {
	/// Returns a copy of the stored grant, if any.
	pub fn grant(&self) -> Option<AccessGrant> {
		self.0.read().clone()
	}
}
impl GrantStore for MemoryGrantStore {
	fn save(&self, grant: &AccessGrant) -> Result<(), StoreError> {
		*self.0.write() = Some(grant.clone());

		Ok(())
	}
}
