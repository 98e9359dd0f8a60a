//! Parcel store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `parcel` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every operation is a single SQL statement; no transactions or retries.
//! - `get` reports a missing row as `RepoError::NotFound`.
//! - Updates and deletes that match zero rows succeed (idempotent).
//! - The store assigns fields only; address and timestamp rules belong to
//!   callers. Rows it did not write are read back as stored.
//! - Store errors surface unchanged inside `RepoError::Db`; nothing is logged.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";
const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for parcel persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No parcel row carries the requested number.
    NotFound(ParcelNumber),
    /// Persisted status string is not a known `ParcelStatus`.
    InvalidData(String),
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this error is the expected "no such parcel" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::InvalidData(message) => write!(f, "invalid persisted parcel data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "parcel store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "parcel store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "parcel store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for parcel CRUD operations.
pub trait ParcelRepository {
    /// Inserts a new parcel and returns its storage-assigned number.
    /// `parcel.number` is ignored; other fields are written as given.
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber>;
    /// Loads one parcel, or `RepoError::NotFound`.
    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Loads every parcel of `client`, ordered by number. Empty when none.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()>;
    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()>;
    fn delete(&self, number: ParcelNumber) -> RepoResult<()>;
}

/// SQLite-backed parcel store bound to one borrowed connection.
pub struct SqliteParcelStore<'conn> {
    conn: &'conn Connection,
}

/// Default store implementation.
pub type ParcelStore<'conn> = SqliteParcelStore<'conn>;

impl<'conn> SqliteParcelStore<'conn> {
    /// Binds to a connection whose `parcel` table is managed by the caller.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Binds to a migrated connection, verifying the schema first.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_parcel_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelRepository for SqliteParcelStore<'_> {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        self.conn.execute(
            "INSERT INTO parcel (client, status, address, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                parcel.client,
                parcel.status.as_str(),
                parcel.address.as_str(),
                parcel.created_at.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"))?;

        let mut rows = stmt.query([number])?;
        if let Some(row) = rows.next()? {
            return parse_parcel_row(row);
        }

        Err(RepoError::NotFound(number))
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PARCEL_SELECT_SQL} WHERE client = ?1 ORDER BY number ASC;"
        ))?;

        let mut rows = stmt.query([client])?;
        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }

        Ok(parcels)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2;",
            params![address, number],
        )?;
        Ok(())
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE parcel SET status = ?1 WHERE number = ?2;",
            params![status.as_str(), number],
        )?;
        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM parcel WHERE number = ?1;", [number])?;
        Ok(())
    }
}

fn parse_parcel_row(row: &Row<'_>) -> RepoResult<Parcel> {
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<ParcelStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in parcel.status"))
    })?;

    Ok(Parcel {
        number: row.get("number")?,
        client: row.get("client")?,
        status,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_parcel_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let present = table_columns(conn, PARCEL_TABLE)?;
    if present.is_empty() {
        return Err(RepoError::MissingRequiredTable(PARCEL_TABLE));
    }

    for column in PARCEL_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: PARCEL_TABLE,
                column,
            });
        }
    }

    Ok(())
}

// Empty when the table does not exist.
fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
