//! Plant repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and food-type queries over the `plants` table.
//! - Map SQLite constraint failures to semantic errors.
//!
//! # Invariants
//! - Write paths normalize and validate before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - List results are ordered by `id ASC`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::plant::{Plant, PlantId, PlantValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PLANT_SELECT_SQL: &str = "SELECT
    id,
    catalog_number,
    name,
    plant_type,
    food_type,
    quantity,
    is_edible
FROM plants";

const PLANT_REQUIRED_COLUMNS: [&str; 9] = [
    "id",
    "catalog_number",
    "name",
    "plant_type",
    "food_type",
    "quantity",
    "is_edible",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Key used to address a single plant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlantKey {
    Id(PlantId),
    CatalogNumber(String),
}

impl Display for PlantKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::CatalogNumber(value) => write!(f, "catalog number {value}"),
        }
    }
}

/// Errors from plant persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed field validation before SQL.
    Validation(PlantValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No row matched the given key.
    NotFound(PlantKey),
    /// Another row already owns this catalog number.
    DuplicateCatalogNumber(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted into a valid `Plant`.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "plant not found: {key}"),
            Self::DuplicateCatalogNumber(value) => {
                write!(f, "catalog number already in use: {value}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "plant repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "plant repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "plant repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted plant data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlantValidationError> for RepoError {
    fn from(value: PlantValidationError) -> Self {
        Self::Validation(value)
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

/// Query options for listing plants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantListQuery {
    /// Case-insensitive exact food type filter.
    pub food_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for plant CRUD operations.
pub trait PlantRepository {
    /// Inserts a new row and returns the assigned primary key.
    fn create_plant(&self, plant: &Plant) -> RepoResult<PlantId>;
    fn get_plant_by_id(&self, id: PlantId) -> RepoResult<Option<Plant>>;
    fn get_plant_by_catalog_number(&self, catalog_number: &str) -> RepoResult<Option<Plant>>;
    fn list_plants(&self, query: &PlantListQuery) -> RepoResult<Vec<Plant>>;
    /// Replaces all fields of the row addressed by `id`, or by
    /// `catalog_number` when `id` is `None`.
    fn update_plant(&self, plant: &Plant) -> RepoResult<()>;
    fn delete_plant_by_catalog_number(&self, catalog_number: &str) -> RepoResult<()>;
    fn count_plants(&self) -> RepoResult<u64>;
}

/// SQLite-backed plant repository.
pub struct SqlitePlantRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlantRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_plant_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PlantRepository for SqlitePlantRepository<'_> {
    fn create_plant(&self, plant: &Plant) -> RepoResult<PlantId> {
        // Why: food-type search trims its input, so stored labels must be
        // trimmed too or padded rows become unreachable.
        let plant = plant.normalized();
        plant.validate()?;

        self.conn
            .execute(
                "INSERT INTO plants (
                    catalog_number,
                    name,
                    plant_type,
                    food_type,
                    quantity,
                    is_edible
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    plant.catalog_number.as_str(),
                    plant.name.as_str(),
                    plant.plant_type.as_str(),
                    plant.food_type.as_str(),
                    plant.quantity,
                    bool_to_int(plant.is_edible),
                ],
            )
            .map_err(|err| map_unique_violation(err, &plant.catalog_number))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_plant_by_id(&self, id: PlantId) -> RepoResult<Option<Plant>> {
        self.query_one(&format!("{PLANT_SELECT_SQL} WHERE id = ?1;"), Value::Integer(id))
    }

    fn get_plant_by_catalog_number(&self, catalog_number: &str) -> RepoResult<Option<Plant>> {
        self.query_one(
            &format!("{PLANT_SELECT_SQL} WHERE catalog_number = ?1;"),
            Value::Text(catalog_number.to_string()),
        )
    }

    fn list_plants(&self, query: &PlantListQuery) -> RepoResult<Vec<Plant>> {
        let mut sql = format!("{PLANT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(food_type) = query.food_type.as_ref() {
            sql.push_str(" AND food_type = ? COLLATE NOCASE");
            bind_values.push(Value::Text(food_type.clone()));
        }

        sql.push_str(" ORDER BY id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut plants = Vec::new();
        while let Some(row) = rows.next()? {
            plants.push(parse_plant_row(row)?);
        }

        Ok(plants)
    }

    fn update_plant(&self, plant: &Plant) -> RepoResult<()> {
        let plant = plant.normalized();
        plant.validate()?;

        let (where_sql, key_value, key) = match plant.id {
            Some(id) => ("id = ?7", Value::Integer(id), PlantKey::Id(id)),
            None => (
                "catalog_number = ?7",
                Value::Text(plant.catalog_number.clone()),
                PlantKey::CatalogNumber(plant.catalog_number.clone()),
            ),
        };

        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE plants
                     SET
                        catalog_number = ?1,
                        name = ?2,
                        plant_type = ?3,
                        food_type = ?4,
                        quantity = ?5,
                        is_edible = ?6,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE {where_sql};"
                ),
                params![
                    plant.catalog_number.as_str(),
                    plant.name.as_str(),
                    plant.plant_type.as_str(),
                    plant.food_type.as_str(),
                    plant.quantity,
                    bool_to_int(plant.is_edible),
                    key_value,
                ],
            )
            .map_err(|err| map_unique_violation(err, &plant.catalog_number))?;

        if changed == 0 {
            return Err(RepoError::NotFound(key));
        }

        Ok(())
    }

    fn delete_plant_by_catalog_number(&self, catalog_number: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM plants WHERE catalog_number = ?1;",
            [catalog_number],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(PlantKey::CatalogNumber(
                catalog_number.to_string(),
            )));
        }

        Ok(())
    }

    fn count_plants(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM plants;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative plant count `{count}`")))
    }
}

impl SqlitePlantRepository<'_> {
    fn query_one(&self, sql: &str, key: Value) -> RepoResult<Option<Plant>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_plant_row(row)?)),
            None => Ok(None),
        }
    }
}

fn parse_plant_row(row: &Row<'_>) -> RepoResult<Plant> {
    let quantity_raw: i64 = row.get("quantity")?;
    let quantity = i32::try_from(quantity_raw).map_err(|_| {
        RepoError::InvalidData(format!(
            "quantity `{quantity_raw}` out of range in plants.quantity"
        ))
    })?;

    let is_edible = match row.get::<_, i64>("is_edible")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_edible value `{other}` in plants.is_edible"
            )));
        }
    };

    let plant = Plant {
        id: Some(row.get("id")?),
        catalog_number: row.get("catalog_number")?,
        name: row.get("name")?,
        plant_type: row.get("plant_type")?,
        food_type: row.get("food_type")?,
        quantity,
        is_edible,
    };
    plant.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "row {} failed validation: {err}",
            plant.id.unwrap_or_default()
        ))
    })?;
    Ok(plant)
}

fn map_unique_violation(err: rusqlite::Error, catalog_number: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateCatalogNumber(catalog_number.to_string())
        }
        _ => err.into(),
    }
}

fn ensure_plant_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "plants")? {
        return Err(RepoError::MissingRequiredTable("plants"));
    }

    for column in PLANT_REQUIRED_COLUMNS {
        if !table_has_column(conn, "plants", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "plants",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
