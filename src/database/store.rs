use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::database::models::drink::{Drink, DrinkChanges, Ingredient, NewDrink};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("drink {0} not found")]
    NotFound(i64),

    #[error("a drink titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("stored recipe for drink {id} is not a valid ingredient list")]
    CorruptRecipe {
        id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("recipe could not be serialized")]
    EncodeRecipe(#[source] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_DRINKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS drinks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    recipe TEXT NOT NULL
)";

/// SQLite-backed drink store. Cheap to clone; clones share one pool.
#[derive(Clone)]
pub struct DrinkStore {
    pool: SqlitePool,
}

/// Raw row shape: the recipe column holds the ingredient list as JSON text.
#[derive(FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl DrinkRow {
    fn into_drink(self) -> Result<Drink, StoreError> {
        let recipe: Vec<Ingredient> = serde_json::from_str(&self.recipe)
            .map_err(|source| StoreError::CorruptRecipe { id: self.id, source })?;
        Ok(Drink {
            id: self.id,
            title: self.title,
            recipe,
        })
    }
}

impl DrinkStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_DRINKS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Drop and recreate the drinks table. Destructive; startup only calls
    /// this when DATABASE_RESET is set.
    pub async fn reset_schema(&self) -> Result<(), StoreError> {
        sqlx::query("DROP TABLE IF EXISTS drinks")
            .execute(&self.pool)
            .await?;
        self.ensure_schema().await
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All drinks, id ascending.
    pub async fn list(&self) -> Result<Vec<Drink>, StoreError> {
        let rows: Vec<DrinkRow> = sqlx::query_as("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(DrinkRow::into_drink).collect()
    }

    pub async fn find(&self, id: i64) -> Result<Drink, StoreError> {
        let row: Option<DrinkRow> =
            sqlx::query_as("SELECT id, title, recipe FROM drinks WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or(StoreError::NotFound(id))?.into_drink()
    }

    pub async fn insert(&self, draft: NewDrink) -> Result<Drink, StoreError> {
        let recipe = serde_json::to_string(&draft.recipe).map_err(StoreError::EncodeRecipe)?;
        let row: DrinkRow = sqlx::query_as(
            "INSERT INTO drinks (title, recipe) VALUES (?1, ?2) RETURNING id, title, recipe",
        )
        .bind(&draft.title)
        .bind(&recipe)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| constraint_error(e, &draft.title))?;
        row.into_drink()
    }

    /// Merge the provided fields over the current row and persist. The id
    /// never changes.
    pub async fn update(&self, id: i64, changes: DrinkChanges) -> Result<Drink, StoreError> {
        let current = self.find(id).await?;
        let title = changes.title.unwrap_or(current.title);
        let recipe = changes.recipe.unwrap_or(current.recipe);
        let encoded = serde_json::to_string(&recipe).map_err(StoreError::EncodeRecipe)?;

        sqlx::query("UPDATE drinks SET title = ?1, recipe = ?2 WHERE id = ?3")
            .bind(&title)
            .bind(&encoded)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| constraint_error(e, &title))?;

        Ok(Drink { id, title, recipe })
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn constraint_error(err: sqlx::Error, title: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateTitle(title.to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}
