use anyhow::{Result, Context};
use chrono::Utc;
use log::{info, debug};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use super::model::{NewParcel, Parcel, ParcelStatus};

pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to PostgreSQL database {}@{}:{}/{}",
              config.username, config.host, config.port, config.database);

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.username);
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("Unable to connect to the database")?;

        info!("Database connection established");

        let db = Database { pool };
        db.create_tables_if_not_exists().await?;

        Ok(db)
    }

    async fn create_tables_if_not_exists(&self) -> Result<()> {
        info!("Checking/creating database tables");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS parcels (
                id UUID PRIMARY KEY,
                code VARCHAR(64) NOT NULL DEFAULT '',
                courier VARCHAR(255) NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT '',
                raw_text TEXT NOT NULL DEFAULT '',
                status VARCHAR(16) NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'collected')),
                timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                created_at TIMESTAMPTZ DEFAULT NOW()
            )
            "#
        )
        .execute(&self.pool)
        .await
        .context("Unable to create parcels table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_parcels_status ON parcels (status)")
            .execute(&self.pool)
            .await
            .context("Unable to create index on status")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_parcels_timestamp ON parcels (timestamp DESC)")
            .execute(&self.pool)
            .await
            .context("Unable to create index on timestamp")?;

        info!("Database tables checked/created successfully");
        Ok(())
    }

    /// Store a parcel, defaulting to `pending` and the current time.
    pub async fn add_parcel(&self, parcel: &NewParcel) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let status = parcel.status_or_default();
        let timestamp = parcel.timestamp_or(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO parcels
            (id, code, courier, location, raw_text, status, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#
        )
        .bind(id)
        .bind(&parcel.code)
        .bind(&parcel.courier)
        .bind(&parcel.location)
        .bind(&parcel.raw_text)
        .bind(status.as_str())
        .bind(timestamp)
        .execute(&self.pool)
        .await
        .context("Error inserting parcel")?;

        info!("Parcel saved: {} (courier: '{}', code: '{}')", id, parcel.courier, parcel.code);
        Ok(id)
    }

    /// All parcels, newest first.
    pub async fn get_all_parcels(&self) -> Result<Vec<Parcel>> {
        let rows = sqlx::query(
            r#"
            SELECT id, code, courier, location, raw_text, status, timestamp
            FROM parcels
            ORDER BY timestamp DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .context("Error retrieving parcels")?;

        let mut parcels = Vec::with_capacity(rows.len());
        for row in rows {
            parcels.push(Self::parcel_from_row(&row)?);
        }

        debug!("Retrieved {} parcels", parcels.len());
        Ok(parcels)
    }

    pub async fn mark_collected(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE parcels SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(ParcelStatus::Collected.as_str())
            .execute(&self.pool)
            .await
            .context("Error updating parcel status")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Parcel not found: {}", id);
        }

        info!("Parcel {} marked as collected", id);
        Ok(())
    }

    /// Returns whether a parcel was deleted.
    pub async fn delete_parcel(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM parcels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Error deleting parcel")?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Parcel {} deleted", id);
        } else {
            debug!("No parcel to delete with id {}", id);
        }
        Ok(deleted)
    }

    /// Delete every collected parcel, returning how many were removed.
    pub async fn clear_collected(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM parcels WHERE status = $1")
            .bind(ParcelStatus::Collected.as_str())
            .execute(&self.pool)
            .await
            .context("Error deleting collected parcels")?;

        info!("Deleted {} collected parcels", result.rows_affected());
        Ok(result.rows_affected())
    }

    fn parcel_from_row(row: &PgRow) -> Result<Parcel> {
        let status: String = row.try_get("status").context("Missing status column")?;

        Ok(Parcel {
            id: row.try_get("id").context("Missing id column")?,
            code: row.try_get("code").context("Missing code column")?,
            courier: row.try_get("courier").context("Missing courier column")?,
            location: row.try_get("location").context("Missing location column")?,
            raw_text: row.try_get("raw_text").context("Missing raw_text column")?,
            status: status.parse()?,
            timestamp: row.try_get("timestamp").context("Missing timestamp column")?,
        })
    }

    pub async fn close(self) -> Result<()> {
        info!("Closing database connection");
        self.pool.close().await;
        Ok(())
    }
}
