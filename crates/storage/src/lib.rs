use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use uuid::Uuid;

use shared::domain::{OwnerId, Report, ReportFields, ReportId};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Inserts a new report for `owner`. The id is store-assigned.
    pub async fn create_report(&self, owner: &OwnerId, fields: &ReportFields) -> Result<ReportId> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO reports (id, owner_id, technician, office_time, date, description, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&owner.0)
        .bind(&fields.technician)
        .bind(fields.office_time.as_deref())
        .bind(&fields.date)
        .bind(&fields.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(ReportId(id))
    }

    pub async fn reports_for_owner(&self, owner: &OwnerId) -> Result<Vec<Report>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, technician, office_time, date, description, created_at
             FROM reports
             WHERE owner_id = ?",
        )
        .bind(&owner.0)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Report {
                id: ReportId(r.get::<String, _>(0)),
                owner_id: OwnerId(r.get::<String, _>(1)),
                fields: ReportFields {
                    technician: r.get::<String, _>(2),
                    office_time: r.get::<Option<String>, _>(3),
                    date: r.get::<String, _>(4),
                    description: r.get::<String, _>(5),
                },
                created_at: r.get::<DateTime<Utc>, _>(6),
            })
            .collect())
    }

    /// Rewrites all content fields of one report. Returns whether a row
    /// owned by `owner` matched; the owner scope means a caller can never
    /// touch another owner's record.
    pub async fn update_report(
        &self,
        id: &ReportId,
        owner: &OwnerId,
        fields: &ReportFields,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE reports
             SET technician = ?, office_time = ?, date = ?, description = ?
             WHERE id = ? AND owner_id = ?",
        )
        .bind(&fields.technician)
        .bind(fields.office_time.as_deref())
        .bind(&fields.date)
        .bind(&fields.description)
        .bind(&id.0)
        .bind(&owner.0)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns whether a row owned by `owner` was deleted.
    pub async fn delete_report(&self, id: &ReportId, owner: &OwnerId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ? AND owner_id = ?")
            .bind(&id.0)
            .bind(&owner.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
