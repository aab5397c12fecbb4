use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{QuizResult, Recommendation, StoredRecommendation};

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn save_result(pool: &PgPool, email: &str, result: &QuizResult) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO career_compass.recommendations
        (id, email, stream_major, stream_minor, stream_backup,
         specialization_major, specialization_minor, specialization_backup, recorded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
        ON CONFLICT (email) DO UPDATE
        SET stream_major = EXCLUDED.stream_major,
            stream_minor = EXCLUDED.stream_minor,
            stream_backup = EXCLUDED.stream_backup,
            specialization_major = EXCLUDED.specialization_major,
            specialization_minor = EXCLUDED.specialization_minor,
            specialization_backup = EXCLUDED.specialization_backup,
            recorded_at = EXCLUDED.recorded_at
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(result.stream.major.as_deref())
    .bind(result.stream.minor.as_deref())
    .bind(result.stream.backup.as_deref())
    .bind(result.specialization.major.as_deref())
    .bind(result.specialization.minor.as_deref())
    .bind(result.specialization.backup.as_deref())
    .fetch_one(pool)
    .await
    .context("failed to store recommendation")?
    .get("id");

    info!(email, %id, "recommendation stored");
    Ok(id)
}

pub async fn fetch_result(
    pool: &PgPool,
    email: &str,
) -> anyhow::Result<Option<StoredRecommendation>> {
    let row = sqlx::query(
        "SELECT email, stream_major, stream_minor, stream_backup, \
         specialization_major, specialization_minor, specialization_backup, recorded_at \
         FROM career_compass.recommendations \
         WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| StoredRecommendation {
        email: row.get("email"),
        stream: Recommendation {
            major: row.get("stream_major"),
            minor: row.get("stream_minor"),
            backup: row.get("stream_backup"),
        },
        specialization: Recommendation {
            major: row.get("specialization_major"),
            minor: row.get("specialization_minor"),
            backup: row.get("specialization_backup"),
        },
        recorded_at: row.get::<DateTime<Utc>, _>("recorded_at"),
    }))
}
