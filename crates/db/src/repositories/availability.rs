use crate::models::DbAvailabilityWindow;
use chrono::NaiveTime;
use eyre::Result;
use sqlx::{Pool, Postgres};

/// Windows for one weekday, ordered by start time.
pub async fn get_windows_for_day(
    pool: &Pool<Postgres>,
    day_of_week: u8,
) -> Result<Vec<DbAvailabilityWindow>> {
    let windows = sqlx::query_as::<_, DbAvailabilityWindow>(
        r#"
        SELECT day_of_week, start_time, end_time
        FROM availability
        WHERE day_of_week = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(i16::from(day_of_week))
    .fetch_all(pool)
    .await?;

    Ok(windows)
}

pub async fn create_window(
    pool: &Pool<Postgres>,
    day_of_week: u8,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbAvailabilityWindow> {
    let window = sqlx::query_as::<_, DbAvailabilityWindow>(
        r#"
        INSERT INTO availability (day_of_week, start_time, end_time)
        VALUES ($1, $2, $3)
        RETURNING day_of_week, start_time, end_time
        "#,
    )
    .bind(i16::from(day_of_week))
    .bind(start_time)
    .bind(end_time)
    .fetch_one(pool)
    .await?;

    Ok(window)
}
