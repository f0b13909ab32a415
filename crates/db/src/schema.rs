use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const SCHEMA: &[&str] = &[
    // Weekly availability, maintained out of band. TIME accepts 24:00, which
    // decodes as midnight, so windows must end within the day.
    r#"
    CREATE TABLE IF NOT EXISTS availability (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
        start_time TIME NOT NULL,
        end_time TIME NOT NULL,
        CONSTRAINT valid_availability_range CHECK (end_time > start_time),
        CONSTRAINT availability_ends_within_day CHECK (end_time < '24:00:00')
    );
    "#,
    // One row per booked session; the unique constraint is the only guard
    // against double booking
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id UUID PRIMARY KEY,
        session_datetime TIMESTAMP WITH TIME ZONE NOT NULL UNIQUE,
        client_name TEXT NOT NULL,
        client_email TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        subjects TEXT NOT NULL,
        price NUMERIC(10, 2) NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_availability_day_of_week ON availability(day_of_week);",
    "CREATE INDEX IF NOT EXISTS idx_bookings_client_email ON bookings(client_email);",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
