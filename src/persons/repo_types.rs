use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Person record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Person {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub national_code: String,
    pub address: String,
    pub phone: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPerson {
    pub firstname: String,
    pub lastname: String,
    pub national_code: String,
    pub address: String,
    pub phone: String,
}
