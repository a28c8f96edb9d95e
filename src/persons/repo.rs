use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewPerson, Person};
use crate::{db::is_unique_violation, error::AppError};

const DUPLICATE: &str = "national code is already registered";
const MISSING: &str = "no person with this national code";

#[async_trait]
pub trait PersonRepo: Send + Sync {
    /// Inserts a person. A taken national code yields [`AppError::Conflict`].
    async fn create(&self, person: &NewPerson) -> Result<Person, AppError>;

    /// Fails with [`AppError::NotFound`] on a miss.
    async fn get_by_national_code(&self, code: &str) -> Result<Person, AppError>;
}

#[derive(Clone)]
pub struct PgPersonRepo {
    db: PgPool,
}

impl PgPersonRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersonRepo for PgPersonRepo {
    async fn create(&self, person: &NewPerson) -> Result<Person, AppError> {
        sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO persons (firstname, lastname, national_code, address, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, firstname, lastname, national_code, address, phone, created_at
            "#,
        )
        .bind(&person.firstname)
        .bind(&person.lastname)
        .bind(&person.national_code)
        .bind(&person.address)
        .bind(&person.phone)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(DUPLICATE.into())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn get_by_national_code(&self, code: &str) -> Result<Person, AppError> {
        sqlx::query_as::<_, Person>(
            r#"
            SELECT id, firstname, lastname, national_code, address, phone, created_at
            FROM persons
            WHERE national_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(MISSING.into()))
    }
}

#[cfg(test)]
pub use memory::MemoryPersonRepo;
