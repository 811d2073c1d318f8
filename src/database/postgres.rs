use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::models::{Person, PersonId};
use crate::database::query_builder::{SearchFilter, PERSON_COLUMNS};
use crate::database::repository::{PersonRepository, RepositoryError};

/// `people` table in Postgres.
#[derive(Clone)]
pub struct PgPersonRepository {
    pool: PgPool,
}

impl PgPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The unique index on `email` backs up the pre-insert lookup.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::EmailExists,
        _ => RepositoryError::Storage(err),
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepository {
    async fn search(&self, query: &str) -> Result<Vec<Person>, RepositoryError> {
        let filter = SearchFilter::parse(query);
        debug!("person search dispatched as {:?}", filter);
        let sql = filter.to_sql();
        let persons = sql.bind::<Person>().fetch_all(&self.pool).await?;
        Ok(persons)
    }

    async fn create(&self, person: &Person) -> Result<PersonId, RepositoryError> {
        match self.find_by_email(&person.email, 0).await {
            Ok(_) => return Err(RepositoryError::EmailExists),
            Err(RepositoryError::PersonNotFound) => {}
            Err(other) => return Err(other),
        }

        let id: PersonId = sqlx::query_scalar(
            "INSERT INTO people (name, surname, age, email, telephone) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&person.name)
        .bind(&person.surname)
        .bind(person.age)
        .bind(&person.email)
        .bind(&person.telephone)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(id)
    }

    async fn get(&self, id: PersonId) -> Result<Person, RepositoryError> {
        let sql = format!("SELECT {} FROM people WHERE id = $1", PERSON_COLUMNS);
        sqlx::query_as::<_, Person>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::PersonNotFound)
    }

    async fn update(&self, person: &Person) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE people SET
                name = COALESCE(NULLIF($2, ''), name),
                surname = COALESCE(NULLIF($3, ''), surname),
                age = CASE WHEN $4 > 0 THEN $4 ELSE age END,
                email = COALESCE(NULLIF($5, ''), email),
                telephone = COALESCE(NULLIF($6, ''), telephone)
            WHERE id = $1
            "#,
        )
        .bind(person.id)
        .bind(&person.name)
        .bind(&person.surname)
        .bind(person.age)
        .bind(&person.email)
        .bind(&person.telephone)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::PersonNotFound);
        }
        Ok(())
    }

    async fn delete(&self, person: &Person) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(person.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Person>, RepositoryError> {
        let sql = format!("SELECT {} FROM people ORDER BY id", PERSON_COLUMNS);
        let persons = sqlx::query_as::<_, Person>(&sql).fetch_all(&self.pool).await?;
        Ok(persons)
    }

    async fn find_by_email(
        &self,
        email: &str,
        exclude_id: PersonId,
    ) -> Result<Person, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM people WHERE email = $1 AND id <> $2 ORDER BY id LIMIT 1",
            PERSON_COLUMNS
        );
        sqlx::query_as::<_, Person>(&sql)
            .bind(email)
            .bind(exclude_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::PersonNotFound)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
