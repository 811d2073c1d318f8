use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Person, PersonId};

/// Outcomes the repository reports as typed conditions.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("person not found")]
    PersonNotFound,

    #[error("email exists")]
    EmailExists,

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::PersonNotFound)
    }
}

/// All reads and writes of person records go through this trait.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Integer queries match `age` exactly, anything else is a substring
    /// search over the text columns. No match is an empty list.
    async fn search(&self, query: &str) -> Result<Vec<Person>, RepositoryError>;

    /// Insert a new record and return the store-assigned id. Any id on the
    /// input is ignored.
    async fn create(&self, person: &Person) -> Result<PersonId, RepositoryError>;

    async fn get(&self, id: PersonId) -> Result<Person, RepositoryError>;

    /// Replace the non-zero fields of `person` on the row with `person.id`.
    async fn update(&self, person: &Person) -> Result<(), RepositoryError>;

    /// Remove by id. Deleting a missing row is not an error.
    async fn delete(&self, person: &Person) -> Result<(), RepositoryError>;

    async fn get_all(&self) -> Result<Vec<Person>, RepositoryError>;

    /// Find a record holding `email` whose id is not `exclude_id`.
    async fn find_by_email(
        &self,
        email: &str,
        exclude_id: PersonId,
    ) -> Result<Person, RepositoryError>;

    async fn health_check(&self) -> Result<(), RepositoryError>;
}
