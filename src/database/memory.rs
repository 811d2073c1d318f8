use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::models::{Person, PersonId};
use crate::database::query_builder::SearchFilter;
use crate::database::repository::{PersonRepository, RepositoryError};

#[derive(Debug, Default)]
struct Table {
    last_id: PersonId,
    rows: BTreeMap<PersonId, Person>,
}

impl Table {
    fn email_taken(&self, email: &str, exclude_id: PersonId) -> Option<&Person> {
        self.rows
            .values()
            .find(|p| p.email == email && p.id != exclude_id)
    }
}

/// Process-local store used when no database URL is configured, and by tests.
///
/// The email check and the insert share one write lock, so this backend has
/// no check-then-insert window.
#[derive(Debug, Default)]
pub struct MemoryPersonRepository {
    table: RwLock<Table>,
}

impl MemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonRepository for MemoryPersonRepository {
    async fn search(&self, query: &str) -> Result<Vec<Person>, RepositoryError> {
        let filter = SearchFilter::parse(query);
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn create(&self, person: &Person) -> Result<PersonId, RepositoryError> {
        let mut table = self.table.write().await;
        if table.email_taken(&person.email, 0).is_some() {
            return Err(RepositoryError::EmailExists);
        }
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, Person { id, ..person.clone() });
        Ok(id)
    }

    async fn get(&self, id: PersonId) -> Result<Person, RepositoryError> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or(RepositoryError::PersonNotFound)
    }

    async fn update(&self, person: &Person) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&person.id) {
            return Err(RepositoryError::PersonNotFound);
        }
        if !person.email.is_empty() && table.email_taken(&person.email, person.id).is_some() {
            return Err(RepositoryError::EmailExists);
        }
        if let Some(row) = table.rows.get_mut(&person.id) {
            row.merge(person);
        }
        Ok(())
    }

    async fn delete(&self, person: &Person) -> Result<(), RepositoryError> {
        self.table.write().await.rows.remove(&person.id);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Person>, RepositoryError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_email(
        &self,
        email: &str,
        exclude_id: PersonId,
    ) -> Result<Person, RepositoryError> {
        let table = self.table.read().await;
        table
            .email_taken(email, exclude_id)
            .cloned()
            .ok_or(RepositoryError::PersonNotFound)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
