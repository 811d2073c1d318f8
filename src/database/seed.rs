use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::database::models::Person;
use crate::database::repository::{PersonRepository, RepositoryError};
use crate::validation::check_new_person;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read { path: String, source: std::io::Error },

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("seed person #{index} ({email}) is invalid: {reason}")]
    Invalid { index: usize, email: String, reason: &'static str },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// YAML document with a top-level `persons:` list.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub persons: Vec<Person>,
}

impl SeedFile {
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(raw)?)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub removed: usize,
    pub created: usize,
    pub skipped: usize,
}

/// Load `persons` into the store. With `reset`, existing records are removed
/// first. Records whose email is already taken are skipped.
pub async fn apply(
    repo: &dyn PersonRepository,
    persons: &[Person],
    reset: bool,
) -> Result<SeedReport, SeedError> {
    for (index, person) in persons.iter().enumerate() {
        check_new_person(person).map_err(|reason| SeedError::Invalid {
            index,
            email: person.email.clone(),
            reason,
        })?;
    }

    let mut report = SeedReport::default();

    if reset {
        for existing in repo.get_all().await? {
            repo.delete(&existing).await?;
            report.removed += 1;
        }
    }

    for person in persons {
        match repo.create(person).await {
            Ok(_) => report.created += 1,
            Err(RepositoryError::EmailExists) => {
                warn!("Seed person {} skipped: email already in use", person.email);
                report.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        "Seeding finished: {} removed, {} created, {} skipped",
        report.removed, report.created, report.skipped
    );
    Ok(report)
}
