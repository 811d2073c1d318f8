use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, Postgres};

use crate::database::models::Person;

pub const PERSON_COLUMNS: &str = "id, name, surname, age, email, telephone";

/// Predicate selected by a free-form search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// The whole (trimmed) query parsed as an integer.
    AgeEquals(i64),
    /// Case-sensitive substring over name, surname, email and telephone.
    TextSearch(String),
}

impl SearchFilter {
    pub fn parse(query: &str) -> Self {
        let trimmed = query.trim();
        match trimmed.parse::<i64>() {
            Ok(age) => SearchFilter::AgeEquals(age),
            Err(_) => SearchFilter::TextSearch(trimmed.to_string()),
        }
    }

    pub fn matches(&self, person: &Person) -> bool {
        match self {
            SearchFilter::AgeEquals(age) => person.age == *age,
            SearchFilter::TextSearch(needle) => [
                &person.name,
                &person.surname,
                &person.email,
                &person.telephone,
            ]
            .iter()
            .any(|field| field.contains(needle.as_str())),
        }
    }

    pub fn to_sql(&self) -> SqlResult {
        match self {
            SearchFilter::AgeEquals(age) => SqlResult {
                query: format!("SELECT {} FROM people WHERE age = $1 ORDER BY id", PERSON_COLUMNS),
                param: SqlParam::Int(*age),
            },
            SearchFilter::TextSearch(needle) => SqlResult {
                query: format!(
                    "SELECT {} FROM people WHERE name LIKE $1 ESCAPE '\\' \
                     OR surname LIKE $1 ESCAPE '\\' \
                     OR email LIKE $1 ESCAPE '\\' OR telephone LIKE $1 ESCAPE '\\' ORDER BY id",
                    PERSON_COLUMNS
                ),
                param: SqlParam::Text(format!("%{}%", escape_like(needle))),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub param: SqlParam,
}

impl SqlResult {
    pub fn bind<'q, O>(
        &'q self,
    ) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        let q = sqlx::query_as::<_, O>(&self.query);
        match &self.param {
            SqlParam::Int(i) => q.bind(*i),
            SqlParam::Text(s) => q.bind(s.as_str()),
        }
    }
}

/// Make `%`, `_` and `\` match literally under `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
