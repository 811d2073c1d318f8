use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type PersonId = i64;

/// A row of the `people` table.
///
/// Missing JSON fields decode to their zero value; the handlers decide what
/// a zero value means for the operation at hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Person {
    #[serde(skip_serializing_if = "is_unassigned")]
    pub id: PersonId,
    pub name: String,
    pub surname: String,
    pub age: i64,
    pub email: String,
    pub telephone: String,
}

fn is_unassigned(id: &PersonId) -> bool {
    *id == 0
}

impl Person {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        age: i64,
        email: impl Into<String>,
        telephone: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            surname: surname.into(),
            age,
            email: email.into(),
            telephone: telephone.into(),
        }
    }

    /// Apply the partial-update convention: empty strings and non-positive
    /// ages in `changes` leave the current value in place.
    pub fn merge(&mut self, changes: &Person) {
        if !changes.name.is_empty() {
            self.name = changes.name.clone();
        }
        if !changes.surname.is_empty() {
            self.surname = changes.surname.clone();
        }
        if changes.age > 0 {
            self.age = changes.age;
        }
        if !changes.email.is_empty() {
            self.email = changes.email.clone();
        }
        if !changes.telephone.is_empty() {
            self.telephone = changes.telephone.clone();
        }
    }
}

/// Body of `PUT /person/:id`. `None` means the field was not sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub telephone: Option<String>,
}

impl PersonUpdate {
    /// First field that was sent as an explicit empty string.
    pub fn first_empty_field(&self) -> Option<&'static str> {
        [
            ("Name", &self.name),
            ("Surname", &self.surname),
            ("Email", &self.email),
            ("Telephone", &self.telephone),
        ]
        .into_iter()
        .find(|(_, value)| value.as_deref() == Some(""))
        .map(|(label, _)| label)
    }

    /// True when at least one field carries a non-zero value.
    pub fn has_changes(&self) -> bool {
        let supplied = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        supplied(&self.name)
            || supplied(&self.surname)
            || supplied(&self.email)
            || supplied(&self.telephone)
            || self.age.is_some_and(|age| age > 0)
    }

    /// Flatten into the zero-value form the repository understands.
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name.unwrap_or_default(),
            surname: self.surname.unwrap_or_default(),
            age: self.age.filter(|age| *age > 0).unwrap_or(0),
            email: self.email.unwrap_or_default(),
            telephone: self.telephone.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_is_omitted_until_assigned() {
        let mut person = Person::new("A", "B", 30, "a@b.com", "+71234567890");
        let value = serde_json::to_value(&person).unwrap();
        assert!(value.get("id").is_none());

        person.id = 7;
        let value = serde_json::to_value(&person).unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn missing_fields_decode_to_zero_values() {
        let person: Person = serde_json::from_value(json!({ "name": "A" })).unwrap();
        assert_eq!(person.name, "A");
        assert_eq!(person.age, 0);
        assert!(person.email.is_empty());
    }

    #[test]
    fn merge_keeps_fields_with_zero_values() {
        let mut person = Person::new("A", "B", 30, "a@b.com", "+71234567890");
        person.merge(&Person { age: -1, surname: "C".into(), ..Default::default() });
        assert_eq!(person.age, 30);
        assert_eq!(person.surname, "C");
        assert_eq!(person.name, "A");
    }

    #[test]
    fn update_reports_explicit_empty_fields() {
        let update: PersonUpdate =
            serde_json::from_value(json!({ "age": 40, "surname": "" })).unwrap();
        assert_eq!(update.first_empty_field(), Some("Surname"));

        let update: PersonUpdate = serde_json::from_value(json!({ "age": 40 })).unwrap();
        assert_eq!(update.first_empty_field(), None);
        assert!(update.has_changes());
    }

    #[test]
    fn non_positive_age_alone_is_not_a_change() {
        let update: PersonUpdate = serde_json::from_value(json!({ "age": 0 })).unwrap();
        assert!(!update.has_changes());
        assert_eq!(update.into_person(3).age, 0);
    }
}
