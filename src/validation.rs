use once_cell::sync::Lazy;
use regex::Regex;

use crate::database::models::Person;

/// Longest value accepted for the text columns of `people`.
pub const MAX_FIELD_LEN: usize = 200;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

// `\d` is Unicode-aware in `regex`, so spell out the ASCII range.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+7[0-9]{10}$").expect("phone pattern compiles"));

/// `local@domain.tld` with a purely alphabetic TLD of two or more letters.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// `+7` followed by exactly ten digits.
pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn within_field_limit(value: &str) -> bool {
    value.chars().count() <= MAX_FIELD_LEN
}

/// Rules a record must satisfy before it is inserted. The message is safe
/// to return to clients.
pub fn check_new_person(person: &Person) -> Result<(), &'static str> {
    if person.age < 0 {
        return Err("invalid age value");
    }
    if !validate_email(&person.email) {
        return Err("invalid email format");
    }
    if !validate_phone(&person.telephone) {
        return Err("invalid phone number format (+70011234568)");
    }
    if person.name.is_empty() {
        return Err("name cannot be empty");
    }
    if person.surname.is_empty() {
        return Err("surname cannot be empty");
    }
    if ![&person.name, &person.surname, &person.email]
        .iter()
        .all(|v| within_field_limit(v))
    {
        return Err("field value exceeds 200 characters");
    }
    Ok(())
}
