//! Derived name parts for person contacts.
//!
//! # Invariants
//! - Tokens are whitespace-delimited.
//! - First token is the first name and last token the last name; a single
//!   token fills both.
//! - A middle name exists only for names of exactly three tokens.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name-splitting failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    /// Input contains no non-whitespace token.
    EmptyName,
}

impl Display for NameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name has no tokens to split"),
        }
    }
}

impl Error for NameError {}

/// First/middle/last parts derived from a full display name.
///
/// Empty strings mean "not present", matching the persisted blank columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

/// Splits a full name into first/middle/last parts.
///
/// `"Jane Q R Doe"` yields no middle name: only three-token names get one.
pub fn split_name(full_name: &str) -> Result<PersonName, NameError> {
    let tokens = full_name.split_whitespace().collect::<Vec<_>>();
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return Err(NameError::EmptyName);
    };

    let middle = if tokens.len() == 3 { tokens[1] } else { "" };

    Ok(PersonName {
        first_name: (*first).to_string(),
        middle_name: middle.to_string(),
        last_name: (*last).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{split_name, NameError};

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(split_name(" \t\n ").unwrap_err(), NameError::EmptyName);
        assert_eq!(split_name("").unwrap_err(), NameError::EmptyName);
    }

    #[test]
    fn irregular_whitespace_is_collapsed() {
        let name = split_name("  Ana\tMaria \n Silva ").unwrap();
        assert_eq!(name.first_name, "Ana");
        assert_eq!(name.middle_name, "Maria");
        assert_eq!(name.last_name, "Silva");
    }
}
