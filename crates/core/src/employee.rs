//! Employee profile constants.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MAX_NAME_LENGTH: u64 = 60;
pub const MAX_CONTACT_NUMBER_LENGTH: u64 = 15;
pub const MAX_ADDRESS_LENGTH: u64 = 200;
pub const MAX_EMAIL_LENGTH: u64 = 100;
pub const MIN_PASSWORD_LENGTH: u64 = 6;
pub const MAX_PASSWORD_LENGTH: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(CoreError::BadInput(format!(
                "Invalid gender '{s}'. Must be one of: Male, Female, Other"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_round_trips() {
        for g in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(g.as_str().parse::<Gender>().unwrap(), g);
        }
        assert!("unknown".parse::<Gender>().is_err());
    }
}
