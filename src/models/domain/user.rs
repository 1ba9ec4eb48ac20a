use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// The signed-in user: an email address or phone number, nothing more.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub identifier: String,
}

impl User {
    pub fn new(identifier: &str) -> AppResult<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::EmptyInput(
                "Please enter an email or phone number.".to_string(),
            ));
        }
        Ok(User {
            identifier: identifier.to_string(),
        })
    }
}
