//! Identity of the signed-in portal user.

use serde::{Deserialize, Serialize};

/// Current user as supplied by the session/auth collaborator.
///
/// The core only reads `name` and `role`; role is one of
/// `admin|teacher|student` in the portal but is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
    pub role: String,
}

impl CurrentUser {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}
