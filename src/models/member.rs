//! Project member model.

use serde::{Deserialize, Serialize};

/// A project member (`GET /projects/:id/members/all`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// Numeric access level (10 guest .. 50 owner).
    pub access_level: i64,
    pub state: String,
}
