use serde::{Deserialize, Serialize};

/// Identity on whose behalf a selection query is compiled.
///
/// Consulted by the organisational-scoping criteria (`subject hub code`,
/// `subject screening centre code`) when the caller passes a symbolic value
/// such as `user's hub`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// Internal id of the acting user.
    pub user_id: i64,
    /// Organisation id of the user's hub.
    pub hub_id: i64,
    /// Organisation id of the user's screening centre.
    pub screening_centre_id: i64,
    /// Role id, where the caller knows it.
    pub role_id: Option<i32>,
}

impl ActorContext {
    pub fn new(user_id: i64, hub_id: i64, screening_centre_id: i64) -> Self {
        Self {
            user_id,
            hub_id,
            screening_centre_id,
            role_id: None,
        }
    }
}
