use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Both fields are optional on the wire so that absence reports the rating rule
/// instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingInput {
    #[serde(default)]
    pub store_id: Option<Uuid>,
    #[serde(default)]
    pub rating: Option<i32>,
}
