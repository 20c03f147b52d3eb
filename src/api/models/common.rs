use serde::Serialize;

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Response carrying the id of a newly created row
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}
