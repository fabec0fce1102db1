use serde::Serialize;

/// Uniform envelope for single-resource responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Envelope for list responses with offset-pagination metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub message: String,
    pub data: Vec<T>,
    pub total: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}
