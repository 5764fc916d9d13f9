use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

/// Plain acknowledgement for actions without a resource body.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SuccessDto {
    pub message: String,
}

impl SuccessDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
