use serde::Deserialize;
use utoipa::ToSchema;

/// Body of both login steps. The OTP itself is never checked, so it is not read.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "3001234567")]
    pub mobile_number: String,
}
