use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{InstructorProfile, ProfileUpdate};

impl ApiClient {
    pub async fn profile(&self) -> Result<InstructorProfile, ApiError> {
        self.get_data("/instructors/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.send_ack(Method::PUT, "/instructors/profile", update)
            .await
    }

    /// Downloads an avatar for display. Avatars are public URLs, so no token
    /// is attached.
    pub async fn avatar_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status,
                message: "avatar download failed".to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
