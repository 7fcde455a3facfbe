use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::info;

use super::{ApiClient, ApiError, StagedFile};
use crate::models::{AccountDetails, Credentials, LoginResponse, PasswordChange};

#[derive(Debug, Deserialize)]
struct UpdatedAccount {
    #[serde(default)]
    avatar: Option<String>,
}

impl ApiClient {
    /// Exchanges credentials for a token. The token is not stored here; the
    /// caller decides whether the role is admitted first.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(credentials);
        let response: LoginResponse = self.execute(request).await?.into_data()?;
        info!(role = %response.role, "login accepted by backend");
        Ok(response)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = self.authed(Method::GET, "/auth/logout")?;
        self.execute_authed::<serde_json::Value>(request).await?;
        Ok(())
    }

    /// Sends name, email and phone as multipart, attaching the avatar when one
    /// is staged. Returns the new avatar URL if the backend reports one.
    pub async fn update_details(
        &self,
        details: &AccountDetails,
        avatar: Option<StagedFile>,
    ) -> Result<Option<String>, ApiError> {
        let mut form = Form::new()
            .text("firstName", details.first_name.clone())
            .text("lastName", details.last_name.clone())
            .text("email", details.email.clone())
            .text("phone", details.phone.clone());
        if let Some(file) = avatar {
            form = form.part("avatar", file.into_part()?);
        }
        let updated: Option<UpdatedAccount> = self
            .send_multipart(Method::PUT, "/auth/updatedetails", form)
            .await?;
        Ok(updated.and_then(|u| u.avatar).filter(|a| !a.is_empty()))
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.send_ack(Method::PUT, "/auth/changepassword", change)
            .await
    }
}

impl StagedFile {
    pub(crate) fn into_part(self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.name)
            .mime_str(&self.mime)?)
    }
}
