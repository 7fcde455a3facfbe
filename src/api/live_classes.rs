use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{JoinInfo, LiveClass, NewLiveClass};

impl ApiClient {
    /// Scheduled classes, soonest first.
    pub async fn live_classes(&self) -> Result<Vec<LiveClass>, ApiError> {
        let mut classes: Vec<LiveClass> = self.get_list("/instructors/live-classes").await?;
        classes.sort_by_key(|c| c.scheduled_at);
        Ok(classes)
    }

    pub async fn schedule_live_class(&self, class: &NewLiveClass) -> Result<LiveClass, ApiError> {
        self.send_json(Method::POST, "/instructors/live-classes", class)
            .await
    }

    pub async fn join_live_class(&self, class_id: &str) -> Result<JoinInfo, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/instructors/live-classes/{class_id}/join"),
            &serde_json::json!({}),
        )
        .await
    }
}
