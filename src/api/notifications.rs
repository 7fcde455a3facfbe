use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{CourseNotification, UserNotification};

impl ApiClient {
    pub async fn notify_users(&self, notification: &UserNotification) -> Result<(), ApiError> {
        self.send_ack(Method::POST, "/notifications", notification)
            .await
    }

    pub async fn notify_course(
        &self,
        course_id: &str,
        notification: &CourseNotification,
    ) -> Result<(), ApiError> {
        self.send_ack(
            Method::POST,
            &format!("/notifications/course/{course_id}"),
            notification,
        )
        .await
    }
}
