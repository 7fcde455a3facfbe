use reqwest::Method;
use serde_json::json;
use tracing::warn;

use super::{ApiClient, ApiError};
use crate::models::{Assessment, Course, NewAssessment, SubmittedAssessment};

impl ApiClient {
    pub async fn assessments(&self, course_id: &str) -> Result<Vec<Assessment>, ApiError> {
        self.get_list(&format!("/instructors/courses/{course_id}/assessments"))
            .await
    }

    pub async fn assessment(
        &self,
        course_id: &str,
        assessment_id: &str,
    ) -> Result<Assessment, ApiError> {
        self.get_data(&format!(
            "/instructors/courses/{course_id}/assessments/{assessment_id}"
        ))
        .await
    }

    pub async fn create_assessment(
        &self,
        course_id: &str,
        assessment: &NewAssessment,
    ) -> Result<Assessment, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/instructors/courses/{course_id}/assessments"),
            assessment,
        )
        .await
    }

    pub async fn set_assessment_published(
        &self,
        course_id: &str,
        assessment_id: &str,
        published: bool,
    ) -> Result<(), ApiError> {
        self.send_ack(
            Method::PUT,
            &format!("/instructors/courses/{course_id}/assessments/{assessment_id}"),
            &json!({ "isPublished": published }),
        )
        .await
    }

    pub async fn delete_assessment(
        &self,
        course_id: &str,
        assessment_id: &str,
    ) -> Result<(), ApiError> {
        self.delete(&format!(
            "/instructors/courses/{course_id}/assessments/{assessment_id}"
        ))
        .await
    }

    pub async fn submitted_assessments(
        &self,
        course_id: &str,
    ) -> Result<Vec<SubmittedAssessment>, ApiError> {
        self.get_list(&format!(
            "/instructors/courses/{course_id}/assessments/submitted"
        ))
        .await
    }

    /// Submissions for the given courses, each tagged with its course.
    pub async fn submissions_for(
        &self,
        courses: &[Course],
    ) -> Result<Vec<SubmittedAssessment>, ApiError> {
        let mut all = Vec::new();
        for course in courses {
            match self.submitted_assessments(&course.id).await {
                Ok(list) => all.extend(list.into_iter().map(|mut s| {
                    s.course_id = course.id.clone();
                    s.course_title = course.title.clone();
                    s
                })),
                Err(e) if e.is_unauthorized() => return Err(e),
                Err(e) => warn!(course = %course.id, error = %e, "skipping submissions of course"),
            }
        }
        Ok(all)
    }
}
