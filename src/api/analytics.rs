use std::collections::HashMap;

use reqwest::Method;
use tracing::warn;

use super::{ApiClient, ApiError};
use crate::metrics;
use crate::models::{CertificateCandidate, CertificateRequest, Course, Earnings, ProgressRecord};

/// Progress of every course, as collected for the analytics screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressOverview {
    /// Completed enrollments still waiting for a certificate.
    pub candidates: Vec<CertificateCandidate>,
    /// Overall progress percentages keyed by course id.
    pub by_course: HashMap<String, Vec<f64>>,
}

impl ProgressOverview {
    pub fn completion_rate(&self, course_id: &str) -> u32 {
        self.by_course
            .get(course_id)
            .map(|values| metrics::completion_rate(values))
            .unwrap_or(0)
    }
}

impl ApiClient {
    pub async fn earnings(&self, period_days: u32) -> Result<Earnings, ApiError> {
        self.get_data(&format!("/instructors/earnings?period={period_days}"))
            .await
    }

    pub async fn course_progress(&self, course_id: &str) -> Result<Vec<ProgressRecord>, ApiError> {
        self.get_list(&format!("/progress/course/{course_id}"))
            .await
    }

    pub async fn progress_overview(
        &self,
        courses: &[Course],
    ) -> Result<ProgressOverview, ApiError> {
        let mut overview = ProgressOverview::default();
        for course in courses {
            match self.course_progress(&course.id).await {
                Ok(records) => {
                    overview.by_course.insert(
                        course.id.clone(),
                        records.iter().map(|r| r.overall_progress).collect(),
                    );
                    overview
                        .candidates
                        .extend(metrics::certificate_candidates(course, &records));
                }
                Err(e) if e.is_unauthorized() => return Err(e),
                Err(e) => warn!(course = %course.id, error = %e, "skipping progress of course"),
            }
        }
        Ok(overview)
    }

    pub async fn issue_certificate(
        &self,
        candidate: &CertificateCandidate,
    ) -> Result<(), ApiError> {
        self.send_ack(
            Method::POST,
            "/certificates",
            &CertificateRequest::from(candidate),
        )
        .await
    }
}
