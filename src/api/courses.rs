use std::path::Path;

use reqwest::Method;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{ApiClient, ApiError};
use crate::metrics;
use crate::models::{Course, CourseDraft, CourseStatus, EnrolledStudent, Enrollment};

/// A file picked from disk and held in memory until its parent record exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for(&name).to_string();
        Self { name, bytes, mime }
    }

    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

fn mime_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

/// Metadata sent along with a lecture video.
#[derive(Debug, Clone, PartialEq)]
pub struct LectureUpload {
    pub section_id: String,
    pub lecture_id: String,
    pub title: String,
    pub description: String,
    pub duration: u32,
    pub is_preview: bool,
}

#[derive(Debug, Deserialize)]
struct ThumbnailResponse {
    #[serde(default)]
    thumbnail: Option<String>,
}

impl ApiClient {
    pub async fn courses(&self, period_days: Option<u32>) -> Result<Vec<Course>, ApiError> {
        let path = match period_days {
            Some(days) => format!("/instructors/courses?period={days}"),
            None => "/instructors/courses".to_string(),
        };
        self.get_list(&path).await
    }

    pub async fn course(&self, course_id: &str) -> Result<Course, ApiError> {
        self.get_data(&format!("/instructors/courses/{course_id}"))
            .await
    }

    pub async fn create_course(&self, draft: &CourseDraft) -> Result<Course, ApiError> {
        self.send_json(Method::POST, "/instructors/courses", draft)
            .await
    }

    pub async fn set_course_status(
        &self,
        course_id: &str,
        status: CourseStatus,
    ) -> Result<(), ApiError> {
        self.send_ack(
            Method::PUT,
            &format!("/instructors/courses/{course_id}"),
            &json!({ "status": status }),
        )
        .await
    }

    pub async fn delete_course(&self, course_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/instructors/courses/{course_id}"))
            .await
    }

    /// Returns the stored thumbnail URL when the backend echoes it.
    pub async fn upload_thumbnail(
        &self,
        course_id: &str,
        file: StagedFile,
    ) -> Result<Option<String>, ApiError> {
        let form = Form::new().part("thumbnail", file.into_part()?);
        let response: Option<ThumbnailResponse> = self
            .send_multipart(
                Method::POST,
                &format!("/instructors/courses/{course_id}/thumbnail"),
                form,
            )
            .await?;
        Ok(response.and_then(|r| r.thumbnail))
    }

    pub async fn upload_lecture_content(
        &self,
        course_id: &str,
        lecture: &LectureUpload,
        video: StagedFile,
    ) -> Result<(), ApiError> {
        let form = Form::new()
            .text("sectionId", lecture.section_id.clone())
            .text("lectureId", lecture.lecture_id.clone())
            .text("title", lecture.title.clone())
            .text("description", lecture.description.clone())
            .text("type", "video")
            .text("isPreview", lecture.is_preview.to_string())
            .text("duration", lecture.duration.to_string())
            .part("content", video.into_part()?);
        self.send_multipart::<serde_json::Value>(
            Method::POST,
            &format!("/instructors/courses/{course_id}/content"),
            form,
        )
        .await?;
        Ok(())
    }

    pub async fn course_students(&self, course_id: &str) -> Result<Vec<Enrollment>, ApiError> {
        self.get_list(&format!("/instructors/courses/{course_id}/students"))
            .await
    }

    /// Students across every course, one lookup per course in order. A course
    /// whose lookup fails is skipped; a rejected session aborts the whole pass.
    pub async fn enrolled_students(
        &self,
        courses: &[Course],
    ) -> Result<Vec<EnrolledStudent>, ApiError> {
        let mut per_course = Vec::with_capacity(courses.len());
        for course in courses {
            match self.course_students(&course.id).await {
                Ok(enrollments) => per_course.push((course.title.clone(), enrollments)),
                Err(e) if e.is_unauthorized() => return Err(e),
                Err(e) => warn!(course = %course.id, error = %e, "skipping students of course"),
            }
        }
        Ok(metrics::merge_students(&per_course))
    }

    /// Course list with each entry replaced by its detail record, which is the
    /// only place the curriculum is returned. Detail failures keep the summary.
    pub async fn courses_with_curriculum(&self) -> Result<Vec<Course>, ApiError> {
        let summaries = self.courses(None).await?;
        let mut detailed = Vec::with_capacity(summaries.len());
        for summary in summaries {
            match self.course(&summary.id).await {
                Ok(course) => detailed.push(course),
                Err(e) if e.is_unauthorized() => return Err(e),
                Err(e) => {
                    debug!(course = %summary.id, error = %e, "no curriculum detail");
                    detailed.push(summary);
                }
            }
        }
        Ok(detailed)
    }
}
