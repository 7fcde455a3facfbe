use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts a JSON string, number or null; the backend is not consistent.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Published,
    #[default]
    Draft,
}

impl CourseStatus {
    pub fn toggled(self) -> Self {
        match self {
            CourseStatus::Published => CourseStatus::Draft,
            CourseStatus::Draft => CourseStatus::Published,
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CourseStatus::Published => write!(f, "Published"),
            CourseStatus::Draft => write!(f, "Draft"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u32,
    #[serde(default)]
    pub content: Option<LectureContent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_preview: bool,
}

impl Lecture {
    pub fn video_url(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Lecture length as `m:ss`.
    pub fn display_time(&self) -> String {
        format!("{}:{:02}", self.duration / 60, self.duration % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub section_title: String,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub level: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub discount_price: f64,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CourseStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_ratings: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_students: u32,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub curriculum: Vec<Section>,
}

/// Body of a course creation request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub category: String,
    pub sub_category: String,
    pub language: String,
    pub level: String,
    pub duration: String,
    pub price: f64,
    pub discount_price: f64,
    pub prerequisites: Vec<String>,
    pub learning_outcomes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_points: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub passing_score: u32,
    /// Minutes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_limit: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssessment {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub total_points: u32,
    pub passing_score: u32,
    pub time_limit: u32,
    pub is_published: bool,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl StudentRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub submission_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAssessment {
    pub assessment_id: String,
    pub assessment_title: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub student: StudentRef,
    #[serde(default)]
    pub submission: Submission,
    /// Filled in client-side from the course the list was fetched for.
    #[serde(default, skip_serializing)]
    pub course_id: String,
    #[serde(default, skip_serializing)]
    pub course_title: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub student: StudentRef,
    #[serde(default)]
    pub enrollment_date: Option<DateTime<Utc>>,
}

/// A student row on the dashboard, flattened from an enrollment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrolledStudent {
    pub id: String,
    pub name: String,
    pub email: String,
    pub course_title: String,
    pub enrollment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Enrollment id.
    #[serde(rename = "_id")]
    pub id: String,
    pub student: StudentRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_progress: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificate_issued: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateCandidate {
    pub student_id: String,
    pub student_name: String,
    pub course_id: String,
    pub course_title: String,
    pub enrollment_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub student_id: String,
    pub course_id: String,
    pub enrollment_id: String,
}

impl From<&CertificateCandidate> for CertificateRequest {
    fn from(candidate: &CertificateCandidate) -> Self {
        Self {
            student_id: candidate.student_id.clone(),
            course_id: candidate.course_id.clone(),
            enrollment_id: candidate.enrollment_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_earnings: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub twitter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
}

impl InstructorProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect::<String>()
            .to_uppercase()
    }
}

/// Fields sent to `PUT /instructors/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub bio: String,
    pub expertise: Vec<String>,
    pub social_links: SocialLinks,
}

/// Fields sent to `PUT /auth/updatedetails`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    System,
    Course,
    Assessment,
    Announcement,
}

impl NotificationType {
    pub const ALL: [NotificationType; 4] = [
        NotificationType::System,
        NotificationType::Course,
        NotificationType::Assessment,
        NotificationType::Announcement,
    ];
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            NotificationType::System => "System",
            NotificationType::Course => "Course",
            NotificationType::Assessment => "Assessment",
            NotificationType::Announcement => "Announcement",
        };
        write!(f, "{label}")
    }
}

/// Notification addressed to individual students.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotification {
    pub user: Vec<String>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entity_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// Notification broadcast to every student of a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseNotification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveClassStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

impl fmt::Display for LiveClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            LiveClassStatus::Scheduled => "Scheduled",
            LiveClassStatus::Live => "Live",
            LiveClassStatus::Completed => "Completed",
            LiveClassStatus::Cancelled => "Cancelled",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveClass {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub course_id: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub meeting_url: Option<String>,
    #[serde(default)]
    pub status: LiveClassStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLiveClass {
    pub title: String,
    pub course_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinInfo {
    pub join_url: String,
}
