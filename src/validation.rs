//! Form state and the checks run before anything is sent.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;
use thiserror::Error;

use crate::api::StagedFile;
use crate::models::{
    AccountDetails, CourseDraft, CourseNotification, NewAssessment, NewLiveClass,
    NotificationType, PasswordChange, ProfileUpdate, Question, SocialLinks, UserNotification,
};

pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: usize = 100 * 1024 * 1024;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid phone regex"));
static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(www\.)?linkedin\.com/in/[a-zA-Z0-9-]+/?$").expect("valid linkedin regex")
});
static TWITTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(www\.)?(twitter|x)\.com/[a-zA-Z0-9_]+/?$").expect("valid twitter regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("First name and last name are required")]
    NameRequired,
    #[error("A valid email is required")]
    Email,
    #[error("Phone number must be 10 digits")]
    Phone,
    #[error("Invalid LinkedIn URL")]
    LinkedIn,
    #[error("Invalid Twitter/X URL")]
    Twitter,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("{0} must be a non-negative number")]
    NotANumber(&'static str),
    #[error("Discount price cannot exceed the price")]
    DiscountTooHigh,
    #[error("Passing score cannot exceed total points")]
    PassingScoreTooHigh,
    #[error("The start time must be in the future")]
    StartInPast,
    #[error("Duration must be greater than zero")]
    ZeroDuration,
    #[error("Select at least one recipient")]
    NoRecipients,
    #[error("Only JPEG, PNG, or GIF images are allowed.")]
    NotAnImage,
    #[error("Image size must be less than 5MB.")]
    ImageTooLarge,
    #[error("Only MP4 videos are allowed.")]
    NotMp4,
    #[error("Video size must be less than 100MB.")]
    VideoTooLarge,
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn is_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

pub fn is_linkedin(value: &str) -> bool {
    LINKEDIN_RE.is_match(value)
}

pub fn is_twitter(value: &str) -> bool {
    TWITTER_RE.is_match(value)
}

/// Splits on commas, trimming entries and dropping empty ones.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// First word is the first name, the rest is the last name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut words = full_name.split_whitespace();
    let first = words.next().unwrap_or_default().to_string();
    let last = words.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// Adds a trimmed tag unless it is blank or already present.
pub fn add_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let tag = tag.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

fn required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

fn non_negative(value: &str, field: &'static str) -> Result<f64, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or(ValidationError::NotANumber(field))
}

fn whole_number(value: &str, field: &'static str) -> Result<u32, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<u32>()
        .map_err(|_| ValidationError::NotANumber(field))
}

/// Profile tab: personal details, bio, expertise and social links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub bio: String,
    pub expertise: Vec<String>,
    pub new_expertise: String,
    pub linkedin: String,
    pub twitter: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(AccountDetails, ProfileUpdate), ValidationError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if !is_email(&self.email) {
            return Err(ValidationError::Email);
        }
        if !self.phone.is_empty() && !is_phone(&self.phone) {
            return Err(ValidationError::Phone);
        }
        if !self.linkedin.is_empty() && !is_linkedin(&self.linkedin) {
            return Err(ValidationError::LinkedIn);
        }
        if !self.twitter.is_empty() && !is_twitter(&self.twitter) {
            return Err(ValidationError::Twitter);
        }
        Ok((
            AccountDetails {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                email: self.email.trim().to_string(),
                phone: self.phone.clone(),
            },
            ProfileUpdate {
                bio: self.bio.clone(),
                expertise: self.expertise.clone(),
                social_links: SocialLinks {
                    linkedin: self.linkedin.clone(),
                    twitter: self.twitter.clone(),
                },
            },
        ))
    }
}

/// Account tab: display name, email and an optional password change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl AccountForm {
    pub fn validate(&self) -> Result<(AccountDetails, Option<PasswordChange>), ValidationError> {
        if self.new_password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        let (first_name, last_name) = split_full_name(&self.full_name);
        if first_name.is_empty() {
            return Err(ValidationError::Required("Full name"));
        }
        if !self.email.is_empty() && !is_email(&self.email) {
            return Err(ValidationError::Email);
        }
        let details = AccountDetails {
            first_name,
            last_name,
            email: self.email.trim().to_string(),
            phone: self.phone.clone(),
        };
        let password = (!self.current_password.is_empty() && !self.new_password.is_empty())
            .then(|| PasswordChange {
                current_password: self.current_password.clone(),
                new_password: self.new_password.clone(),
            });
        Ok((details, password))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseForm {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub category: String,
    pub sub_category: String,
    pub language: String,
    pub level: String,
    pub duration: String,
    pub price: String,
    pub discount_price: String,
    pub prerequisites: String,
    pub learning_outcomes: String,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            category: String::new(),
            sub_category: String::new(),
            language: "English".to_string(),
            level: String::new(),
            duration: String::new(),
            price: String::new(),
            discount_price: String::new(),
            prerequisites: String::new(),
            learning_outcomes: String::new(),
        }
    }
}

impl CourseForm {
    pub fn validate(&self) -> Result<CourseDraft, ValidationError> {
        required(&self.title, "Title")?;
        required(&self.description, "Description")?;
        required(&self.category, "Category")?;
        required(&self.level, "Level")?;
        let price = non_negative(&self.price, "Price")?;
        let discount_price = non_negative(&self.discount_price, "Discount price")?;
        if discount_price > price {
            return Err(ValidationError::DiscountTooHigh);
        }
        Ok(CourseDraft {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            sub_category: self.sub_category.trim().to_string(),
            language: self.language.trim().to_string(),
            level: self.level.trim().to_string(),
            duration: self.duration.trim().to_string(),
            price,
            discount_price,
            prerequisites: split_list(&self.prerequisites),
            learning_outcomes: split_list(&self.learning_outcomes),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Audience {
    #[default]
    Students,
    Course,
}

impl Audience {
    pub const ALL: [Audience; 2] = [Audience::Students, Audience::Course];
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Audience::Students => write!(f, "Selected students"),
            Audience::Course => write!(f, "Everyone in a course"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationForm {
    pub audience: Audience,
    pub user_ids: Vec<String>,
    pub course_id: Option<String>,
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
    pub related_entity: String,
    pub related_entity_model: String,
    pub action_url: String,
}

#[derive(Debug)]
pub enum NotificationTarget {
    Users(UserNotification),
    Course(String, CourseNotification),
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl NotificationForm {
    pub fn toggle_user(&mut self, id: &str) {
        if let Some(pos) = self.user_ids.iter().position(|u| u == id) {
            self.user_ids.remove(pos);
        } else {
            self.user_ids.push(id.to_string());
        }
    }

    pub fn validate(&self) -> Result<NotificationTarget, ValidationError> {
        required(&self.title, "Title")?;
        required(&self.message, "Message")?;
        match self.audience {
            Audience::Students => {
                if self.user_ids.is_empty() {
                    return Err(ValidationError::NoRecipients);
                }
                Ok(NotificationTarget::Users(UserNotification {
                    user: self.user_ids.clone(),
                    title: self.title.trim().to_string(),
                    message: self.message.trim().to_string(),
                    kind: self.kind,
                    related_entity: optional(&self.related_entity),
                    related_entity_model: optional(&self.related_entity_model),
                    action_url: optional(&self.action_url),
                }))
            }
            Audience::Course => {
                let course_id = self
                    .course_id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .ok_or(ValidationError::Required("Course"))?;
                Ok(NotificationTarget::Course(
                    course_id,
                    CourseNotification {
                        title: self.title.trim().to_string(),
                        message: self.message.trim().to_string(),
                        kind: self.kind,
                        action_url: optional(&self.action_url),
                    },
                ))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentForm {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub total_points: String,
    pub passing_score: String,
    pub time_limit: String,
    pub publish: bool,
    pub questions: Vec<Question>,
    pub new_question: String,
    pub new_question_points: String,
}

impl AssessmentForm {
    pub fn add_question(&mut self) -> Result<(), ValidationError> {
        required(&self.new_question, "Question")?;
        let points = whole_number(&self.new_question_points, "Points")?;
        self.questions.push(Question {
            question: self.new_question.trim().to_string(),
            points,
        });
        self.new_question.clear();
        self.new_question_points.clear();
        Ok(())
    }

    pub fn validate(&self) -> Result<NewAssessment, ValidationError> {
        required(&self.title, "Title")?;
        let due = self.due_date.ok_or(ValidationError::Required("Due date"))?;
        let total_points = whole_number(&self.total_points, "Total points")?;
        let passing_score = whole_number(&self.passing_score, "Passing score")?;
        let time_limit = whole_number(&self.time_limit, "Time limit")?;
        if passing_score > total_points {
            return Err(ValidationError::PassingScoreTooHigh);
        }
        let end_of_day = due
            .and_hms_opt(23, 59, 59)
            .ok_or(ValidationError::Required("Due date"))?;
        Ok(NewAssessment {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            due_date: Utc.from_utc_datetime(&end_of_day),
            total_points,
            passing_score,
            time_limit,
            is_published: self.publish,
            questions: self.questions.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveClassForm {
    pub title: String,
    pub course_id: Option<String>,
    pub date: Option<NaiveDate>,
    /// `HH:MM`, UTC.
    pub time: String,
    pub duration_minutes: String,
}

impl Default for LiveClassForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            course_id: None,
            date: None,
            time: "10:00".to_string(),
            duration_minutes: "60".to_string(),
        }
    }
}

impl LiveClassForm {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<NewLiveClass, ValidationError> {
        required(&self.title, "Title")?;
        let course_id = self
            .course_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::Required("Course"))?;
        let date = self.date.ok_or(ValidationError::Required("Date"))?;
        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
            .map_err(|_| ValidationError::Required("Start time"))?;
        let scheduled_at = Utc.from_utc_datetime(&date.and_time(time));
        if scheduled_at <= now {
            return Err(ValidationError::StartInPast);
        }
        let duration_minutes = whole_number(&self.duration_minutes, "Duration")?;
        if duration_minutes == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(NewLiveClass {
            title: self.title.trim().to_string(),
            course_id,
            scheduled_at,
            duration_minutes,
        })
    }
}

/// Thumbnails only have to decode as a supported image.
pub fn check_thumbnail(file: &StagedFile) -> Result<(), ValidationError> {
    match image::guess_format(&file.bytes) {
        Ok(image::ImageFormat::Png | image::ImageFormat::Jpeg | image::ImageFormat::Gif) => Ok(()),
        _ => Err(ValidationError::NotAnImage),
    }
}

pub fn check_avatar(file: &StagedFile) -> Result<(), ValidationError> {
    check_thumbnail(file)?;
    if file.size() > MAX_AVATAR_BYTES {
        return Err(ValidationError::ImageTooLarge);
    }
    Ok(())
}

/// MP4 is recognised by its `ftyp` box at offset 4.
pub fn check_video(file: &StagedFile) -> Result<(), ValidationError> {
    let is_mp4 = file.bytes.get(4..8) == Some(b"ftyp".as_slice())
        && file.name.to_ascii_lowercase().ends_with(".mp4");
    if !is_mp4 {
        return Err(ValidationError::NotMp4);
    }
    if file.size() > MAX_VIDEO_BYTES {
        return Err(ValidationError::VideoTooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    fn valid_profile() -> ProfileForm {
        ProfileForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn profile_rules() {
        assert!(valid_profile().validate().is_ok());

        let mut form = valid_profile();
        form.email = "ada@example".into();
        assert_eq!(form.validate().unwrap_err(), ValidationError::Email);

        let mut form = valid_profile();
        form.phone = "12345".into();
        assert_eq!(form.validate().unwrap_err(), ValidationError::Phone);
        form.phone = "0123456789".into();
        assert!(form.validate().is_ok());

        let mut form = valid_profile();
        form.linkedin = "https://linkedin.com/company/acme".into();
        assert_eq!(form.validate().unwrap_err(), ValidationError::LinkedIn);
        form.linkedin = "https://www.linkedin.com/in/ada-l/".into();
        form.twitter = "https://x.com/ada_l".into();
        assert!(form.validate().is_ok());
        form.twitter = "https://mastodon.social/@ada".into();
        assert_eq!(form.validate().unwrap_err(), ValidationError::Twitter);

        let mut form = valid_profile();
        form.last_name = " ".into();
        assert_eq!(form.validate().unwrap_err(), ValidationError::NameRequired);
    }

    #[test]
    fn account_splits_name_and_checks_passwords() {
        let mut form = AccountForm {
            full_name: "  Mary Ann  van Dyke ".into(),
            ..Default::default()
        };
        let (details, password) = form.validate().unwrap();
        assert_eq!(details.first_name, "Mary");
        assert_eq!(details.last_name, "Ann van Dyke");
        assert!(password.is_none());

        form.current_password = "old".into();
        form.new_password = "new-secret".into();
        form.confirm_password = "new-secre".into();
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::PasswordMismatch
        );
        form.confirm_password = "new-secret".into();
        assert!(form.validate().unwrap().1.is_some());
    }

    #[test]
    fn course_form_rules() {
        let mut form = CourseForm {
            title: "Rust".into(),
            description: "Systems".into(),
            category: "Programming".into(),
            level: "Beginner".into(),
            price: "100".into(),
            discount_price: "20".into(),
            prerequisites: " git, , cargo ,".into(),
            ..Default::default()
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.price, 100.0);
        assert_eq!(draft.prerequisites, ["git", "cargo"]);
        assert_eq!(draft.language, "English");

        form.discount_price = "120".into();
        assert_eq!(form.validate().unwrap_err(), ValidationError::DiscountTooHigh);
        form.discount_price = "-1".into();
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::NotANumber("Discount price")
        );
        form.category.clear();
        assert_eq!(form.validate().unwrap_err(), ValidationError::Required("Category"));
    }

    #[test]
    fn notification_needs_recipients() {
        let mut form = NotificationForm {
            title: "Heads up".into(),
            message: "Class moved".into(),
            ..Default::default()
        };
        assert_eq!(form.validate().err(), Some(ValidationError::NoRecipients));

        form.toggle_user("s1");
        form.toggle_user("s2");
        form.toggle_user("s1");
        match form.validate() {
            Ok(NotificationTarget::Users(n)) => assert_eq!(n.user, ["s2"]),
            _ => panic!("expected user notification"),
        }

        form.audience = Audience::Course;
        assert_eq!(form.validate().err(), Some(ValidationError::Required("Course")));
        form.course_id = Some("c1".into());
        assert!(matches!(form.validate(), Ok(NotificationTarget::Course(id, _)) if id == "c1"));
    }

    #[test]
    fn assessment_passing_score_bounded() {
        let mut form = AssessmentForm {
            title: "Quiz".into(),
            total_points: "10".into(),
            passing_score: "12".into(),
            ..Default::default()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::Required("Due date"));
        form.due_date = NaiveDate::from_ymd_opt(2030, 5, 1);
        assert_eq!(form.validate().unwrap_err(), ValidationError::PassingScoreTooHigh);
        form.passing_score = "6".into();
        assert_eq!(form.validate().unwrap().total_points, 10);
    }

    #[test]
    fn live_class_must_start_in_future() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        let mut form = LiveClassForm {
            title: "Office hours".into(),
            course_id: Some("c1".into()),
            date: NaiveDate::from_ymd_opt(2030, 1, 1),
            time: "11:00".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(now).unwrap_err(), ValidationError::StartInPast);
        form.time = "13:30".into();
        let class = form.validate(now).unwrap();
        assert_eq!(class.duration_minutes, 60);
        form.duration_minutes = "0".into();
        assert_eq!(form.validate(now).unwrap_err(), ValidationError::ZeroDuration);
    }

    #[test]
    fn file_checks() {
        let png = StagedFile::new("a.png", PNG_HEADER.to_vec());
        assert!(check_thumbnail(&png).is_ok());
        assert!(check_avatar(&png).is_ok());

        let text = StagedFile::new("a.png", b"hello world".to_vec());
        assert_eq!(check_thumbnail(&text), Err(ValidationError::NotAnImage));

        let mut big = PNG_HEADER.to_vec();
        big.resize(MAX_AVATAR_BYTES + 1, 0);
        let big = StagedFile::new("big.png", big);
        assert_eq!(check_avatar(&big), Err(ValidationError::ImageTooLarge));

        let mp4 = StagedFile::new("talk.mp4", b"\0\0\0\x18ftypmp42".to_vec());
        assert!(check_video(&mp4).is_ok());
        let renamed = StagedFile::new("talk.mp4", b"RIFF0000AVI ".to_vec());
        assert_eq!(check_video(&renamed), Err(ValidationError::NotMp4));
    }

    #[test]
    fn tags_are_deduplicated() {
        let mut tags = vec!["Rust".to_string()];
        assert!(!add_tag(&mut tags, " Rust "));
        assert!(!add_tag(&mut tags, "  "));
        assert!(add_tag(&mut tags, "Go"));
        assert_eq!(tags, ["Rust", "Go"]);
    }
}
