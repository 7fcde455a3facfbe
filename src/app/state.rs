use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use iced::widget::image::Handle;
use iced_aw::date_picker::Date;

use crate::api::{ApiClient, ProgressOverview, StagedFile};
use crate::app::messages::Generation;
use crate::config::{Preferences, Settings, SidebarBehavior};
use crate::fetch::Remote;
use crate::models::{
    Assessment, Course, CourseStatus, EnrolledStudent, Earnings, InstructorProfile, LiveClass,
    SubmittedAssessment,
};
use crate::session::SessionStore;
use crate::toast::{ToastSlot, ANALYTICS_TOAST_TTL};
use crate::validation::{
    AccountForm, AssessmentForm, CourseForm, LiveClassForm, NotificationForm, ProfileForm,
};

pub const ASSIGNMENTS_PER_PAGE: usize = 10;
pub const LOGIN_REDIRECT_MS: u64 = 1500;
pub const COURSE_REDIRECT_MS: u64 = 3000;

/// Everything a screen needs to talk to the outside world.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub api: ApiClient,
    pub session: SessionStore,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Dashboard,
    MyCourses,
    CoursePlayer,
    CourseAssessments,
    CreateCourse,
    Assignments,
    Analytics,
    LiveClasses,
    Settings,
}

impl Screen {
    /// Header title and subtitle.
    pub fn heading(self) -> (&'static str, &'static str) {
        match self {
            Screen::Login => ("Sign in", ""),
            Screen::Dashboard => ("Dashboard", "Overview of your teaching activity"),
            Screen::MyCourses => ("My Courses", "Manage and publish your courses"),
            Screen::CoursePlayer => ("Course Content", "Browse sections and lectures"),
            Screen::CourseAssessments => ("Assessments", "Quizzes and assignments of a course"),
            Screen::CreateCourse => ("Create Course", "Describe your new course"),
            Screen::Assignments => ("Assignments", "Submissions from your students"),
            Screen::Analytics => ("Analytics", "Revenue, ratings and completion"),
            Screen::LiveClasses => ("Live Classes", "Schedule and join live sessions"),
            Screen::Settings => ("Settings", "Profile, account and preferences"),
        }
    }
}

/// Pick list entry for a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOption {
    pub id: String,
    pub title: String,
}

impl CourseOption {
    pub fn all(courses: &[Course]) -> Vec<CourseOption> {
        courses
            .iter()
            .map(|c| CourseOption {
                id: c.id.clone(),
                title: c.title.clone(),
            })
            .collect()
    }
}

impl fmt::Display for CourseOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

pub fn to_naive(date: Date) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year, date.month, date.day)
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub loading: bool,
}

/// Published course and student counts seen on the last dashboard visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub students: usize,
    pub published: usize,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub courses: Remote<Vec<Course>>,
    pub students: Remote<Vec<EnrolledStudent>>,
    /// Counts from the previous visit, the base of the increments.
    pub baseline: Option<DashboardCounts>,
    pub show_notify: bool,
    pub notify: NotificationForm,
    pub notify_error: Option<String>,
    pub sending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] =
        [StatusFilter::All, StatusFilter::Published, StatusFilter::Draft];

    pub fn matches(self, status: CourseStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Published => status == CourseStatus::Published,
            StatusFilter::Draft => status == CourseStatus::Draft,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::Published => write!(f, "Published"),
            StatusFilter::Draft => write!(f, "Draft"),
        }
    }
}

#[derive(Debug, Default)]
pub struct MyCoursesState {
    pub courses: Remote<Vec<Course>>,
    pub search: String,
    pub status_filter: StatusFilter,
    pub confirm_delete: Option<String>,
}

impl MyCoursesState {
    pub fn visible(&self) -> Vec<&Course> {
        let needle = self.search.trim().to_lowercase();
        self.courses
            .items()
            .iter()
            .filter(|c| self.status_filter.matches(c.status))
            .filter(|c| {
                needle.is_empty()
                    || c.title.to_lowercase().contains(&needle)
                    || c.subtitle.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureRef {
    pub section_id: String,
    pub lecture_id: String,
}

#[derive(Debug, Default)]
pub struct PlayerState {
    pub course_id: String,
    pub course: Remote<Course>,
    pub collapsed: HashSet<String>,
    pub selected: Option<LectureRef>,
    pub video: Option<StagedFile>,
    pub uploading: bool,
    pub upload_status: Option<String>,
}

impl PlayerState {
    pub fn selected_lecture(&self) -> Option<(&crate::models::Section, &crate::models::Lecture)> {
        let selected = self.selected.as_ref()?;
        let course = self.course.get()?;
        let section = course
            .curriculum
            .iter()
            .find(|s| s.id == selected.section_id)?;
        let lecture = section
            .lectures
            .iter()
            .find(|l| l.id == selected.lecture_id)?;
        Some((section, lecture))
    }
}

#[derive(Debug, Default)]
pub struct CourseAssessmentsState {
    pub course_id: String,
    pub course_title: String,
    pub assessments: Remote<Vec<Assessment>>,
    pub confirm_delete: Option<String>,
    pub show_form: bool,
    pub form: AssessmentForm,
    pub show_date_picker: bool,
    pub form_error: Option<String>,
    pub saving: bool,
}

#[derive(Debug, Default)]
pub struct CreateCourseState {
    pub form: CourseForm,
    pub thumbnail: Option<StagedFile>,
    pub thumbnail_preview: Option<Handle>,
    pub show_preview: bool,
    pub saving: bool,
    pub error: Option<String>,
    /// Progress of the create-then-upload sequence.
    pub status: Option<String>,
    /// Bumped on every mount; replies and timers from an older visit are dropped.
    pub visit: Generation,
}

impl CreateCourseState {
    /// A blank form for the next visit.
    pub fn next_visit(&self) -> Self {
        Self {
            visit: self.visit + 1,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionFilter {
    #[default]
    All,
    Active,
    PastDue,
    Completed,
}

impl SubmissionFilter {
    pub const ALL: [SubmissionFilter; 4] = [
        SubmissionFilter::All,
        SubmissionFilter::Active,
        SubmissionFilter::PastDue,
        SubmissionFilter::Completed,
    ];

    pub fn matches(self, submission: &SubmittedAssessment) -> bool {
        let status = submission.submission.status.to_lowercase();
        match self {
            SubmissionFilter::All => true,
            SubmissionFilter::Active => status == "submitted",
            SubmissionFilter::PastDue => status == "late",
            SubmissionFilter::Completed => submission.submission.score.is_some(),
        }
    }
}

impl fmt::Display for SubmissionFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubmissionFilter::All => write!(f, "All"),
            SubmissionFilter::Active => write!(f, "Active"),
            SubmissionFilter::PastDue => write!(f, "Past due"),
            SubmissionFilter::Completed => write!(f, "Completed"),
        }
    }
}

/// Course selector on the assignments screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CourseChoice {
    #[default]
    All,
    One(CourseOption),
}

impl fmt::Display for CourseChoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CourseChoice::All => write!(f, "All courses"),
            CourseChoice::One(option) => write!(f, "{option}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct AssignmentsState {
    pub courses: Remote<Vec<Course>>,
    pub submissions: Remote<Vec<SubmittedAssessment>>,
    pub course_choice: CourseChoice,
    pub search: String,
    pub filter: SubmissionFilter,
    pub due_date: Option<NaiveDate>,
    pub show_date_picker: bool,
    /// Zero-based.
    pub page: usize,
    pub confirm_delete: Option<(String, String)>,
}

impl AssignmentsState {
    pub fn filtered(&self) -> Vec<&SubmittedAssessment> {
        let needle = self.search.trim().to_lowercase();
        self.submissions
            .items()
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.assessment_title.to_lowercase().contains(&needle)
                    || s.student.full_name().to_lowercase().contains(&needle)
            })
            .filter(|s| self.filter.matches(s))
            .filter(|s| match self.due_date {
                Some(day) => s.due_date.map(|d| d.date_naive()) == Some(day),
                None => true,
            })
            .collect()
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(ASSIGNMENTS_PER_PAGE).max(1)
    }

    pub fn current_page(&self) -> Vec<&SubmittedAssessment> {
        let page = self.page.min(self.page_count() - 1);
        self.filtered()
            .into_iter()
            .skip(page * ASSIGNMENTS_PER_PAGE)
            .take(ASSIGNMENTS_PER_PAGE)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsPeriod(pub u32);

impl AnalyticsPeriod {
    pub const ALL: [AnalyticsPeriod; 4] = [
        AnalyticsPeriod(7),
        AnalyticsPeriod(30),
        AnalyticsPeriod(90),
        AnalyticsPeriod(365),
    ];
}

impl Default for AnalyticsPeriod {
    fn default() -> Self {
        AnalyticsPeriod(30)
    }
}

impl fmt::Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", crate::metrics::period_label(self.0))
    }
}

#[derive(Debug)]
pub struct AnalyticsState {
    pub period: AnalyticsPeriod,
    pub earnings: Remote<Earnings>,
    pub courses: Remote<Vec<Course>>,
    pub progress: Remote<ProgressOverview>,
    /// Enrollment ids with a certificate request in flight.
    pub approving: HashSet<String>,
    pub toast: ToastSlot,
    pub exporting: bool,
}

impl Default for AnalyticsState {
    fn default() -> Self {
        Self {
            period: AnalyticsPeriod::default(),
            earnings: Remote::default(),
            courses: Remote::default(),
            progress: Remote::default(),
            approving: HashSet::new(),
            toast: ToastSlot::new(ANALYTICS_TOAST_TTL),
            exporting: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct LiveClassesState {
    pub classes: Remote<Vec<LiveClass>>,
    pub courses: Remote<Vec<Course>>,
    pub form: LiveClassForm,
    pub show_date_picker: bool,
    pub form_error: Option<String>,
    pub saving: bool,
    pub joining: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    Profile,
    Account,
    Notifications,
    Appearance,
    Security,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 5] = [
        SettingsTab::Profile,
        SettingsTab::Account,
        SettingsTab::Notifications,
        SettingsTab::Appearance,
        SettingsTab::Security,
    ];
}

impl fmt::Display for SettingsTab {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            SettingsTab::Profile => "Profile",
            SettingsTab::Account => "Account",
            SettingsTab::Notifications => "Notifications",
            SettingsTab::Appearance => "Appearance",
            SettingsTab::Security => "Security",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSession {
    pub id: u32,
    pub name: String,
    pub device: String,
    pub is_current: bool,
}

impl DeviceSession {
    pub fn current() -> Self {
        Self {
            id: 1,
            name: "Current Session".to_string(),
            device: format!("Desktop app on {}", std::env::consts::OS),
            is_current: true,
        }
    }
}

#[derive(Debug)]
pub struct SettingsState {
    pub tab: SettingsTab,
    pub profile: Remote<InstructorProfile>,
    pub avatar_image: Option<Handle>,
    pub editable: bool,
    pub profile_form: ProfileForm,
    pub avatar: Option<StagedFile>,
    pub saving: bool,
    pub account_form: AccountForm,
    pub sessions: Vec<DeviceSession>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            tab: SettingsTab::default(),
            profile: Remote::default(),
            avatar_image: None,
            editable: false,
            profile_form: ProfileForm::default(),
            avatar: None,
            saving: false,
            account_form: AccountForm::default(),
            sessions: vec![DeviceSession::current()],
        }
    }
}

impl SettingsState {
    pub fn fill_forms(&mut self, profile: &InstructorProfile) {
        self.profile_form = ProfileForm {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            bio: profile.bio.clone(),
            expertise: profile.expertise.clone(),
            new_expertise: String::new(),
            linkedin: profile.social_links.linkedin.clone(),
            twitter: profile.social_links.twitter.clone(),
        };
        self.account_form = AccountForm {
            full_name: profile.full_name(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            ..AccountForm::default()
        };
    }
}

pub struct App {
    pub ctx: AppContext,
    pub screen: Screen,
    /// Collapsible sidebar state; ignored when the sidebar is always expanded.
    pub sidebar_open: bool,
    pub toast: ToastSlot,
    pub instructor: Remote<InstructorProfile>,
    pub last_dashboard_counts: Option<DashboardCounts>,
    pub login: LoginState,
    pub dashboard: DashboardState,
    pub my_courses: MyCoursesState,
    pub player: PlayerState,
    pub course_assessments: CourseAssessmentsState,
    pub create_course: CreateCourseState,
    pub assignments: AssignmentsState,
    pub analytics: AnalyticsState,
    pub live_classes: LiveClassesState,
    pub settings: SettingsState,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        let screen = if ctx.session.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        };
        Self {
            ctx,
            screen,
            sidebar_open: true,
            toast: ToastSlot::default(),
            instructor: Remote::default(),
            last_dashboard_counts: None,
            login: LoginState::default(),
            dashboard: DashboardState::default(),
            my_courses: MyCoursesState::default(),
            player: PlayerState::default(),
            course_assessments: CourseAssessmentsState::default(),
            create_course: CreateCourseState::default(),
            assignments: AssignmentsState::default(),
            analytics: AnalyticsState::default(),
            live_classes: LiveClassesState::default(),
            settings: SettingsState::default(),
        }
    }

    pub fn theme(&self) -> iced::Theme {
        self.ctx.preferences.theme.theme()
    }

    pub fn sidebar_expanded(&self) -> bool {
        self.ctx.preferences.sidebar == SidebarBehavior::Expanded || self.sidebar_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StudentRef, Submission};
    use chrono::{TimeZone, Utc};

    fn submission(
        title: &str,
        student: &str,
        status: &str,
        score: Option<f64>,
        day: u32,
    ) -> SubmittedAssessment {
        SubmittedAssessment {
            assessment_id: title.to_lowercase(),
            assessment_title: title.into(),
            due_date: Some(Utc.with_ymd_and_hms(2025, 4, day, 18, 0, 0).unwrap()),
            student: StudentRef {
                id: student.to_lowercase(),
                first_name: student.into(),
                last_name: "Doe".into(),
                email: String::new(),
            },
            submission: Submission {
                status: status.into(),
                score,
                submission_date: None,
            },
            course_id: "c1".into(),
            course_title: "Rust".into(),
        }
    }

    fn loaded(items: Vec<SubmittedAssessment>) -> AssignmentsState {
        let mut state = AssignmentsState::default();
        let generation = state.submissions.begin();
        state.submissions.resolve(generation, Ok(items));
        state
    }

    #[test]
    fn assignment_filters_combine() {
        let mut state = loaded(vec![
            submission("Quiz 1", "Ann", "Submitted", None, 1),
            submission("Quiz 2", "Bob", "Late", None, 2),
            submission("Essay", "Ann", "Graded", Some(9.0), 2),
        ]);
        assert_eq!(state.filtered().len(), 3);

        state.search = "ann".into();
        assert_eq!(state.filtered().len(), 2);

        state.filter = SubmissionFilter::Completed;
        let titles: Vec<&str> = state
            .filtered()
            .iter()
            .map(|s| s.assessment_title.as_str())
            .collect();
        assert_eq!(titles, ["Essay"]);

        state.search.clear();
        state.filter = SubmissionFilter::PastDue;
        assert_eq!(state.filtered().len(), 1);

        state.filter = SubmissionFilter::All;
        state.due_date = NaiveDate::from_ymd_opt(2025, 4, 2);
        assert_eq!(state.filtered().len(), 2);
    }

    #[test]
    fn assignments_paginate_by_ten() {
        let items = (0..23)
            .map(|i| submission(&format!("Quiz {i}"), "Ann", "Submitted", None, 1))
            .collect();
        let mut state = loaded(items);
        assert_eq!(state.page_count(), 3);
        assert_eq!(state.current_page().len(), 10);
        state.page = 2;
        assert_eq!(state.current_page().len(), 3);
        state.page = 9;
        assert_eq!(state.current_page().len(), 3);

        let empty = loaded(Vec::new());
        assert_eq!(empty.page_count(), 1);
        assert!(empty.current_page().is_empty());
    }

    #[test]
    fn my_courses_search_and_status() {
        let mut state = MyCoursesState::default();
        let generation = state.courses.begin();
        state.courses.resolve(
            generation,
            Ok(vec![
                Course {
                    id: "a".into(),
                    title: "Rust basics".into(),
                    status: CourseStatus::Published,
                    ..Default::default()
                },
                Course {
                    id: "b".into(),
                    title: "Go".into(),
                    subtitle: "Concurrency in Rust style".into(),
                    ..Default::default()
                },
            ]),
        );
        state.search = "RUST".into();
        assert_eq!(state.visible().len(), 2);
        state.status_filter = StatusFilter::Draft;
        let ids: Vec<&str> = state.visible().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["b"]);
    }
}
