use std::path::PathBuf;
use std::time::Instant;

use iced_aw::date_picker::Date;

use crate::api::{Failure, ProgressOverview, StagedFile};
use crate::app::state::{
    AnalyticsPeriod, CourseChoice, CourseOption, Screen, SettingsTab, StatusFilter,
    SubmissionFilter,
};
use crate::config::{SidebarBehavior, ThemeMode};
use crate::models::{
    Assessment, Course, EnrolledStudent, Earnings, InstructorProfile, JoinInfo, LiveClass,
    LoginResponse, NotificationType, SubmittedAssessment,
};
use crate::report::ExportFormat;
use crate::validation::Audience;

/// Generation a response was requested under.
pub type Generation = u64;

#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Screen),
    ToggleSidebar,
    ToggleTheme,
    Logout,
    LoggedOut(Result<(), Failure>),
    InstructorLoaded(Generation, Result<InstructorProfile, Failure>),
    Tick(Instant),
    DismissToast,
    Login(LoginMessage),
    Dashboard(DashboardMessage),
    MyCourses(MyCoursesMessage),
    Player(PlayerMessage),
    CourseAssessments(CourseAssessmentsMessage),
    CreateCourse(CreateCourseMessage),
    Assignments(AssignmentsMessage),
    Analytics(AnalyticsMessage),
    LiveClasses(LiveClassesMessage),
    Settings(SettingsMessage),
}

#[derive(Debug, Clone)]
pub enum LoginMessage {
    EmailChanged(String),
    PasswordChanged(String),
    TogglePassword,
    Submit,
    Finished(Result<LoginResponse, String>),
    RedirectElapsed,
}

#[derive(Debug, Clone)]
pub enum DashboardMessage {
    CoursesLoaded(Generation, Result<Vec<Course>, Failure>),
    StudentsLoaded(Generation, Result<Vec<EnrolledStudent>, Failure>),
    OpenNotify,
    CloseNotify,
    AudienceSelected(Audience),
    ToggleStudent(String),
    SelectAll(bool),
    CourseSelected(CourseOption),
    TitleChanged(String),
    BodyChanged(String),
    KindSelected(NotificationType),
    ActionUrlChanged(String),
    Send,
    Sent(Result<(), Failure>),
}

#[derive(Debug, Clone)]
pub enum MyCoursesMessage {
    Loaded(Generation, Result<Vec<Course>, Failure>),
    Refresh,
    SearchChanged(String),
    FilterSelected(StatusFilter),
    ToggleStatus(String),
    StatusSaved(Result<(), Failure>),
    AskDelete(String),
    CancelDelete,
    ConfirmDelete,
    Deleted(Result<(), Failure>),
    OpenPlayer(String),
    OpenAssessments(String),
}

#[derive(Debug, Clone)]
pub enum PlayerMessage {
    Loaded(Generation, Result<Course, Failure>),
    ToggleSection(String),
    SelectLecture(String, String),
    OpenVideo,
    PickVideo,
    VideoPicked(Result<Option<StagedFile>, String>),
    Upload,
    Uploaded(Result<(), Failure>),
}

#[derive(Debug, Clone)]
pub enum CourseAssessmentsMessage {
    Loaded(Generation, Result<Vec<Assessment>, Failure>),
    TogglePublish(String),
    PublishSaved(Result<(), Failure>),
    AskDelete(String),
    CancelDelete,
    ConfirmDelete,
    Deleted(Result<(), Failure>),
    OpenForm,
    CloseForm,
    TitleChanged(String),
    DescriptionChanged(String),
    TotalPointsChanged(String),
    PassingScoreChanged(String),
    TimeLimitChanged(String),
    PublishChecked(bool),
    QuestionChanged(String),
    QuestionPointsChanged(String),
    AddQuestion,
    RemoveQuestion(usize),
    ChooseDate,
    CancelDate,
    SubmitDate(Date),
    Submit,
    Created(Result<Assessment, Failure>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    Title,
    Subtitle,
    Description,
    Category,
    SubCategory,
    Language,
    Level,
    Duration,
    Price,
    DiscountPrice,
    Prerequisites,
    LearningOutcomes,
}

#[derive(Debug, Clone)]
pub enum CreateCourseMessage {
    FieldChanged(CourseField, String),
    PickThumbnail,
    ThumbnailPicked(Result<Option<StagedFile>, String>),
    RemoveThumbnail,
    TogglePreview,
    Submit,
    Created(Generation, Result<Course, Failure>),
    ThumbnailUploaded(Generation, Result<Option<String>, Failure>),
    RedirectElapsed(Generation),
}

#[derive(Debug, Clone)]
pub enum AssignmentsMessage {
    CoursesLoaded(Generation, Result<Vec<Course>, Failure>),
    SubmissionsLoaded(Generation, Result<Vec<SubmittedAssessment>, Failure>),
    CourseChosen(CourseChoice),
    SearchChanged(String),
    FilterSelected(SubmissionFilter),
    ChooseDate,
    CancelDate,
    SubmitDate(Date),
    ClearDate,
    Page(usize),
    AskDelete(String, String),
    CancelDelete,
    ConfirmDelete,
    Deleted(Result<(), Failure>),
}

#[derive(Debug, Clone)]
pub enum AnalyticsMessage {
    PeriodSelected(AnalyticsPeriod),
    EarningsLoaded(Generation, Result<Earnings, Failure>),
    CoursesLoaded(Generation, Result<Vec<Course>, Failure>),
    ProgressLoaded(Generation, Result<ProgressOverview, Failure>),
    Approve(String),
    Approved(String, Result<(), Failure>),
    Export(ExportFormat),
    Exported(ExportFormat, Result<PathBuf, String>),
    DismissToast,
}

#[derive(Debug, Clone)]
pub enum LiveClassesMessage {
    Loaded(Generation, Result<Vec<LiveClass>, Failure>),
    CoursesLoaded(Generation, Result<Vec<Course>, Failure>),
    TitleChanged(String),
    CourseSelected(CourseOption),
    ChooseDate,
    CancelDate,
    SubmitDate(Date),
    TimeChanged(String),
    DurationChanged(String),
    Schedule,
    Scheduled(Result<LiveClass, Failure>),
    Join(String),
    Joined(Result<JoinInfo, Failure>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
    Phone,
    Bio,
    NewExpertise,
    LinkedIn,
    Twitter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    FullName,
    Email,
    CurrentPassword,
    NewPassword,
    ConfirmPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceToggle {
    EmailNewStudents,
    EmailAssignments,
    EmailReviews,
    PushMessages,
    PushReports,
    TwoFactor,
    PublicProfile,
    ShowOnlineStatus,
    AllowRecommendations,
}

#[derive(Debug, Clone)]
pub enum SettingsMessage {
    TabSelected(SettingsTab),
    ProfileLoaded(Generation, Result<InstructorProfile, Failure>),
    AvatarLoaded(Result<Vec<u8>, String>),
    Edit,
    CancelEdit,
    ProfileChanged(ProfileField, String),
    AddExpertise,
    RemoveExpertise(String),
    PickAvatar,
    AvatarPicked(Result<Option<StagedFile>, String>),
    RemoveAvatar,
    SaveProfile,
    ProfileSaved(Result<Option<String>, Failure>),
    AccountChanged(AccountField, String),
    SaveAccount,
    AccountSaved(Result<(), Failure>),
    Toggle(PreferenceToggle, bool),
    SavePreferences,
    ThemeSelected(ThemeMode),
    SidebarSelected(SidebarBehavior),
    ResetAppearance,
    RevokeSession(u32),
    RevokeOtherSessions,
}
