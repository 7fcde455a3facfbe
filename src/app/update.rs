use std::time::{Duration, Instant};

use iced::{Subscription, Task};
use tokio::task;
use tracing::{info, warn};

use crate::api::{ApiError, Failure, StagedFile};
use crate::app::state::{AppContext, Screen};
use crate::fetch::Remote;
use crate::toast::ToastKind;
use super::messages::Generation;
use super::{App, Message};

/// True when a result means the session is gone. A 401 from a superseded
/// request is ignored; the session it was sent under may no longer exist.
pub(crate) fn is_expired<T, U>(
    remote: &Remote<U>,
    generation: Generation,
    result: &Result<T, Failure>,
) -> bool {
    remote.is_current(generation) && matches!(result, Err(Failure::Unauthorized))
}

pub(crate) fn as_text<T>(result: Result<T, Failure>) -> Result<T, String> {
    result.map_err(|f| f.message())
}

/// Opens a native file dialog off the UI thread and reads the chosen file.
/// `Ok(None)` means the dialog was cancelled.
pub(crate) async fn pick_file(
    title: &'static str,
    filter_name: &'static str,
    extensions: &'static [&'static str],
) -> Result<Option<StagedFile>, String> {
    task::spawn_blocking(move || {
        let Some(path) = rfd::FileDialog::new()
            .set_title(title)
            .add_filter(filter_name, extensions)
            .pick_file()
        else {
            return Ok(None);
        };
        StagedFile::read(&path)
            .map(Some)
            .map_err(|e| format!("Could not read {}: {e}", path.display()))
    })
    .await
    .unwrap_or_else(|e| Err(format!("File dialog failed: {e}")))
}

pub(crate) async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await
}

impl App {
    pub fn boot(ctx: AppContext) -> (Self, Task<Message>) {
        let mut app = App::new(ctx);
        let task = if app.ctx.session.is_authenticated() {
            info!("resuming stored session");
            Task::batch([app.navigate(Screen::Dashboard), app.load_instructor()])
        } else {
            Task::none()
        };
        (app, task)
    }

    pub fn title(&self) -> String {
        let (title, _) = self.screen.heading();
        format!("Instructor Dashboard - {title}")
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.toast.is_visible() || self.analytics.toast.is_visible() {
            iced::time::every(Duration::from_secs(1)).map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(screen) => self.navigate(screen),
            Message::ToggleSidebar => {
                self.sidebar_open = !self.sidebar_open;
                Task::none()
            }
            Message::ToggleTheme => {
                self.ctx.preferences.theme = self.ctx.preferences.theme.toggled();
                self.save_preferences(None);
                Task::none()
            }
            Message::Logout => {
                let api = self.ctx.api.clone();
                Task::perform(
                    async move { api.logout().await.map_err(Failure::from) },
                    Message::LoggedOut,
                )
            }
            Message::LoggedOut(result) => {
                if let Err(e) = result {
                    warn!(error = %e.message(), "logout request failed, clearing session anyway");
                }
                self.end_session();
                self.notify("Logged out successfully.", ToastKind::Success);
                Task::none()
            }
            Message::InstructorLoaded(generation, result) => {
                if is_expired(&self.instructor, generation, &result) {
                    return self.expire_session();
                }
                self.instructor.resolve(generation, as_text(result));
                Task::none()
            }
            Message::Tick(now) => {
                self.toast.tick(now);
                self.analytics.toast.tick(now);
                Task::none()
            }
            Message::DismissToast => {
                self.toast.dismiss();
                Task::none()
            }
            Message::Login(msg) => self.update_login(msg),
            Message::Dashboard(msg) => self.update_dashboard(msg),
            Message::MyCourses(msg) => self.update_my_courses(msg),
            Message::Player(msg) => self.update_player(msg),
            Message::CourseAssessments(msg) => self.update_course_assessments(msg),
            Message::CreateCourse(msg) => self.update_create_course(msg),
            Message::Assignments(msg) => self.update_assignments(msg),
            Message::Analytics(msg) => self.update_analytics(msg),
            Message::LiveClasses(msg) => self.update_live_classes(msg),
            Message::Settings(msg) => self.update_settings(msg),
        }
    }

    /// Switches screen and starts the fetches the screen needs on mount.
    pub fn navigate(&mut self, screen: Screen) -> Task<Message> {
        if screen != Screen::Login && !self.ctx.session.is_authenticated() {
            warn!(?screen, "no session token, staying on login");
            self.screen = Screen::Login;
            self.notify(ApiError::MissingToken.to_string(), ToastKind::Error);
            return Task::none();
        }
        self.screen = screen;
        match screen {
            Screen::Login => Task::none(),
            Screen::Dashboard => self.load_dashboard(),
            Screen::MyCourses => self.load_my_courses(),
            Screen::CoursePlayer => self.load_player(),
            Screen::CourseAssessments => self.load_course_assessments(),
            Screen::CreateCourse => {
                self.create_course = self.create_course.next_visit();
                Task::none()
            }
            Screen::Assignments => self.load_assignments(),
            Screen::Analytics => self.load_analytics(),
            Screen::LiveClasses => self.load_live_classes(),
            Screen::Settings => self.load_settings(),
        }
    }

    pub(crate) fn load_instructor(&mut self) -> Task<Message> {
        let generation = self.instructor.begin();
        let api = self.ctx.api.clone();
        Task::perform(
            async move { api.profile().await.map_err(Failure::from) },
            move |r| Message::InstructorLoaded(generation, r),
        )
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast.show(message, kind, Instant::now());
    }

    /// The server rejected the token, or there is none: drop it and go back
    /// to the login screen.
    pub fn expire_session(&mut self) -> Task<Message> {
        warn!("session rejected by backend");
        self.end_session();
        self.notify(ApiError::Unauthorized.to_string(), ToastKind::Error);
        Task::none()
    }

    fn end_session(&mut self) {
        self.ctx.session.clear();
        self.instructor.clear();
        self.last_dashboard_counts = None;
        self.login = Default::default();
        self.screen = Screen::Login;
    }

    /// Persists preferences; `success` is shown as a toast when given.
    pub(crate) fn save_preferences(&mut self, success: Option<&str>) {
        let path = self.ctx.settings.config_path();
        match self.ctx.preferences.save(&path) {
            Ok(()) => {
                if let Some(message) = success {
                    self.notify(message, ToastKind::Success);
                }
            }
            Err(e) => {
                warn!(error = %e, "could not save preferences");
                self.notify(e.to_string(), ToastKind::Error);
            }
        }
    }
}
