use iced::Task;
use tracing::{debug, info};

use crate::api::Failure;
use crate::app::messages::DashboardMessage;
use crate::app::state::DashboardCounts;
use crate::app::update::{as_text, is_expired};
use crate::app::{App, Message};
use crate::metrics;
use crate::toast::ToastKind;
use crate::validation::{NotificationForm, NotificationTarget};

/// Increments relative to the previous visit; the first visit compares
/// against zero.
pub(crate) fn increments(
    baseline: Option<DashboardCounts>,
    current: DashboardCounts,
) -> (f64, f64) {
    let base = baseline.unwrap_or_default();
    (
        metrics::percent_change(base.students, current.students),
        metrics::percent_change(base.published, current.published),
    )
}

impl App {
    pub(crate) fn load_dashboard(&mut self) -> Task<Message> {
        let state = &mut self.dashboard;
        state.baseline = self.last_dashboard_counts;
        let generation = state.courses.begin();
        let api = self.ctx.api.clone();
        Task::perform(
            async move {
                api.courses(None)
                    .await
                    .map_err(|e| {
                        Failure::with_fallback(e, "Failed to fetch data. Please try again later.")
                    })
            },
            move |r| Message::Dashboard(DashboardMessage::CoursesLoaded(generation, r)),
        )
    }

    pub(crate) fn dashboard_counts(&self) -> DashboardCounts {
        DashboardCounts {
            students: self.dashboard.students.items().len(),
            published: metrics::published_count(self.dashboard.courses.items()),
        }
    }

    pub(crate) fn update_dashboard(&mut self, message: DashboardMessage) -> Task<Message> {
        match message {
            DashboardMessage::CoursesLoaded(generation, result) => {
                if is_expired(&self.dashboard.courses, generation, &result) {
                    return self.expire_session();
                }
                let courses = result.as_ref().ok().cloned();
                if !self.dashboard.courses.resolve(generation, as_text(result)) {
                    return Task::none();
                }
                let Some(courses) = courses else {
                    self.dashboard.students.fail("Failed to fetch data. Please try again later.");
                    return Task::none();
                };
                let generation = self.dashboard.students.begin();
                let api = self.ctx.api.clone();
                Task::perform(
                    async move { api.enrolled_students(&courses).await.map_err(Failure::from) },
                    move |r| Message::Dashboard(DashboardMessage::StudentsLoaded(generation, r)),
                )
            }
            DashboardMessage::StudentsLoaded(generation, result) => {
                if is_expired(&self.dashboard.students, generation, &result) {
                    return self.expire_session();
                }
                if self.dashboard.students.resolve(generation, as_text(result))
                    && self.dashboard.students.error.is_none()
                {
                    let counts = self.dashboard_counts();
                    debug!(?counts, "dashboard counts updated");
                    self.last_dashboard_counts = Some(counts);
                }
                Task::none()
            }
            DashboardMessage::OpenNotify => {
                let state = &mut self.dashboard;
                state.show_notify = true;
                state.notify = NotificationForm::default();
                state.notify_error = None;
                Task::none()
            }
            DashboardMessage::CloseNotify => {
                self.dashboard.show_notify = false;
                Task::none()
            }
            DashboardMessage::AudienceSelected(audience) => {
                self.dashboard.notify.audience = audience;
                Task::none()
            }
            DashboardMessage::ToggleStudent(id) => {
                self.dashboard.notify.toggle_user(&id);
                Task::none()
            }
            DashboardMessage::SelectAll(all) => {
                self.dashboard.notify.user_ids = if all {
                    self.dashboard.students.items().iter().map(|s| s.id.clone()).collect()
                } else {
                    Vec::new()
                };
                Task::none()
            }
            DashboardMessage::CourseSelected(option) => {
                self.dashboard.notify.course_id = Some(option.id);
                Task::none()
            }
            DashboardMessage::TitleChanged(v) => {
                self.dashboard.notify.title = v;
                Task::none()
            }
            DashboardMessage::BodyChanged(v) => {
                self.dashboard.notify.message = v;
                Task::none()
            }
            DashboardMessage::KindSelected(kind) => {
                self.dashboard.notify.kind = kind;
                Task::none()
            }
            DashboardMessage::ActionUrlChanged(v) => {
                self.dashboard.notify.action_url = v;
                Task::none()
            }
            DashboardMessage::Send => {
                let state = &mut self.dashboard;
                if state.sending {
                    return Task::none();
                }
                let target = match state.notify.validate() {
                    Ok(target) => target,
                    Err(e) => {
                        state.notify_error = Some(e.to_string());
                        return Task::none();
                    }
                };
                state.notify_error = None;
                state.sending = true;
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        let sent = match &target {
                            NotificationTarget::Users(n) => api.notify_users(n).await,
                            NotificationTarget::Course(id, n) => api.notify_course(id, n).await,
                        };
                        sent.map_err(|e| Failure::with_fallback(e, "Failed to send notification."))
                    },
                    |r| Message::Dashboard(DashboardMessage::Sent(r)),
                )
            }
            DashboardMessage::Sent(result) => {
                self.dashboard.sending = false;
                match result {
                    Ok(()) => {
                        let audience = self.dashboard.notify.audience;
                        info!(?audience, "notification sent");
                        self.dashboard.show_notify = false;
                        self.notify("Notification sent successfully!", ToastKind::Success);
                    }
                    Err(Failure::Unauthorized) => return self.expire_session(),
                    Err(Failure::Message(m)) => self.dashboard.notify_error = Some(m),
                }
                Task::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_visit_counts_as_full_increase() {
        let current = DashboardCounts { students: 4, published: 2 };
        assert_eq!(increments(None, current), (100.0, 100.0));

        let before = DashboardCounts { students: 4, published: 2 };
        let after = DashboardCounts { students: 5, published: 1 };
        assert_eq!(increments(Some(before), after), (25.0, -50.0));
    }
}
