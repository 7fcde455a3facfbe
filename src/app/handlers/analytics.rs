use chrono::Utc;
use iced::Task;
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use crate::api::Failure;
use crate::app::messages::AnalyticsMessage;
use crate::app::update::{as_text, is_expired};
use crate::app::{App, Message};
use crate::report::AnalyticsReport;
use crate::toast::ToastKind;

impl App {
    /// Earnings and courses are fetched side by side for the current period;
    /// progress follows once the courses are in.
    pub(crate) fn load_analytics(&mut self) -> Task<Message> {
        let period = self.analytics.period.0;
        let earnings_gen = self.analytics.earnings.begin();
        let courses_gen = self.analytics.courses.begin();
        self.analytics.progress.begin();
        let api = self.ctx.api.clone();
        let earnings = Task::perform(
            {
                let api = api.clone();
                async move {
                    api.earnings(period)
                        .await
                        .map_err(|e| Failure::with_fallback(e, "Failed to fetch earnings data"))
                }
            },
            move |r| Message::Analytics(AnalyticsMessage::EarningsLoaded(earnings_gen, r)),
        );
        let courses = Task::perform(
            async move {
                api.courses(Some(period))
                    .await
                    .map_err(|e| Failure::with_fallback(e, "Failed to fetch courses data"))
            },
            move |r| Message::Analytics(AnalyticsMessage::CoursesLoaded(courses_gen, r)),
        );
        Task::batch([earnings, courses])
    }

    fn analytics_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.analytics.toast.show(message, kind, std::time::Instant::now());
    }

    pub(crate) fn update_analytics(&mut self, message: AnalyticsMessage) -> Task<Message> {
        match message {
            AnalyticsMessage::PeriodSelected(period) => {
                if self.analytics.period == period {
                    return Task::none();
                }
                info!(days = period.0, "analytics period changed");
                self.analytics.period = period;
                self.load_analytics()
            }
            AnalyticsMessage::EarningsLoaded(generation, result) => {
                if is_expired(&self.analytics.earnings, generation, &result) {
                    return self.expire_session();
                }
                if self.analytics.earnings.resolve(generation, as_text(result)) {
                    if let Some(e) = self.analytics.earnings.error.clone() {
                        self.analytics_toast(e, ToastKind::Error);
                    }
                }
                Task::none()
            }
            AnalyticsMessage::CoursesLoaded(generation, result) => {
                if is_expired(&self.analytics.courses, generation, &result) {
                    return self.expire_session();
                }
                let courses = result.as_ref().ok().cloned();
                if !self.analytics.courses.resolve(generation, as_text(result)) {
                    return Task::none();
                }
                let Some(courses) = courses else {
                    let error = self.analytics.courses.error.clone().unwrap_or_default();
                    self.analytics.progress.fail("Failed to fetch progress data");
                    self.analytics_toast(error, ToastKind::Error);
                    return Task::none();
                };
                let generation = self.analytics.progress.begin();
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.progress_overview(&courses)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to fetch progress data"))
                    },
                    move |r| Message::Analytics(AnalyticsMessage::ProgressLoaded(generation, r)),
                )
            }
            AnalyticsMessage::ProgressLoaded(generation, result) => {
                if is_expired(&self.analytics.progress, generation, &result) {
                    return self.expire_session();
                }
                if self.analytics.progress.resolve(generation, as_text(result)) {
                    if let Some(e) = self.analytics.progress.error.clone() {
                        self.analytics_toast(e, ToastKind::Error);
                    }
                }
                Task::none()
            }
            AnalyticsMessage::Approve(enrollment_id) => {
                let state = &mut self.analytics;
                if state.approving.contains(&enrollment_id) {
                    return Task::none();
                }
                let Some(candidate) = state
                    .progress
                    .get()
                    .and_then(|p| p.candidates.iter().find(|c| c.enrollment_id == enrollment_id))
                    .cloned()
                else {
                    return Task::none();
                };
                state.approving.insert(enrollment_id.clone());
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.issue_certificate(&candidate)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to approve certificate"))
                    },
                    move |r| {
                        Message::Analytics(AnalyticsMessage::Approved(enrollment_id.clone(), r))
                    },
                )
            }
            AnalyticsMessage::Approved(enrollment_id, result) => {
                self.analytics.approving.remove(&enrollment_id);
                match result {
                    Ok(()) => {
                        let name = self
                            .analytics
                            .progress
                            .get()
                            .and_then(|p| {
                                p.candidates.iter().find(|c| c.enrollment_id == enrollment_id)
                            })
                            .map(|c| c.student_name.clone())
                            .unwrap_or_default();
                        self.analytics.progress.patch(|p| {
                            p.candidates.retain(|c| c.enrollment_id != enrollment_id)
                        });
                        info!(enrollment = %enrollment_id, "certificate issued");
                        self.analytics_toast(
                            format!("Certificate approved for {name}"),
                            ToastKind::Success,
                        );
                        Task::none()
                    }
                    Err(Failure::Unauthorized) => self.expire_session(),
                    Err(Failure::Message(m)) => {
                        warn!(
                            enrollment = %enrollment_id,
                            error = %m,
                            "certificate request failed"
                        );
                        self.analytics_toast("Failed to approve certificate", ToastKind::Error);
                        Task::none()
                    }
                }
            }
            AnalyticsMessage::Export(format) => {
                let state = &mut self.analytics;
                if state.exporting {
                    return Task::none();
                }
                state.exporting = true;
                let report = AnalyticsReport::build(
                    state.period.0,
                    state.earnings.get(),
                    state.courses.items(),
                    state.progress.get(),
                    Utc::now(),
                );
                let dir = self.ctx.settings.reports_dir();
                Task::perform(
                    async move {
                        spawn_blocking(move || {
                            report.export(format, &dir).map_err(|e| e.to_string())
                        })
                            .await
                            .map_err(|e| format!("Export task failed: {e}"))?
                    },
                    move |r| Message::Analytics(AnalyticsMessage::Exported(format, r)),
                )
            }
            AnalyticsMessage::Exported(format, result) => {
                self.analytics.exporting = false;
                match result {
                    Ok(path) => {
                        self.analytics_toast(
                            format!("Analytics exported as {format}"),
                            ToastKind::Success,
                        );
                        if let Err(e) = open::that(&path) {
                            warn!(
                                path = %path.display(),
                                error = %e,
                                "could not open exported report"
                            );
                        }
                    }
                    Err(e) => {
                        warn!(%format, error = %e, "analytics export failed");
                        self.analytics_toast(format!("Export failed: {e}"), ToastKind::Error);
                    }
                }
                Task::none()
            }
            AnalyticsMessage::DismissToast => {
                self.analytics.toast.dismiss();
                Task::none()
            }
        }
    }
}
