use chrono::Utc;
use iced::Task;
use tracing::{info, warn};

use crate::api::Failure;
use crate::app::messages::LiveClassesMessage;
use crate::app::state::to_naive;
use crate::app::update::{as_text, is_expired};
use crate::app::{App, Message};
use crate::toast::ToastKind;
use crate::validation::LiveClassForm;

impl App {
    pub(crate) fn load_live_classes(&mut self) -> Task<Message> {
        let classes_gen = self.live_classes.classes.begin();
        let courses_gen = self.live_classes.courses.begin();
        let api = self.ctx.api.clone();
        let classes = Task::perform(
            {
                let api = api.clone();
                async move {
                    api.live_classes()
                        .await
                        .map_err(|e| Failure::with_fallback(e, "Failed to fetch live classes."))
                }
            },
            move |r| Message::LiveClasses(LiveClassesMessage::Loaded(classes_gen, r)),
        );
        let courses = Task::perform(
            async move {
                api.courses(None)
                    .await
                    .map_err(|e| Failure::with_fallback(e, "Failed to fetch courses."))
            },
            move |r| Message::LiveClasses(LiveClassesMessage::CoursesLoaded(courses_gen, r)),
        );
        Task::batch([classes, courses])
    }

    pub(crate) fn update_live_classes(&mut self, message: LiveClassesMessage) -> Task<Message> {
        let state = &mut self.live_classes;
        match message {
            LiveClassesMessage::Loaded(generation, result) => {
                if is_expired(&state.classes, generation, &result) {
                    return self.expire_session();
                }
                state.classes.resolve(generation, as_text(result));
                Task::none()
            }
            LiveClassesMessage::CoursesLoaded(generation, result) => {
                if is_expired(&state.courses, generation, &result) {
                    return self.expire_session();
                }
                state.courses.resolve(generation, as_text(result));
                Task::none()
            }
            LiveClassesMessage::TitleChanged(v) => {
                state.form.title = v;
                Task::none()
            }
            LiveClassesMessage::CourseSelected(option) => {
                state.form.course_id = Some(option.id);
                Task::none()
            }
            LiveClassesMessage::ChooseDate => {
                state.show_date_picker = true;
                Task::none()
            }
            LiveClassesMessage::CancelDate => {
                state.show_date_picker = false;
                Task::none()
            }
            LiveClassesMessage::SubmitDate(date) => {
                state.form.date = to_naive(date);
                state.show_date_picker = false;
                Task::none()
            }
            LiveClassesMessage::TimeChanged(v) => {
                state.form.time = v;
                Task::none()
            }
            LiveClassesMessage::DurationChanged(v) => {
                state.form.duration_minutes = v;
                Task::none()
            }
            LiveClassesMessage::Schedule => {
                if state.saving {
                    return Task::none();
                }
                let class = match state.form.validate(Utc::now()) {
                    Ok(class) => class,
                    Err(e) => {
                        state.form_error = Some(e.to_string());
                        return Task::none();
                    }
                };
                state.form_error = None;
                state.saving = true;
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.schedule_live_class(&class)
                            .await
                            .map_err(|e| {
                                Failure::with_fallback(e, "Failed to schedule live class.")
                            })
                    },
                    |r| Message::LiveClasses(LiveClassesMessage::Scheduled(r)),
                )
            }
            LiveClassesMessage::Scheduled(result) => {
                state.saving = false;
                match result {
                    Ok(class) => {
                        info!(class = %class.id, at = %class.scheduled_at, "live class scheduled");
                        state.form = LiveClassForm::default();
                        state.classes.patch(|list| {
                            list.push(class);
                            list.sort_by_key(|c| c.scheduled_at);
                        });
                        self.notify("Live class scheduled successfully!", ToastKind::Success);
                        Task::none()
                    }
                    Err(Failure::Unauthorized) => self.expire_session(),
                    Err(Failure::Message(m)) => {
                        state.form_error = Some(m);
                        Task::none()
                    }
                }
            }
            LiveClassesMessage::Join(class_id) => {
                if state.joining.is_some() {
                    return Task::none();
                }
                state.joining = Some(class_id.clone());
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.join_live_class(&class_id)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to join live class."))
                    },
                    |r| Message::LiveClasses(LiveClassesMessage::Joined(r)),
                )
            }
            LiveClassesMessage::Joined(result) => {
                state.joining = None;
                match result {
                    Ok(info) => {
                        if let Err(e) = open::that(&info.join_url) {
                            warn!(url = %info.join_url, error = %e, "could not open meeting");
                            let message = format!("Could not open the meeting: {e}");
                            self.notify(message, ToastKind::Error);
                        }
                        Task::none()
                    }
                    Err(Failure::Unauthorized) => self.expire_session(),
                    Err(Failure::Message(m)) => {
                        self.notify(m, ToastKind::Error);
                        Task::none()
                    }
                }
            }
        }
    }
}
