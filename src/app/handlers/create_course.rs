use iced::widget::image::Handle;
use iced::Task;
use tracing::{info, warn};

use crate::api::Failure;
use crate::app::messages::{CourseField, CreateCourseMessage, Generation};
use crate::app::state::{Screen, COURSE_REDIRECT_MS};
use crate::app::update::{pick_file, sleep_ms};
use crate::app::{App, Message};
use crate::toast::ToastKind;
use crate::validation::{check_thumbnail, CourseForm};

fn field_mut(form: &mut CourseForm, field: CourseField) -> &mut String {
    match field {
        CourseField::Title => &mut form.title,
        CourseField::Subtitle => &mut form.subtitle,
        CourseField::Description => &mut form.description,
        CourseField::Category => &mut form.category,
        CourseField::SubCategory => &mut form.sub_category,
        CourseField::Language => &mut form.language,
        CourseField::Level => &mut form.level,
        CourseField::Duration => &mut form.duration,
        CourseField::Price => &mut form.price,
        CourseField::DiscountPrice => &mut form.discount_price,
        CourseField::Prerequisites => &mut form.prerequisites,
        CourseField::LearningOutcomes => &mut form.learning_outcomes,
    }
}

fn redirect(visit: Generation) -> Task<Message> {
    Task::perform(sleep_ms(COURSE_REDIRECT_MS), move |_| {
        Message::CreateCourse(CreateCourseMessage::RedirectElapsed(visit))
    })
}

impl App {
    pub(crate) fn update_create_course(&mut self, message: CreateCourseMessage) -> Task<Message> {
        let state = &mut self.create_course;
        match message {
            CreateCourseMessage::FieldChanged(field, value) => {
                *field_mut(&mut state.form, field) = value;
                Task::none()
            }
            CreateCourseMessage::PickThumbnail => Task::perform(
                pick_file("Select course thumbnail", "Images", &["png", "jpg", "jpeg", "gif"]),
                |r| Message::CreateCourse(CreateCourseMessage::ThumbnailPicked(r)),
            ),
            CreateCourseMessage::ThumbnailPicked(Ok(None)) => Task::none(),
            CreateCourseMessage::ThumbnailPicked(Ok(Some(file))) => {
                if let Err(e) = check_thumbnail(&file) {
                    state.error = Some(e.to_string());
                    return Task::none();
                }
                state.error = None;
                state.thumbnail_preview = Some(Handle::from_bytes(file.bytes.clone()));
                state.thumbnail = Some(file);
                Task::none()
            }
            CreateCourseMessage::ThumbnailPicked(Err(e)) => {
                state.error = Some(e);
                Task::none()
            }
            CreateCourseMessage::RemoveThumbnail => {
                state.thumbnail = None;
                state.thumbnail_preview = None;
                Task::none()
            }
            CreateCourseMessage::TogglePreview => {
                state.show_preview = !state.show_preview;
                Task::none()
            }
            CreateCourseMessage::Submit => {
                if state.saving {
                    return Task::none();
                }
                let draft = match state.form.validate() {
                    Ok(draft) => draft,
                    Err(e) => {
                        state.error = Some(e.to_string());
                        return Task::none();
                    }
                };
                state.error = None;
                state.status = None;
                state.saving = true;
                let visit = state.visit;
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.create_course(&draft)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to create course."))
                    },
                    move |r| Message::CreateCourse(CreateCourseMessage::Created(visit, r)),
                )
            }
            CreateCourseMessage::Created(visit, result) if visit != state.visit => {
                if let Ok(course) = result {
                    info!(course = %course.id, "course created after leaving the form");
                }
                Task::none()
            }
            CreateCourseMessage::Created(visit, Ok(course)) => {
                info!(course = %course.id, "course created");
                let Some(file) = state.thumbnail.take() else {
                    state.status =
                        Some("Course created successfully! Redirecting to courses page...".into());
                    return redirect(visit);
                };
                state.status = Some("Course created! Uploading thumbnail...".into());
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.upload_thumbnail(&course.id, file)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to upload thumbnail."))
                    },
                    move |r| {
                        Message::CreateCourse(CreateCourseMessage::ThumbnailUploaded(visit, r))
                    },
                )
            }
            CreateCourseMessage::Created(_, Err(Failure::Unauthorized)) => {
                state.saving = false;
                self.expire_session()
            }
            CreateCourseMessage::Created(_, Err(Failure::Message(m))) => {
                state.saving = false;
                state.error = Some(m);
                Task::none()
            }
            CreateCourseMessage::ThumbnailUploaded(visit, result) => {
                if let Err(failure) = &result {
                    warn!(error = %failure.message(), "thumbnail upload failed");
                }
                if visit != state.visit {
                    return Task::none();
                }
                state.status = Some(match result {
                    Ok(_) => {
                        "Thumbnail uploaded successfully! Redirecting to courses page...".into()
                    }
                    Err(failure) => format!("{} Redirecting to courses page...", failure.message()),
                });
                redirect(visit)
            }
            CreateCourseMessage::RedirectElapsed(visit) => {
                if self.screen != Screen::CreateCourse || visit != state.visit {
                    return Task::none();
                }
                self.notify("Course created successfully!", ToastKind::Success);
                self.navigate(Screen::MyCourses)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_maps_to_its_own_input() {
        let mut form = CourseForm::default();
        *field_mut(&mut form, CourseField::Price) = "49".into();
        *field_mut(&mut form, CourseField::SubCategory) = "Systems".into();
        assert_eq!(form.price, "49");
        assert_eq!(form.sub_category, "Systems");
        assert_eq!(form.language, "English");
    }
}
