use iced::Task;
use tracing::{info, warn};

use crate::api::Failure;
use crate::app::messages::MyCoursesMessage;
use crate::app::state::{CourseAssessmentsState, PlayerState, Screen};
use crate::app::update::{as_text, is_expired};
use crate::app::{App, Message};
use crate::toast::ToastKind;

impl App {
    pub(crate) fn load_my_courses(&mut self) -> Task<Message> {
        let generation = self.my_courses.courses.begin();
        let api = self.ctx.api.clone();
        Task::perform(
            async move {
                api.courses_with_curriculum()
                    .await
                    .map_err(|e| Failure::with_fallback(e, "Failed to fetch courses."))
            },
            move |r| Message::MyCourses(MyCoursesMessage::Loaded(generation, r)),
        )
    }

    pub(crate) fn update_my_courses(&mut self, message: MyCoursesMessage) -> Task<Message> {
        match message {
            MyCoursesMessage::Loaded(generation, result) => {
                if is_expired(&self.my_courses.courses, generation, &result) {
                    return self.expire_session();
                }
                self.my_courses.courses.resolve(generation, as_text(result));
                Task::none()
            }
            MyCoursesMessage::Refresh => self.load_my_courses(),
            MyCoursesMessage::SearchChanged(v) => {
                self.my_courses.search = v;
                Task::none()
            }
            MyCoursesMessage::FilterSelected(filter) => {
                self.my_courses.status_filter = filter;
                Task::none()
            }
            MyCoursesMessage::ToggleStatus(course_id) => {
                let Some(next) = self
                    .my_courses
                    .courses
                    .items()
                    .iter()
                    .find(|c| c.id == course_id)
                    .map(|c| c.status.toggled())
                else {
                    return Task::none();
                };
                self.my_courses.courses.patch(|courses| {
                    if let Some(course) = courses.iter_mut().find(|c| c.id == course_id) {
                        course.status = next;
                    }
                });
                info!(course = %course_id, status = %next, "changing course status");
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.set_course_status(&course_id, next)
                            .await
                            .map_err(|e| {
                                Failure::with_fallback(e, "Failed to update course status.")
                            })
                    },
                    |r| Message::MyCourses(MyCoursesMessage::StatusSaved(r)),
                )
            }
            MyCoursesMessage::StatusSaved(result) => {
                self.settle_course_edit(result, "Course status updated.")
            }
            MyCoursesMessage::AskDelete(course_id) => {
                self.my_courses.confirm_delete = Some(course_id);
                Task::none()
            }
            MyCoursesMessage::CancelDelete => {
                self.my_courses.confirm_delete = None;
                Task::none()
            }
            MyCoursesMessage::ConfirmDelete => {
                let Some(course_id) = self.my_courses.confirm_delete.take() else {
                    return Task::none();
                };
                self.my_courses
                    .courses
                    .patch(|courses| courses.retain(|c| c.id != course_id));
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.delete_course(&course_id)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to delete course."))
                    },
                    |r| Message::MyCourses(MyCoursesMessage::Deleted(r)),
                )
            }
            MyCoursesMessage::Deleted(result) => {
                self.settle_course_edit(result, "Course deleted successfully!")
            }
            MyCoursesMessage::OpenPlayer(course_id) => {
                let mut course = std::mem::take(&mut self.player.course);
                course.clear();
                self.player = PlayerState {
                    course_id,
                    course,
                    ..Default::default()
                };
                self.navigate(Screen::CoursePlayer)
            }
            MyCoursesMessage::OpenAssessments(course_id) => {
                let title = self
                    .my_courses
                    .courses
                    .items()
                    .iter()
                    .find(|c| c.id == course_id)
                    .map(|c| c.title.clone())
                    .unwrap_or_default();
                let mut assessments = std::mem::take(&mut self.course_assessments.assessments);
                assessments.clear();
                self.course_assessments = CourseAssessmentsState {
                    course_id,
                    course_title: title,
                    assessments,
                    ..Default::default()
                };
                self.navigate(Screen::CourseAssessments)
            }
        }
    }

    /// Confirms an optimistic edit, or re-fetches the list when it failed.
    fn settle_course_edit(&mut self, result: Result<(), Failure>, success: &str) -> Task<Message> {
        match result {
            Ok(()) => {
                self.notify(success, ToastKind::Success);
                Task::none()
            }
            Err(Failure::Unauthorized) => self.expire_session(),
            Err(Failure::Message(m)) => {
                warn!(error = %m, "course edit failed, reloading");
                self.notify(m, ToastKind::Error);
                self.load_my_courses()
            }
        }
    }
}
