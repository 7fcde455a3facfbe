use iced::Task;
use tracing::{info, warn};

use crate::api::Failure;
use crate::app::messages::AssignmentsMessage;
use crate::app::state::{to_naive, CourseChoice};
use crate::app::update::{as_text, is_expired};
use crate::app::{App, Message};
use crate::toast::ToastKind;

impl App {
    pub(crate) fn load_assignments(&mut self) -> Task<Message> {
        let generation = self.assignments.courses.begin();
        let api = self.ctx.api.clone();
        Task::perform(
            async move {
                api.courses(None)
                    .await
                    .map_err(|e| Failure::with_fallback(e, "Failed to fetch courses."))
            },
            move |r| Message::Assignments(AssignmentsMessage::CoursesLoaded(generation, r)),
        )
    }

    /// Fetches submissions for the chosen course, or for all of them.
    fn load_submissions(&mut self) -> Task<Message> {
        let state = &mut self.assignments;
        let courses: Vec<_> = match &state.course_choice {
            CourseChoice::All => state.courses.items().to_vec(),
            CourseChoice::One(option) => state
                .courses
                .items()
                .iter()
                .filter(|c| c.id == option.id)
                .cloned()
                .collect(),
        };
        state.page = 0;
        let generation = state.submissions.begin();
        let api = self.ctx.api.clone();
        Task::perform(
            async move {
                api.submissions_for(&courses)
                    .await
                    .map_err(|e| Failure::with_fallback(e, "Failed to fetch submissions."))
            },
            move |r| Message::Assignments(AssignmentsMessage::SubmissionsLoaded(generation, r)),
        )
    }

    pub(crate) fn update_assignments(&mut self, message: AssignmentsMessage) -> Task<Message> {
        let state = &mut self.assignments;
        match message {
            AssignmentsMessage::CoursesLoaded(generation, result) => {
                if is_expired(&state.courses, generation, &result) {
                    return self.expire_session();
                }
                let loaded = result.is_ok();
                if state.courses.resolve(generation, as_text(result)) && loaded {
                    return self.load_submissions();
                }
                Task::none()
            }
            AssignmentsMessage::SubmissionsLoaded(generation, result) => {
                if is_expired(&state.submissions, generation, &result) {
                    return self.expire_session();
                }
                state.submissions.resolve(generation, as_text(result));
                Task::none()
            }
            AssignmentsMessage::CourseChosen(choice) => {
                if state.course_choice == choice {
                    return Task::none();
                }
                state.course_choice = choice;
                self.load_submissions()
            }
            AssignmentsMessage::SearchChanged(v) => {
                state.search = v;
                state.page = 0;
                Task::none()
            }
            AssignmentsMessage::FilterSelected(filter) => {
                state.filter = filter;
                state.page = 0;
                Task::none()
            }
            AssignmentsMessage::ChooseDate => {
                state.show_date_picker = true;
                Task::none()
            }
            AssignmentsMessage::CancelDate => {
                state.show_date_picker = false;
                Task::none()
            }
            AssignmentsMessage::SubmitDate(date) => {
                state.due_date = to_naive(date);
                state.show_date_picker = false;
                state.page = 0;
                Task::none()
            }
            AssignmentsMessage::ClearDate => {
                state.due_date = None;
                state.page = 0;
                Task::none()
            }
            AssignmentsMessage::Page(page) => {
                state.page = page.min(state.page_count() - 1);
                Task::none()
            }
            AssignmentsMessage::AskDelete(course_id, assessment_id) => {
                state.confirm_delete = Some((course_id, assessment_id));
                Task::none()
            }
            AssignmentsMessage::CancelDelete => {
                state.confirm_delete = None;
                Task::none()
            }
            AssignmentsMessage::ConfirmDelete => {
                let Some((course_id, assessment_id)) = state.confirm_delete.take() else {
                    return Task::none();
                };
                state.submissions.patch(|list| {
                    list.retain(|s| !(s.course_id == course_id && s.assessment_id == assessment_id))
                });
                state.page = state.page.min(state.page_count() - 1);
                info!(course = %course_id, assessment = %assessment_id, "deleting assessment");
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.delete_assessment(&course_id, &assessment_id)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to delete assessment."))
                    },
                    |r| Message::Assignments(AssignmentsMessage::Deleted(r)),
                )
            }
            AssignmentsMessage::Deleted(result) => match result {
                Ok(()) => {
                    self.notify("Assessment deleted successfully!", ToastKind::Success);
                    Task::none()
                }
                Err(Failure::Unauthorized) => self.expire_session(),
                Err(Failure::Message(m)) => {
                    warn!(error = %m, "delete failed, reloading submissions");
                    self.notify("Failed to delete assessment.", ToastKind::Error);
                    self.load_submissions()
                }
            },
        }
    }
}
