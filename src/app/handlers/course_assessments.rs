use iced::Task;
use tracing::{info, warn};

use crate::api::Failure;
use crate::app::messages::CourseAssessmentsMessage;
use crate::app::state::to_naive;
use crate::app::update::{as_text, is_expired};
use crate::app::{App, Message};
use crate::toast::ToastKind;
use crate::validation::AssessmentForm;

impl App {
    pub(crate) fn load_course_assessments(&mut self) -> Task<Message> {
        let course_id = self.course_assessments.course_id.clone();
        if course_id.is_empty() {
            self.course_assessments.assessments.fail("No course selected.");
            return Task::none();
        }
        let generation = self.course_assessments.assessments.begin();
        let api = self.ctx.api.clone();
        Task::perform(
            async move {
                api.assessments(&course_id)
                    .await
                    .map_err(|e| Failure::with_fallback(e, "Failed to fetch assessments."))
            },
            move |r| Message::CourseAssessments(CourseAssessmentsMessage::Loaded(generation, r)),
        )
    }

    pub(crate) fn update_course_assessments(
        &mut self,
        message: CourseAssessmentsMessage,
    ) -> Task<Message> {
        let state = &mut self.course_assessments;
        match message {
            CourseAssessmentsMessage::Loaded(generation, result) => {
                if is_expired(&state.assessments, generation, &result) {
                    return self.expire_session();
                }
                state.assessments.resolve(generation, as_text(result));
                Task::none()
            }
            CourseAssessmentsMessage::TogglePublish(assessment_id) => {
                let Some(published) = state
                    .assessments
                    .items()
                    .iter()
                    .find(|a| a.id == assessment_id)
                    .map(|a| !a.is_published)
                else {
                    return Task::none();
                };
                state.assessments.patch(|list| {
                    if let Some(a) = list.iter_mut().find(|a| a.id == assessment_id) {
                        a.is_published = published;
                    }
                });
                let course_id = state.course_id.clone();
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.set_assessment_published(&course_id, &assessment_id, published)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to update assessment."))
                    },
                    |r| Message::CourseAssessments(CourseAssessmentsMessage::PublishSaved(r)),
                )
            }
            CourseAssessmentsMessage::PublishSaved(result) => {
                self.settle_assessment_edit(result, "Assessment updated.")
            }
            CourseAssessmentsMessage::AskDelete(assessment_id) => {
                state.confirm_delete = Some(assessment_id);
                Task::none()
            }
            CourseAssessmentsMessage::CancelDelete => {
                state.confirm_delete = None;
                Task::none()
            }
            CourseAssessmentsMessage::ConfirmDelete => {
                let Some(assessment_id) = state.confirm_delete.take() else {
                    return Task::none();
                };
                state
                    .assessments
                    .patch(|list| list.retain(|a| a.id != assessment_id));
                let course_id = state.course_id.clone();
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.delete_assessment(&course_id, &assessment_id)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to delete assessment."))
                    },
                    |r| Message::CourseAssessments(CourseAssessmentsMessage::Deleted(r)),
                )
            }
            CourseAssessmentsMessage::Deleted(result) => {
                self.settle_assessment_edit(result, "Assessment deleted successfully!")
            }
            CourseAssessmentsMessage::OpenForm => {
                state.show_form = true;
                state.form = AssessmentForm::default();
                state.form_error = None;
                Task::none()
            }
            CourseAssessmentsMessage::CloseForm => {
                state.show_form = false;
                state.show_date_picker = false;
                Task::none()
            }
            CourseAssessmentsMessage::TitleChanged(v) => {
                state.form.title = v;
                Task::none()
            }
            CourseAssessmentsMessage::DescriptionChanged(v) => {
                state.form.description = v;
                Task::none()
            }
            CourseAssessmentsMessage::TotalPointsChanged(v) => {
                state.form.total_points = v;
                Task::none()
            }
            CourseAssessmentsMessage::PassingScoreChanged(v) => {
                state.form.passing_score = v;
                Task::none()
            }
            CourseAssessmentsMessage::TimeLimitChanged(v) => {
                state.form.time_limit = v;
                Task::none()
            }
            CourseAssessmentsMessage::PublishChecked(v) => {
                state.form.publish = v;
                Task::none()
            }
            CourseAssessmentsMessage::QuestionChanged(v) => {
                state.form.new_question = v;
                Task::none()
            }
            CourseAssessmentsMessage::QuestionPointsChanged(v) => {
                state.form.new_question_points = v;
                Task::none()
            }
            CourseAssessmentsMessage::AddQuestion => {
                state.form_error = state.form.add_question().err().map(|e| e.to_string());
                Task::none()
            }
            CourseAssessmentsMessage::RemoveQuestion(index) => {
                if index < state.form.questions.len() {
                    state.form.questions.remove(index);
                }
                Task::none()
            }
            CourseAssessmentsMessage::ChooseDate => {
                state.show_date_picker = true;
                Task::none()
            }
            CourseAssessmentsMessage::CancelDate => {
                state.show_date_picker = false;
                Task::none()
            }
            CourseAssessmentsMessage::SubmitDate(date) => {
                state.form.due_date = to_naive(date);
                state.show_date_picker = false;
                Task::none()
            }
            CourseAssessmentsMessage::Submit => {
                if state.saving {
                    return Task::none();
                }
                let assessment = match state.form.validate() {
                    Ok(assessment) => assessment,
                    Err(e) => {
                        state.form_error = Some(e.to_string());
                        return Task::none();
                    }
                };
                state.form_error = None;
                state.saving = true;
                let course_id = state.course_id.clone();
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.create_assessment(&course_id, &assessment)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to create assessment."))
                    },
                    |r| Message::CourseAssessments(CourseAssessmentsMessage::Created(r)),
                )
            }
            CourseAssessmentsMessage::Created(result) => {
                state.saving = false;
                match result {
                    Ok(assessment) => {
                        info!(assessment = %assessment.id, "assessment created");
                        state.show_form = false;
                        state.assessments.patch(|list| list.push(assessment));
                        self.notify("Assessment created successfully!", ToastKind::Success);
                        Task::none()
                    }
                    Err(Failure::Unauthorized) => self.expire_session(),
                    Err(Failure::Message(m)) => {
                        state.form_error = Some(m);
                        Task::none()
                    }
                }
            }
        }
    }

    /// Confirms an optimistic edit, or re-fetches the list when it failed.
    fn settle_assessment_edit(
        &mut self,
        result: Result<(), Failure>,
        success: &str,
    ) -> Task<Message> {
        match result {
            Ok(()) => {
                self.notify(success, ToastKind::Success);
                Task::none()
            }
            Err(Failure::Unauthorized) => self.expire_session(),
            Err(Failure::Message(m)) => {
                warn!(error = %m, "assessment edit failed, reloading");
                self.notify(m, ToastKind::Error);
                self.load_course_assessments()
            }
        }
    }
}
