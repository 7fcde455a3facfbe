use iced::widget::{
    button, checkbox, column, horizontal_space, row, scrollable, text, text_input, Column,
    Container, Stack,
};
use iced::{Alignment, Length};
use iced_aw::date_picker;

use crate::app::messages::CourseAssessmentsMessage as Msg;
use crate::app::state::Screen;
use crate::app::{App, Message};
use crate::models::Assessment;
use crate::screens::common::{
    card, date_label, error_line, field, icon, icon_button_content, modal, remote_status, to_date,
};

fn msg(message: Msg) -> Message {
    Message::CourseAssessments(message)
}

fn assessment_card<'a>(app: &App, assessment: &Assessment) -> Container<'a, Message> {
    let mode = app.ctx.preferences.theme;
    let due = assessment
        .due_date
        .map(|d| d.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| "No due date".to_string());
    let (status, style) = if assessment.is_published {
        ("Published", text::success as fn(&iced::Theme) -> text::Style)
    } else {
        ("Draft", text::secondary as fn(&iced::Theme) -> text::Style)
    };

    card(
        column![
            row![
                text(assessment.title.clone()).size(20),
                text(status).style(style),
                horizontal_space(),
                button(if assessment.is_published { "Unpublish" } else { "Publish" })
                    .style(button::secondary)
                    .on_press(msg(Msg::TogglePublish(assessment.id.clone()))),
                button(icon("trash", mode))
                    .style(button::danger)
                    .on_press(msg(Msg::AskDelete(assessment.id.clone()))),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
            text(assessment.description.clone()).size(15),
            row![
                text(format!("Due {due}")),
                text(format!(
                    "{} points, pass at {}",
                    assessment.total_points, assessment.passing_score
                )),
                text(format!("{} min", assessment.time_limit)),
                text(format!("{} questions", assessment.questions.len())),
            ]
            .spacing(25),
        ]
        .spacing(8),
    )
}

fn create_form(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.course_assessments;
    let form = &state.form;

    let due_button = button(icon_button_content(icon("calendar", mode), "Due date"))
        .style(button::secondary)
        .on_press(msg(Msg::ChooseDate));
    let due = row![
        date_picker(
            state.show_date_picker,
            to_date(form.due_date),
            due_button,
            msg(Msg::CancelDate),
            |d| msg(Msg::SubmitDate(d)),
        ),
        text(date_label(form.due_date, "not set")),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let questions = form.questions.iter().enumerate().fold(
        Column::new().spacing(4),
        |col, (i, q)| {
            col.push(
                row![
                    text(format!("{}. {} ({} pts)", i + 1, q.question, q.points)),
                    horizontal_space(),
                    button(icon("xmark", mode))
                        .style(button::text)
                        .on_press(msg(Msg::RemoveQuestion(i))),
                ]
                .align_y(Alignment::Center),
            )
        },
    );

    let submit = (!state.saving).then_some(msg(Msg::Submit));
    let content = column![
        text("New assessment").size(24),
        field("Title", text_input("Title", &form.title).on_input(|v| msg(Msg::TitleChanged(v)))),
        field(
            "Description",
            text_input("Description", &form.description)
                .on_input(|v| msg(Msg::DescriptionChanged(v)))
        ),
        due,
        row![
            field(
                "Total points",
                text_input("100", &form.total_points).on_input(|v| msg(Msg::TotalPointsChanged(v)))
            ),
            field(
                "Passing score",
                text_input("60", &form.passing_score).on_input(|v| msg(Msg::PassingScoreChanged(v)))
            ),
            field(
                "Time limit (min)",
                text_input("30", &form.time_limit).on_input(|v| msg(Msg::TimeLimitChanged(v)))
            ),
        ]
        .spacing(10),
        checkbox("Publish immediately", form.publish).on_toggle(|v| msg(Msg::PublishChecked(v))),
        text("Questions").size(18),
        scrollable(questions).height(Length::Fixed(120.0)),
        row![
            text_input("Question", &form.new_question)
                .on_input(|v| msg(Msg::QuestionChanged(v)))
                .width(Length::FillPortion(4)),
            text_input("Points", &form.new_question_points)
                .on_input(|v| msg(Msg::QuestionPointsChanged(v)))
                .width(Length::FillPortion(1)),
            button("Add").on_press(msg(Msg::AddQuestion)),
        ]
        .spacing(10),
    ]
    .spacing(12)
    .push_maybe(error_line(state.form_error.as_ref()))
    .push(
        row![
            horizontal_space(),
            button("Cancel").style(button::secondary).on_press(msg(Msg::CloseForm)),
            button(if state.saving { "Saving..." } else { "Create" }).on_press_maybe(submit),
        ]
        .spacing(10),
    );
    modal(content, 640.0)
}

pub fn course_assessments_screen(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.course_assessments;

    let header = row![
        button(icon_button_content(icon("arrow-left", mode), "My Courses"))
            .style(button::text)
            .on_press(Message::Navigate(Screen::MyCourses)),
        text(state.course_title.clone()).size(24),
        horizontal_space(),
        button(icon_button_content(icon("circle-plus", mode), "New assessment"))
            .on_press(msg(Msg::OpenForm)),
    ]
    .spacing(15)
    .align_y(Alignment::Center);

    let mut list = Column::new().spacing(12);
    let items = state.assessments.items();
    if items.is_empty() && state.assessments.data.is_some() {
        list = list.push(text("No assessments for this course yet."));
    }
    for assessment in items {
        list = list.push(assessment_card(app, assessment));
    }

    let body = column![header]
        .spacing(20)
        .padding(20)
        .push_maybe(remote_status(&state.assessments, "assessments"))
        .push(scrollable(list).height(Length::Fill));

    let mut stack =
        Stack::new().push(Container::new(body).width(Length::Fill).height(Length::Fill));
    if state.show_form {
        stack = stack.push(create_form(app));
    }
    if state.confirm_delete.is_some() {
        let dialog = column![
            text("Delete assessment").size(24),
            text("The assessment and its submissions will be removed."),
            row![
                horizontal_space(),
                button("Cancel").style(button::secondary).on_press(msg(Msg::CancelDelete)),
                button("Delete").style(button::danger).on_press(msg(Msg::ConfirmDelete)),
            ]
            .spacing(10),
        ]
        .spacing(15);
        stack = stack.push(modal(dialog, 440.0));
    }
    Container::new(stack).width(Length::Fill).height(Length::Fill)
}
