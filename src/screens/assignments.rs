use iced::widget::{
    button, column, horizontal_space, pick_list, row, scrollable, text, text_input, Column,
    Container, Row, Rule, Stack,
};
use iced::{Alignment, Length};
use iced_aw::date_picker;

use crate::app::messages::AssignmentsMessage as Msg;
use crate::app::state::{CourseChoice, CourseOption, SubmissionFilter};
use crate::app::{App, Message};
use crate::models::SubmittedAssessment;
use crate::screens::common::{date_label, icon, icon_button_content, modal, remote_status, to_date};

fn msg(message: Msg) -> Message {
    Message::Assignments(message)
}

fn submission_row<'a>(app: &App, s: &SubmittedAssessment) -> Row<'a, Message> {
    let mode = app.ctx.preferences.theme;
    let due = s
        .due_date
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "-".to_string());
    let score = s
        .submission
        .score
        .map(|v| format!("{v}"))
        .unwrap_or_else(|| "Not graded".to_string());
    row![
        text(s.assessment_title.clone()).width(Length::FillPortion(3)),
        text(s.course_title.clone()).width(Length::FillPortion(3)),
        text(s.student.full_name()).width(Length::FillPortion(2)),
        text(due).width(Length::FillPortion(1)),
        text(s.submission.status.clone()).width(Length::FillPortion(1)),
        text(score).width(Length::FillPortion(1)),
        button(icon("trash", mode))
            .style(button::danger)
            .on_press(msg(Msg::AskDelete(s.course_id.clone(), s.assessment_id.clone()))),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
}

pub fn assignments_screen(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.assignments;

    let mut choices = vec![CourseChoice::All];
    choices.extend(CourseOption::all(state.courses.items()).into_iter().map(CourseChoice::One));

    let date_button = button(icon_button_content(icon("calendar", mode), "Due date"))
        .style(button::secondary)
        .on_press(msg(Msg::ChooseDate));

    let filters = row![
        pick_list(choices, Some(state.course_choice.clone()), |c| msg(Msg::CourseChosen(c))),
        text_input("Search by assessment or student...", &state.search)
            .on_input(|v| msg(Msg::SearchChanged(v)))
            .padding(8)
            .width(Length::Fixed(300.0)),
        pick_list(SubmissionFilter::ALL, Some(state.filter), |f| msg(Msg::FilterSelected(f))),
        date_picker(
            state.show_date_picker,
            to_date(state.due_date),
            date_button,
            msg(Msg::CancelDate),
            |d| msg(Msg::SubmitDate(d)),
        ),
        text(date_label(state.due_date, "any date")),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .push_maybe(state.due_date.map(|_| {
        button(icon("xmark", mode)).style(button::text).on_press(msg(Msg::ClearDate))
    }));

    let header = row![
        text("Assessment").width(Length::FillPortion(3)),
        text("Course").width(Length::FillPortion(3)),
        text("Student").width(Length::FillPortion(2)),
        text("Due").width(Length::FillPortion(1)),
        text("Status").width(Length::FillPortion(1)),
        text("Score").width(Length::FillPortion(1)),
        horizontal_space().width(Length::Fixed(40.0)),
    ]
    .spacing(10);

    let page_items = state.current_page();
    let mut table = Column::new().spacing(8).push(header).push(Rule::horizontal(1));
    if page_items.is_empty() && state.submissions.data.is_some() {
        table = table.push(text("No submissions found."));
    }
    for submission in page_items {
        table = table.push(submission_row(app, submission));
    }

    let pages = state.page_count();
    let page = state.page.min(pages - 1);
    let pager = row![
        button(icon("chevron-left", mode))
            .style(button::secondary)
            .on_press_maybe((page > 0).then(|| msg(Msg::Page(page - 1)))),
        text(format!("Page {} of {}  ({} results)", page + 1, pages, state.filtered().len())),
        button(icon("chevron-right", mode))
            .style(button::secondary)
            .on_press_maybe((page + 1 < pages).then(|| msg(Msg::Page(page + 1)))),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let body = column![filters]
        .spacing(20)
        .padding(20)
        .push_maybe(remote_status(&state.courses, "courses"))
        .push_maybe(remote_status(&state.submissions, "submissions"))
        .push(scrollable(table).height(Length::Fill))
        .push(pager);

    let mut stack =
        Stack::new().push(Container::new(body).width(Length::Fill).height(Length::Fill));
    if state.confirm_delete.is_some() {
        let dialog = column![
            text("Delete assessment").size(24),
            text("This removes the assessment for every student in the course."),
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
