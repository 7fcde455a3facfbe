use iced::widget::{
    button, column, horizontal_space, pick_list, row, scrollable, text, text_input, Column,
    Container, Stack,
};
use iced::{Alignment, Length};

use crate::app::messages::MyCoursesMessage;
use crate::app::state::{Screen, StatusFilter};
use crate::app::{App, Message};
use crate::metrics;
use crate::models::{Course, CourseStatus};
use crate::screens::common::{card, icon, icon_button_content, modal, remote_status};

fn msg(message: MyCoursesMessage) -> Message {
    Message::MyCourses(message)
}

fn course_card<'a>(app: &App, course: &Course) -> Container<'a, Message> {
    let mode = app.ctx.preferences.theme;
    let status_style = match course.status {
        CourseStatus::Published => text::success,
        CourseStatus::Draft => text::secondary,
    };
    let toggle_label = match course.status {
        CourseStatus::Published => "Unpublish",
        CourseStatus::Draft => "Publish",
    };
    let lectures: usize = course.curriculum.iter().map(|s| s.lectures.len()).sum();

    let header = row![
        text(course.title.clone()).size(22),
        text(course.status.to_string()).style(status_style),
        horizontal_space(),
        button(icon_button_content(icon("play", mode), "Content"))
            .on_press(msg(MyCoursesMessage::OpenPlayer(course.id.clone()))),
        button(icon_button_content(icon("clipboard-check", mode), "Assessments"))
            .on_press(msg(MyCoursesMessage::OpenAssessments(course.id.clone()))),
        button(toggle_label)
            .style(button::secondary)
            .on_press(msg(MyCoursesMessage::ToggleStatus(course.id.clone()))),
        button(icon("trash", mode))
            .style(button::danger)
            .on_press(msg(MyCoursesMessage::AskDelete(course.id.clone()))),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let facts = row![
        text(format!("{} students", course.total_students)),
        text(format!("{:.1} ★ ({} ratings)", course.rating, course.total_ratings)),
        text(format!("${:.2}", course.price)),
        text(format!(
            "{} lectures, {}",
            lectures,
            metrics::format_duration(metrics::curriculum_duration(course))
        )),
    ]
    .spacing(25);

    card(
        column![header, text(course.subtitle.clone()).size(15), facts]
            .spacing(8),
    )
}

pub fn my_courses_screen(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.my_courses;

    let toolbar = row![
        text_input("Search courses...", &state.search)
            .on_input(|v| msg(MyCoursesMessage::SearchChanged(v)))
            .padding(10)
            .width(Length::Fixed(300.0)),
        pick_list(StatusFilter::ALL, Some(state.status_filter), |f| {
            msg(MyCoursesMessage::FilterSelected(f))
        }),
        horizontal_space(),
        button(icon_button_content(icon("rotate", mode), "Refresh"))
            .style(button::secondary)
            .on_press(msg(MyCoursesMessage::Refresh)),
        button(icon_button_content(icon("circle-plus", mode), "New course"))
            .on_press(Message::Navigate(Screen::CreateCourse)),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let visible = state.visible();
    let mut list = Column::new().spacing(12);
    if visible.is_empty() && !state.courses.loading && state.courses.error.is_none() {
        list = list.push(text("No courses match."));
    }
    for course in visible {
        list = list.push(course_card(app, course));
    }

    let body = column![toolbar]
        .spacing(20)
        .padding(20)
        .push_maybe(remote_status(&state.courses, "courses"))
        .push(scrollable(list).height(Length::Fill));

    let mut stack =
        Stack::new().push(Container::new(body).width(Length::Fill).height(Length::Fill));
    if let Some(id) = &state.confirm_delete {
        let title = state
            .courses
            .items()
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.title.clone())
            .unwrap_or_default();
        let dialog = column![
            text("Delete course").size(24),
            text(format!("\"{title}\" and its content will be removed. This cannot be undone.")),
            row![
                horizontal_space(),
                button("Cancel")
                    .style(button::secondary)
                    .on_press(msg(MyCoursesMessage::CancelDelete)),
                button("Delete")
                    .style(button::danger)
                    .on_press(msg(MyCoursesMessage::ConfirmDelete)),
            ]
            .spacing(10),
        ]
        .spacing(15);
        stack = stack.push(modal(dialog, 460.0));
    }
    Container::new(stack).width(Length::Fill).height(Length::Fill)
}
