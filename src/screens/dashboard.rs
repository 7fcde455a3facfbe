use iced::widget::{
    button, checkbox, column, horizontal_space, pick_list, radio, row, scrollable, text,
    text_input, Column, Container, Row, Stack,
};
use iced::{Alignment, Element, Length};

use crate::app::handlers::dashboard::increments;
use crate::app::messages::DashboardMessage;
use crate::app::state::CourseOption;
use crate::app::{App, Message};
use crate::metrics;
use crate::models::NotificationType;
use crate::screens::common::{
    card, error_line, field, icon, icon_button_content, modal, remote_status, stat_card,
};
use crate::validation::Audience;

const RECENT_STUDENTS: usize = 5;

fn dash(message: DashboardMessage) -> Message {
    Message::Dashboard(message)
}

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value}% since last visit")
    } else {
        format!("{value}% since last visit")
    }
}

fn notify_modal(app: &App) -> Container<Message> {
    let state = &app.dashboard;
    let form = &state.notify;

    let audience = Audience::ALL.iter().fold(Row::new().spacing(20), |r, a| {
        r.push(radio(a.to_string(), *a, Some(form.audience), |a| {
            dash(DashboardMessage::AudienceSelected(a))
        }))
    });

    let recipients: Element<Message> = match form.audience {
        Audience::Students => {
            let students = state.students.items();
            let all_selected = !students.is_empty() && form.user_ids.len() == students.len();
            let list = students.iter().fold(Column::new().spacing(4), |col, s| {
                col.push(
                    checkbox(format!("{} ({})", s.name, s.email), form.user_ids.contains(&s.id))
                        .on_toggle({
                            let id = s.id.clone();
                            move |_| dash(DashboardMessage::ToggleStudent(id.clone()))
                        }),
                )
            });
            column![
                checkbox("Select all", all_selected)
                    .on_toggle(|on| dash(DashboardMessage::SelectAll(on))),
                scrollable(list).height(Length::Fixed(160.0)),
            ]
            .spacing(8)
            .into()
        }
        Audience::Course => {
            let options = CourseOption::all(state.courses.items());
            let selected = form
                .course_id
                .as_ref()
                .and_then(|id| options.iter().find(|o| &o.id == id).cloned());
            pick_list(options, selected, |o| dash(DashboardMessage::CourseSelected(o)))
                .placeholder("Choose a course")
                .into()
        }
    };

    let send = (!state.sending).then_some(dash(DashboardMessage::Send));
    let content = column![
        text("Send notification").size(24),
        audience,
        recipients,
        field(
            "Title",
            text_input("Title", &form.title).on_input(|v| dash(DashboardMessage::TitleChanged(v)))
        ),
        field(
            "Message",
            text_input("Message", &form.message)
                .on_input(|v| dash(DashboardMessage::BodyChanged(v)))
        ),
        field(
            "Type",
            pick_list(NotificationType::ALL, Some(form.kind), |k| {
                dash(DashboardMessage::KindSelected(k))
            })
        ),
        field(
            "Action URL (optional)",
            text_input("https://...", &form.action_url)
                .on_input(|v| dash(DashboardMessage::ActionUrlChanged(v)))
        ),
    ]
    .spacing(12)
    .push_maybe(error_line(state.notify_error.as_ref()))
    .push(
        row![
            horizontal_space(),
            button("Cancel").style(button::secondary).on_press(dash(DashboardMessage::CloseNotify)),
            button(if state.sending { "Sending..." } else { "Send" }).on_press_maybe(send),
        ]
        .spacing(10),
    );
    modal(content, 560.0)
}

pub fn dashboard_screen(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.dashboard;
    let courses = state.courses.items();
    let counts = app.dashboard_counts();
    let (students_change, published_change) = increments(state.baseline, counts);
    let rating = metrics::average_rating(courses);

    let stats = row![
        stat_card(
            "Total students",
            counts.students.to_string(),
            state.students.data.as_ref().map(|_| signed(students_change)),
            "users",
            mode
        ),
        stat_card(
            "Active courses",
            counts.published.to_string(),
            state.courses.data.as_ref().map(|_| signed(published_change)),
            "book-open",
            mode
        ),
        stat_card(
            "Average rating",
            format!("{:.1}", rating.rating),
            Some(format!("{}% satisfaction", rating.satisfaction)),
            "star",
            mode
        ),
        stat_card(
            "Revenue",
            format!("${:.2}", metrics::total_revenue(None, courses)),
            None,
            "dollar-sign",
            mode
        ),
    ]
    .spacing(15);

    let top = metrics::top_courses(courses, 3).into_iter().fold(
        column![text("Top courses").size(20)].spacing(8),
        |col, c| {
            col.push(
                row![
                    text(c.title.clone()).width(Length::FillPortion(3)),
                    text(format!("{} students", c.total_students)).width(Length::FillPortion(1)),
                    text(format!("{:.1} ★", c.rating)).width(Length::FillPortion(1)),
                ]
                .spacing(10),
            )
        },
    );

    let recent = state.students.items().iter().take(RECENT_STUDENTS).fold(
        column![text("Recent enrollments").size(20)]
            .spacing(8)
            .push_maybe(remote_status(&state.students, "students")),
        |col, s| {
            let when = s
                .enrollment_date
                .map(|d| d.format("%d.%m.%Y").to_string())
                .unwrap_or_default();
            col.push(
                row![
                    text(s.name.clone()).width(Length::FillPortion(2)),
                    text(s.course_title.clone()).width(Length::FillPortion(3)),
                    text(when).width(Length::FillPortion(1)),
                ]
                .spacing(10),
            )
        },
    );

    let header = row![
        horizontal_space(),
        button(icon_button_content(icon("bell", mode), "Send notification"))
            .on_press(dash(DashboardMessage::OpenNotify)),
    ]
    .align_y(Alignment::Center);

    let body = column![header]
        .spacing(20)
        .push_maybe(remote_status(&state.courses, "courses"))
        .push(stats)
        .push(row![card(top), card(recent)].spacing(15));

    let base = Container::new(scrollable(body.padding(20)))
        .width(Length::Fill)
        .height(Length::Fill);

    let mut stack = Stack::new().push(base);
    if state.show_notify {
        stack = stack.push(notify_modal(app));
    }
    Container::new(stack).width(Length::Fill).height(Length::Fill)
}
