use chrono::Utc;
use iced::widget::{
    button, column, pick_list, row, scrollable, text, text_input, Column,
    Container,
};
use iced::{Alignment, Length};
use iced_aw::date_picker;

use crate::app::messages::LiveClassesMessage as Msg;
use crate::app::state::CourseOption;
use crate::app::{App, Message};
use crate::models::{LiveClass, LiveClassStatus};
use crate::screens::common::{
    card, date_label, error_line, field, icon, icon_button_content, remote_status, to_date,
};

fn msg(message: Msg) -> Message {
    Message::LiveClasses(message)
}

fn class_row<'a>(app: &'a App, class: &'a LiveClass) -> Container<'a, Message> {
    let mode = app.ctx.preferences.theme;
    let course = app
        .live_classes
        .courses
        .items()
        .iter()
        .find(|c| c.id == class.course_id)
        .map(|c| c.title.clone())
        .unwrap_or_default();
    let joining = app.live_classes.joining.as_deref() == Some(class.id.as_str());
    let can_join = matches!(class.status, LiveClassStatus::Scheduled | LiveClassStatus::Live);
    card(
        row![
            column![
                text(class.title.clone()).size(18),
                text(course).size(14),
            ]
            .spacing(4)
            .width(Length::FillPortion(3)),
            text(class.scheduled_at.format("%d.%m.%Y %H:%M UTC").to_string())
                .width(Length::FillPortion(2)),
            text(format!("{} min", class.duration_minutes)).width(Length::FillPortion(1)),
            text(class.status.to_string()).width(Length::FillPortion(1)),
            button(icon_button_content(
                icon("video", mode),
                if joining { "Joining..." } else { "Join" },
            ))
                .on_press_maybe(
                    (can_join && app.live_classes.joining.is_none())
                        .then(|| msg(Msg::Join(class.id.clone()))),
                ),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
    )
}

fn schedule_form(app: &App) -> Column<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.live_classes;
    let form = &state.form;

    let options = CourseOption::all(state.courses.items());
    let selected = form
        .course_id
        .as_ref()
        .and_then(|id| options.iter().find(|o| &o.id == id).cloned());

    let date_button = button(icon_button_content(icon("calendar", mode), "Date"))
        .style(button::secondary)
        .on_press(msg(Msg::ChooseDate));

    column![
        text("Schedule a live class").size(20),
        field(
            "Title",
            text_input("Weekly Q&A", &form.title).on_input(|v| msg(Msg::TitleChanged(v)))
        ),
        field(
            "Course",
            pick_list(options, selected, |o| msg(Msg::CourseSelected(o)))
                .placeholder("Choose a course")
        ),
        row![
            date_picker(
                state.show_date_picker,
                to_date(form.date),
                date_button,
                msg(Msg::CancelDate),
                |d| msg(Msg::SubmitDate(d)),
            ),
            text(date_label(form.date, "no date")),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
        row![
            field(
                "Start (HH:MM, UTC)",
                text_input("10:00", &form.time).on_input(|v| msg(Msg::TimeChanged(v)))
            ),
            field(
                "Duration (min)",
                text_input("60", &form.duration_minutes).on_input(|v| msg(Msg::DurationChanged(v)))
            ),
        ]
        .spacing(10),
    ]
    .spacing(12)
    .push_maybe(error_line(state.form_error.as_ref()))
    .push(
        button(if state.saving { "Scheduling..." } else { "Schedule" })
            .on_press_maybe((!state.saving).then_some(msg(Msg::Schedule))),
    )
}

pub fn live_classes_screen(app: &App) -> Container<Message> {
    let state = &app.live_classes;
    let now = Utc::now();
    let (upcoming, past): (Vec<&LiveClass>, Vec<&LiveClass>) = state
        .classes
        .items()
        .iter()
        .partition(|c| c.scheduled_at >= now || c.status == LiveClassStatus::Live);

    let mut list = column![text("Upcoming").size(20)].spacing(10);
    if upcoming.is_empty() && state.classes.data.is_some() {
        list = list.push(text("Nothing scheduled."));
    }
    for class in upcoming {
        list = list.push(class_row(app, class));
    }
    if !past.is_empty() {
        list = list.push(text("Past").size(20));
        for class in past.into_iter().rev() {
            list = list.push(class_row(app, class));
        }
    }

    let body = Column::new()
        .spacing(20)
        .padding(20)
        .push_maybe(remote_status(&state.classes, "live classes"))
        .push(
            row![
                scrollable(list).width(Length::FillPortion(3)),
                card(schedule_form(app)).width(Length::FillPortion(2)),
            ]
            .spacing(20)
            .height(Length::Fill),
        );

    Container::new(body).width(Length::Fill).height(Length::Fill)
}
