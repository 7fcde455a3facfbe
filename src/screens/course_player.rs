use iced::widget::{button, column, horizontal_space, row, scrollable, text, Column, Container};
use iced::{Alignment, Length};

use crate::app::messages::PlayerMessage;
use crate::app::state::Screen;
use crate::app::{App, Message};
use crate::metrics;
use crate::screens::common::{card, icon, icon_button_content, remote_status};

fn msg(message: PlayerMessage) -> Message {
    Message::Player(message)
}

fn curriculum(app: &App) -> Column<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.player;
    let Some(course) = state.course.get() else {
        return Column::new();
    };

    let mut list = Column::new().spacing(6);
    for section in &course.curriculum {
        let collapsed = state.collapsed.contains(&section.id);
        let total: u32 = section.lectures.iter().map(|l| l.duration).sum();
        list = list.push(
            button(
                row![
                    icon(if collapsed { "chevron-right" } else { "chevron-down" }, mode),
                    text(section.section_title.clone()).size(17),
                    horizontal_space(),
                    text(format!(
                        "{} lectures, {}",
                        section.lectures.len(),
                        metrics::format_duration(total)
                    ))
                        .size(13),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            )
            .style(button::secondary)
            .width(Length::Fill)
            .on_press(msg(PlayerMessage::ToggleSection(section.id.clone()))),
        );
        if collapsed {
            continue;
        }
        for lecture in &section.lectures {
            let selected = state
                .selected
                .as_ref()
                .is_some_and(|s| s.section_id == section.id && s.lecture_id == lecture.id);
            let marker = if lecture.video_url().is_some() { "circle-play" } else { "file" };
            list = list.push(
                button(
                    row![
                        icon(marker, mode),
                        text(lecture.title.clone()),
                        horizontal_space(),
                        text(lecture.display_time()).size(13),
                    ]
                    .spacing(8)
                    .align_y(Alignment::Center),
                )
                .style(if selected { button::primary } else { button::text })
                .width(Length::Fill)
                .on_press(msg(PlayerMessage::SelectLecture(
                    section.id.clone(),
                    lecture.id.clone(),
                ))),
            );
        }
    }
    if course.curriculum.is_empty() {
        list = list.push(text("This course has no sections yet."));
    }
    list
}

fn lecture_panel(app: &App) -> Column<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.player;
    let Some((section, lecture)) = state.selected_lecture() else {
        return column![text("Select a lecture to see its details.")];
    };

    let description = lecture
        .content
        .as_ref()
        .and_then(|c| c.description.clone())
        .unwrap_or_default();
    let open = lecture.video_url().map(|_| msg(PlayerMessage::OpenVideo));
    let upload = (state.video.is_some() && !state.uploading).then_some(msg(PlayerMessage::Upload));

    column![
        text(section.section_title.clone()).size(14),
        text(lecture.title.clone()).size(24),
        text(format!(
            "Duration {}{}",
            lecture.display_time(),
            if lecture.is_preview { ", free preview" } else { "" }
        )),
        text(description),
        button(icon_button_content(icon("up-right-from-square", mode), "Open video"))
            .on_press_maybe(open),
        text("Replace lecture video").size(18),
        row![
            button(icon_button_content(icon("file-video", mode), "Choose MP4"))
                .style(button::secondary)
                .on_press_maybe((!state.uploading).then_some(msg(PlayerMessage::PickVideo))),
            button(icon_button_content(
                icon("upload", mode),
                if state.uploading { "Uploading..." } else { "Upload" },
            ))
                .on_press_maybe(upload),
        ]
        .spacing(10),
    ]
    .spacing(12)
    .push_maybe(state.upload_status.as_ref().map(|s| text(s.clone()).size(14)))
}

pub fn course_player_screen(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.player;
    let title = state
        .course
        .get()
        .map(|c| c.title.clone())
        .unwrap_or_default();

    let header = row![
        button(icon_button_content(icon("arrow-left", mode), "My Courses"))
            .style(button::text)
            .on_press(Message::Navigate(Screen::MyCourses)),
        text(title).size(24),
    ]
    .spacing(15)
    .align_y(Alignment::Center);

    let body = column![header]
        .spacing(15)
        .padding(20)
        .push_maybe(remote_status(&state.course, "course"))
        .push(
            row![
                Container::new(scrollable(curriculum(app))).width(Length::FillPortion(2)),
                card(lecture_panel(app)).width(Length::FillPortion(3)),
            ]
            .spacing(20)
            .height(Length::Fill),
        );

    Container::new(body).width(Length::Fill).height(Length::Fill)
}
