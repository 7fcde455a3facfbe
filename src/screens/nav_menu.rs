use iced::widget::{
    button, column, horizontal_space, row, text, vertical_space, Column, Container, Row,
};
use iced::{Alignment, Length};

use crate::app::state::Screen;
use crate::app::{App, Message};
use crate::screens::common::{icon, icon_button_content};

const ENTRIES: [(Screen, &str, &str); 7] = [
    (Screen::Dashboard, "house", "Dashboard"),
    (Screen::MyCourses, "book-open", "My Courses"),
    (Screen::CreateCourse, "circle-plus", "Create Course"),
    (Screen::Assignments, "clipboard-list", "Assignments"),
    (Screen::Analytics, "chart-line", "Analytics"),
    (Screen::LiveClasses, "video", "Live Classes"),
    (Screen::Settings, "gear", "Settings"),
];

/// Screens reached from a course keep their parent entry highlighted.
fn highlighted(current: Screen) -> Screen {
    match current {
        Screen::CoursePlayer | Screen::CourseAssessments => Screen::MyCourses,
        other => other,
    }
}

pub fn nav_menu(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let expanded = app.sidebar_expanded();
    let active = highlighted(app.screen);

    let mut content = Column::new().spacing(10);
    for (screen, icon_name, label) in ENTRIES {
        let inner = if expanded {
            icon_button_content(icon(icon_name, mode), label)
        } else {
            row![icon(icon_name, mode)]
        };
        let style = if screen == active { button::primary } else { button::text };
        content = content.push(
            button(inner)
                .style(style)
                .on_press(Message::Navigate(screen))
                .width(Length::Fill),
        );
    }

    let logout = if expanded {
        icon_button_content(icon("arrow-right-from-bracket", mode), "Logout")
    } else {
        row![icon("arrow-right-from-bracket", mode)]
    };
    content = content
        .push(vertical_space())
        .push(button(logout).style(button::danger).on_press(Message::Logout).width(Length::Fill));

    Container::new(content)
        .width(Length::Fixed(if expanded { 210.0 } else { 64.0 }))
        .height(Length::Fill)
        .padding(10)
}

/// Header with the screen title, theme toggle and the signed-in instructor.
pub fn navbar(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let (title, subtitle) = app.screen.heading();

    let who = match app.instructor.get() {
        Some(profile) => row![
            Container::new(text(profile.initials()).size(16))
                .padding(8)
                .style(iced::widget::container::rounded_box),
            column![text(profile.full_name()).size(15), text(profile.email.clone()).size(12)],
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        None if app.instructor.loading => row![text("Loading profile...").size(13)],
        None => Row::new(),
    };

    let theme_icon = match mode {
        crate::config::ThemeMode::Light => "moon",
        crate::config::ThemeMode::Dark => "sun",
    };

    let mut bar = Row::new().spacing(15).align_y(Alignment::Center);
    if app.ctx.preferences.sidebar == crate::config::SidebarBehavior::Collapsible {
        bar = bar.push(
            button(icon("bars", mode))
                .style(button::text)
                .on_press(Message::ToggleSidebar),
        );
    }
    bar = bar
        .push(column![text(title).size(26), text(subtitle).size(14)].spacing(2))
        .push(horizontal_space())
        .push(button(icon(theme_icon, mode)).style(button::text).on_press(Message::ToggleTheme))
        .push(who);

    Container::new(bar).width(Length::Fill).padding(10)
}
