use iced::widget::{button, checkbox, column, text, text_input, vertical_space, Container};
use iced::{Center, Length};

use crate::config::ThemeMode;
use crate::screens::common::{icon, icon_button_content};

use crate::app::messages::LoginMessage;
use crate::app::{App, Message};

pub fn login_screen(app: &App) -> Container<Message> {
    let state = &app.login;
    let mode = app.ctx.preferences.theme;
    let submit = (!state.loading).then_some(Message::Login(LoginMessage::Submit));

    let content = column![
        text("Instructor Portal").size(30),
        text("Sign in to manage your courses").size(16),
        vertical_space().height(10),
        text_input("Email", &state.email)
            .on_input(|v| Message::Login(LoginMessage::EmailChanged(v)))
            .on_submit_maybe(submit.clone())
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        text_input("Password", &state.password)
            .on_input(|v| Message::Login(LoginMessage::PasswordChanged(v)))
            .on_submit_maybe(submit.clone())
            .secure(!state.show_password)
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        checkbox("Show password", state.show_password)
            .on_toggle(|_| Message::Login(LoginMessage::TogglePassword)),
        button(if state.loading { "Signing in..." } else { "Sign in" })
            .on_press_maybe(submit)
            .padding(10),
        vertical_space().height(10),
        button(icon_button_content(
            icon(if mode == ThemeMode::Light { "moon" } else { "sun" }, mode),
            if mode == ThemeMode::Light { "Dark mode" } else { "Light mode" },
        ))
        .style(button::text)
        .on_press(Message::ToggleTheme),
    ]
    .spacing(15)
    .width(Length::Fill)
    .align_x(Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_y(Length::Fill)
        .padding(40)
}
