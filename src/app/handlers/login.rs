use iced::Task;
use tracing::{info, warn};

use crate::app::messages::LoginMessage;
use crate::app::state::{Screen, LOGIN_REDIRECT_MS};
use crate::app::update::sleep_ms;
use crate::app::{App, Message};
use crate::models::Credentials;
use crate::toast::ToastKind;

const INSTRUCTOR_ROLE: &str = "instructor";

/// `Access denied. Students are not allowed on this page.`
pub(crate) fn access_denied(role: &str) -> String {
    let mut chars = role.chars();
    let capitalised = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => "User".to_string(),
    };
    format!("Access denied. {capitalised}s are not allowed on this page.")
}

impl App {
    pub(crate) fn update_login(&mut self, message: LoginMessage) -> Task<Message> {
        let state = &mut self.login;
        match message {
            LoginMessage::EmailChanged(v) => {
                state.email = v;
                Task::none()
            }
            LoginMessage::PasswordChanged(v) => {
                state.password = v;
                Task::none()
            }
            LoginMessage::TogglePassword => {
                state.show_password = !state.show_password;
                Task::none()
            }
            LoginMessage::Submit => {
                if state.loading {
                    return Task::none();
                }
                if state.email.trim().is_empty() || state.password.is_empty() {
                    self.notify("Please enter your email and password.", ToastKind::Error);
                    return Task::none();
                }
                state.loading = true;
                let credentials = Credentials {
                    email: state.email.trim().to_string(),
                    password: state.password.clone(),
                };
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.login(&credentials)
                            .await
                            .map_err(|e| e.message_or("Invalid credentials or server error."))
                    },
                    |r| Message::Login(LoginMessage::Finished(r)),
                )
            }
            LoginMessage::Finished(result) => {
                state.loading = false;
                match result {
                    Ok(response) if response.role != INSTRUCTOR_ROLE => {
                        info!(role = %response.role, "login refused for role");
                        self.notify(access_denied(&response.role), ToastKind::Error);
                        Task::none()
                    }
                    Ok(response) => {
                        if let Err(e) = self.ctx.session.save(&response.token) {
                            warn!(error = %e, "could not persist session token");
                            self.notify(format!("Could not store session: {e}"), ToastKind::Error);
                            return Task::none();
                        }
                        state.password.clear();
                        self.notify("Login successful! Redirecting...", ToastKind::Success);
                        Task::batch([
                            Task::perform(sleep_ms(LOGIN_REDIRECT_MS), |_| {
                                Message::Login(LoginMessage::RedirectElapsed)
                            }),
                            self.load_instructor(),
                        ])
                    }
                    Err(message) => {
                        self.notify(message, ToastKind::Error);
                        Task::none()
                    }
                }
            }
            LoginMessage::RedirectElapsed => {
                if self.screen == Screen::Login && self.ctx.session.is_authenticated() {
                    self.navigate(Screen::Dashboard)
                } else {
                    Task::none()
                }
            }
        }
    }
}
