use iced::widget::{
    button, checkbox, column, horizontal_space, image, radio, row, scrollable, text, text_input,
    Column, Container, Row,
};
use iced::{Alignment, Element, Length};

use crate::app::messages::{AccountField, PreferenceToggle, ProfileField, SettingsMessage as Msg};
use crate::app::state::SettingsTab;
use crate::app::{App, Message};
use crate::config::{SidebarBehavior, ThemeMode};
use crate::screens::common::{card, field, icon, icon_button_content, remote_status};

fn msg(message: Msg) -> Message {
    Message::Settings(message)
}

fn profile_input<'a>(
    label: &'a str,
    value: &'a str,
    profile_field: ProfileField,
    editable: bool,
) -> Column<'a, Message> {
    let input = text_input(label, value).padding(8);
    let input = if editable {
        input.on_input(move |v| msg(Msg::ProfileChanged(profile_field, v)))
    } else {
        input
    };
    field(label, input)
}

fn toggle<'a>(label: &'a str, on: bool, which: PreferenceToggle) -> Element<'a, Message> {
    checkbox(label, on)
        .on_toggle(move |v| msg(Msg::Toggle(which, v)))
        .into()
}

fn profile_tab(app: &App) -> Column<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.settings;
    let form = &state.profile_form;
    let editable = state.editable && !state.saving;

    let avatar: Element<Message> = match &state.avatar_image {
        Some(handle) => image(handle.clone()).width(Length::Fixed(96.0)).into(),
        None => Container::new(
            text(state.profile.get().map(|p| p.initials()).unwrap_or_default()).size(32),
        )
        .padding(24)
        .style(iced::widget::container::rounded_box)
        .into(),
    };
    let mut avatar_col = column![avatar].spacing(8).align_x(Alignment::Center);
    if editable {
        avatar_col = avatar_col.push(
            row![
                button(icon("camera", mode))
                    .style(button::secondary)
                    .on_press(msg(Msg::PickAvatar)),
                button(icon("trash", mode)).style(button::danger).on_press(msg(Msg::RemoveAvatar)),
            ]
            .spacing(6),
        );
    }

    let tags = form.expertise.iter().fold(Row::new().spacing(6), |r, tag| {
        let chip = row![text(tag.clone()).size(14)].spacing(4).align_y(Alignment::Center);
        let chip = if editable {
            chip.push(
                button(icon("xmark", mode))
                    .style(button::text)
                    .padding(0)
                    .on_press(msg(Msg::RemoveExpertise(tag.clone()))),
            )
        } else {
            chip
        };
        r.push(Container::new(chip).padding(6).style(iced::widget::container::rounded_box))
    });

    let mut expertise = column![text("Expertise").size(14), tags].spacing(6);
    if editable {
        expertise = expertise.push(
            row![
                text_input("Add expertise", &form.new_expertise)
                    .on_input(|v| msg(Msg::ProfileChanged(ProfileField::NewExpertise, v)))
                    .on_submit(msg(Msg::AddExpertise)),
                button("Add").on_press(msg(Msg::AddExpertise)),
            ]
            .spacing(8),
        );
    }

    let actions = (if state.editable {
        row![
            horizontal_space(),
            button("Cancel")
                .style(button::secondary)
                .on_press_maybe((!state.saving).then_some(msg(Msg::CancelEdit))),
            button(if state.saving { "Saving..." } else { "Save changes" })
                .on_press_maybe((!state.saving).then_some(msg(Msg::SaveProfile))),
        ]
    } else {
        row![
            horizontal_space(),
            button(icon_button_content(icon("pen", mode), "Edit profile")).on_press(msg(Msg::Edit)),
        ]
    })
    .spacing(10);

    column![
        row![
            avatar_col,
            column![
                row![
                    profile_input(
                        "First name",
                        &form.first_name,
                        ProfileField::FirstName,
                        editable,
                    ),
                    profile_input("Last name", &form.last_name, ProfileField::LastName, editable),
                ]
                .spacing(10),
                row![
                    profile_input("Email", &form.email, ProfileField::Email, editable),
                    profile_input("Phone", &form.phone, ProfileField::Phone, editable),
                ]
                .spacing(10),
            ]
            .spacing(10),
        ]
        .spacing(20),
        profile_input("Bio", &form.bio, ProfileField::Bio, editable),
        expertise,
        row![
            profile_input("LinkedIn", &form.linkedin, ProfileField::LinkedIn, editable),
            profile_input("Twitter / X", &form.twitter, ProfileField::Twitter, editable),
        ]
        .spacing(10),
        actions,
    ]
    .spacing(15)
}

fn account_tab(app: &App) -> Column<Message> {
    let state = &app.settings;
    let form = &state.account_form;
    column![
        account_input("Full name", &form.full_name, AccountField::FullName, false),
        account_input("Email", &form.email, AccountField::Email, false),
        text("Change password").size(18),
        account_input(
            "Current password",
            &form.current_password,
            AccountField::CurrentPassword,
            true,
        ),
        row![
            account_input("New password", &form.new_password, AccountField::NewPassword, true),
            account_input(
                "Confirm new password",
                &form.confirm_password,
                AccountField::ConfirmPassword,
                true,
            ),
        ]
        .spacing(10),
        row![
            horizontal_space(),
            button(if state.saving { "Saving..." } else { "Update account" })
                .on_press_maybe((!state.saving).then_some(msg(Msg::SaveAccount))),
        ],
    ]
    .spacing(15)
}

fn account_input<'a>(
    label: &'a str,
    value: &'a str,
    which: AccountField,
    secure: bool,
) -> Column<'a, Message> {
    field(
        label,
        text_input(label, value)
            .on_input(move |v| msg(Msg::AccountChanged(which, v)))
            .secure(secure)
            .padding(8),
    )
}

fn notifications_tab(app: &App) -> Column<Message> {
    let prefs = &app.ctx.preferences.notifications;
    column![
        text("Email").size(18),
        toggle(
            "New student enrollments",
            prefs.email_new_students,
            PreferenceToggle::EmailNewStudents,
        ),
        toggle(
            "Assignment submissions",
            prefs.email_assignments,
            PreferenceToggle::EmailAssignments,
        ),
        toggle("Course reviews", prefs.email_reviews, PreferenceToggle::EmailReviews),
        text("Push").size(18),
        toggle("Student messages", prefs.push_messages, PreferenceToggle::PushMessages),
        toggle("Weekly reports", prefs.push_reports, PreferenceToggle::PushReports),
        row![horizontal_space(), button("Save preferences").on_press(msg(Msg::SavePreferences))],
    ]
    .spacing(12)
}

fn appearance_tab(app: &App) -> Column<Message> {
    let prefs = &app.ctx.preferences;
    column![
        text("Theme").size(18),
        row![
            radio("Light", ThemeMode::Light, Some(prefs.theme), |t| msg(Msg::ThemeSelected(t))),
            radio("Dark", ThemeMode::Dark, Some(prefs.theme), |t| msg(Msg::ThemeSelected(t))),
        ]
        .spacing(20),
        text("Sidebar").size(18),
        row![
            radio("Collapsible", SidebarBehavior::Collapsible, Some(prefs.sidebar), |b| {
                msg(Msg::SidebarSelected(b))
            }),
            radio("Always expanded", SidebarBehavior::Expanded, Some(prefs.sidebar), |b| {
                msg(Msg::SidebarSelected(b))
            }),
        ]
        .spacing(20),
        row![
            button("Reset to default").style(button::secondary).on_press(msg(Msg::ResetAppearance)),
            horizontal_space(),
            button("Save appearance").on_press(msg(Msg::SavePreferences)),
        ],
    ]
    .spacing(12)
}

fn security_tab(app: &App) -> Column<Message> {
    let mode = app.ctx.preferences.theme;
    let privacy = &app.ctx.preferences.privacy;
    let sessions = app.settings.sessions.iter().fold(Column::new().spacing(8), |col, s| {
        let action: Element<Message> = if s.is_current {
            text("This device").size(13).into()
        } else {
            button("Revoke")
                .style(button::danger)
                .on_press(msg(Msg::RevokeSession(s.id)))
                .into()
        };
        col.push(
            row![
                icon("desktop", mode),
                column![text(s.name.clone()), text(s.device.clone()).size(13)],
                horizontal_space(),
                action,
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        )
    });
    column![
        toggle("Two-factor authentication", privacy.two_factor, PreferenceToggle::TwoFactor),
        text("Privacy").size(18),
        toggle("Public profile", privacy.public_profile, PreferenceToggle::PublicProfile),
        toggle(
            "Show online status",
            privacy.show_online_status,
            PreferenceToggle::ShowOnlineStatus,
        ),
        toggle(
            "Allow course recommendations",
            privacy.allow_recommendations,
            PreferenceToggle::AllowRecommendations
        ),
        row![
            horizontal_space(),
            button("Save security settings").on_press(msg(Msg::SavePreferences)),
        ],
        text("Active sessions").size(18),
        sessions,
        row![
            horizontal_space(),
            button("Log out all other sessions")
                .style(button::secondary)
                .on_press_maybe(
                    (app.settings.sessions.len() > 1).then_some(msg(Msg::RevokeOtherSessions)),
                ),
        ],
    ]
    .spacing(12)
}

pub fn settings_screen(app: &App) -> Container<Message> {
    let state = &app.settings;
    let tabs = SettingsTab::ALL.iter().fold(Row::new().spacing(8), |r, tab| {
        let style = if *tab == state.tab { button::primary } else { button::secondary };
        r.push(button(text(tab.to_string())).style(style).on_press(msg(Msg::TabSelected(*tab))))
    });

    let content = match state.tab {
        SettingsTab::Profile => profile_tab(app),
        SettingsTab::Account => account_tab(app),
        SettingsTab::Notifications => notifications_tab(app),
        SettingsTab::Appearance => appearance_tab(app),
        SettingsTab::Security => security_tab(app),
    };

    let body = column![tabs]
        .spacing(20)
        .padding(20)
        .push_maybe(remote_status(&state.profile, "profile"))
        .push(scrollable(card(content)).height(Length::Fill));

    Container::new(body).width(Length::Fill).height(Length::Fill)
}
