use iced::widget::image::Handle;
use iced::Task;
use tracing::{debug, info, warn};

use crate::api::Failure;
use crate::app::messages::{AccountField, PreferenceToggle, ProfileField, SettingsMessage};
use crate::app::state::SettingsTab;
use crate::app::update::{as_text, is_expired, pick_file};
use crate::app::{App, Message};
use crate::config::{Preferences, SidebarBehavior, ThemeMode};
use crate::toast::ToastKind;
use crate::validation::{add_tag, check_avatar, AccountForm, ProfileForm};

fn profile_field(form: &mut ProfileForm, field: ProfileField) -> &mut String {
    match field {
        ProfileField::FirstName => &mut form.first_name,
        ProfileField::LastName => &mut form.last_name,
        ProfileField::Email => &mut form.email,
        ProfileField::Phone => &mut form.phone,
        ProfileField::Bio => &mut form.bio,
        ProfileField::NewExpertise => &mut form.new_expertise,
        ProfileField::LinkedIn => &mut form.linkedin,
        ProfileField::Twitter => &mut form.twitter,
    }
}

fn account_field(form: &mut AccountForm, field: AccountField) -> &mut String {
    match field {
        AccountField::FullName => &mut form.full_name,
        AccountField::Email => &mut form.email,
        AccountField::CurrentPassword => &mut form.current_password,
        AccountField::NewPassword => &mut form.new_password,
        AccountField::ConfirmPassword => &mut form.confirm_password,
    }
}

pub(crate) fn apply_toggle(prefs: &mut Preferences, toggle: PreferenceToggle, on: bool) {
    let slot = match toggle {
        PreferenceToggle::EmailNewStudents => &mut prefs.notifications.email_new_students,
        PreferenceToggle::EmailAssignments => &mut prefs.notifications.email_assignments,
        PreferenceToggle::EmailReviews => &mut prefs.notifications.email_reviews,
        PreferenceToggle::PushMessages => &mut prefs.notifications.push_messages,
        PreferenceToggle::PushReports => &mut prefs.notifications.push_reports,
        PreferenceToggle::TwoFactor => &mut prefs.privacy.two_factor,
        PreferenceToggle::PublicProfile => &mut prefs.privacy.public_profile,
        PreferenceToggle::ShowOnlineStatus => &mut prefs.privacy.show_online_status,
        PreferenceToggle::AllowRecommendations => &mut prefs.privacy.allow_recommendations,
    };
    *slot = on;
}

impl App {
    pub(crate) fn load_settings(&mut self) -> Task<Message> {
        let generation = self.settings.profile.begin();
        let api = self.ctx.api.clone();
        Task::perform(
            async move {
                api.profile()
                    .await
                    .map_err(|e| Failure::with_fallback(e, "Failed to fetch profile"))
            },
            move |r| Message::Settings(SettingsMessage::ProfileLoaded(generation, r)),
        )
    }

    fn load_avatar(&self, url: String) -> Task<Message> {
        let api = self.ctx.api.clone();
        Task::perform(
            async move { api.avatar_bytes(&url).await.map_err(|e| e.to_string()) },
            |r| Message::Settings(SettingsMessage::AvatarLoaded(r)),
        )
    }

    pub(crate) fn update_settings(&mut self, message: SettingsMessage) -> Task<Message> {
        let state = &mut self.settings;
        match message {
            SettingsMessage::TabSelected(tab) => {
                state.tab = tab;
                Task::none()
            }
            SettingsMessage::ProfileLoaded(generation, result) => {
                if is_expired(&state.profile, generation, &result) {
                    return self.expire_session();
                }
                if !state.profile.resolve(generation, as_text(result)) {
                    return Task::none();
                }
                let Some(profile) = state.profile.get().cloned() else {
                    return Task::none();
                };
                state.fill_forms(&profile);
                state.editable = false;
                state.avatar = None;
                match profile.avatar.filter(|a| !a.is_empty()) {
                    Some(url) => self.load_avatar(url),
                    None => {
                        state.avatar_image = None;
                        Task::none()
                    }
                }
            }
            SettingsMessage::AvatarLoaded(Ok(bytes)) => {
                if state.avatar.is_none() {
                    state.avatar_image = Some(Handle::from_bytes(bytes));
                }
                Task::none()
            }
            SettingsMessage::AvatarLoaded(Err(e)) => {
                debug!(error = %e, "avatar not shown");
                Task::none()
            }
            SettingsMessage::Edit => {
                state.editable = true;
                Task::none()
            }
            SettingsMessage::CancelEdit => {
                state.editable = false;
                if let Some(profile) = state.profile.get().cloned() {
                    state.fill_forms(&profile);
                }
                if state.avatar.take().is_some() {
                    state.avatar_image = None;
                    let url = state.profile.get().and_then(|p| p.avatar.clone());
                    if let Some(url) = url.filter(|a| !a.is_empty()) {
                        return self.load_avatar(url);
                    }
                }
                Task::none()
            }
            SettingsMessage::ProfileChanged(field, value) => {
                *profile_field(&mut state.profile_form, field) = value;
                Task::none()
            }
            SettingsMessage::AddExpertise => {
                let tag = std::mem::take(&mut state.profile_form.new_expertise);
                add_tag(&mut state.profile_form.expertise, &tag);
                Task::none()
            }
            SettingsMessage::RemoveExpertise(tag) => {
                state.profile_form.expertise.retain(|t| *t != tag);
                Task::none()
            }
            SettingsMessage::PickAvatar => Task::perform(
                pick_file("Select profile picture", "Images", &["png", "jpg", "jpeg", "gif"]),
                |r| Message::Settings(SettingsMessage::AvatarPicked(r)),
            ),
            SettingsMessage::AvatarPicked(Ok(None)) => Task::none(),
            SettingsMessage::AvatarPicked(Ok(Some(file))) => {
                if let Err(e) = check_avatar(&file) {
                    self.notify(e.to_string(), ToastKind::Error);
                    return Task::none();
                }
                state.avatar_image = Some(Handle::from_bytes(file.bytes.clone()));
                state.avatar = Some(file);
                Task::none()
            }
            SettingsMessage::AvatarPicked(Err(e)) => {
                self.notify(e, ToastKind::Error);
                Task::none()
            }
            SettingsMessage::RemoveAvatar => {
                state.avatar = None;
                state.avatar_image = None;
                Task::none()
            }
            SettingsMessage::SaveProfile => {
                if state.saving {
                    return Task::none();
                }
                let (details, update) = match state.profile_form.validate() {
                    Ok(parts) => parts,
                    Err(e) => {
                        self.notify(e.to_string(), ToastKind::Error);
                        return Task::none();
                    }
                };
                state.saving = true;
                let avatar = state.avatar.clone();
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.update_profile(&update)
                            .await
                            .map_err(|e| {
                                Failure::with_fallback(e, "Failed to update profile details")
                            })?;
                        api.update_details(&details, avatar)
                            .await
                            .map_err(|e| {
                                Failure::with_fallback(e, "Failed to update account details")
                            })
                    },
                    |r| Message::Settings(SettingsMessage::ProfileSaved(r)),
                )
            }
            SettingsMessage::ProfileSaved(result) => {
                state.saving = false;
                match result {
                    Ok(avatar) => {
                        info!(new_avatar = avatar.is_some(), "profile updated");
                        state.editable = false;
                        state.avatar = None;
                        self.notify("Profile updated successfully!", ToastKind::Success);
                        Task::batch([self.load_settings(), self.load_instructor()])
                    }
                    Err(Failure::Unauthorized) => self.expire_session(),
                    Err(Failure::Message(m)) => {
                        self.notify(m, ToastKind::Error);
                        Task::none()
                    }
                }
            }
            SettingsMessage::AccountChanged(field, value) => {
                *account_field(&mut state.account_form, field) = value;
                Task::none()
            }
            SettingsMessage::SaveAccount => {
                if state.saving {
                    return Task::none();
                }
                let (details, password) = match state.account_form.validate() {
                    Ok(parts) => parts,
                    Err(e) => {
                        self.notify(e.to_string(), ToastKind::Error);
                        return Task::none();
                    }
                };
                state.saving = true;
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.update_details(&details, None)
                            .await
                            .map_err(|e| {
                                Failure::with_fallback(e, "Failed to update account details")
                            })?;
                        if let Some(change) = password {
                            api.change_password(&change).await.map_err(|e| {
                                Failure::with_fallback(e, "Failed to update password")
                            })?;
                        }
                        Ok::<(), Failure>(())
                    },
                    |r| Message::Settings(SettingsMessage::AccountSaved(r)),
                )
            }
            SettingsMessage::AccountSaved(result) => {
                state.saving = false;
                match result {
                    Ok(()) => {
                        let form = &mut state.account_form;
                        form.current_password.clear();
                        form.new_password.clear();
                        form.confirm_password.clear();
                        self.notify("Account updated successfully!", ToastKind::Success);
                        Task::batch([self.load_settings(), self.load_instructor()])
                    }
                    Err(Failure::Unauthorized) => self.expire_session(),
                    Err(Failure::Message(m)) => {
                        self.notify(m, ToastKind::Error);
                        Task::none()
                    }
                }
            }
            SettingsMessage::Toggle(toggle, on) => {
                apply_toggle(&mut self.ctx.preferences, toggle, on);
                Task::none()
            }
            SettingsMessage::SavePreferences => {
                let success = if state.tab == SettingsTab::Appearance {
                    "Appearance settings saved successfully!"
                } else {
                    "Settings saved successfully!"
                };
                self.save_preferences(Some(success));
                Task::none()
            }
            SettingsMessage::ThemeSelected(theme) => {
                self.ctx.preferences.theme = theme;
                Task::none()
            }
            SettingsMessage::SidebarSelected(behavior) => {
                self.ctx.preferences.sidebar = behavior;
                Task::none()
            }
            SettingsMessage::ResetAppearance => {
                self.ctx.preferences.theme = ThemeMode::default();
                self.ctx.preferences.sidebar = SidebarBehavior::default();
                self.save_preferences(None);
                self.notify("Settings reset to default.", ToastKind::Info);
                Task::none()
            }
            SettingsMessage::RevokeSession(id) => {
                if state.sessions.iter().any(|s| s.id == id && s.is_current) {
                    self.notify("Use Logout to end the current session.", ToastKind::Info);
                    return Task::none();
                }
                state.sessions.retain(|s| s.id != id);
                self.notify("Session revoked.", ToastKind::Success);
                Task::none()
            }
            SettingsMessage::RevokeOtherSessions => {
                state.sessions.retain(|s| s.is_current);
                self.notify("All other sessions have been logged out.", ToastKind::Success);
                Task::none()
            }
        }
    }
}
