use iced::Task;
use tracing::{info, warn};

use crate::api::{Failure, LectureUpload};
use crate::app::messages::PlayerMessage;
use crate::app::state::LectureRef;
use crate::app::update::{as_text, is_expired, pick_file};
use crate::app::{App, Message};
use crate::models::Course;
use crate::toast::ToastKind;
use crate::validation::check_video;

/// The first lecture with a video, or failing that the first lecture at all.
pub(crate) fn first_playable(course: &Course) -> Option<LectureRef> {
    let lectures = || {
        course
            .curriculum
            .iter()
            .flat_map(|s| s.lectures.iter().map(move |l| (s, l)))
    };
    lectures()
        .find(|(_, l)| l.video_url().is_some())
        .or_else(|| lectures().next())
        .map(|(s, l)| LectureRef {
            section_id: s.id.clone(),
            lecture_id: l.id.clone(),
        })
}

impl App {
    pub(crate) fn load_player(&mut self) -> Task<Message> {
        let course_id = self.player.course_id.clone();
        if course_id.is_empty() {
            self.player.course.fail("No course selected.");
            return Task::none();
        }
        let generation = self.player.course.begin();
        let api = self.ctx.api.clone();
        Task::perform(
            async move {
                api.course(&course_id)
                    .await
                    .map_err(|e| Failure::with_fallback(e, "Failed to load course content."))
            },
            move |r| Message::Player(PlayerMessage::Loaded(generation, r)),
        )
    }

    pub(crate) fn update_player(&mut self, message: PlayerMessage) -> Task<Message> {
        let state = &mut self.player;
        match message {
            PlayerMessage::Loaded(generation, result) => {
                if is_expired(&state.course, generation, &result) {
                    return self.expire_session();
                }
                if state.course.resolve(generation, as_text(result)) {
                    let still_there = state.selected_lecture().is_some();
                    if !still_there {
                        state.selected = state.course.get().and_then(first_playable);
                    }
                }
                Task::none()
            }
            PlayerMessage::ToggleSection(section_id) => {
                if !state.collapsed.remove(&section_id) {
                    state.collapsed.insert(section_id);
                }
                Task::none()
            }
            PlayerMessage::SelectLecture(section_id, lecture_id) => {
                state.selected = Some(LectureRef {
                    section_id,
                    lecture_id,
                });
                state.upload_status = None;
                Task::none()
            }
            PlayerMessage::OpenVideo => {
                let Some(url) = state
                    .selected_lecture()
                    .and_then(|(_, l)| l.video_url())
                    .map(str::to_string)
                else {
                    self.notify("This lecture has no video yet.", ToastKind::Info);
                    return Task::none();
                };
                if let Err(e) = open::that(&url) {
                    warn!(%url, error = %e, "could not open video");
                    self.notify(format!("Could not open the video: {e}"), ToastKind::Error);
                }
                Task::none()
            }
            PlayerMessage::PickVideo => Task::perform(
                pick_file("Select lecture video", "MP4 video", &["mp4"]),
                |r| Message::Player(PlayerMessage::VideoPicked(r)),
            ),
            PlayerMessage::VideoPicked(Ok(None)) => Task::none(),
            PlayerMessage::VideoPicked(Ok(Some(file))) => {
                match check_video(&file) {
                    Ok(()) => {
                        state.upload_status = Some(format!("Ready to upload {}", file.name));
                        state.video = Some(file);
                    }
                    Err(e) => {
                        state.video = None;
                        state.upload_status = Some(e.to_string());
                    }
                }
                Task::none()
            }
            PlayerMessage::VideoPicked(Err(e)) => {
                state.upload_status = Some(e);
                Task::none()
            }
            PlayerMessage::Upload => {
                if state.uploading {
                    return Task::none();
                }
                let Some((section, lecture)) = state.selected_lecture() else {
                    state.upload_status = Some("Select a lecture first.".to_string());
                    return Task::none();
                };
                let upload = LectureUpload {
                    section_id: section.id.clone(),
                    lecture_id: lecture.id.clone(),
                    title: lecture.title.clone(),
                    description: lecture
                        .content
                        .as_ref()
                        .and_then(|c| c.description.clone())
                        .unwrap_or_default(),
                    duration: lecture.duration,
                    is_preview: lecture.is_preview,
                };
                let Some(video) = state.video.take() else {
                    state.upload_status = Some("Choose an MP4 file first.".to_string());
                    return Task::none();
                };
                info!(
                    lecture = %upload.lecture_id,
                    bytes = video.size(),
                    "uploading lecture video"
                );
                state.uploading = true;
                state.upload_status = Some("Uploading...".to_string());
                let course_id = state.course_id.clone();
                let api = self.ctx.api.clone();
                Task::perform(
                    async move {
                        api.upload_lecture_content(&course_id, &upload, video)
                            .await
                            .map_err(|e| Failure::with_fallback(e, "Failed to upload video."))
                    },
                    |r| Message::Player(PlayerMessage::Uploaded(r)),
                )
            }
            PlayerMessage::Uploaded(result) => {
                state.uploading = false;
                match result {
                    Ok(()) => {
                        state.upload_status = None;
                        self.notify("Video uploaded successfully!", ToastKind::Success);
                        self.load_player()
                    }
                    Err(Failure::Unauthorized) => self.expire_session(),
                    Err(Failure::Message(m)) => {
                        state.upload_status = Some(m);
                        Task::none()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lecture, LectureContent, Section};

    fn lecture(id: &str, url: Option<&str>) -> Lecture {
        Lecture {
            id: id.into(),
            title: id.into(),
            content: url.map(|u| LectureContent {
                url: Some(u.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn first_playable_prefers_lectures_with_video() {
        let mut course = Course {
            curriculum: vec![
                Section {
                    id: "s1".into(),
                    lectures: vec![lecture("l1", None)],
                    ..Default::default()
                },
                Section {
                    id: "s2".into(),
                    lectures: vec![lecture("l2", Some("https://cdn/v.mp4"))],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let pick = first_playable(&course).unwrap();
        assert_eq!((pick.section_id.as_str(), pick.lecture_id.as_str()), ("s2", "l2"));

        course.curriculum[1].lectures[0].content = None;
        assert_eq!(first_playable(&course).unwrap().lecture_id, "l1");

        assert!(first_playable(&Course::default()).is_none());
    }
}
