mod analytics;
mod assignments;
mod course_assessments;
mod create_course;
pub(crate) mod dashboard;
mod live_classes;
mod login;
mod my_courses;
mod player;
mod settings;
