pub mod analytics;
pub mod assignments;
pub mod common;
pub mod course_assessments;
pub mod course_player;
pub mod create_course;
pub mod dashboard;
pub mod live_classes;
pub mod login;
pub mod my_courses;
pub mod nav_menu;
pub mod settings;
pub mod toast;

pub use analytics::analytics_screen;
pub use assignments::assignments_screen;
pub use course_assessments::course_assessments_screen;
pub use course_player::course_player_screen;
pub use create_course::create_course_screen;
pub use dashboard::dashboard_screen;
pub use live_classes::live_classes_screen;
pub use login::login_screen;
pub use my_courses::my_courses_screen;
pub use nav_menu::{nav_menu, navbar};
pub use settings::settings_screen;
pub use toast::toast_overlay;
