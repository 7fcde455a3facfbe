use iced::widget::{column, Container, Row, Rule, Stack};
use iced::{Element, Length};

use crate::app::state::Screen;
use crate::screens::{
    analytics_screen, assignments_screen, course_assessments_screen, course_player_screen,
    create_course_screen, dashboard_screen, live_classes_screen, login_screen, my_courses_screen,
    nav_menu, navbar, settings_screen, toast_overlay,
};
use super::{App, Message};

impl App {
    pub fn view(&self) -> Element<Message> {
        let page = match self.screen {
            Screen::Login => login_screen(self),
            Screen::Dashboard => dashboard_screen(self),
            Screen::MyCourses => my_courses_screen(self),
            Screen::CoursePlayer => course_player_screen(self),
            Screen::CourseAssessments => course_assessments_screen(self),
            Screen::CreateCourse => create_course_screen(self),
            Screen::Assignments => assignments_screen(self),
            Screen::Analytics => analytics_screen(self),
            Screen::LiveClasses => live_classes_screen(self),
            Screen::Settings => settings_screen(self),
        };

        let shell: Element<Message> = if self.screen == Screen::Login {
            page.width(Length::Fill).into()
        } else {
            Row::new()
                .push(nav_menu(self))
                .push(Rule::vertical(1))
                .push(column![navbar(self), Rule::horizontal(1), page.width(Length::Fill)])
                .into()
        };

        let mut stack =
            Stack::new().push(Container::new(shell).width(Length::Fill).height(Length::Fill));
        if let Some(toast) = toast_overlay(&self.toast, Message::DismissToast) {
            stack = stack.push(toast);
        }
        stack.into()
    }
}
