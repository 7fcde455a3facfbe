use iced::widget::{
    button, column, horizontal_space, image, row, scrollable, text, text_input, Column, Container,
};
use iced::{Alignment, Length};

use crate::app::messages::{CourseField, CreateCourseMessage};
use crate::app::{App, Message};
use crate::screens::common::{card, error_line, field, icon, icon_button_content};
use crate::validation::{split_list, CourseForm};

fn msg(message: CreateCourseMessage) -> Message {
    Message::CreateCourse(message)
}

fn input<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    course_field: CourseField,
) -> Column<'a, Message> {
    field(
        label,
        text_input(placeholder, value)
            .on_input(move |v| msg(CreateCourseMessage::FieldChanged(course_field, v)))
            .padding(8),
    )
}

fn preview<'a>(form: &CourseForm) -> Container<'a, Message> {
    let bullets = |items: Vec<String>| {
        items
            .into_iter()
            .fold(Column::new().spacing(2), |col, item| col.push(text(format!("• {item}"))))
    };
    let price = match form.discount_price.trim() {
        "" => format!("${}", form.price.trim()),
        discount => format!("${discount} (was ${})", form.price.trim()),
    };
    card(
        column![
            text(form.title.clone()).size(24),
            text(form.subtitle.clone()).size(16),
            text(format!(
                "{} / {}  |  {}  |  {}  |  {}",
                form.category, form.sub_category, form.level, form.language, form.duration
            ))
            .size(14),
            text(price),
            text(form.description.clone()),
            text("Prerequisites").size(16),
            bullets(split_list(&form.prerequisites)),
            text("What you will learn").size(16),
            bullets(split_list(&form.learning_outcomes)),
        ]
        .spacing(8),
    )
}

pub fn create_course_screen(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.create_course;
    let form = &state.form;
    let busy = state.saving;

    let thumbnail = match &state.thumbnail_preview {
        Some(handle) => column![
            image(handle.clone()).width(Length::Fixed(240.0)),
            button("Remove")
                .style(button::danger)
                .on_press_maybe((!busy).then_some(msg(CreateCourseMessage::RemoveThumbnail))),
        ]
        .spacing(8),
        None => column![text("No thumbnail selected").size(14)],
    };

    let form_column = column![
        input("Title *", "Course title", &form.title, CourseField::Title),
        input("Subtitle", "Short tagline", &form.subtitle, CourseField::Subtitle),
        input(
            "Description *",
            "What is the course about?",
            &form.description,
            CourseField::Description,
        ),
        row![
            input("Category *", "Development", &form.category, CourseField::Category),
            input("Sub-category", "Web", &form.sub_category, CourseField::SubCategory),
        ]
        .spacing(10),
        row![
            input("Language", "English", &form.language, CourseField::Language),
            input("Level *", "Beginner", &form.level, CourseField::Level),
            input("Duration", "10 hours", &form.duration, CourseField::Duration),
        ]
        .spacing(10),
        row![
            input("Price", "0", &form.price, CourseField::Price),
            input("Discount price", "0", &form.discount_price, CourseField::DiscountPrice),
        ]
        .spacing(10),
        input(
            "Prerequisites (comma separated)",
            "Basic Rust, Git",
            &form.prerequisites,
            CourseField::Prerequisites
        ),
        input(
            "Learning outcomes (comma separated)",
            "Build a CLI, Write tests",
            &form.learning_outcomes,
            CourseField::LearningOutcomes
        ),
        text("Thumbnail").size(16),
        row![
            button(icon_button_content(icon("image", mode), "Choose image"))
                .style(button::secondary)
                .on_press_maybe((!busy).then_some(msg(CreateCourseMessage::PickThumbnail))),
            thumbnail,
        ]
        .spacing(15),
    ]
    .spacing(12)
    .push_maybe(error_line(state.error.as_ref()))
    .push_maybe(state.status.as_ref().map(|s| text(s.clone()).style(text::success)))
    .push(
        row![
            button(if state.show_preview { "Hide preview" } else { "Preview" })
                .style(button::secondary)
                .on_press(msg(CreateCourseMessage::TogglePreview)),
            horizontal_space(),
            button(if busy { "Creating..." } else { "Create course" })
                .on_press_maybe((!busy).then_some(msg(CreateCourseMessage::Submit))),
        ]
        .align_y(Alignment::Center),
    );

    let mut layout =
        row![scrollable(form_column.padding(10)).width(Length::FillPortion(3))].spacing(20);
    if state.show_preview {
        layout = layout.push(scrollable(preview(form)).width(Length::FillPortion(2)));
    }

    Container::new(layout)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
}
