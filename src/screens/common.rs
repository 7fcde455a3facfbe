use chrono::{Datelike, NaiveDate};
use iced::widget::container::{background, bordered_box};
use iced::widget::{column, text, Column, Container, Row};
use iced::{Alignment, Color, Element, Length, Renderer, Theme};
use iced_aw::date_picker::Date;
use iced_font_awesome::fa_icon_solid;

use crate::app::Message;
use crate::config::ThemeMode;
use crate::fetch::Remote;

pub fn icon(name: &'static str, mode: ThemeMode) -> Element<'static, Message> {
    fa_icon_solid(name)
        .style(move |_| text::base(&mode.theme()))
        .into()
}

pub fn icon_button_content<'a>(
    icon_element: impl Into<Element<'a, Message, Theme, Renderer>>,
    label: impl text::IntoFragment<'a>,
) -> Row<'a, Message> {
    Row::new()
        .align_y(Alignment::Center)
        .spacing(5)
        .push(icon_element)
        .push(text(label))
}

/// Darkened full-window overlay with `content` centered on top.
pub fn modal<'a>(content: impl Into<Element<'a, Message>>, width: f32) -> Container<'a, Message> {
    let dialog = Container::new(content)
        .style(bordered_box)
        .padding(20)
        .width(Length::Fixed(width));
    Container::new(Container::new(dialog).center(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }))
}

pub fn card<'a>(content: impl Into<Element<'a, Message>>) -> Container<'a, Message> {
    Container::new(content)
        .padding(15)
        .width(Length::Fill)
        .style(bordered_box)
}

/// Small labelled figure used on the dashboard and analytics screens.
pub fn stat_card<'a>(
    label: &'a str,
    value: String,
    note: Option<String>,
    icon_name: &'static str,
    mode: ThemeMode,
) -> Container<'a, Message> {
    let body = column![
        icon_button_content(icon(icon_name, mode), label),
        text(value).size(28),
    ]
    .spacing(8)
    .push_maybe(note.map(|n| text(n).size(13).style(text::secondary)));
    card(body).width(Length::FillPortion(1))
}

/// Loading / error line for a remote resource, or `None` when it has data.
pub fn remote_status<'a, T>(remote: &Remote<T>, what: &str) -> Option<Element<'a, Message>> {
    if remote.loading && remote.data.is_none() {
        return Some(text(format!("Loading {what}...")).into());
    }
    remote
        .error
        .as_ref()
        .map(|e| text(e.clone()).style(text::danger).into())
}

pub fn error_line<'a>(error: Option<&String>) -> Option<Element<'a, Message>> {
    error.map(|e| text(e.clone()).style(text::danger).into())
}

pub fn field<'a>(label: &'a str, input: impl Into<Element<'a, Message>>) -> Column<'a, Message> {
    column![text(label).size(14), input.into()].spacing(4)
}

pub fn to_date(date: Option<NaiveDate>) -> Date {
    match date {
        Some(d) => Date::from_ymd(d.year(), d.month(), d.day()),
        None => Date::today(),
    }
}

pub fn date_label(date: Option<NaiveDate>, empty: &str) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| empty.to_string())
}
