use iced::widget::{button, container, row, text, Container};
use iced::{Alignment, Color, Length};

use crate::app::Message;
use crate::toast::{ToastKind, ToastSlot};

/// Bottom-right toast, or `None` when the slot is empty.
pub fn toast_overlay<'a>(slot: &ToastSlot, dismiss: Message) -> Option<Container<'a, Message>> {
    let toast = slot.current()?;
    let tint = match toast.kind {
        ToastKind::Info => Color::from_rgb8(37, 99, 235),
        ToastKind::Success => Color::from_rgb8(22, 163, 74),
        ToastKind::Error => Color::from_rgb8(220, 38, 38),
    };
    let bubble = Container::new(
        row![
            text(toast.message.clone()).color(Color::WHITE),
            button(text("✕").color(Color::WHITE))
                .style(button::text)
                .on_press(dismiss),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding(12)
    .max_width(420.0)
    .style(move |_| container::Style {
        background: Some(tint.into()),
        border: iced::border::rounded(6.0),
        ..container::Style::default()
    });

    Some(
        Container::new(bubble)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::End)
            .align_y(Alignment::End)
            .padding(20),
    )
}
