use iced::widget::{
    button, column, horizontal_space, pick_list, progress_bar, row, scrollable, text, Column,
    Container, Row, Stack,
};
use iced::{Alignment, Length};

use crate::app::messages::AnalyticsMessage as Msg;
use crate::app::state::AnalyticsPeriod;
use crate::app::{App, Message};
use crate::metrics;
use crate::report::ExportFormat;
use crate::screens::common::{card, icon, icon_button_content, remote_status, stat_card};
use crate::screens::toast::toast_overlay;

const TOP_COURSES: usize = 5;

fn msg(message: Msg) -> Message {
    Message::Analytics(message)
}

fn revenue_bars(app: &App) -> Column<Message> {
    let courses = app.analytics.courses.items();
    let max = courses
        .iter()
        .map(metrics::course_revenue)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    courses.iter().fold(
        column![text("Revenue by course").size(20)].spacing(8),
        |col, c| {
            let revenue = metrics::course_revenue(c);
            col.push(
                row![
                    text(c.title.clone()).width(Length::FillPortion(2)),
                    progress_bar(0.0..=max as f32, revenue as f32)
                        .height(12)
                        .width(Length::FillPortion(3)),
                    text(format!("${revenue:.2}")).width(Length::FillPortion(1)),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            )
        },
    )
}

fn top_courses(app: &App) -> Column<Message> {
    let state = &app.analytics;
    let courses = state.courses.items();
    metrics::top_courses(courses, TOP_COURSES).into_iter().fold(
        column![text("Top courses").size(20)].spacing(8),
        |col, c| {
            let completion = state.progress.get().map_or(0, |p| p.completion_rate(&c.id));
            col.push(
                row![
                    text(c.title.clone()).width(Length::FillPortion(3)),
                    text(format!("{} students", c.total_students)).width(Length::FillPortion(1)),
                    text(format!("{:.1} ★", c.rating)).width(Length::FillPortion(1)),
                    text(format!("{completion}% completed")).width(Length::FillPortion(1)),
                ]
                .spacing(10),
            )
        },
    )
}

fn certificates(app: &App) -> Column<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.analytics;
    let mut col = column![text("Pending certificates").size(20)]
        .spacing(8)
        .push_maybe(remote_status(&state.progress, "progress"));
    let candidates = state.progress.get().map(|p| p.candidates.as_slice()).unwrap_or(&[]);
    if candidates.is_empty() && state.progress.data.is_some() {
        col = col.push(text("No students are waiting for a certificate."));
    }
    for c in candidates {
        let approving = state.approving.contains(&c.enrollment_id);
        col = col.push(
            row![
                text(c.student_name.clone()).width(Length::FillPortion(2)),
                text(c.course_title.clone()).width(Length::FillPortion(3)),
                button(icon_button_content(
                    icon("certificate", mode),
                    if approving { "Approving..." } else { "Approve" }
                ))
                .on_press_maybe((!approving).then(|| msg(Msg::Approve(c.enrollment_id.clone())))),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        );
    }
    col
}

pub fn analytics_screen(app: &App) -> Container<Message> {
    let mode = app.ctx.preferences.theme;
    let state = &app.analytics;
    let courses = state.courses.items();
    let rating = metrics::average_rating(courses);
    let revenue = metrics::total_revenue(state.earnings.get(), courses);
    let students: u32 = courses.iter().map(|c| c.total_students).sum();
    let completion = state.progress.get().map_or(0, |p| {
        let all: Vec<f64> = p.by_course.values().flatten().copied().collect();
        metrics::completion_rate(&all)
    });

    let exports = ExportFormat::ALL.iter().fold(Row::new().spacing(8), |r, format| {
        r.push(
            button(icon_button_content(icon("file-export", mode), format.to_string()))
                .style(button::secondary)
                .on_press_maybe((!state.exporting).then_some(msg(Msg::Export(*format)))),
        )
    });

    let toolbar = row![
        pick_list(AnalyticsPeriod::ALL, Some(state.period), |p| msg(Msg::PeriodSelected(p))),
        horizontal_space(),
        exports,
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let stats = row![
        stat_card(
            "Total revenue",
            format!("${revenue:.2}"),
            Some(state.period.to_string()),
            "dollar-sign",
            mode,
        ),
        stat_card("Students", students.to_string(), None, "users", mode),
        stat_card(
            "Average rating",
            format!("{:.1}", rating.rating),
            Some(format!("{}% satisfaction", rating.satisfaction)),
            "star",
            mode
        ),
        stat_card("Completion rate", format!("{completion}%"), None, "graduation-cap", mode),
    ]
    .spacing(15);

    let body = column![toolbar]
        .spacing(20)
        .push_maybe(remote_status(&state.earnings, "earnings"))
        .push_maybe(remote_status(&state.courses, "courses"))
        .push(stats)
        .push(row![card(revenue_bars(app)), card(top_courses(app))].spacing(15))
        .push(card(certificates(app)));

    let base = Container::new(scrollable(body.padding(20)))
        .width(Length::Fill)
        .height(Length::Fill);
    let mut stack = Stack::new().push(base);
    if let Some(overlay) = toast_overlay(&state.toast, msg(Msg::DismissToast)) {
        stack = stack.push(overlay);
    }
    Container::new(stack).width(Length::Fill).height(Length::Fill)
}
