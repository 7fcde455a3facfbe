//! Aggregates shown on the dashboard and analytics screens.
//!
//! Everything here is a pure function of data already fetched. Empty input
//! always yields zero, never NaN.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{
    CertificateCandidate, Course, CourseStatus, Earnings, EnrolledStudent, Enrollment,
    ProgressRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    /// Mean rating, one decimal.
    pub rating: f64,
    /// Mean rating as a percentage of five stars.
    pub satisfaction: u32,
}

/// Sums every rating but divides by the number of rated courses only, so
/// unrated courses do not drag the average down.
pub fn average_rating(courses: &[Course]) -> RatingSummary {
    let rated = courses.iter().filter(|c| c.rating > 0.0).count();
    if rated == 0 {
        return RatingSummary::default();
    }
    let total: f64 = courses.iter().map(|c| c.rating).sum();
    let mean = total / rated as f64;
    RatingSummary {
        rating: round_to(mean, 1),
        satisfaction: (mean / 5.0 * 100.0).round().max(0.0) as u32,
    }
}

pub fn course_revenue(course: &Course) -> f64 {
    (course.price - course.discount_price) * f64::from(course.total_students)
}

/// Reported earnings win when positive; otherwise revenue is estimated from
/// the course list.
pub fn total_revenue(earnings: Option<&Earnings>, courses: &[Course]) -> f64 {
    if let Some(e) = earnings.filter(|e| e.total_earnings > 0.0) {
        return e.total_earnings;
    }
    round_to(courses.iter().map(course_revenue).sum(), 2)
}

pub fn completion_rate(progress: &[f64]) -> u32 {
    if progress.is_empty() {
        return 0;
    }
    let mean = progress.iter().sum::<f64>() / progress.len() as f64;
    mean.round().clamp(0.0, 100.0) as u32
}

/// Most enrolled first, ties broken by rating.
pub fn top_courses(courses: &[Course], n: usize) -> Vec<&Course> {
    let mut sorted: Vec<&Course> = courses.iter().collect();
    sorted.sort_by(|a, b| {
        b.total_students
            .cmp(&a.total_students)
            .then_with(|| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
    });
    sorted.truncate(n);
    sorted
}

/// Change from `previous` to `current` in percent, one decimal.
pub fn percent_change(previous: usize, current: usize) -> f64 {
    match (previous, current) {
        (0, 0) => 0.0,
        (0, _) => 100.0,
        (prev, cur) => round_to((cur as f64 - prev as f64) / prev as f64 * 100.0, 1),
    }
}

pub fn published_count(courses: &[Course]) -> usize {
    courses
        .iter()
        .filter(|c| c.status == CourseStatus::Published)
        .count()
}

/// Total lecture time of a course in seconds.
pub fn curriculum_duration(course: &Course) -> u32 {
    course
        .curriculum
        .iter()
        .flat_map(|s| &s.lectures)
        .map(|l| l.duration)
        .sum()
}

/// `1h 5m`, `12m` or `45s`.
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}

pub fn certificate_candidates(
    course: &Course,
    progress: &[ProgressRecord],
) -> Vec<CertificateCandidate> {
    progress
        .iter()
        .filter(|p| p.overall_progress >= 100.0 && !p.certificate_issued)
        .map(|p| CertificateCandidate {
            student_id: p.student.id.clone(),
            student_name: p.student.full_name(),
            course_id: course.id.clone(),
            course_title: course.title.clone(),
            enrollment_id: p.id.clone(),
        })
        .collect()
}

/// Flattens per-course enrollments into unique students. The first course a
/// student appears in is the one shown; the newest enrollment comes first.
pub fn merge_students(per_course: &[(String, Vec<Enrollment>)]) -> Vec<EnrolledStudent> {
    let mut seen = HashSet::new();
    let mut students: Vec<EnrolledStudent> = per_course
        .iter()
        .flat_map(|(title, enrollments)| enrollments.iter().map(move |e| (title, e)))
        .filter(|(_, e)| seen.insert(e.student.id.clone()))
        .map(|(title, e)| EnrolledStudent {
            id: e.student.id.clone(),
            name: e.student.full_name(),
            email: e.student.email.clone(),
            course_title: title.clone(),
            enrollment_date: e.enrollment_date,
        })
        .collect();
    students.sort_by(|a, b| b.enrollment_date.cmp(&a.enrollment_date));
    students
}

pub fn period_label(days: u32) -> String {
    match days {
        7 => "Last 7 days".to_string(),
        30 => "Last 30 days".to_string(),
        90 => "Last 3 months".to_string(),
        365 => "Last year".to_string(),
        d => format!("{d} days"),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lecture, Section, StudentRef};
    use chrono::{TimeZone, Utc};

    fn course(id: &str, price: f64, discount: f64, students: u32, rating: f64) -> Course {
        Course {
            id: id.into(),
            title: format!("Course {id}"),
            price,
            discount_price: discount,
            total_students: students,
            rating,
            ..Default::default()
        }
    }

    fn student(id: &str) -> StudentRef {
        StudentRef {
            id: id.into(),
            first_name: "Stu".into(),
            last_name: id.to_uppercase(),
            email: format!("{id}@example.com"),
        }
    }

    #[test]
    fn empty_inputs_give_zero() {
        assert_eq!(average_rating(&[]), RatingSummary::default());
        assert_eq!(total_revenue(None, &[]), 0.0);
        assert_eq!(completion_rate(&[]), 0);
        assert_eq!(percent_change(0, 0), 0.0);
        assert!(top_courses(&[], 5).is_empty());
        assert!(merge_students(&[]).is_empty());

        let unrated = [course("a", 10.0, 0.0, 1, 0.0)];
        assert_eq!(average_rating(&unrated), RatingSummary::default());
    }

    #[test]
    fn revenue_from_prices_discounts_and_students() {
        let courses = [
            course("a", 100.0, 20.0, 5, 0.0),
            course("b", 200.0, 50.0, 10, 0.0),
        ];
        assert_eq!(total_revenue(None, &courses), 1900.0);

        let zero = Earnings { total_earnings: 0.0 };
        assert_eq!(total_revenue(Some(&zero), &courses), 1900.0);

        let reported = Earnings { total_earnings: 750.5 };
        assert_eq!(total_revenue(Some(&reported), &courses), 750.5);
    }

    #[test]
    fn average_rating_ignores_unrated_in_denominator() {
        let courses = [
            course("a", 0.0, 0.0, 0, 4.0),
            course("b", 0.0, 0.0, 0, 5.0),
            course("c", 0.0, 0.0, 0, 0.0),
        ];
        let summary = average_rating(&courses);
        assert_eq!(summary.rating, 4.5);
        assert_eq!(summary.satisfaction, 90);
    }

    #[test]
    fn top_courses_break_ties_by_rating() {
        let courses = [
            course("a", 0.0, 0.0, 10, 3.0),
            course("b", 0.0, 0.0, 20, 1.0),
            course("c", 0.0, 0.0, 10, 4.5),
        ];
        let ids: Vec<&str> = top_courses(&courses, 2).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn percent_change_cases() {
        assert_eq!(percent_change(0, 3), 100.0);
        assert_eq!(percent_change(4, 5), 25.0);
        assert_eq!(percent_change(3, 2), -33.3);
    }

    #[test]
    fn candidates_need_full_progress_and_no_certificate() {
        let c = course("c1", 0.0, 0.0, 0, 0.0);
        let records = vec![
            ProgressRecord {
                id: "e1".into(),
                student: student("s1"),
                overall_progress: 100.0,
                certificate_issued: false,
            },
            ProgressRecord {
                id: "e2".into(),
                student: student("s2"),
                overall_progress: 100.0,
                certificate_issued: true,
            },
            ProgressRecord {
                id: "e3".into(),
                student: student("s3"),
                overall_progress: 80.0,
                certificate_issued: false,
            },
        ];
        let found = certificate_candidates(&c, &records);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].enrollment_id, "e1");
        assert_eq!(found[0].course_title, "Course c1");
        assert_eq!(found[0].student_name, "Stu S1");
    }

    #[test]
    fn merge_students_dedupes_and_orders_newest_first() {
        let day = |d| Some(Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap());
        let per_course = vec![
            (
                "Rust".to_string(),
                vec![
                    Enrollment { student: student("s1"), enrollment_date: day(1) },
                    Enrollment { student: student("s2"), enrollment_date: day(5) },
                ],
            ),
            (
                "Go".to_string(),
                vec![
                    Enrollment { student: student("s1"), enrollment_date: day(9) },
                    Enrollment { student: student("s3"), enrollment_date: day(3) },
                ],
            ),
        ];
        let merged = merge_students(&per_course);
        let ids: Vec<&str> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s2", "s3", "s1"]);
        assert_eq!(merged[2].course_title, "Rust");
    }

    #[test]
    fn curriculum_duration_sums_lectures() {
        let mut c = course("c", 0.0, 0.0, 0, 0.0);
        c.curriculum = vec![
            Section {
                lectures: vec![
                    Lecture { duration: 600, ..Default::default() },
                    Lecture { duration: 3000, ..Default::default() },
                ],
                ..Default::default()
            },
            Section {
                lectures: vec![Lecture { duration: 300, ..Default::default() }],
                ..Default::default()
            },
        ];
        assert_eq!(curriculum_duration(&c), 3900);
        assert_eq!(format_duration(3900), "1h 5m");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(completion_rate(&[100.0, 50.0, 0.0]), 50);
    }
}
