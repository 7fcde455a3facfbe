use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use umya_spreadsheet::{new_file, writer};

use crate::api::ProgressOverview;
use crate::metrics;
use crate::models::{Course, Earnings};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Could not write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not build spreadsheet: {0}")]
    Xlsx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Xlsx];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRow {
    pub title: String,
    pub status: String,
    pub students: u32,
    pub revenue: f64,
    pub rating: f64,
    pub completion: u32,
}

/// Snapshot of the analytics screen at export time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub period_days: u32,
    pub period_label: String,
    pub generated_at: DateTime<Utc>,
    pub total_revenue: f64,
    pub total_students: u32,
    pub average_rating: f64,
    pub satisfaction: u32,
    pub pending_certificates: usize,
    pub courses: Vec<CourseRow>,
}

impl AnalyticsReport {
    pub fn build(
        period_days: u32,
        earnings: Option<&Earnings>,
        courses: &[Course],
        progress: Option<&ProgressOverview>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let rating = metrics::average_rating(courses);
        Self {
            period_days,
            period_label: metrics::period_label(period_days),
            generated_at,
            total_revenue: metrics::total_revenue(earnings, courses),
            total_students: courses.iter().map(|c| c.total_students).sum(),
            average_rating: rating.rating,
            satisfaction: rating.satisfaction,
            pending_certificates: progress.map_or(0, |p| p.candidates.len()),
            courses: courses
                .iter()
                .map(|c| CourseRow {
                    title: c.title.clone(),
                    status: c.status.to_string(),
                    students: c.total_students,
                    revenue: metrics::course_revenue(c),
                    rating: c.rating,
                    completion: progress.map_or(0, |p| p.completion_rate(&c.id)),
                })
                .collect(),
        }
    }

    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Course,Status,Students,Revenue,Rating,Completion\n");
        for row in &self.courses {
            csv.push_str(&format!(
                "{},{},{},{:.2},{},{}\n",
                csv_quote(&row.title),
                csv_quote(&row.status),
                row.students,
                row.revenue,
                row.rating,
                row.completion
            ));
        }
        csv
    }

    fn write_xlsx(&self, path: &Path) -> Result<(), ReportError> {
        let mut book = new_file();
        let sheet = book
            .get_sheet_by_name_mut("Sheet1")
            .ok_or_else(|| ReportError::Xlsx("workbook has no default sheet".to_string()))?;

        sheet.get_cell_mut("A1").set_value("Course analytics");
        sheet
            .get_cell_mut("A2")
            .set_value(format!("Period: {}", self.period_label));
        sheet
            .get_cell_mut("A3")
            .set_value(format!("Total revenue: {:.2}", self.total_revenue));

        let headers = ["Course", "Status", "Students", "Revenue", "Rating", "Completion %"];
        for (i, header) in headers.iter().enumerate() {
            let cell_address = format!("{}5", col_to_letter(i + 1));
            sheet.get_cell_mut(&*cell_address).set_value(*header);
        }

        for (i, row) in self.courses.iter().enumerate() {
            let line = i + 6;
            let values = [
                row.title.clone(),
                row.status.clone(),
                row.students.to_string(),
                format!("{:.2}", row.revenue),
                row.rating.to_string(),
                row.completion.to_string(),
            ];
            for (j, value) in values.iter().enumerate() {
                let cell_address = format!("{}{}", col_to_letter(j + 1), line);
                sheet.get_cell_mut(&*cell_address).set_value(value);
            }
        }

        writer::xlsx::write(&book, path).map_err(|e| ReportError::Xlsx(e.to_string()))
    }

    /// Writes the report into `reports_dir` and returns the file path.
    pub fn export(&self, format: ExportFormat, reports_dir: &Path) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(reports_dir)?;
        let filename = format!(
            "analytics_{}d_{}.{}",
            self.period_days,
            self.generated_at.format("%Y-%m-%d_%H%M%S"),
            format.extension()
        );
        let path = reports_dir.join(filename);
        match format {
            ExportFormat::Csv => fs::write(&path, self.to_csv())?,
            ExportFormat::Json => fs::write(&path, serde_json::to_string_pretty(self)?)?,
            ExportFormat::Xlsx => self.write_xlsx(&path)?,
        }
        info!(path = %path.display(), %format, "analytics report written");
        Ok(path)
    }
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// 1-based column index to a letter; six columns is all we use.
fn col_to_letter(col: usize) -> String {
    ((b'A' + (col as u8) - 1) as char).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseStatus;
    use chrono::TimeZone;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn sample() -> AnalyticsReport {
        let courses = vec![
            Course {
                id: "a".into(),
                title: "Rust, the hard way".into(),
                price: 100.0,
                discount_price: 20.0,
                total_students: 5,
                rating: 4.0,
                status: CourseStatus::Published,
                ..Default::default()
            },
            Course {
                id: "b".into(),
                title: "Go".into(),
                price: 200.0,
                discount_price: 50.0,
                total_students: 10,
                ..Default::default()
            },
        ];
        let generated_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        AnalyticsReport::build(30, None, &courses, None, generated_at)
    }

    #[test]
    fn build_uses_metrics() {
        let report = sample();
        assert_eq!(report.total_revenue, 1900.0);
        assert_eq!(report.total_students, 15);
        assert_eq!(report.average_rating, 4.0);
        assert_eq!(report.period_label, "Last 30 days");
    }

    #[test]
    fn csv_quotes_titles_with_commas() {
        let csv = sample().to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "\"Rust, the hard way\",Published,5,400.00,4,0");
        assert_eq!(lines[2], "Go,Draft,10,1500.00,0,0");
    }

    #[test]
    fn export_writes_each_format() {
        let dir = std::env::temp_dir().join(format!(
            "reports-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        let report = sample();
        for format in ExportFormat::ALL {
            let path = report.export(format, &dir).unwrap();
            assert!(path.exists());
            assert_eq!(
                path.extension().and_then(|e| e.to_str()),
                Some(format.extension())
            );
        }
        let json =
            std::fs::read_to_string(dir.join("analytics_30d_2025-03-01_093000.json")).unwrap();
        assert!(json.contains("\"periodDays\": 30"));
    }
}
