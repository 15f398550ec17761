//! Terminal and JSON presentation of a year's listing.

use kanpo_downloader_core::display::{
    display_name, format_date, format_size, issue_number_label, page_range_label,
};
use kanpo_downloader_core::listing::{bucket_by_month, MonthBucket, ParsedFile};
use kanpo_downloader_core::navigation::month_availability;
use kanpo_downloader_core::session::SessionSnapshot;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ListingReport {
    pub year: Option<i32>,
    pub error: Option<String>,
    pub months: Vec<MonthBucket>,
}

/// Month buckets of the snapshot, narrowed to `month` when given.
pub fn visible_months(snapshot: &SessionSnapshot, month: Option<u32>) -> Vec<MonthBucket> {
    bucket_by_month(&snapshot.listing)
        .into_iter()
        .filter(|bucket| month.map_or(true, |m| bucket.month == m))
        .collect()
}

pub fn render_json(snapshot: &SessionSnapshot, month: Option<u32>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ListingReport {
        year: snapshot.year,
        error: snapshot.error.clone(),
        months: visible_months(snapshot, month),
    })
}

pub fn render_text(snapshot: &SessionSnapshot, month: Option<u32>) -> String {
    let year = snapshot.year.unwrap_or_default();
    let mut lines = vec![format!("{year}年の官報ファイル一覧")];

    if let Some(error) = &snapshot.error {
        lines.push(format!("エラー: {error}"));
    } else if snapshot.loading {
        lines.push("ファイルを読み込み中...".to_string());
    } else if snapshot.listing.is_empty() {
        lines.push("この年のファイルはありません".to_string());
    } else {
        lines.push(month_nav(snapshot, year));
        let months = visible_months(snapshot, month);
        if months.is_empty() {
            lines.push(String::new());
            lines.push("この月のファイルはありません".to_string());
        }
        for bucket in &months {
            lines.push(String::new());
            lines.push(format!("== {}月 ==", bucket.month));
            for day in &bucket.dates {
                lines.push(format_date(&day.date));
                for file in day.types.values().flatten() {
                    lines.extend(card(file));
                }
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Months without files are bracketed, like the disabled month buttons.
fn month_nav(snapshot: &SessionSnapshot, year: i32) -> String {
    month_availability(&snapshot.listing, year)
        .into_iter()
        .map(|m| {
            if m.has_files {
                format!("{}月", m.month)
            } else {
                format!("({}月)", m.month)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn card(file: &ParsedFile) -> [String; 2] {
    let labels: Vec<String> = [
        display_name(file),
        issue_number_label(&file.name),
        page_range_label(&file.name),
        format_size(file.size),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    [
        format!("  {}", labels.join("  ")),
        format!("    {}", file.download_url),
    ]
}
