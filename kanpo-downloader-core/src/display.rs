//! Display strings derived from parsed gazette files.

use chrono::{Datelike, NaiveDate};

use crate::listing::{DocumentType, FileName, ParsedFile};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Decimal (1000-based) size with two decimals, e.g. `1.50 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    // floor(log_1000(bytes)), capped at the largest unit
    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit + 1 < SIZE_UNITS.len() && bytes / scale >= 1000 {
        scale *= 1000;
        unit += 1;
    }
    format!("{:.2} {}", bytes as f64 / scale as f64, SIZE_UNITS[unit])
}

/// `YYYYMMDD` → `YYYY年MM月DD日(W)`. Unparseable input is returned as-is.
pub fn format_date(date: &str) -> String {
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return date.to_string();
    }
    match NaiveDate::parse_from_str(date, "%Y%m%d") {
        Ok(day) => format!(
            "{}年{}月{}日({})",
            &date[0..4],
            &date[4..6],
            &date[6..8],
            WEEKDAYS[day.weekday().num_days_from_sunday() as usize]
        ),
        Err(_) => date.to_string(),
    }
}

pub fn display_type_name(document_type: DocumentType) -> String {
    match document_type {
        DocumentType::Original => "本紙".to_string(),
        DocumentType::Extra => "号外".to_string(),
        DocumentType::Procurement => "政府調達".to_string(),
        DocumentType::SpecialExtra => "特別号外".to_string(),
        DocumentType::Index => "目録".to_string(),
        DocumentType::Other => document_type.code().to_string(),
    }
}

/// `第123号`, or empty for unrecognized filenames.
pub fn issue_number_label(name: &FileName) -> String {
    name.issue_number()
        .map(|n| format!("第{n}号"))
        .unwrap_or_default()
}

/// `1-25頁`, or empty for unrecognized filenames.
pub fn page_range_label(name: &FileName) -> String {
    name.page_range()
        .map(|(start, end)| format!("{start}-{end}頁"))
        .unwrap_or_default()
}

/// Card title: the type label, or the raw path when the filename is unrecognized.
pub fn display_name(file: &ParsedFile) -> String {
    match &file.name {
        FileName::Parsed { document_type, .. } => display_type_name(*document_type),
        FileName::Unrecognized => file.path.clone(),
    }
}
