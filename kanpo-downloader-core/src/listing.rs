//! Listing normalizer: turns a raw repository tree into gazette files grouped
//! by date and document type, and orders them by month for presentation.
//!
//! Filenames follow `YYYYMMDD` + type letter + 5-digit issue number + `full`
//! + 4-digit start page + 4-digit end page + `.pdf`, e.g.
//! `20250115h00123full00010025.pdf`. Anything else is kept as
//! [`FileName::Unrecognized`] and grouped under [`DocumentType::Other`].

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RepoLocation;
use crate::contract::{TreeListing, TreeNode};

static FILE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{8})([hgctm])([0-9]{5})full([0-9]{4})([0-9]{4})\.pdf$")
        .expect("gazette filename pattern is valid")
});

const PDF_SUFFIX: &str = ".pdf";

/// Gazette category encoded in the filename. Variant order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// 本紙
    #[serde(rename = "h")]
    Original,
    /// 号外
    #[serde(rename = "g")]
    Extra,
    /// 政府調達
    #[serde(rename = "c")]
    Procurement,
    /// 特別号外
    #[serde(rename = "t")]
    SpecialExtra,
    /// 目録
    #[serde(rename = "m")]
    Index,
    #[serde(rename = "other")]
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Original,
        DocumentType::Extra,
        DocumentType::Procurement,
        DocumentType::SpecialExtra,
        DocumentType::Index,
        DocumentType::Other,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DocumentType::Original => "h",
            DocumentType::Extra => "g",
            DocumentType::Procurement => "c",
            DocumentType::SpecialExtra => "t",
            DocumentType::Index => "m",
            DocumentType::Other => "other",
        }
    }

    /// Maps a type code back to its variant; unknown codes are `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Metadata recovered from a filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileName {
    Parsed {
        date: String,
        document_type: DocumentType,
        issue_number: u32,
        page_range: (u32, u32),
    },
    Unrecognized,
}

impl FileName {
    pub fn document_type(&self) -> DocumentType {
        match self {
            FileName::Parsed { document_type, .. } => *document_type,
            FileName::Unrecognized => DocumentType::Other,
        }
    }

    pub fn issue_number(&self) -> Option<u32> {
        match self {
            FileName::Parsed { issue_number, .. } => Some(*issue_number),
            FileName::Unrecognized => None,
        }
    }

    pub fn page_range(&self) -> Option<(u32, u32)> {
        match self {
            FileName::Parsed { page_range, .. } => Some(*page_range),
            FileName::Unrecognized => None,
        }
    }
}

/// A PDF from a year's listing, ready for display and download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    pub size: u64,
    pub download_url: String,
    /// First path segment; `YYYYMMDD` for well-formed listings.
    pub date: String,
    pub name: FileName,
}

impl ParsedFile {
    pub fn from_node(node: &TreeNode, year: i32, repo: &RepoLocation) -> Self {
        let date = node.path.split('/').next().unwrap_or_default().to_string();
        Self {
            path: node.path.clone(),
            size: node.size.unwrap_or(0),
            download_url: repo.raw_url(year, &node.path),
            date,
            name: parse(&node.path),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.name.document_type()
    }
}

/// Files of one date, keyed by document type.
pub type TypeGroups = BTreeMap<DocumentType, Vec<ParsedFile>>;

/// date → document type → files, in listing order within each type.
pub type GroupedListing = BTreeMap<String, TypeGroups>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: String,
    pub types: TypeGroups,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub month: u32,
    /// Descending by date.
    pub dates: Vec<DateGroup>,
}

/// Keeps files whose path ends in `.pdf` (case-sensitive).
pub fn filter_pdf(entries: &[TreeNode]) -> Vec<TreeNode> {
    entries
        .iter()
        .filter(|node| node.is_file() && node.path.ends_with(PDF_SUFFIX))
        .cloned()
        .collect()
}

/// Extracts metadata from `"<date>/<filename>"`. Never fails: anything that
/// does not follow the naming convention is [`FileName::Unrecognized`].
pub fn parse(path: &str) -> FileName {
    let mut segments = path.split('/');
    let file_name = match (segments.next(), segments.next()) {
        (Some(_), Some(name)) => name,
        _ => return FileName::Unrecognized,
    };
    if !file_name.ends_with(PDF_SUFFIX) {
        return FileName::Unrecognized;
    }

    let Some(caps) = FILE_NAME_RE.captures(file_name) else {
        return FileName::Unrecognized;
    };
    let document_type = match DocumentType::from_code(&caps[2]) {
        Some(t) => t,
        None => return FileName::Unrecognized,
    };
    let number = |i: usize| caps[i].parse::<u32>().ok();
    let (Some(issue_number), Some(start), Some(end)) = (number(3), number(4), number(5)) else {
        return FileName::Unrecognized;
    };

    FileName::Parsed {
        date: caps[1].to_string(),
        document_type,
        issue_number,
        page_range: (start, end),
    }
}

/// Groups files by date then type, preserving input order inside each bucket.
pub fn group(files: impl IntoIterator<Item = ParsedFile>) -> GroupedListing {
    let mut grouped = GroupedListing::new();
    for file in files {
        grouped
            .entry(file.date.clone())
            .or_default()
            .entry(file.document_type())
            .or_default()
            .push(file);
    }
    grouped
}

/// Month number of a `YYYYMMDD` date key.
pub fn month_of(date: &str) -> Option<u32> {
    date.get(4..6)
        .filter(|m| m.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|m| m.parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
}

/// Orders the grouped listing into month buckets, months and dates descending.
///
/// Date keys without a valid month are left out of the buckets.
pub fn bucket_by_month(grouped: &GroupedListing) -> Vec<MonthBucket> {
    let mut months: BTreeMap<u32, Vec<DateGroup>> = BTreeMap::new();
    for (date, types) in grouped.iter().rev() {
        match month_of(date) {
            Some(month) => months.entry(month).or_default().push(DateGroup {
                date: date.clone(),
                types: types.clone(),
            }),
            None => warn!(date = %date, "Skipping date key without a valid month"),
        }
    }

    months
        .into_iter()
        .rev()
        .map(|(month, dates)| MonthBucket { month, dates })
        .collect()
}

/// filter → parse → group for one year's listing.
pub fn normalize(year: i32, listing: &TreeListing, repo: &RepoLocation) -> GroupedListing {
    let pdfs = filter_pdf(&listing.tree);
    debug!(
        year,
        entries = listing.tree.len(),
        pdfs = pdfs.len(),
        "Filtered listing to PDF files"
    );
    group(pdfs.iter().map(|node| ParsedFile::from_node(node, year, repo)))
}
