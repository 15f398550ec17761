//! Saves selected gazette PDFs to disk, mirroring the repository layout.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use kanpo_downloader_core::listing::{DocumentType, GroupedListing, ParsedFile};
use tracing::{error, info};

/// Which files of a year's listing to save.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub date: Option<String>,
    pub kind: Option<DocumentType>,
}

impl Selection {
    pub fn matches(&self, file: &ParsedFile) -> bool {
        self.date.as_ref().map_or(true, |d| &file.date == d)
            && self.kind.map_or(true, |k| file.document_type() == k)
    }
}

#[derive(Debug)]
pub struct SaveReport {
    pub saved: Vec<PathBuf>,
    pub bytes: u64,
}

/// Files picked by `selection`, newest date first.
pub fn select<'a>(listing: &'a GroupedListing, selection: &Selection) -> Vec<&'a ParsedFile> {
    listing
        .values()
        .rev()
        .flat_map(|types| types.values().flatten())
        .filter(|file| selection.matches(file))
        .collect()
}

/// Downloads each file to `<output_dir>/<path>`; stops at the first failure.
pub async fn save_files(
    client: &reqwest::Client,
    files: &[&ParsedFile],
    output_dir: &Path,
) -> Result<SaveReport> {
    let mut report = SaveReport {
        saved: Vec::with_capacity(files.len()),
        bytes: 0,
    };

    for file in files {
        if !is_plain_relative(&file.path) {
            anyhow::bail!("Refusing to save outside the output directory: {}", file.path);
        }
        let target = output_dir.join(&file.path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        info!(url = %file.download_url, path = %target.display(), "Downloading PDF");
        let resp = client
            .get(&file.download_url)
            .send()
            .await
            .with_context(|| format!("Request failed for {}", file.download_url))?;
        let status = resp.status();
        if !status.is_success() {
            error!(url = %file.download_url, status = %status, "Download returned error");
            anyhow::bail!("HTTP error! status: {} for {}", status.as_u16(), file.download_url);
        }
        let body = resp
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", file.download_url))?;

        tokio::fs::write(&target, &body)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;
        report.bytes += body.len() as u64;
        report.saved.push(target);
    }

    info!(files = report.saved.len(), bytes = report.bytes, "Download complete");
    Ok(report)
}

fn is_plain_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
