// PDF loading module
// Reads a directory of PDF files and extracts per-page text for ingestion


use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Text extracted from a single PDF page, with the metadata that later
/// becomes a citation
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPage {
    /// File name of the source PDF (no directory components)
    pub file_name: String,
    /// 1-based page label
    pub page_label: String,
    /// Cleaned page text
    pub text: String,
}

/// Load every readable PDF in a directory (non-recursive).
///
/// Files that cannot be parsed are logged and skipped; an unreadable file is
/// not an ingestion failure.
#[inline]
pub fn load_directory(dir: &Path) -> Result<Vec<PdfPage>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read PDF directory: {}", dir.display()))?;

    let mut pages = Vec::new();
    let mut files = 0usize;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();

        if !is_pdf(&path) {
            debug!("Skipping non-PDF entry: {}", path.display());
            continue;
        }

        match load_pdf_pages(&path) {
            Ok(file_pages) => {
                files += 1;
                pages.extend(file_pages);
            }
            Err(e) => {
                warn!("Skipping unreadable PDF {}: {}", path.display(), e);
            }
        }
    }

    info!(
        "Loaded {} pages from {} PDF files in {}",
        pages.len(),
        files,
        dir.display()
    );
    Ok(pages)
}

/// Extract per-page text from a single PDF file
#[inline]
pub fn load_pdf_pages(path: &Path) -> Result<Vec<PdfPage>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("PDF path has no file name: {}", path.display()))?;

    let raw_pages = pdf_extract::extract_text_by_pages(path)
        .with_context(|| format!("Failed to extract text from {}", path.display()))?;

    let pages: Vec<PdfPage> = raw_pages
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = cleanup_page_text(raw);
            if text.is_empty() {
                debug!("Page {} of {} has no extractable text", i + 1, file_name);
                return None;
            }
            Some(PdfPage {
                file_name: file_name.clone(),
                page_label: (i + 1).to_string(),
                text,
            })
        })
        .collect();

    debug!(
        "Extracted {} non-empty pages from {}",
        pages.len(),
        file_name
    );
    Ok(pages)
}

fn is_pdf(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Normalize extracted page text: strip null bytes, trim lines, and drop
/// empty lines left behind by the PDF layout
fn cleanup_page_text(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
