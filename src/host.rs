/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Host-page collaborators: file inputs, canvases, fetch and downloads.

#![allow(async_fn_in_trait)]

use crate::canvas::CanvasPixels;
use crate::error::{BridgeError, Result};
use crate::format::OutputFile;

/// Whole contents of one user-selected file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileData {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileData {
    pub fn new(name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }
}

/// A file picker element (`<input type="file">` in the browser).
pub trait FileInput {
    fn file_count(&self) -> usize;
    fn file_name(&self, index: usize) -> Option<String>;
    async fn read_file(&self, index: usize) -> Result<FileData>;
}

/// Something a bitmap can be captured from.
pub trait CanvasSource {
    fn capture(&self) -> Result<CanvasPixels>;
}

/// Network and save-as services of the hosting page.
pub trait Host: 'static {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
    /// Offer one file to the user as a client-side download.
    fn save_file(&self, file: &OutputFile) -> Result<()>;
}

/// PDF-ness is decided on the literal, case-sensitive name suffix.
pub fn is_pdf_name(name: &str) -> bool {
    name.ends_with(".pdf")
}

impl FileInput for [FileData] {
    fn file_count(&self) -> usize {
        self.len()
    }

    fn file_name(&self, index: usize) -> Option<String> {
        self.get(index).map(|f| f.name.clone())
    }

    async fn read_file(&self, index: usize) -> Result<FileData> {
        self.get(index).cloned().ok_or_else(|| BridgeError::FileRead {
            index,
            message: "no such file".into(),
        })
    }
}

impl CanvasSource for CanvasPixels {
    fn capture(&self) -> Result<CanvasPixels> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_suffix_is_case_sensitive() {
        assert!(is_pdf_name("report.pdf"));
        assert!(!is_pdf_name("REPORT.PDF"));
        assert!(!is_pdf_name("pdf.png"));
        assert!(!is_pdf_name("archive.pdf.zip"));
    }

    #[test]
    fn slice_input_reads_by_index() {
        let files = vec![FileData::new("a.png", "image/png", vec![1, 2])];
        let input: &[FileData] = &files;
        assert_eq!(input.file_count(), 1);
        assert_eq!(input.file_name(0).as_deref(), Some("a.png"));
        assert_eq!(input.file_name(1), None);

        let read = futures::executor::block_on(input.read_file(0)).unwrap();
        assert_eq!(read.bytes, vec![1, 2]);
        assert!(futures::executor::block_on(input.read_file(3)).is_err());
    }
}
