/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Output formats and the fixed export presets handed to the SDK.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::BridgeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Pdf,
    Tiff,
    Png,
    Jpeg,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Pdf => "pdf",
            FileFormat::Tiff => "tiff",
            FileFormat::Png => "png",
            FileFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FileFormat::Pdf => "application/pdf",
            FileFormat::Tiff => "image/tiff",
            FileFormat::Png => "image/png",
            FileFormat::Jpeg => "image/jpeg",
        }
    }

    /// Multi-page containers: every selected page goes into one file.
    pub fn is_combined(self) -> bool {
        matches!(self, FileFormat::Pdf | FileFormat::Tiff)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(FileFormat::Pdf),
            "tiff" => Ok(FileFormat::Tiff),
            "png" => Ok(FileFormat::Png),
            "jpeg" => Ok(FileFormat::Jpeg),
            other => Err(BridgeError::UnknownFormat(other.to_string())),
        }
    }
}

/// One artifact produced by a conversion, ready to be zipped or downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl OutputFile {
    pub fn new(name: String, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name,
            mime_type: mime_type.to_string(),
            bytes,
        }
    }
}

/// `{filename}.{ext}` for combined formats
pub fn combined_name(filename: &str, format: FileFormat) -> String {
    format!("{}.{}", filename, format.extension())
}

/// `{filename}{offset}.{ext}`, offset being the position within the exported set
pub fn page_name(filename: &str, offset: usize, format: FileFormat) -> String {
    format!("{}{}.{}", filename, offset, format.extension())
}

pub fn archive_name(filename: &str) -> String {
    format!("{}.zip", filename)
}

/// PDF export preset. Field names follow the SDK's `PdfSettings` interface.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfSettings {
    pub author: String,
    pub compression: String,
    pub page_type: String,
    pub creator: String,
    pub creation_date: String,
    pub key_words: String,
    pub modified_date: String,
    pub producer: String,
    pub subject: String,
    pub title: String,
    pub version: String,
    pub quality: u8,
}

impl PdfSettings {
    /// Preset stamped with `now` as both creation and modification date.
    pub fn stamped(now: DateTime<Utc>) -> Self {
        let date = pdf_date(now);
        Self {
            author: "Dynamsoft".into(),
            compression: "pdf/jpeg".into(),
            page_type: "page/a4".into(),
            creator: "DDV".into(),
            creation_date: date.clone(),
            key_words: "samplepdf".into(),
            modified_date: date,
            producer: "Dynamsoft Document Viewer".into(),
            subject: "SamplePdf".into(),
            title: "SamplePdf".into(),
            version: "1.5".into(),
            quality: 90,
        }
    }
}

/// PDF date string: `D:YYYYMMDDHHmmSS`
fn pdf_date(at: DateTime<Utc>) -> String {
    at.format("D:%Y%m%d%H%M%S").to_string()
}

#[derive(Clone, Debug, Serialize)]
pub struct JpegSettings {
    pub quality: u8,
}

impl Default for JpegSettings {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TiffTag {
    pub id: u16,
    pub content: String,
    pub content_is_base64: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TiffSettings {
    pub custom_tag: Vec<TiffTag>,
    pub compression: String,
}

impl Default for TiffSettings {
    fn default() -> Self {
        Self {
            custom_tag: vec![TiffTag {
                id: 700,
                content: "Created By Dynamsoft".into(),
                content_is_base64: false,
            }],
            compression: "tiff/auto".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_known_formats_only() {
        assert_eq!("jpeg".parse::<FileFormat>(), Ok(FileFormat::Jpeg));
        assert_eq!("tiff".parse::<FileFormat>(), Ok(FileFormat::Tiff));
        assert_eq!(
            "gif".parse::<FileFormat>(),
            Err(BridgeError::UnknownFormat("gif".into()))
        );
    }

    #[test]
    fn only_pdf_and_tiff_are_combined() {
        assert!(FileFormat::Pdf.is_combined());
        assert!(FileFormat::Tiff.is_combined());
        assert!(!FileFormat::Png.is_combined());
        assert!(!FileFormat::Jpeg.is_combined());
    }

    #[test]
    fn output_names() {
        assert_eq!(combined_name("scan", FileFormat::Pdf), "scan.pdf");
        assert_eq!(page_name("scan", 2, FileFormat::Png), "scan2.png");
        assert_eq!(archive_name("scan"), "scan.zip");
    }

    #[test]
    fn pdf_settings_use_sdk_field_names() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 8, 59, 59).unwrap();
        let json = serde_json::to_value(PdfSettings::stamped(now)).unwrap();
        assert_eq!(json["creationDate"], "D:20230101085959");
        assert_eq!(json["pageType"], "page/a4");
        assert_eq!(json["keyWords"], "samplepdf");
        assert_eq!(json["quality"], 90);
    }

    #[test]
    fn tiff_settings_carry_custom_tag() {
        let json = serde_json::to_value(TiffSettings::default()).unwrap();
        assert_eq!(json["customTag"][0]["id"], 700);
        assert_eq!(json["customTag"][0]["contentIsBase64"], false);
        assert_eq!(json["compression"], "tiff/auto");
    }
}
