/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Zip packing for multi-file conversions.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{BridgeError, Result};
use crate::format::OutputFile;

/// Pack every output into one deflate archive, in order.
pub fn pack(files: &[OutputFile]) -> Result<Vec<u8>> {
    let mut seen = HashSet::new();
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        if !seen.insert(file.name.as_str()) {
            return Err(BridgeError::Archive(format!(
                "duplicate entry {}",
                file.name
            )));
        }
        zip.start_file(file.name.as_str(), options)
            .map_err(|e| BridgeError::Archive(format!("{}: {e}", file.name)))?;
        zip.write_all(&file.bytes)
            .map_err(|e| BridgeError::Archive(format!("{}: {e}", file.name)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| BridgeError::Archive(e.to_string()))?;
    let bytes = cursor.into_inner();
    log::debug!("Packed {} files into {} bytes", files.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn file(name: &str, bytes: &[u8]) -> OutputFile {
        OutputFile::new(name.into(), "image/png", bytes.to_vec())
    }

    #[test]
    fn entries_keep_names_and_contents() {
        let bytes = pack(&[file("a0.png", b"first"), file("a1.png", b"second")]).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("a1.png")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn empty_input_is_a_valid_archive() {
        let bytes = pack(&[]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = pack(&[file("a.pdf", b"x"), file("a.pdf", b"y")]).unwrap_err();
        assert!(matches!(err, BridgeError::Archive(_)));
    }
}
