/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! DOM elements as page sources.

use wasm_bindgen::JsCast;

use crate::canvas::CanvasPixels;
use crate::error::{BridgeError, Result};
use crate::host::{CanvasSource, FileData, FileInput};

use super::web_download::blob_to_bytes;

impl FileInput for web_sys::HtmlInputElement {
    fn file_count(&self) -> usize {
        self.files().map_or(0, |files| files.length() as usize)
    }

    fn file_name(&self, index: usize) -> Option<String> {
        self.files()?.get(index as u32).map(|file| file.name())
    }

    async fn read_file(&self, index: usize) -> Result<FileData> {
        let file = self
            .files()
            .and_then(|files| files.get(index as u32))
            .ok_or_else(|| BridgeError::FileRead {
                index,
                message: "no such file".into(),
            })?;
        let bytes = blob_to_bytes(&file)
            .await
            .map_err(|message| BridgeError::FileRead { index, message })?;
        Ok(FileData {
            name: file.name(),
            mime_type: file.type_(),
            bytes,
        })
    }
}

impl CanvasSource for web_sys::HtmlCanvasElement {
    fn capture(&self) -> Result<CanvasPixels> {
        let (width, height) = (self.width(), self.height());
        let context: web_sys::CanvasRenderingContext2d = self
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
            .ok_or_else(|| BridgeError::Canvas("no 2d context".into()))?;
        let image = context
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(|e| BridgeError::Canvas(super::describe(&e)))?;
        Ok(CanvasPixels {
            width,
            height,
            rgba: image.data().0,
        })
    }
}
