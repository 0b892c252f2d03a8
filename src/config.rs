/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Asset locations for the viewer SDK.

use serde::{Deserialize, Serialize};

/// Where the SDK bundle and its companions are served from.
///
/// Deserialized from the plain object handed to the JS `SdkLoader`
/// constructor; any missing field falls back to the bundled layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SdkConfig {
    /// Script that defines the `Dynamsoft.DDV` global
    pub script_url: String,
    pub stylesheet_url: String,
    /// Directory holding the SDK's wasm engine files
    pub engine_resource_path: String,
    /// Sample PDF used to warm up the PDF engine
    pub pdf_warmup_url: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            script_url: "assets/ddv.js".into(),
            stylesheet_url: "assets/ddv.css".into(),
            engine_resource_path: "assets/engine".into(),
            pdf_warmup_url: "assets/warmup.pdf".into(),
        }
    }
}
