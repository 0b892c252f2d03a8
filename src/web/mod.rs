/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Browser backend: DDV bindings, DOM adapters and the JS-facing classes.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

mod ddv;
mod exports;
mod input;
mod platform;
mod web_download;

pub use exports::{JsDocumentSession, JsSdkLoader};
pub use platform::{WebPlatform, WebSubscription};
pub use web_download::{BrowserHost, download_file};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    crate::logging::init();
}

/// Best-effort message for a thrown JS value.
fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
