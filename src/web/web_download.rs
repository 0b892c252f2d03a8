/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Blob plumbing, `fetch` and save-as downloads for the browser host.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;

use crate::error::{BridgeError, Result};
use crate::format::OutputFile;
use crate::host::Host;

use super::describe;

/// Object URLs outlive the click by this long so the download can start.
const REVOKE_DELAY_MS: i32 = 5000;

/// Wrap raw bytes in a typed `Blob`.
pub fn bytes_to_blob(data: &[u8], mime_type: &str) -> std::result::Result<web_sys::Blob, String> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(data));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);
    web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| format!("Failed to create Blob: {}", describe(&e)))
}

/// Read a `Blob` (or a `File`) back into memory.
pub async fn blob_to_bytes(blob: &web_sys::Blob) -> std::result::Result<Vec<u8>, String> {
    let buffer = JsFuture::from(blob.array_buffer())
        .await
        .map_err(|e| format!("Failed to read Blob: {}", describe(&e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Save `file` through a hidden `<a download>` pointing at an object URL.
pub fn download_file(file: &OutputFile) -> Result<()> {
    let fail = |message: String| BridgeError::Download {
        filename: file.name.clone(),
        message,
    };
    let window = web_sys::window().ok_or_else(|| fail("no window".into()))?;
    let document = window.document().ok_or_else(|| fail("no document".into()))?;
    let body = document.body().ok_or_else(|| fail("no body".into()))?;

    let blob = bytes_to_blob(&file.bytes, &file.mime_type).map_err(fail)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| fail(describe(&e)))?;

    let anchor = document
        .create_element("a")
        .ok()
        .and_then(|el| el.dyn_into::<web_sys::HtmlAnchorElement>().ok())
        .ok_or_else(|| fail("cannot create anchor".into()))?;
    anchor.set_href(&url);
    anchor.set_download(&file.name);
    anchor.style().set_property("display", "none").ok();

    body.append_child(&anchor).map_err(|e| fail(describe(&e)))?;
    anchor.click();
    anchor.remove();

    revoke_later(&window, url);
    Ok(())
}

fn revoke_later(window: &web_sys::Window, url: String) {
    let revoke = Closure::once_into_js(move || {
        web_sys::Url::revoke_object_url(&url).ok();
    });
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), REVOKE_DELAY_MS)
        .is_err()
    {
        log::warn!("Object URL will not be revoked");
    }
}

/// The hosting page: same-origin `fetch` and anchor-click downloads.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserHost;

impl Host for BrowserHost {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fail = |message: String| BridgeError::Fetch {
            url: url.to_string(),
            message,
        };
        let window = web_sys::window().ok_or_else(|| fail("no window".into()))?;

        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| fail(describe(&e)))?
            .dyn_into()
            .map_err(|_| fail("fetch did not resolve to a Response".into()))?;
        if !response.ok() {
            return Err(fail(format!("HTTP {}", response.status())));
        }

        let body = response.array_buffer().map_err(|e| fail(describe(&e)))?;
        let buffer = JsFuture::from(body).await.map_err(|e| fail(describe(&e)))?;
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        log::debug!("Fetched {} ({} bytes)", url, bytes.len());
        Ok(bytes)
    }

    fn save_file(&self, file: &OutputFile) -> Result<()> {
        download_file(file)?;
        log::info!("Downloaded {} ({} bytes)", file.name, file.bytes.len());
        Ok(())
    }
}
