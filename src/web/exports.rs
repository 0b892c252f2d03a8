/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! JS classes handed to the UI host.
//!
//! ```js
//! const loader = new SdkLoader({ scriptUrl: "/ddv/ddv.js" });
//! await loader.initialize();
//! if (await loader.setLicense(key) !== 0) throw new Error("license");
//! const session = loader.createDocumentSession();
//! session.createBrowseViewer("thumbs");
//! await session.loadFiles(input);
//! await session.convert("scan", "png", true);
//! session.free();
//! ```

use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::config::SdkConfig;
use crate::loader::SdkLoader;
use crate::session::DocumentSession;

use super::ddv;
use super::platform::WebPlatform;
use super::web_download::BrowserHost;

#[wasm_bindgen(js_name = SdkLoader)]
pub struct JsSdkLoader {
    inner: Rc<SdkLoader<WebPlatform>>,
}

#[wasm_bindgen(js_class = SdkLoader)]
impl JsSdkLoader {
    /// `config` may be omitted; missing fields use the bundled asset paths.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsSdkLoader, JsError> {
        let config: SdkConfig = if config.is_undefined() || config.is_null() {
            SdkConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?
        };
        Ok(Self {
            inner: Rc::new(SdkLoader::new(WebPlatform, config)),
        })
    }

    /// Resolves once the SDK script has loaded; rejects if it failed.
    pub fn initialize(&self) -> Promise {
        let loader = Rc::clone(&self.inner);
        future_to_promise(async move {
            loader
                .initialize()
                .await
                .map(|()| JsValue::UNDEFINED)
                .map_err(|e| JsError::new(&e.to_string()).into())
        })
    }

    /// Resolves to `0` on success, `-1` otherwise.
    #[wasm_bindgen(js_name = setLicense)]
    pub fn set_license(&self, key: String) -> Promise {
        let loader = Rc::clone(&self.inner);
        future_to_promise(async move {
            let status = loader.set_license(&key).await;
            Ok(JsValue::from(status.code()))
        })
    }

    #[wasm_bindgen(js_name = createDocumentSession)]
    pub fn create_document_session(&self) -> Result<JsDocumentSession, JsError> {
        let session = self
            .inner
            .create_session(BrowserHost)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(JsDocumentSession {
            inner: Rc::new(session),
        })
    }
}

type WebSession = DocumentSession<ddv::DocumentManager, BrowserHost>;

/// Dropping (`free()`) the last reference disposes the session.
#[wasm_bindgen(js_name = DocumentSession)]
pub struct JsDocumentSession {
    inner: Rc<WebSession>,
}

#[wasm_bindgen(js_class = DocumentSession)]
impl JsDocumentSession {
    #[wasm_bindgen(js_name = loadFiles)]
    pub fn load_files(&self, input: web_sys::HtmlInputElement) -> Promise {
        let session = Rc::clone(&self.inner);
        future_to_promise(async move {
            session.load_files(&input).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = detectPdf)]
    pub fn detect_pdf(&self, input: &web_sys::HtmlInputElement) -> bool {
        self.inner.detect_pdf(input)
    }

    #[wasm_bindgen(js_name = createBrowseViewer)]
    pub fn create_browse_viewer(&self, element_id: &str) {
        self.inner.create_browse_viewer(element_id);
    }

    #[wasm_bindgen(js_name = createEditViewer)]
    pub fn create_edit_viewer(&self, element_id: &str) {
        self.inner.create_edit_viewer(element_id);
    }

    /// `format` is one of `pdf`, `tiff`, `png`, `jpeg`.
    pub fn convert(&self, filename: String, format: String, zip: bool) -> Promise {
        let session = Rc::clone(&self.inner);
        future_to_promise(async move {
            session.convert_named(&filename, &format, zip).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = loadPdfEngine)]
    pub fn load_pdf_engine(&self) -> Promise {
        let session = Rc::clone(&self.inner);
        future_to_promise(async move {
            session.load_pdf_engine().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(getter, js_name = isPdfReady)]
    pub fn is_pdf_ready(&self) -> bool {
        self.inner.is_pdf_ready()
    }

    #[wasm_bindgen(js_name = showEditor)]
    pub fn show_editor(&self) {
        self.inner.show_editor();
    }

    #[wasm_bindgen(js_name = hideEditor)]
    pub fn hide_editor(&self) {
        self.inner.hide_editor();
    }

    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&self) {
        self.inner.select_all();
    }

    #[wasm_bindgen(js_name = unselectAll)]
    pub fn unselect_all(&self) {
        self.inner.unselect_all();
    }

    #[wasm_bindgen(js_name = removeSelected)]
    pub fn remove_selected(&self) {
        self.inner.remove_selected();
    }

    #[wasm_bindgen(js_name = removeAll)]
    pub fn remove_all(&self) {
        self.inner.remove_all();
    }

    #[wasm_bindgen(js_name = loadFromCanvas)]
    pub fn load_from_canvas(&self, canvas: web_sys::HtmlCanvasElement) -> Promise {
        let session = Rc::clone(&self.inner);
        future_to_promise(async move {
            session.load_from_canvas(&canvas).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = onPageIndexChanged)]
    pub fn on_page_index_changed(&self, index: u32) {
        self.inner.on_page_index_changed(index as usize);
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }
}
