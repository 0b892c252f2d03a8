/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Raw wasm-bindgen imports of the `Dynamsoft.DDV` global and the asset
//! loader bridge. Safe wrappers live in `platform.rs`.
//! API reference: https://www.dynamsoft.com/document-viewer/docs/api/

use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/asset_loader.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    pub async fn load_script(url: &str) -> Result<JsValue, JsValue>;

    pub fn load_stylesheet(url: &str);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["Dynamsoft", "DDV"], js_name = setConfig, catch)]
    pub async fn set_config(config: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["Dynamsoft", "DDV"], js_name = setProcessingHandler, catch)]
    pub fn set_processing_handler(kind: &str, handler: &JsValue) -> Result<(), JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["Dynamsoft", "DDV"])]
    pub type ImageFilter;

    #[wasm_bindgen(constructor, js_namespace = ["Dynamsoft", "DDV"], catch)]
    pub fn new() -> Result<ImageFilter, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    /// `Dynamsoft.DDV.documentManager`
    #[derive(Clone, Debug)]
    pub type DocumentManager;

    #[wasm_bindgen(method, catch, js_name = createDocument)]
    pub fn create_document(this: &DocumentManager) -> Result<Document, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getAllDocuments)]
    pub fn get_all_documents(this: &DocumentManager) -> Result<js_sys::Array, JsValue>;

    #[wasm_bindgen(method, catch, js_name = deleteDocuments)]
    pub fn delete_documents(this: &DocumentManager, uids: &js_sys::Array) -> Result<JsValue, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    /// `IDocument`
    #[derive(Clone, Debug)]
    pub type Document;

    #[wasm_bindgen(method, getter)]
    pub fn uid(this: &Document) -> String;

    #[wasm_bindgen(method, getter)]
    pub fn pages(this: &Document) -> js_sys::Array;

    #[wasm_bindgen(method, catch, js_name = loadSource)]
    pub fn load_source(this: &Document, source: &web_sys::Blob) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = deletePages)]
    pub fn delete_pages(this: &Document, indices: &js_sys::Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = saveToPdf)]
    pub fn save_to_pdf(
        this: &Document,
        indices: &js_sys::Array,
        settings: &JsValue,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = saveToTiff)]
    pub fn save_to_tiff(
        this: &Document,
        indices: &js_sys::Array,
        settings: &JsValue,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = saveToPng)]
    pub fn save_to_png(this: &Document, index: u32) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = saveToJpeg)]
    pub fn save_to_jpeg(
        this: &Document,
        index: u32,
        settings: &JsValue,
    ) -> Result<js_sys::Promise, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["Dynamsoft", "DDV"])]
    #[derive(Clone, Debug)]
    pub type BrowseViewer;

    #[wasm_bindgen(constructor, js_namespace = ["Dynamsoft", "DDV"], catch)]
    pub fn new(options: &JsValue) -> Result<BrowseViewer, JsValue>;

    #[wasm_bindgen(method, catch, js_name = openDocument)]
    pub fn open_document(this: &BrowseViewer, uid: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = goToPage)]
    pub fn go_to_page(this: &BrowseViewer, index: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn show(this: &BrowseViewer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn hide(this: &BrowseViewer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, setter, catch, js_name = multiselectMode)]
    pub fn set_multiselect_mode(this: &BrowseViewer, enabled: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = getSelectedPageIndices)]
    pub fn get_selected_page_indices(this: &BrowseViewer) -> Result<js_sys::Array, JsValue>;

    #[wasm_bindgen(method, catch, js_name = selectPages)]
    pub fn select_pages(this: &BrowseViewer, indices: &js_sys::Array) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = selectAllPages)]
    pub fn select_all_pages(this: &BrowseViewer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn on(this: &BrowseViewer, event: &str, handler: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn off(this: &BrowseViewer, event: &str, handler: &js_sys::Function) -> Result<(), JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["Dynamsoft", "DDV"])]
    #[derive(Clone, Debug)]
    pub type EditViewer;

    #[wasm_bindgen(constructor, js_namespace = ["Dynamsoft", "DDV"], catch)]
    pub fn new(options: &JsValue) -> Result<EditViewer, JsValue>;

    #[wasm_bindgen(method, catch, js_name = openDocument)]
    pub fn open_document(this: &EditViewer, uid: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = goToPage)]
    pub fn go_to_page(this: &EditViewer, index: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, setter, catch, js_name = displayMode)]
    pub fn set_display_mode(this: &EditViewer, mode: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn show(this: &EditViewer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn hide(this: &EditViewer) -> Result<(), JsValue>;
}
