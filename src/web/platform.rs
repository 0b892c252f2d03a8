/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Capability traits implemented on top of the `Dynamsoft.DDV` bindings.

use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::SdkConfig;
use crate::error::{BridgeError, Result};
use crate::format::{JpegSettings, PdfSettings, TiffSettings};
use crate::host::FileData;
use crate::sdk::{self, DisplayMode, SdkPlatform};

use super::ddv;
use super::describe;
use super::web_download::{blob_to_bytes, bytes_to_blob};

const CURRENT_INDEX_CHANGED: &str = "currentIndexChanged";

fn sdk_err(call: &'static str) -> impl Fn(JsValue) -> BridgeError {
    move |e| BridgeError::sdk(call, describe(&e))
}

/// `Dynamsoft.DDV`, or `NotLoaded` while the script is missing.
fn namespace() -> Result<JsValue> {
    let root = Reflect::get(&js_sys::global(), &"Dynamsoft".into())
        .map_err(|_| BridgeError::NotLoaded)?;
    if root.is_undefined() {
        return Err(BridgeError::NotLoaded);
    }
    let ddv = Reflect::get(&root, &"DDV".into()).map_err(|_| BridgeError::NotLoaded)?;
    if ddv.is_undefined() {
        return Err(BridgeError::NotLoaded);
    }
    Ok(ddv)
}

fn to_js<T: Serialize>(call: &'static str, value: &T) -> Result<JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| BridgeError::sdk(call, e.to_string()))
}

fn index_array(indices: &[usize]) -> Array {
    indices.iter().map(|&i| JsValue::from(i as u32)).collect()
}

fn container(element_id: &str) -> Result<web_sys::HtmlElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(element_id))
        .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(|| BridgeError::sdk("getElementById", format!("no element #{}", element_id)))
}

async fn resolve_bytes(call: &'static str, promise: js_sys::Promise) -> Result<Vec<u8>> {
    let blob: web_sys::Blob = JsFuture::from(promise)
        .await
        .map_err(sdk_err(call))?
        .dyn_into()
        .map_err(|_| BridgeError::sdk(call, "result is not a Blob"))?;
    blob_to_bytes(&blob)
        .await
        .map_err(|message| BridgeError::sdk(call, message))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LicenseOptions<'a> {
    license: &'a str,
    engine_resource_path: &'a str,
}

// ===== Platform =====

/// The SDK as loaded into the current page.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebPlatform;

impl SdkPlatform for WebPlatform {
    type Manager = ddv::DocumentManager;

    async fn load_assets(&self, config: &SdkConfig) -> Result<()> {
        ddv::load_script(&config.script_url)
            .await
            .map_err(|_| BridgeError::Load(config.script_url.clone()))?;
        ddv::load_stylesheet(&config.stylesheet_url);
        Ok(())
    }

    async fn configure(&self, license: &str, config: &SdkConfig) -> Result<()> {
        namespace()?;
        let options = to_js(
            "setConfig",
            &LicenseOptions {
                license,
                engine_resource_path: &config.engine_resource_path,
            },
        )?;
        ddv::set_config(&options)
            .await
            .map_err(|e| BridgeError::License(describe(&e)))?;

        let filter = ddv::ImageFilter::new().map_err(sdk_err("ImageFilter"))?;
        ddv::set_processing_handler("imageFilter", &filter)
            .map_err(sdk_err("setProcessingHandler"))?;
        Ok(())
    }

    fn document_manager(&self) -> Result<ddv::DocumentManager> {
        let manager = Reflect::get(&namespace()?, &"documentManager".into())
            .map_err(sdk_err("documentManager"))?;
        if manager.is_undefined() || manager.is_null() {
            return Err(BridgeError::NotLoaded);
        }
        Ok(manager.unchecked_into())
    }
}

// ===== Document manager =====

impl sdk::DocumentManager for ddv::DocumentManager {
    type Document = ddv::Document;
    type BrowseViewer = ddv::BrowseViewer;
    type EditViewer = ddv::EditViewer;

    fn documents(&self) -> Result<Vec<ddv::Document>> {
        let all = self.get_all_documents().map_err(sdk_err("getAllDocuments"))?;
        Ok(all.iter().map(|doc| doc.unchecked_into()).collect())
    }

    fn create_document(&self) -> Result<ddv::Document> {
        ddv::DocumentManager::create_document(self).map_err(sdk_err("createDocument"))
    }

    fn delete_documents(&self, uids: &[String]) -> Result<()> {
        let uids: Array = uids.iter().map(|u| JsValue::from_str(u)).collect();
        ddv::DocumentManager::delete_documents(self, &uids).map_err(sdk_err("deleteDocuments"))?;
        Ok(())
    }

    fn create_browse_viewer(&self, container_id: &str) -> Result<ddv::BrowseViewer> {
        let options = Object::new();
        Reflect::set(&options, &"container".into(), &container(container_id)?)
            .map_err(sdk_err("BrowseViewer"))?;
        ddv::BrowseViewer::new(&options).map_err(sdk_err("BrowseViewer"))
    }

    fn create_edit_viewer(&self, container_id: &str) -> Result<ddv::EditViewer> {
        let options = Object::new();
        Reflect::set(&options, &"container".into(), &container(container_id)?)
            .map_err(sdk_err("EditViewer"))?;
        Reflect::set(&options, &"uiConfig".into(), &edit_viewer_ui()?)
            .map_err(sdk_err("EditViewer"))?;
        ddv::EditViewer::new(&options).map_err(sdk_err("EditViewer"))
    }
}

/// Desktop edit-viewer layout: toolbar header over the main view. The
/// loader, download and print buttons are left out on purpose.
fn edit_viewer_ui() -> Result<JsValue> {
    let elements = Reflect::get(&namespace()?, &"Elements".into()).map_err(sdk_err("Elements"))?;
    let element = |name: &str| -> Result<JsValue> {
        Reflect::get(&elements, &name.into()).map_err(sdk_err("Elements"))
    };
    let layout = |class_name: Option<&str>, children: Array| -> Result<JsValue> {
        let obj = Object::new();
        Reflect::set(&obj, &"type".into(), &element("Layout")?).map_err(sdk_err("Elements"))?;
        if let Some(class_name) = class_name {
            Reflect::set(&obj, &"className".into(), &class_name.into())
                .map_err(sdk_err("Elements"))?;
        }
        Reflect::set(&obj, &"children".into(), &children).map_err(sdk_err("Elements"))?;
        Ok(obj.into())
    };

    let tools = Array::new();
    for name in [
        "ThumbnailSwitch",
        "Zoom",
        "FitMode",
        "DisplayMode",
        "RotateLeft",
        "RotateRight",
        "Crop",
        "Filter",
        "Undo",
        "Redo",
        "DeleteCurrent",
        "DeleteAll",
        "Pan",
    ] {
        tools.push(&element(name)?);
    }

    let pagination = Object::new();
    Reflect::set(&pagination, &"type".into(), &element("Pagination")?)
        .map_err(sdk_err("Elements"))?;
    Reflect::set(
        &pagination,
        &"className".into(),
        &"ddv-edit-viewer-pagination-desktop".into(),
    )
    .map_err(sdk_err("Elements"))?;

    let header = layout(
        Some("ddv-edit-viewer-header-desktop"),
        Array::of2(&layout(None, tools)?, &layout(None, Array::of1(&pagination))?),
    )?;
    let root = layout(
        Some("ddv-edit-viewer-desktop"),
        Array::of2(&header, &element("MainView")?),
    )?;
    Reflect::set(&root, &"flexDirection".into(), &"column".into()).map_err(sdk_err("Elements"))?;
    Ok(root)
}

// ===== Document =====

impl sdk::Document for ddv::Document {
    fn uid(&self) -> String {
        ddv::Document::uid(self)
    }

    fn page_count(&self) -> Result<usize> {
        Ok(self.pages().length() as usize)
    }

    async fn load_source(&self, source: &FileData) -> Result<usize> {
        let before = self.pages().length();
        let blob = bytes_to_blob(&source.bytes, &source.mime_type)
            .map_err(|message| BridgeError::sdk("loadSource", message))?;
        let pending = ddv::Document::load_source(self, &blob).map_err(sdk_err("loadSource"))?;
        JsFuture::from(pending).await.map_err(sdk_err("loadSource"))?;
        Ok(self.pages().length().saturating_sub(before) as usize)
    }

    fn delete_pages(&self, indices: &[usize]) -> Result<()> {
        ddv::Document::delete_pages(self, &index_array(indices)).map_err(sdk_err("deletePages"))?;
        Ok(())
    }

    async fn save_to_pdf(&self, indices: &[usize], settings: &PdfSettings) -> Result<Vec<u8>> {
        let settings = to_js("saveToPdf", settings)?;
        let pending = ddv::Document::save_to_pdf(self, &index_array(indices), &settings)
            .map_err(sdk_err("saveToPdf"))?;
        resolve_bytes("saveToPdf", pending).await
    }

    async fn save_to_tiff(&self, indices: &[usize], settings: &TiffSettings) -> Result<Vec<u8>> {
        let settings = to_js("saveToTiff", settings)?;
        let pending = ddv::Document::save_to_tiff(self, &index_array(indices), &settings)
            .map_err(sdk_err("saveToTiff"))?;
        resolve_bytes("saveToTiff", pending).await
    }

    async fn save_to_png(&self, index: usize) -> Result<Vec<u8>> {
        let pending =
            ddv::Document::save_to_png(self, index as u32).map_err(sdk_err("saveToPng"))?;
        resolve_bytes("saveToPng", pending).await
    }

    async fn save_to_jpeg(&self, index: usize, settings: &JpegSettings) -> Result<Vec<u8>> {
        let settings = to_js("saveToJpeg", settings)?;
        let pending = ddv::Document::save_to_jpeg(self, index as u32, &settings)
            .map_err(sdk_err("saveToJpeg"))?;
        resolve_bytes("saveToJpeg", pending).await
    }
}

// ===== Viewers =====

impl sdk::Viewer for ddv::EditViewer {
    fn open_document(&self, uid: &str) -> Result<()> {
        ddv::EditViewer::open_document(self, uid).map_err(sdk_err("openDocument"))
    }

    fn go_to_page(&self, index: usize) -> Result<()> {
        ddv::EditViewer::go_to_page(self, index as u32).map_err(sdk_err("goToPage"))?;
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> Result<()> {
        if visible {
            self.show().map_err(sdk_err("show"))
        } else {
            self.hide().map_err(sdk_err("hide"))
        }
    }
}

impl sdk::EditViewer for ddv::EditViewer {
    fn set_display_mode(&self, mode: DisplayMode) -> Result<()> {
        ddv::EditViewer::set_display_mode(self, mode.as_str()).map_err(sdk_err("displayMode"))
    }
}

impl sdk::Viewer for ddv::BrowseViewer {
    fn open_document(&self, uid: &str) -> Result<()> {
        ddv::BrowseViewer::open_document(self, uid).map_err(sdk_err("openDocument"))
    }

    fn go_to_page(&self, index: usize) -> Result<()> {
        ddv::BrowseViewer::go_to_page(self, index as u32).map_err(sdk_err("goToPage"))?;
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> Result<()> {
        if visible {
            self.show().map_err(sdk_err("show"))
        } else {
            self.hide().map_err(sdk_err("hide"))
        }
    }
}

impl sdk::BrowseViewer for ddv::BrowseViewer {
    type Subscription = WebSubscription;

    fn set_multiselect(&self, enabled: bool) -> Result<()> {
        self.set_multiselect_mode(enabled)
            .map_err(sdk_err("multiselectMode"))
    }

    fn selected_page_indices(&self) -> Result<Vec<usize>> {
        let selected = self
            .get_selected_page_indices()
            .map_err(sdk_err("getSelectedPageIndices"))?;
        Ok(selected
            .iter()
            .filter_map(|v| v.as_f64())
            .map(|i| i as usize)
            .collect())
    }

    fn select_pages(&self, indices: &[usize]) -> Result<()> {
        ddv::BrowseViewer::select_pages(self, &index_array(indices)).map_err(sdk_err("selectPages"))
    }

    fn select_all_pages(&self) -> Result<()> {
        ddv::BrowseViewer::select_all_pages(self).map_err(sdk_err("selectAllPages"))
    }

    fn on_current_index_changed(
        &self,
        mut handler: Box<dyn FnMut(usize)>,
    ) -> Result<WebSubscription> {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let index = Reflect::get(&event, &"newIndex".into())
                .ok()
                .and_then(|v| v.as_f64());
            if let Some(index) = index
                && index >= 0.0
            {
                handler(index as usize);
            }
        });
        self.on(CURRENT_INDEX_CHANGED, callback.as_ref().unchecked_ref())
            .map_err(sdk_err("on"))?;
        Ok(WebSubscription {
            viewer: self.clone(),
            callback,
        })
    }
}

/// Keeps the JS callback alive while registered; unregisters on drop.
pub struct WebSubscription {
    viewer: ddv::BrowseViewer,
    callback: Closure<dyn FnMut(JsValue)>,
}

impl Drop for WebSubscription {
    fn drop(&mut self) {
        if let Err(e) = self
            .viewer
            .off(CURRENT_INDEX_CHANGED, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("Failed to unregister page-change callback: {}", describe(&e));
        }
    }
}
