/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Typed capability handles for the viewer SDK.
//!
//! Each trait exposes only the operations this crate invokes on the
//! corresponding SDK object. Handles are cheap to clone: in the browser they
//! are `JsValue` references, in the in-memory backend `Rc`s.

#![allow(async_fn_in_trait)]

use crate::config::SdkConfig;
use crate::error::Result;
use crate::format::{JpegSettings, PdfSettings, TiffSettings};
use crate::host::FileData;

/// Process-wide entry point to the SDK.
pub trait SdkPlatform: 'static {
    type Manager: DocumentManager;

    /// Inject the SDK script and stylesheet; resolves once the script ran.
    async fn load_assets(&self, config: &SdkConfig) -> Result<()>;

    /// Apply the license and engine location, install processing handlers.
    async fn configure(&self, license: &str, config: &SdkConfig) -> Result<()>;

    /// The SDK's singleton document manager.
    fn document_manager(&self) -> Result<Self::Manager>;
}

/// The SDK's in-memory document collection.
pub trait DocumentManager: Clone + 'static {
    type Document: Document;
    type BrowseViewer: BrowseViewer;
    type EditViewer: EditViewer;

    fn documents(&self) -> Result<Vec<Self::Document>>;
    fn create_document(&self) -> Result<Self::Document>;
    fn delete_documents(&self, uids: &[String]) -> Result<()>;

    /// Thumbnail viewer with multi-page selection, bound to a DOM container
    fn create_browse_viewer(&self, container_id: &str) -> Result<Self::BrowseViewer>;
    /// Single-page viewer with the editing toolbar, bound to a DOM container
    fn create_edit_viewer(&self, container_id: &str) -> Result<Self::EditViewer>;

    /// The sole working document, created on first use.
    fn primary_document(&self) -> Result<Self::Document> {
        match self.documents()?.into_iter().next() {
            Some(doc) => Ok(doc),
            None => self.create_document(),
        }
    }
}

pub trait Document: Clone + 'static {
    fn uid(&self) -> String;
    fn page_count(&self) -> Result<usize>;

    /// Append the pages decoded from `source`; returns how many were added.
    async fn load_source(&self, source: &FileData) -> Result<usize>;
    fn delete_pages(&self, indices: &[usize]) -> Result<()>;

    async fn save_to_pdf(&self, indices: &[usize], settings: &PdfSettings) -> Result<Vec<u8>>;
    async fn save_to_tiff(&self, indices: &[usize], settings: &TiffSettings) -> Result<Vec<u8>>;
    async fn save_to_png(&self, index: usize) -> Result<Vec<u8>>;
    async fn save_to_jpeg(&self, index: usize, settings: &JpegSettings) -> Result<Vec<u8>>;
}

pub trait Viewer: Clone + 'static {
    fn open_document(&self, uid: &str) -> Result<()>;
    fn go_to_page(&self, index: usize) -> Result<()>;
    fn set_visible(&self, visible: bool) -> Result<()>;
}

/// Page layout of the edit viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// One page at a time.
    Single,
    /// Pages scroll continuously.
    Continuous,
}

impl DisplayMode {
    /// Name the SDK uses for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Single => "single",
            DisplayMode::Continuous => "continuous",
        }
    }
}

pub trait EditViewer: Viewer {
    fn set_display_mode(&self, mode: DisplayMode) -> Result<()>;
}

pub trait BrowseViewer: Viewer {
    /// Live registration of a current-index handler. Dropping it unregisters
    /// the handler from the SDK.
    type Subscription: 'static;

    /// Viewers start in single-select mode; selecting several pages needs
    /// this switched on.
    fn set_multiselect(&self, enabled: bool) -> Result<()>;

    fn selected_page_indices(&self) -> Result<Vec<usize>>;
    fn select_pages(&self, indices: &[usize]) -> Result<()>;
    fn select_all_pages(&self) -> Result<()>;

    fn on_current_index_changed(
        &self,
        handler: Box<dyn FnMut(usize)>,
    ) -> Result<Self::Subscription>;
}
