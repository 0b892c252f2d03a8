/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! In-memory SDK backend for native builds and tests.
//!
//! Pages are stored as the raw bytes they were loaded from. A source is one
//! page, except `application/pdf` sources, where each form feed (`\x0c`)
//! starts a new page. Exports hand those bytes back (combined formats concatenate them),
//! so the backend models page bookkeeping, selection and navigation but not
//! rendering. Every object can be switched into a failing mode.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::config::SdkConfig;
use crate::error::{BridgeError, Result};
use crate::format::{JpegSettings, OutputFile, PdfSettings, TiffSettings};
use crate::host::{FileData, Host};
use crate::sdk::{
    BrowseViewer, DisplayMode, Document, DocumentManager, EditViewer, SdkPlatform, Viewer,
};

// ===== Platform =====

#[derive(Clone, Default)]
pub struct MemoryPlatform {
    inner: Rc<PlatformState>,
}

#[derive(Default)]
struct PlatformState {
    asset_loads: Cell<usize>,
    fail_assets: Cell<bool>,
    license: RefCell<Option<String>>,
    manager: MemoryManager,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent asset loads fail.
    pub fn fail_asset_load(&self, fail: bool) {
        self.inner.fail_assets.set(fail);
    }

    pub fn asset_loads(&self) -> usize {
        self.inner.asset_loads.get()
    }

    pub fn license(&self) -> Option<String> {
        self.inner.license.borrow().clone()
    }
}

impl SdkPlatform for MemoryPlatform {
    type Manager = MemoryManager;

    async fn load_assets(&self, config: &SdkConfig) -> Result<()> {
        self.inner.asset_loads.set(self.inner.asset_loads.get() + 1);
        if self.inner.fail_assets.get() {
            return Err(BridgeError::Load(config.script_url.clone()));
        }
        Ok(())
    }

    async fn configure(&self, license: &str, _config: &SdkConfig) -> Result<()> {
        if license.trim().is_empty() {
            return Err(BridgeError::License("empty license key".into()));
        }
        *self.inner.license.borrow_mut() = Some(license.to_string());
        Ok(())
    }

    fn document_manager(&self) -> Result<MemoryManager> {
        Ok(self.inner.manager.clone())
    }
}

// ===== Document manager =====

#[derive(Clone, Default)]
pub struct MemoryManager {
    inner: Rc<ManagerState>,
}

#[derive(Default)]
struct ManagerState {
    documents: RefCell<Vec<MemoryDocument>>,
    next_uid: Cell<u32>,
    failing: Rc<Cell<bool>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every manager and document call fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.set(failing);
    }

    fn check(&self, call: &'static str) -> Result<()> {
        if self.inner.failing.get() {
            return Err(BridgeError::sdk(call, "injected failure"));
        }
        Ok(())
    }

    fn find(&self, uid: &str) -> Option<MemoryDocument> {
        self.inner
            .documents
            .borrow()
            .iter()
            .find(|d| d.inner.uid == uid)
            .cloned()
    }
}

impl DocumentManager for MemoryManager {
    type Document = MemoryDocument;
    type BrowseViewer = MemoryBrowseViewer;
    type EditViewer = MemoryEditViewer;

    fn documents(&self) -> Result<Vec<MemoryDocument>> {
        self.check("getAllDocuments")?;
        Ok(self.inner.documents.borrow().clone())
    }

    fn create_document(&self) -> Result<MemoryDocument> {
        self.check("createDocument")?;
        let n = self.inner.next_uid.get() + 1;
        self.inner.next_uid.set(n);
        let doc = MemoryDocument {
            inner: Rc::new(DocumentState {
                uid: format!("doc-{}", n),
                pages: RefCell::new(Vec::new()),
                failing: Rc::clone(&self.inner.failing),
            }),
        };
        self.inner.documents.borrow_mut().push(doc.clone());
        Ok(doc)
    }

    fn delete_documents(&self, uids: &[String]) -> Result<()> {
        self.check("deleteDocuments")?;
        self.inner
            .documents
            .borrow_mut()
            .retain(|d| !uids.contains(&d.inner.uid));
        Ok(())
    }

    fn create_browse_viewer(&self, container_id: &str) -> Result<MemoryBrowseViewer> {
        self.check("BrowseViewer")?;
        Ok(MemoryBrowseViewer {
            inner: Rc::new(BrowseState {
                core: ViewerCore::new(self, container_id)?,
                selected: RefCell::new(Vec::new()),
                multiselect: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                released: Cell::new(0),
            }),
        })
    }

    fn create_edit_viewer(&self, container_id: &str) -> Result<MemoryEditViewer> {
        self.check("EditViewer")?;
        Ok(MemoryEditViewer {
            inner: Rc::new(ViewerCore::new(self, container_id)?),
            display_mode: Rc::new(Cell::new(None)),
        })
    }
}

// ===== Document =====

const PDF_MIME: &str = "application/pdf";
const PAGE_BREAK: u8 = 0x0c;

#[derive(Clone)]
pub struct MemoryDocument {
    inner: Rc<DocumentState>,
}

struct DocumentState {
    uid: String,
    pages: RefCell<Vec<Vec<u8>>>,
    failing: Rc<Cell<bool>>,
}

impl MemoryDocument {
    fn check(&self, call: &'static str) -> Result<()> {
        if self.inner.failing.get() {
            return Err(BridgeError::sdk(call, "injected failure"));
        }
        Ok(())
    }

    fn page(&self, call: &'static str, index: usize) -> Result<Vec<u8>> {
        self.inner
            .pages
            .borrow()
            .get(index)
            .cloned()
            .ok_or_else(|| BridgeError::sdk(call, format!("page {} out of range", index)))
    }

    fn concat(&self, call: &'static str, indices: &[usize]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for &index in indices {
            out.extend(self.page(call, index)?);
        }
        Ok(out)
    }

    /// Raw bytes of every page, in order.
    pub fn pages(&self) -> Vec<Vec<u8>> {
        self.inner.pages.borrow().clone()
    }
}

impl Document for MemoryDocument {
    fn uid(&self) -> String {
        self.inner.uid.clone()
    }

    fn page_count(&self) -> Result<usize> {
        self.check("pages")?;
        Ok(self.inner.pages.borrow().len())
    }

    async fn load_source(&self, source: &FileData) -> Result<usize> {
        self.check("loadSource")?;
        if source.bytes.is_empty() {
            return Err(BridgeError::sdk("loadSource", format!("{} is empty", source.name)));
        }
        let pages: Vec<Vec<u8>> = if source.mime_type == PDF_MIME {
            source
                .bytes
                .split(|&b| b == PAGE_BREAK)
                .filter(|page| !page.is_empty())
                .map(<[u8]>::to_vec)
                .collect()
        } else {
            vec![source.bytes.clone()]
        };
        let added = pages.len();
        self.inner.pages.borrow_mut().extend(pages);
        Ok(added)
    }

    fn delete_pages(&self, indices: &[usize]) -> Result<()> {
        self.check("deletePages")?;
        let mut pages = self.inner.pages.borrow_mut();
        if let Some(&bad) = indices.iter().find(|&&i| i >= pages.len()) {
            return Err(BridgeError::sdk("deletePages", format!("page {} out of range", bad)));
        }
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &index in sorted.iter().rev() {
            pages.remove(index);
        }
        Ok(())
    }

    async fn save_to_pdf(&self, indices: &[usize], _settings: &PdfSettings) -> Result<Vec<u8>> {
        self.check("saveToPdf")?;
        self.concat("saveToPdf", indices)
    }

    async fn save_to_tiff(&self, indices: &[usize], _settings: &TiffSettings) -> Result<Vec<u8>> {
        self.check("saveToTiff")?;
        self.concat("saveToTiff", indices)
    }

    async fn save_to_png(&self, index: usize) -> Result<Vec<u8>> {
        self.check("saveToPng")?;
        self.page("saveToPng", index)
    }

    async fn save_to_jpeg(&self, index: usize, _settings: &JpegSettings) -> Result<Vec<u8>> {
        self.check("saveToJpeg")?;
        self.page("saveToJpeg", index)
    }
}

// ===== Viewers =====

struct ViewerCore {
    container_id: String,
    manager: MemoryManager,
    opened: RefCell<Option<MemoryDocument>>,
    current: Cell<usize>,
    visible: Cell<bool>,
}

impl ViewerCore {
    fn new(manager: &MemoryManager, container_id: &str) -> Result<Self> {
        if container_id.is_empty() {
            return Err(BridgeError::sdk("container", "element id is empty"));
        }
        Ok(Self {
            container_id: container_id.to_string(),
            manager: manager.clone(),
            opened: RefCell::new(None),
            current: Cell::new(0),
            visible: Cell::new(true),
        })
    }

    fn open(&self, uid: &str) -> Result<()> {
        let doc = self
            .manager
            .find(uid)
            .ok_or_else(|| BridgeError::sdk("openDocument", format!("no document {}", uid)))?;
        *self.opened.borrow_mut() = Some(doc);
        self.current.set(0);
        Ok(())
    }

    fn page_count(&self) -> Result<usize> {
        match self.opened.borrow().as_ref() {
            Some(doc) => doc.page_count(),
            None => Ok(0),
        }
    }

    fn go_to(&self, index: usize) -> Result<bool> {
        if index >= self.page_count()? {
            return Err(BridgeError::sdk("goToPage", format!("page {} out of range", index)));
        }
        let changed = self.current.replace(index) != index;
        Ok(changed)
    }
}

#[derive(Clone)]
pub struct MemoryEditViewer {
    inner: Rc<ViewerCore>,
    display_mode: Rc<Cell<Option<DisplayMode>>>,
}

impl MemoryEditViewer {
    pub fn container_id(&self) -> &str {
        &self.inner.container_id
    }

    pub fn current_page(&self) -> usize {
        self.inner.current.get()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.visible.get()
    }

    pub fn opened_document(&self) -> Option<String> {
        self.inner.opened.borrow().as_ref().map(|d| d.uid())
    }

    /// `None` until a mode has been set.
    pub fn display_mode(&self) -> Option<DisplayMode> {
        self.display_mode.get()
    }
}

impl EditViewer for MemoryEditViewer {
    fn set_display_mode(&self, mode: DisplayMode) -> Result<()> {
        self.display_mode.set(Some(mode));
        Ok(())
    }
}

impl Viewer for MemoryEditViewer {
    fn open_document(&self, uid: &str) -> Result<()> {
        self.inner.open(uid)
    }

    fn go_to_page(&self, index: usize) -> Result<()> {
        self.inner.go_to(index).map(|_| ())
    }

    fn set_visible(&self, visible: bool) -> Result<()> {
        self.inner.visible.set(visible);
        Ok(())
    }
}

type Listener = (u64, Box<dyn FnMut(usize)>);

#[derive(Clone)]
pub struct MemoryBrowseViewer {
    inner: Rc<BrowseState>,
}

struct BrowseState {
    core: ViewerCore,
    selected: RefCell<Vec<usize>>,
    multiselect: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    released: Cell<usize>,
}

impl MemoryBrowseViewer {
    pub fn container_id(&self) -> &str {
        &self.inner.core.container_id
    }

    pub fn current_page(&self) -> usize {
        self.inner.core.current.get()
    }

    pub fn opened_document(&self) -> Option<String> {
        self.inner.core.opened.borrow().as_ref().map(|d| d.uid())
    }

    pub fn is_multiselect(&self) -> bool {
        self.inner.multiselect.get()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// How many subscriptions have been dropped so far.
    pub fn released_subscriptions(&self) -> usize {
        self.inner.released.get()
    }

    /// Simulate the user clicking a thumbnail.
    pub fn click_page(&self, index: usize) -> Result<()> {
        self.select_pages(&[index])?;
        self.go_to_page(index)
    }

    fn notify(&self, index: usize) {
        // Handlers run outside the borrow so they may call back into the viewer
        let mut running = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        for (_, handler) in running.iter_mut() {
            handler(index);
        }
        let mut listeners = self.inner.listeners.borrow_mut();
        running.append(&mut listeners);
        *listeners = running;
    }
}

impl Viewer for MemoryBrowseViewer {
    fn open_document(&self, uid: &str) -> Result<()> {
        self.inner.core.open(uid)?;
        self.inner.selected.borrow_mut().clear();
        Ok(())
    }

    fn go_to_page(&self, index: usize) -> Result<()> {
        if self.inner.core.go_to(index)? {
            self.notify(index);
        }
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> Result<()> {
        self.inner.core.visible.set(visible);
        Ok(())
    }
}

impl BrowseViewer for MemoryBrowseViewer {
    type Subscription = MemorySubscription;

    fn set_multiselect(&self, enabled: bool) -> Result<()> {
        self.inner.multiselect.set(enabled);
        if !enabled {
            self.inner.selected.borrow_mut().truncate(1);
        }
        Ok(())
    }

    fn selected_page_indices(&self) -> Result<Vec<usize>> {
        self.inner.core.manager.check("getSelectedPageIndices")?;
        Ok(self.inner.selected.borrow().clone())
    }

    fn select_pages(&self, indices: &[usize]) -> Result<()> {
        let count = self.inner.core.page_count()?;
        if let Some(&bad) = indices.iter().find(|&&i| i >= count) {
            return Err(BridgeError::sdk("selectPages", format!("page {} out of range", bad)));
        }
        // Single-select keeps only the first requested page
        let selected = if self.inner.multiselect.get() {
            indices.to_vec()
        } else {
            indices.iter().take(1).copied().collect()
        };
        *self.inner.selected.borrow_mut() = selected;
        Ok(())
    }

    fn select_all_pages(&self) -> Result<()> {
        let count = self.inner.core.page_count()?;
        let all: Vec<usize> = (0..count).collect();
        self.select_pages(&all)
    }

    fn on_current_index_changed(
        &self,
        handler: Box<dyn FnMut(usize)>,
    ) -> Result<MemorySubscription> {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, handler));
        Ok(MemorySubscription {
            id,
            viewer: Rc::downgrade(&self.inner),
        })
    }
}

/// Unregisters its handler when dropped.
pub struct MemorySubscription {
    id: u64,
    viewer: Weak<BrowseState>,
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        if let Some(viewer) = self.viewer.upgrade() {
            viewer.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
            viewer.released.set(viewer.released.get() + 1);
        }
    }
}

// ===== Host =====

/// Serves fetches from a map and records every download.
#[derive(Clone, Default)]
pub struct MemoryHost {
    inner: Rc<HostState>,
}

#[derive(Default)]
struct HostState {
    served: RefCell<HashMap<String, Vec<u8>>>,
    saved: RefCell<Vec<OutputFile>>,
    fail_downloads: Cell<bool>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, bytes: Vec<u8>) {
        self.inner.served.borrow_mut().insert(url.to_string(), bytes);
    }

    pub fn fail_downloads(&self, fail: bool) {
        self.inner.fail_downloads.set(fail);
    }

    /// Every file offered for download, oldest first.
    pub fn saved(&self) -> Vec<OutputFile> {
        self.inner.saved.borrow().clone()
    }
}

impl Host for MemoryHost {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.inner
            .served
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| BridgeError::Fetch {
                url: url.to_string(),
                message: "404 Not Found".into(),
            })
    }

    fn save_file(&self, file: &OutputFile) -> Result<()> {
        if self.inner.fail_downloads.get() {
            return Err(BridgeError::Download {
                filename: file.name.clone(),
                message: "injected failure".into(),
            });
        }
        self.inner.saved.borrow_mut().push(file.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    fn page(bytes: &[u8]) -> FileData {
        FileData::new("page.png", "image/png", bytes.to_vec())
    }

    #[test]
    fn delete_pages_removes_highest_first() {
        let manager = MemoryManager::new();
        let doc = manager.create_document().unwrap();
        for b in [b"a", b"b", b"c", b"d"] {
            block_on(doc.load_source(&page(b))).unwrap();
        }
        doc.delete_pages(&[3, 0, 3]).unwrap();
        assert_eq!(doc.pages(), vec![b"b".to_vec(), b"c".to_vec()]);
        assert!(doc.delete_pages(&[2]).is_err());
    }

    #[test]
    fn browse_viewer_notifies_only_on_change() {
        let manager = MemoryManager::new();
        let doc = manager.create_document().unwrap();
        block_on(doc.load_source(&page(b"a"))).unwrap();
        block_on(doc.load_source(&page(b"b"))).unwrap();

        let viewer = manager.create_browse_viewer("thumbs").unwrap();
        viewer.open_document(&doc.uid()).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = viewer
            .on_current_index_changed(Box::new(move |i| sink.borrow_mut().push(i)))
            .unwrap();

        viewer.go_to_page(1).unwrap();
        viewer.go_to_page(1).unwrap();
        viewer.click_page(0).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 0]);
        assert_eq!(viewer.selected_page_indices().unwrap(), vec![0]);

        drop(sub);
        assert_eq!(viewer.listener_count(), 0);
        assert_eq!(viewer.released_subscriptions(), 1);
    }

    #[test]
    fn pdf_source_splits_on_form_feed() {
        let manager = MemoryManager::new();
        let doc = manager.create_document().unwrap();
        let pdf = FileData::new("scan.pdf", "application/pdf", b"p1\x0cp2\x0cp3".to_vec());
        assert_eq!(block_on(doc.load_source(&pdf)).unwrap(), 3);
        assert_eq!(block_on(doc.load_source(&page(b"x\x0cy"))).unwrap(), 1);
        assert_eq!(doc.pages()[1], b"p2".to_vec());
        assert_eq!(doc.page_count().unwrap(), 4);
    }

    #[test]
    fn single_select_keeps_first_page() {
        let manager = MemoryManager::new();
        let doc = manager.create_document().unwrap();
        for b in [b"a", b"b", b"c"] {
            block_on(doc.load_source(&page(b))).unwrap();
        }
        let viewer = manager.create_browse_viewer("thumbs").unwrap();
        viewer.open_document(&doc.uid()).unwrap();

        viewer.select_pages(&[2, 0]).unwrap();
        assert_eq!(viewer.selected_page_indices().unwrap(), vec![2]);

        viewer.set_multiselect(true).unwrap();
        viewer.select_all_pages().unwrap();
        assert_eq!(viewer.selected_page_indices().unwrap(), vec![0, 1, 2]);

        viewer.set_multiselect(false).unwrap();
        assert_eq!(viewer.selected_page_indices().unwrap(), vec![0]);
    }

    #[test]
    fn viewer_needs_a_container() {
        let manager = MemoryManager::new();
        assert!(manager.create_edit_viewer("").is_err());
    }

    #[test]
    fn host_reports_missing_urls() {
        let host = MemoryHost::new();
        host.serve("a.pdf", vec![1]);
        assert_eq!(block_on(host.fetch("a.pdf")).unwrap(), vec![1]);
        assert!(matches!(
            block_on(host.fetch("b.pdf")),
            Err(BridgeError::Fetch { .. })
        ));
    }
}
