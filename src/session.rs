/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! One document manager plus its browse/edit viewers.
//!
//! Every host-facing operation here logs SDK failures and returns normally:
//! these are UI actions the user can simply repeat, so a failed call leaves
//! no visible effect instead of surfacing a partial-operation error.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::archive;
use crate::canvas;
use crate::config::SdkConfig;
use crate::error::Result;
use crate::format::{self, FileFormat, JpegSettings, OutputFile, PdfSettings, TiffSettings};
use crate::host::{CanvasSource, FileData, FileInput, Host, is_pdf_name};
use crate::sdk::{BrowseViewer, DisplayMode, Document, DocumentManager, EditViewer, Viewer};

/// A viewer and the DOM container it was created in.
struct Attached<V> {
    container_id: String,
    viewer: V,
}

type EditSlot<M> = Rc<RefCell<Option<Attached<<M as DocumentManager>::EditViewer>>>>;
type Subscription<M> = <<M as DocumentManager>::BrowseViewer as BrowseViewer>::Subscription;

pub struct DocumentSession<M: DocumentManager, H: Host> {
    manager: M,
    host: H,
    config: SdkConfig,
    browse: RefCell<Option<Attached<M::BrowseViewer>>>,
    edit: EditSlot<M>,
    /// Page-change registration on the browse viewer; `None` once released
    page_changes: RefCell<Option<Subscription<M>>>,
    pdf_ready: Cell<bool>,
}

impl<M: DocumentManager, H: Host> DocumentSession<M, H> {
    pub fn new(manager: M, host: H, config: SdkConfig) -> Self {
        Self {
            manager,
            host,
            config,
            browse: RefCell::new(None),
            edit: Rc::new(RefCell::new(None)),
            page_changes: RefCell::new(None),
            pdf_ready: Cell::new(false),
        }
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn browse_viewer(&self) -> Option<M::BrowseViewer> {
        self.browse.borrow().as_ref().map(|a| a.viewer.clone())
    }

    pub fn edit_viewer(&self) -> Option<M::EditViewer> {
        self.edit.borrow().as_ref().map(|a| a.viewer.clone())
    }

    pub fn is_pdf_ready(&self) -> bool {
        self.pdf_ready.get()
    }

    // ===== Loading =====

    /// Append every file of `input` to the working document. With a browse
    /// viewer attached, the pages added by this call become the selection and
    /// both viewers move to the first of them.
    pub async fn load_files<I: FileInput + ?Sized>(&self, input: &I) {
        let count = input.file_count();
        log::debug!("Loading {} file(s)", count);
        let first = match self.page_count() {
            Ok(n) => n,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        let mut added = 0;
        for index in 0..count {
            let appended = match input.read_file(index).await {
                Ok(file) => self.append(&file).await,
                Err(e) => Err(e),
            };
            match appended {
                Ok(n) => added += n,
                Err(e) => log::error!("{}", e),
            }
        }

        if let Err(e) = self.reveal_new_pages(first, added) {
            log::error!("{}", e);
        }
    }

    /// Whether any selected file name ends in `.pdf`.
    pub fn detect_pdf<I: FileInput + ?Sized>(&self, input: &I) -> bool {
        (0..input.file_count())
            .filter_map(|i| input.file_name(i))
            .any(|name| is_pdf_name(&name))
    }

    /// Capture the canvas bitmap and append it as a new page.
    pub async fn load_from_canvas<C: CanvasSource + ?Sized>(&self, canvas: &C) {
        if let Err(e) = self.try_load_from_canvas(canvas).await {
            log::error!("{}", e);
        }
    }

    async fn try_load_from_canvas<C: CanvasSource + ?Sized>(&self, canvas: &C) -> Result<()> {
        let file = canvas::to_file_data(&canvas.capture()?)?;
        let first = self.page_count()?;
        let added = self.append(&file).await?;
        self.reveal_new_pages(first, added)
    }

    fn page_count(&self) -> Result<usize> {
        self.manager.primary_document()?.page_count()
    }

    async fn append(&self, file: &FileData) -> Result<usize> {
        let doc = self.manager.primary_document()?;
        let added = doc.load_source(file).await?;
        log::info!(
            "Loaded {} ({} bytes, {} page(s))",
            file.name,
            file.bytes.len(),
            added
        );
        Ok(added)
    }

    fn reveal_new_pages(&self, first: usize, added: usize) -> Result<()> {
        let Some(browse) = self.browse_viewer() else {
            return Ok(());
        };
        if added == 0 {
            return Ok(());
        }
        let new_pages: Vec<usize> = (first..first + added).collect();
        browse.select_pages(&new_pages)?;
        browse.go_to_page(first)?;
        if let Some(edit) = self.edit_viewer() {
            edit.go_to_page(first)?;
        }
        Ok(())
    }

    /// Fetch the bundled sample PDF and push it through load/export once so
    /// the SDK initializes its PDF engine before the first real document.
    pub async fn load_pdf_engine(&self) {
        if let Err(e) = self.warm_up_pdf().await {
            log::error!("PDF engine warm-up failed: {}", e);
        }
        self.pdf_ready.set(true);
    }

    async fn warm_up_pdf(&self) -> Result<()> {
        let url = &self.config.pdf_warmup_url;
        let bytes = self.host.fetch(url).await?;
        let sample = FileData::new(url, "application/pdf", bytes);

        let doc = self.manager.create_document()?;
        let exported = match doc.load_source(&sample).await {
            Ok(_) => doc.save_to_jpeg(0, &JpegSettings::default()).await,
            Err(e) => Err(e),
        };
        self.manager.delete_documents(&[doc.uid()])?;

        let jpeg = exported?;
        log::info!("PDF engine ready (sample page {} bytes)", jpeg.len());
        Ok(())
    }

    // ===== Viewers =====

    pub fn create_browse_viewer(&self, element_id: &str) {
        if let Err(e) = self.try_create_browse_viewer(element_id) {
            log::error!("Browse viewer in #{}: {}", element_id, e);
        }
    }

    fn try_create_browse_viewer(&self, element_id: &str) -> Result<()> {
        if let Some(existing) = self.browse.borrow().as_ref() {
            log::warn!(
                "Browse viewer already attached to #{}, ignoring #{}",
                existing.container_id,
                element_id
            );
            return Ok(());
        }

        let viewer = self.manager.create_browse_viewer(element_id)?;
        viewer.set_multiselect(true)?;
        let doc = self.manager.primary_document()?;
        viewer.open_document(&doc.uid())?;

        let edit = Rc::downgrade(&self.edit);
        let subscription = viewer.on_current_index_changed(Box::new(move |index| {
            if let Some(edit) = edit.upgrade() {
                forward_page_index(&edit, index);
            }
        }))?;

        *self.page_changes.borrow_mut() = Some(subscription);
        *self.browse.borrow_mut() = Some(Attached {
            container_id: element_id.to_string(),
            viewer,
        });
        log::info!("Browse viewer attached to #{}", element_id);
        Ok(())
    }

    pub fn create_edit_viewer(&self, element_id: &str) {
        if let Err(e) = self.try_create_edit_viewer(element_id) {
            log::error!("Edit viewer in #{}: {}", element_id, e);
        }
    }

    fn try_create_edit_viewer(&self, element_id: &str) -> Result<()> {
        if let Some(existing) = self.edit.borrow().as_ref() {
            log::warn!(
                "Edit viewer already attached to #{}, ignoring #{}",
                existing.container_id,
                element_id
            );
            return Ok(());
        }

        let viewer = self.manager.create_edit_viewer(element_id)?;
        viewer.set_display_mode(DisplayMode::Single)?;
        let doc = self.manager.primary_document()?;
        viewer.open_document(&doc.uid())?;

        *self.edit.borrow_mut() = Some(Attached {
            container_id: element_id.to_string(),
            viewer,
        });
        log::info!("Edit viewer attached to #{}", element_id);
        Ok(())
    }

    /// Inbound notification from the browse viewer.
    pub fn on_page_index_changed(&self, index: usize) {
        forward_page_index(&self.edit, index);
    }

    pub fn show_editor(&self) {
        self.set_editor_visible(true);
    }

    pub fn hide_editor(&self) {
        self.set_editor_visible(false);
    }

    fn set_editor_visible(&self, visible: bool) {
        match self.edit_viewer() {
            Some(edit) => {
                if let Err(e) = edit.set_visible(visible) {
                    log::error!("{}", e);
                }
            }
            None => log::debug!("No edit viewer to toggle"),
        }
    }

    // ===== Selection =====

    pub fn select_all(&self) {
        if let Some(browse) = self.browse_viewer()
            && let Err(e) = browse.select_all_pages()
        {
            log::error!("{}", e);
        }
    }

    pub fn unselect_all(&self) {
        if let Some(browse) = self.browse_viewer()
            && let Err(e) = browse.select_pages(&[])
        {
            log::error!("{}", e);
        }
    }

    pub fn remove_selected(&self) {
        let Some(browse) = self.browse_viewer() else {
            log::debug!("No browse viewer, nothing is selected");
            return;
        };
        let result = browse.selected_page_indices().and_then(|selected| {
            if selected.is_empty() {
                return Ok(());
            }
            let doc = self.manager.primary_document()?;
            doc.delete_pages(&selected)?;
            log::info!("Removed {} selected page(s)", selected.len());
            Ok(())
        });
        if let Err(e) = result {
            log::error!("{}", e);
        }
    }

    pub fn remove_all(&self) {
        if let Err(e) = self.try_remove_all() {
            log::error!("{}", e);
        }
    }

    fn try_remove_all(&self) -> Result<()> {
        if let Some(doc) = self.manager.documents()?.into_iter().next() {
            let all: Vec<usize> = (0..doc.page_count()?).collect();
            if !all.is_empty() {
                doc.delete_pages(&all)?;
            }
            log::info!("Removed all {} page(s)", all.len());
            return Ok(());
        }

        let doc = self.manager.create_document()?;
        log::debug!("No document to clear, created empty {}", doc.uid());
        if let Some(browse) = self.browse_viewer() {
            browse.open_document(&doc.uid())?;
        }
        if let Some(edit) = self.edit_viewer() {
            edit.open_document(&doc.uid())?;
        }
        Ok(())
    }

    // ===== Conversion =====

    /// Export the selected pages (all pages without a browse viewer) and hand
    /// the result to the host as downloads.
    pub async fn convert(&self, filename: &str, format: FileFormat, zip: bool) {
        if let Err(e) = self.try_convert(filename, format, zip).await {
            log::error!("Convert to {} failed: {}", format, e);
        }
    }

    /// [`convert`](Self::convert) with the format given by name, as the JS
    /// host passes it. Unknown names are logged and export nothing.
    pub async fn convert_named(&self, filename: &str, format: &str, zip: bool) {
        match format.parse::<FileFormat>() {
            Ok(format) => self.convert(filename, format, zip).await,
            Err(e) => log::error!("Convert {}: {}", filename, e),
        }
    }

    async fn try_convert(&self, filename: &str, format: FileFormat, zip: bool) -> Result<()> {
        let Some(doc) = self.manager.documents()?.into_iter().next() else {
            return Ok(());
        };
        let indices = match self.browse_viewer() {
            Some(browse) => browse.selected_page_indices()?,
            None => (0..doc.page_count()?).collect(),
        };
        if indices.is_empty() {
            log::debug!("Nothing selected, skipping {} export", format);
            return Ok(());
        }

        let outputs = export_pages(&doc, filename, format, &indices).await?;
        log::info!(
            "Exported {} page(s) to {} file(s) as {}",
            indices.len(),
            outputs.len(),
            format
        );

        if zip {
            let bytes = archive::pack(&outputs)?;
            let bundle = OutputFile::new(format::archive_name(filename), "application/zip", bytes);
            self.host.save_file(&bundle)
        } else {
            outputs.iter().try_for_each(|file| self.host.save_file(file))
        }
    }

    // ===== Lifetime =====

    /// Release the page-change registration. Safe to call repeatedly.
    pub fn dispose(&self) {
        if let Some(subscription) = self.page_changes.borrow_mut().take() {
            drop(subscription);
            log::debug!("Page-change callback released");
        }
    }
}

impl<M: DocumentManager, H: Host> Drop for DocumentSession<M, H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn forward_page_index<V: Viewer>(edit: &RefCell<Option<Attached<V>>>, index: usize) {
    let Some(viewer) = edit.borrow().as_ref().map(|a| a.viewer.clone()) else {
        return;
    };
    if let Err(e) = viewer.go_to_page(index) {
        log::error!("{}", e);
    }
}

async fn export_pages<D: Document>(
    doc: &D,
    filename: &str,
    format: FileFormat,
    indices: &[usize],
) -> Result<Vec<OutputFile>> {
    let mime = format.mime_type();
    match format {
        FileFormat::Pdf => {
            let settings = PdfSettings::stamped(chrono::Utc::now());
            let bytes = doc.save_to_pdf(indices, &settings).await?;
            Ok(vec![OutputFile::new(format::combined_name(filename, format), mime, bytes)])
        }
        FileFormat::Tiff => {
            let bytes = doc.save_to_tiff(indices, &TiffSettings::default()).await?;
            Ok(vec![OutputFile::new(format::combined_name(filename, format), mime, bytes)])
        }
        FileFormat::Png | FileFormat::Jpeg => {
            let jpeg = JpegSettings::default();
            let mut files = Vec::with_capacity(indices.len());
            for (offset, &index) in indices.iter().enumerate() {
                let bytes = match format {
                    FileFormat::Png => doc.save_to_png(index).await?,
                    _ => doc.save_to_jpeg(index, &jpeg).await?,
                };
                files.push(OutputFile::new(
                    format::page_name(filename, offset, format),
                    mime,
                    bytes,
                ));
            }
            Ok(files)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use futures::executor::block_on;

    use super::*;
    use crate::canvas::CanvasPixels;
    use crate::memory::{MemoryHost, MemoryManager};

    type Session = DocumentSession<MemoryManager, MemoryHost>;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn session() -> Session {
        init_logger();
        let manager = MemoryManager::new();
        manager.create_document().unwrap();
        DocumentSession::new(manager, MemoryHost::new(), SdkConfig::default())
    }

    fn files(names: &[&str]) -> Vec<FileData> {
        names
            .iter()
            .map(|n| FileData::new(n, "application/octet-stream", n.as_bytes().to_vec()))
            .collect()
    }

    fn page_count(session: &Session) -> usize {
        session
            .manager()
            .primary_document()
            .unwrap()
            .page_count()
            .unwrap()
    }

    #[test]
    fn detect_pdf_matches_literal_suffix() {
        let s = session();
        assert!(!s.detect_pdf(files(&[]).as_slice()));
        assert!(!s.detect_pdf(files(&["a.png", "b.PDF"]).as_slice()));
        assert!(s.detect_pdf(files(&["a.png", "b.pdf"]).as_slice()));
    }

    #[test]
    fn load_files_appends_without_viewers() {
        let s = session();
        block_on(s.load_files(files(&["a.png", "b.jpg"]).as_slice()));
        assert_eq!(page_count(&s), 2);
    }

    #[test]
    fn load_files_selects_new_pages_and_navigates() {
        let s = session();
        s.create_browse_viewer("browse");
        s.create_edit_viewer("edit");
        block_on(s.load_files(files(&["a.png", "b.png"]).as_slice()));
        block_on(s.load_files(files(&["c.png", "d.png", "e.png"]).as_slice()));

        let browse = s.browse_viewer().unwrap();
        let edit = s.edit_viewer().unwrap();
        assert_eq!(page_count(&s), 5);
        assert_eq!(browse.selected_page_indices().unwrap(), vec![2, 3, 4]);
        assert_eq!(browse.current_page(), 2);
        assert_eq!(edit.current_page(), 2);
    }

    #[test]
    fn multi_page_pdf_selects_every_new_page() {
        let s = session();
        s.create_browse_viewer("browse");
        s.create_edit_viewer("edit");
        block_on(s.load_files(files(&["cover.png"]).as_slice()));

        let pdf = FileData::new("scan.pdf", "application/pdf", b"p1\x0cp2\x0cp3".to_vec());
        assert!(s.detect_pdf(std::slice::from_ref(&pdf)));
        block_on(s.load_files(std::slice::from_ref(&pdf)));

        let browse = s.browse_viewer().unwrap();
        assert_eq!(page_count(&s), 4);
        assert_eq!(browse.selected_page_indices().unwrap(), vec![1, 2, 3]);
        assert_eq!(browse.current_page(), 1);
        assert_eq!(s.edit_viewer().unwrap().current_page(), 1);
    }

    #[test]
    fn failed_file_does_not_shift_selection() {
        let s = session();
        s.create_browse_viewer("browse");
        block_on(s.load_files(files(&["a.png"]).as_slice()));

        let mut input = files(&["b.png", "c.png", "d.png"]);
        input[1].bytes.clear();
        block_on(s.load_files(input.as_slice()));

        let browse = s.browse_viewer().unwrap();
        assert_eq!(browse.selected_page_indices().unwrap(), vec![1, 2]);
        assert_eq!(browse.current_page(), 1);
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let s = session();
        let mut input = files(&["a.png", "b.png"]);
        input[0].bytes.clear();
        block_on(s.load_files(input.as_slice()));
        assert_eq!(page_count(&s), 1);
    }

    #[test]
    fn load_from_canvas_adds_png_page() {
        let s = session();
        s.create_browse_viewer("browse");
        let pixels = CanvasPixels {
            width: 2,
            height: 2,
            rgba: vec![0; 16],
        };
        block_on(s.load_from_canvas(&pixels));

        let doc = s.manager().primary_document().unwrap();
        assert_eq!(doc.pages().len(), 1);
        assert_eq!(&doc.pages()[0][..4], b"\x89PNG");
        assert_eq!(s.browse_viewer().unwrap().selected_page_indices().unwrap(), vec![0]);
    }

    #[test]
    fn bad_canvas_is_swallowed() {
        let s = session();
        let pixels = CanvasPixels {
            width: 5,
            height: 5,
            rgba: vec![0; 3],
        };
        block_on(s.load_from_canvas(&pixels));
        assert_eq!(page_count(&s), 0);
    }

    #[test]
    fn viewers_open_the_sole_document() {
        let s = session();
        let uid = s.manager().primary_document().unwrap().uid();
        s.create_browse_viewer("browse");
        s.create_edit_viewer("edit");
        assert_eq!(s.browse_viewer().unwrap().opened_document(), Some(uid.clone()));
        assert_eq!(s.edit_viewer().unwrap().opened_document(), Some(uid));
        assert_eq!(s.manager().documents().unwrap().len(), 1);
    }

    #[test]
    fn viewers_are_configured_on_creation() {
        let s = session();
        s.create_browse_viewer("browse");
        s.create_edit_viewer("edit");
        assert!(s.browse_viewer().unwrap().is_multiselect());
        assert_eq!(s.edit_viewer().unwrap().display_mode(), Some(DisplayMode::Single));
    }

    #[test]
    fn viewer_is_not_recreated() {
        let s = session();
        s.create_browse_viewer("browse");
        s.create_browse_viewer("other");
        s.create_edit_viewer("edit");
        s.create_edit_viewer("edit");
        assert_eq!(s.browse_viewer().unwrap().container_id(), "browse");
        assert_eq!(s.browse_viewer().unwrap().listener_count(), 1);
        assert_eq!(s.edit_viewer().unwrap().container_id(), "edit");
    }

    #[test]
    fn failed_viewer_creation_leaves_slot_empty() {
        let s = session();
        s.create_browse_viewer("");
        assert!(s.browse_viewer().is_none());
        s.create_browse_viewer("browse");
        assert!(s.browse_viewer().is_some());
    }

    #[test]
    fn browse_navigation_drives_edit_viewer() {
        let s = session();
        s.create_browse_viewer("browse");
        s.create_edit_viewer("edit");
        block_on(s.load_files(files(&["a", "b", "c"]).as_slice()));

        s.browse_viewer().unwrap().click_page(1).unwrap();
        assert_eq!(s.edit_viewer().unwrap().current_page(), 1);

        s.on_page_index_changed(0);
        assert_eq!(s.edit_viewer().unwrap().current_page(), 0);
    }

    #[test]
    fn page_change_without_edit_viewer_is_ignored() {
        let s = session();
        s.create_browse_viewer("browse");
        block_on(s.load_files(files(&["a", "b"]).as_slice()));
        s.browse_viewer().unwrap().click_page(0).unwrap();
        s.on_page_index_changed(1);
    }

    #[test]
    fn editor_visibility_toggles() {
        let s = session();
        s.hide_editor();
        s.create_edit_viewer("edit");
        s.hide_editor();
        assert!(!s.edit_viewer().unwrap().is_visible());
        s.show_editor();
        assert!(s.edit_viewer().unwrap().is_visible());
    }

    #[test]
    fn select_and_unselect_all() {
        let s = session();
        s.create_browse_viewer("browse");
        block_on(s.load_files(files(&["a", "b", "c"]).as_slice()));

        s.select_all();
        let browse = s.browse_viewer().unwrap();
        assert_eq!(browse.selected_page_indices().unwrap(), vec![0, 1, 2]);
        s.unselect_all();
        assert!(browse.selected_page_indices().unwrap().is_empty());
    }

    #[test]
    fn remove_selected_deletes_only_selection() {
        let s = session();
        s.create_browse_viewer("browse");
        block_on(s.load_files(files(&["a", "b", "c"]).as_slice()));

        s.browse_viewer().unwrap().select_pages(&[0, 2]).unwrap();
        s.remove_selected();
        let doc = s.manager().primary_document().unwrap();
        assert_eq!(doc.pages(), vec![b"b".to_vec()]);
    }

    #[test]
    fn remove_selected_without_browse_viewer_is_noop() {
        let s = session();
        block_on(s.load_files(files(&["a", "b"]).as_slice()));
        s.remove_selected();
        assert_eq!(page_count(&s), 2);
    }

    #[test]
    fn remove_all_clears_pages_keeping_document() {
        let s = session();
        let uid = s.manager().primary_document().unwrap().uid();
        block_on(s.load_files(files(&["a", "b"]).as_slice()));
        s.remove_all();
        assert_eq!(page_count(&s), 0);
        assert_eq!(s.manager().primary_document().unwrap().uid(), uid);
    }

    #[test]
    fn remove_all_without_documents_creates_one() {
        let s = session();
        s.create_edit_viewer("edit");
        let uids: Vec<String> = s
            .manager()
            .documents()
            .unwrap()
            .iter()
            .map(|d| d.uid())
            .collect();
        s.manager().delete_documents(&uids).unwrap();

        s.remove_all();
        let docs = s.manager().documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_count().unwrap(), 0);
        assert_eq!(s.edit_viewer().unwrap().opened_document(), Some(docs[0].uid()));
    }

    #[test]
    fn convert_with_empty_selection_produces_nothing() {
        let s = session();
        s.create_browse_viewer("browse");
        block_on(s.load_files(files(&["a", "b"]).as_slice()));
        s.unselect_all();

        block_on(s.convert("scan", FileFormat::Png, true));
        block_on(s.convert("scan", FileFormat::Pdf, false));
        assert!(s.host().saved().is_empty());
    }

    #[test]
    fn convert_empty_document_produces_nothing() {
        let s = session();
        block_on(s.convert("scan", FileFormat::Jpeg, false));
        assert!(s.host().saved().is_empty());
    }

    #[test]
    fn per_page_zip_holds_one_entry_per_page() {
        let s = session();
        s.create_browse_viewer("browse");
        block_on(s.load_files(files(&["a", "b", "c", "d"]).as_slice()));
        s.browse_viewer().unwrap().select_pages(&[3, 1, 2]).unwrap();

        block_on(s.convert("scan", FileFormat::Jpeg, true));
        let saved = s.host().saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "scan.zip");
        assert_eq!(saved[0].mime_type, "application/zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(saved[0].bytes.clone())).unwrap();
        assert_eq!(archive.len(), 3);
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["scan0.jpeg", "scan1.jpeg", "scan2.jpeg"]);
    }

    #[test]
    fn per_page_without_zip_downloads_each_page() {
        let s = session();
        block_on(s.load_files(files(&["a", "b"]).as_slice()));

        block_on(s.convert("out", FileFormat::Png, false));
        let saved = s.host().saved();
        let names: Vec<&str> = saved.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["out0.png", "out1.png"]);
        assert_eq!(saved[1].bytes, b"b".to_vec());
        assert_eq!(saved[1].mime_type, "image/png");
    }

    #[test]
    fn combined_formats_produce_one_file() {
        let s = session();
        block_on(s.load_files(files(&["a", "b", "c"]).as_slice()));

        block_on(s.convert("doc", FileFormat::Pdf, false));
        block_on(s.convert("doc", FileFormat::Tiff, false));
        let saved = s.host().saved();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].name, "doc.pdf");
        assert_eq!(saved[0].bytes, b"abc".to_vec());
        assert_eq!(saved[1].name, "doc.tiff");
    }

    #[test]
    fn combined_format_zip_wraps_single_file() {
        let s = session();
        block_on(s.load_files(files(&["a", "b"]).as_slice()));

        block_on(s.convert("doc", FileFormat::Tiff, true));
        let saved = s.host().saved();
        assert_eq!(saved.len(), 1);
        let mut archive = zip::ZipArchive::new(Cursor::new(saved[0].bytes.clone())).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_index(0).unwrap().name(), "doc.tiff");
    }

    #[test]
    fn convert_by_name() {
        let s = session();
        block_on(s.load_files(files(&["a", "b"]).as_slice()));

        block_on(s.convert_named("doc", "bmp", false));
        block_on(s.convert_named("doc", "PNG", true));
        assert!(s.host().saved().is_empty());

        block_on(s.convert_named("doc", "png", false));
        let names: Vec<_> = s.host().saved().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["doc0.png", "doc1.png"]);
    }

    #[test]
    fn sdk_failures_are_swallowed() {
        let s = session();
        s.create_browse_viewer("browse");
        block_on(s.load_files(files(&["a"]).as_slice()));
        s.manager().set_failing(true);

        block_on(s.load_files(files(&["b"]).as_slice()));
        block_on(s.convert("x", FileFormat::Pdf, false));
        s.select_all();
        s.remove_selected();
        s.remove_all();
        assert!(s.host().saved().is_empty());

        s.manager().set_failing(false);
        assert_eq!(page_count(&s), 1);
    }

    #[test]
    fn download_failure_is_swallowed() {
        let s = session();
        block_on(s.load_files(files(&["a"]).as_slice()));
        s.host().fail_downloads(true);
        block_on(s.convert("x", FileFormat::Png, false));
        assert!(s.host().saved().is_empty());
    }

    #[test]
    fn pdf_engine_warm_up_discards_sample() {
        let s = session();
        s.host().serve("assets/warmup.pdf", b"%PDF-1.4".to_vec());
        block_on(s.load_pdf_engine());

        assert!(s.is_pdf_ready());
        assert_eq!(s.manager().documents().unwrap().len(), 1);
        assert!(s.host().saved().is_empty());
    }

    #[test]
    fn pdf_engine_marks_ready_even_when_fetch_fails() {
        let s = session();
        block_on(s.load_pdf_engine());
        assert!(s.is_pdf_ready());
        assert_eq!(s.manager().documents().unwrap().len(), 1);
    }

    #[test]
    fn dispose_releases_callback_once() {
        let s = session();
        s.create_browse_viewer("browse");
        let browse = s.browse_viewer().unwrap();
        assert_eq!(browse.listener_count(), 1);

        s.dispose();
        s.dispose();
        assert_eq!(browse.listener_count(), 0);
        assert_eq!(browse.released_subscriptions(), 1);

        drop(s);
        assert_eq!(browse.released_subscriptions(), 1);
    }

    #[test]
    fn drop_releases_callback() {
        let s = session();
        s.create_browse_viewer("browse");
        let browse = s.browse_viewer().unwrap();
        drop(s);
        assert_eq!(browse.listener_count(), 0);
        assert_eq!(browse.released_subscriptions(), 1);
    }
}
