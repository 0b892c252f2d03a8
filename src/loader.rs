/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Lazy, single-flight bootstrap of the viewer SDK.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::config::SdkConfig;
use crate::error::{BridgeError, Result};
use crate::host::Host;
use crate::sdk::{Document, DocumentManager, SdkPlatform};
use crate::session::DocumentSession;

type InitFuture = Shared<LocalBoxFuture<'static, Result<()>>>;

/// Outcome of [`SdkLoader::set_license`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LicenseStatus {
    Accepted,
    Failed,
}

impl LicenseStatus {
    /// Numeric status reported to JS hosts: `0` or `-1`.
    pub fn code(self) -> i32 {
        match self {
            LicenseStatus::Accepted => 0,
            LicenseStatus::Failed => -1,
        }
    }
}

pub struct SdkLoader<P: SdkPlatform> {
    platform: Rc<P>,
    config: Rc<SdkConfig>,
    init: RefCell<Option<InitFuture>>,
}

impl<P: SdkPlatform> SdkLoader<P> {
    pub fn new(platform: P, config: SdkConfig) -> Self {
        Self {
            platform: Rc::new(platform),
            config: Rc::new(config),
            init: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Load the SDK assets. Every call after the first awaits the same load,
    /// and a failed load stays failed.
    pub async fn initialize(&self) -> Result<()> {
        let pending = self
            .init
            .borrow_mut()
            .get_or_insert_with(|| {
                let platform = Rc::clone(&self.platform);
                let config = Rc::clone(&self.config);
                async move {
                    log::info!("Loading viewer SDK from {}", config.script_url);
                    let result = platform.load_assets(&config).await;
                    match &result {
                        Ok(()) => log::info!("Viewer SDK loaded"),
                        Err(e) => log::error!("Viewer SDK load failed: {}", e),
                    }
                    result
                }
                .boxed_local()
                .shared()
            })
            .clone();
        pending.await
    }

    fn is_loaded(&self) -> bool {
        matches!(
            self.init.borrow().as_ref().and_then(|f| f.peek()),
            Some(Ok(()))
        )
    }

    /// Configure the SDK license. Never fails; problems are logged and
    /// reported as [`LicenseStatus::Failed`].
    pub async fn set_license(&self, key: &str) -> LicenseStatus {
        if !self.is_loaded() {
            log::error!("set_license called before the SDK finished loading");
            return LicenseStatus::Failed;
        }
        match self.platform.configure(key, &self.config).await {
            Ok(()) => {
                log::info!("Viewer SDK license configured");
                LicenseStatus::Accepted
            }
            Err(e) => {
                log::error!("{}", e);
                LicenseStatus::Failed
            }
        }
    }

    /// The SDK's document manager, holding at least one (possibly empty) document.
    pub fn create_document_manager(&self) -> Result<P::Manager> {
        if !self.is_loaded() {
            return Err(BridgeError::NotLoaded);
        }
        let manager = self.platform.document_manager()?;
        if manager.documents()?.is_empty() {
            let doc = manager.create_document()?;
            log::debug!("Created working document {}", doc.uid());
        }
        Ok(manager)
    }

    pub fn create_session<H: Host>(&self, host: H) -> Result<DocumentSession<P::Manager, H>> {
        let manager = self.create_document_manager()?;
        Ok(DocumentSession::new(manager, host, (*self.config).clone()))
    }
}
