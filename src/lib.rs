/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Bridge between a component UI host and the Dynamsoft Document Viewer SDK.
//!
//! [`SdkLoader`] injects the SDK into the page once and configures its
//! license; [`DocumentSession`] owns the document manager and the browse/edit
//! viewers and forwards files, canvas snapshots and conversions to the SDK.
//! SDK objects are reached only through the capability traits in [`sdk`];
//! the browser implementation lives in `web` (wasm32 only) and an
//! in-memory one in [`memory`].

pub mod archive;
pub mod canvas;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod loader;
pub mod logging;
pub mod memory;
pub mod sdk;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::SdkConfig;
pub use error::{BridgeError, Result};
pub use format::FileFormat;
pub use loader::{LicenseStatus, SdkLoader};
pub use session::DocumentSession;
