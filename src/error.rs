/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Error type shared by the loader, the session and every backend.

use thiserror::Error;

/// Everything that can go wrong while talking to the viewer SDK.
///
/// Payloads are plain strings because most of them originate as stringified
/// JS exceptions. The type is `Clone` so a failed `initialize` can be shared
/// between every caller awaiting it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("failed to load SDK asset {0}")]
    Load(String),

    #[error("SDK is not loaded")]
    NotLoaded,

    #[error("license configuration failed: {0}")]
    License(String),

    #[error("SDK call {call} failed: {message}")]
    Sdk { call: &'static str, message: String },

    #[error("failed to read input file #{index}: {message}")]
    FileRead { index: usize, message: String },

    #[error("fetch {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("canvas capture failed: {0}")]
    Canvas(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("archive creation failed: {0}")]
    Archive(String),

    #[error("download of {filename} failed: {message}")]
    Download { filename: String, message: String },

    #[error("unsupported output format: {0}")]
    UnknownFormat(String),
}

impl BridgeError {
    pub fn sdk(call: &'static str, message: impl Into<String>) -> Self {
        BridgeError::Sdk {
            call,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdk_error_names_the_call() {
        let err = BridgeError::sdk("saveToPdf", "out of memory");
        assert_eq!(err.to_string(), "SDK call saveToPdf failed: out of memory");
    }

    #[test]
    fn load_error_names_the_asset() {
        let err = BridgeError::Load("assets/ddv.js".into());
        assert_eq!(err.to_string(), "failed to load SDK asset assets/ddv.js");
    }
}
