/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! `log` backend selection: `console_log` on wasm, env_logger elsewhere.

/// Install the logger for the current target. Calling it twice is harmless.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    env_logger::try_init().ok();
}

#[cfg(target_arch = "wasm32")]
pub fn init() {
    console_log::init_with_level(log::Level::Debug).ok();
}
