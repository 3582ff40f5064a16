// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Public HTTP surface for the widget query pipeline.

pub mod extract;
pub mod handlers;
pub mod server;

pub use server::{GatewayState, router, start_server};
