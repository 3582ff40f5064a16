// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Answerkit.
//!
//! A single tokio-rusqlite connection serializes all access; refinery
//! migrations run on open. [`SqliteStore`] implements every storage
//! collaborator trait so callers wire one value behind several `Arc<dyn _>`
//! seams.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
pub use queries::chunks::{blob_to_vec, cosine_similarity, vec_to_blob};
