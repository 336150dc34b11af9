//! Client-side core for the HaNas remote file store.
//!
//! Two layers: [`api::client::HaNasClient`], a typed reqwest client for
//! the HaNas REST backend (cookie session, id-addressed nodes), and
//! [`cache::tree::FolderTreeCache`], the in-memory folder-tree cache
//! that reconciles per-folder snapshots into one rooted tree for
//! presentation layers to render.

pub mod api;
pub mod cache;
pub mod config;
pub mod util;
