#![doc = "kanpo-downloader-core: core logic library for kanpo-downloader."]

//! This crate contains the listing pipeline for the per-year gazette
//! repositories: fetching a repository tree (cache proxy first, GitHub API as
//! fallback), parsing gazette filenames, grouping files by date and document
//! type, and ordering them by month for presentation.
//!
//! # Usage
//! Build a [`download::FallbackTreeSource`] from a [`config::ListingConfig`],
//! wrap it in a [`session::ListingSession`] and call `select_year`.

pub mod config;
pub mod contract;
pub mod display;
pub mod download;
pub mod listing;
pub mod navigation;
pub mod session;
