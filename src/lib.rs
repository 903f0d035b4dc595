//! # feedcluster
//!
//! Topic clustering of syndicated feed entries.
//! Entries are indexed into term-frequency vectors and grouped with k-means
//! under one of five distance metrics.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod processing;
pub mod storage;
pub mod ui;
