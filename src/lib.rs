//! Weighted radial partition layout.
//!
//! A forest of labeled, weighted nodes is partitioned into angular segments:
//! siblings share their parent's range in proportion to weight, separated by
//! a fixed gap. Weight changes re-run the partition in place and yield
//! old/new placement pairs a renderer can animate between.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod layout;
pub mod render;
pub mod util;
