//! Changeset - inspect how a change set will be applied and rolled back.
//!
//! This crate provides the `changeset` CLI on top of [`changeset_graph`]:
//! it loads a change-set description from disk, projects every resource
//! change into a dependency node, and prints apply order, parallel batches,
//! rollback order and validation findings.

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
