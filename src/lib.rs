//! sqlview - A lightweight result viewer and query console for a remote SQL engine.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod directory;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod render;
pub mod result;
