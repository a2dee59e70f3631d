//! Clover Market Core - Shared types library.
//!
//! This crate provides common types used across the Clover Market client SDK:
//! - `client` - HTTP resource clients and state stores
//! - `integration-tests` - end-to-end store tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, ratings, and
//!   normalized category labels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
