//! Agency service library crate.
//!
//! # Purpose
//! Exposes the access-control pipeline (store adapter, identity resolution,
//! access gate), the bulk existence checks, and the HTTP surface over them for
//! use by the binary and tests.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod existence;
pub mod observability;
pub mod store;
