//! Leasehold Monitor - monitoring REST API client
//!
//! This crate provides:
//! - `MonitorClient`: authenticated JSON requests against an Icinga-style API
//! - Batch result checking (any failed entry fails the whole call)
//! - `HttpLogger`: response logging through `tracing` at a configured level

pub mod client;
pub mod config;
pub mod error;
pub mod http_log;
pub mod model;

pub use client::MonitorClient;
pub use config::MonitorConfig;
pub use error::{MonitorError, Result};
pub use http_log::HttpLogger;
pub use model::{ApiResponse, ApiResult};

pub use reqwest::Method;
