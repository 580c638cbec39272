//! Picrelay Core - configuration and domain model
//!
//! This crate contains the pieces shared by the Graph client and the HTTP
//! server:
//!
//! - **Configuration**: environment-driven settings for the Microsoft
//!   tenant, the target drive and the HTTP listener, with validation
//! - **Domain model**: the records exchanged between the relay workflows
//!   and the API surface (upload results, file listings, pages)

pub mod config;
pub mod model;

pub use config::{Config, GraphConfig, ServerConfig, ValidationError};
pub use model::{FilePage, FileRecord, FolderReference, UploadResult};
