//! HTTP request handlers

mod files;
mod upload;

pub use files::{get_files, get_files_paginated};
pub use upload::{upload_image, MAX_UPLOAD_BYTES};
