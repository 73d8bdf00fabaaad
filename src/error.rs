//! Error types for the skylite extension

use libsqlite3_sys as ffi;
use std::os::raw::c_int;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkyliteError {
    #[error("Extension API pointer is null")]
    NullApiPointer,

    #[error("Extension API handshake failed: {0}")]
    Handshake(String),

    #[error("Base VFS not found: {0}")]
    BaseVfsNotFound(String),

    #[error("VFS registration failed: {0}")]
    VFSRegistrationFailed(i32),

    #[error("Invalid VFS name: {0}")]
    InvalidVfsName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkyliteError {
    /// SQLite status code reported to the host for this error
    ///
    /// Codes that came from the host are passed through unchanged.
    pub fn status_code(&self) -> c_int {
        match self {
            SkyliteError::VFSRegistrationFailed(rc) => *rc,
            _ => ffi::SQLITE_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, SkyliteError>;
