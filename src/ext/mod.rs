//! Extension loader shim
//!
//! The load sequence is a single transition, `Unloaded -> Loaded-Permanently`
//! or `Unloaded -> Load-Failed`:
//!
//! 1. bind the host's API routines ([`Handshake::bind`]); on failure stop here
//! 2. run the registrar once against the bound host
//! 3. report `SQLITE_OK_LOAD_PERMANENTLY`, or the error's status code

pub mod api;


pub use api::{BoundApi, CapabilityTable};

use crate::error::Result;
use crate::vfs::{Registrar, VfsRegistry};
use libsqlite3_sys as ffi;
use std::os::raw::c_int;
use tracing::{error, info, warn};

/// First step of an extension load: turning the host's capability table into
/// something that may call host APIs
pub trait Handshake {
    type Bound: BoundHost;

    fn bind(self) -> Result<Self::Bound>;
}

/// Host side available after a successful handshake
pub trait BoundHost: VfsRegistry {
    /// Leave `message` for the host to surface to whoever requested the load
    fn report(&self, message: &str);
}

/// Run the load sequence and return the status code for the host
///
/// The registrar runs exactly once per call, and never when the handshake
/// fails. Repeated calls register repeatedly.
pub fn initialize<H, R>(handshake: H, registrar: &R) -> c_int
where
    H: Handshake,
    R: Registrar + ?Sized,
{
    let host = match handshake.bind() {
        Ok(host) => host,
        Err(e) => {
            warn!("Extension handshake failed: {}", e);
            return e.status_code();
        }
    };

    match registrar.register(&host) {
        Ok(()) => {
            info!("Extension loaded permanently");
            ffi::SQLITE_OK_LOAD_PERMANENTLY
        }
        Err(e) => {
            error!("VFS registration failed: {}", e);
            host.report(&e.to_string());
            e.status_code()
        }
    }
}
