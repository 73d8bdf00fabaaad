//! # skylite - SQLite loadable extension registering the skylite VFS
//!
//! Build the crate as a `cdylib` and load it into any SQLite host:
//!
//! ```sql
//! SELECT load_extension('./libskylite');
//! ```
//!
//! SQLite derives the entry point `sqlite3_skylite_init` from the file name.
//! On load the extension:
//!
//! - binds the host's `sqlite3_api_routines` table (nothing else runs if this fails)
//! - registers a VFS, named `skylite` by default, over an existing host VFS
//! - asks the host to keep the library loaded for the life of the process
//!
//! Databases then select it with `?vfs=skylite` in a URI filename. See
//! [`config`] for the environment variables that control the registration.
//! A bad environment (an invalid `SKYLITE_VFS_NAME`, an unreadable
//! `SKYLITE_CONFIG` file) fails the load with `SQLITE_ERROR` and a message the
//! host reports to the caller.
//!
//! ## Embedding
//!
//! Anything implementing [`Registrar`], plain functions included, can be run
//! through [`initialize`] in place of the built-in [`SkyliteRegistrar`]:
//!
//! ```rust
//! use skylite::{Registrar, VfsRegistry};
//!
//! fn register_nothing(_: &dyn VfsRegistry) -> skylite::Result<()> {
//!     Ok(())
//! }
//!
//! let _: &dyn Registrar = &register_nothing;
//! ```

pub mod config;
pub mod error;
pub mod ext;
pub mod validation;
pub mod vfs;

pub use crate::{
    config::ExtensionConfig,
    error::{Result, SkyliteError},
    ext::{initialize, BoundApi, BoundHost, CapabilityTable, Handshake},
    validation::VfsName,
    vfs::{Registrar, SkyliteRegistrar, VfsRegistry},
};

use libsqlite3_sys as ffi;
use std::os::raw::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Name the VFS is registered under unless configured otherwise
pub const DEFAULT_VFS_NAME: &str = "skylite";

/// Entry point called by SQLite's extension loader
///
/// Returns `SQLITE_OK_LOAD_PERMANENTLY` on success. On failure returns the
/// error's status code and, once the API table is bound, leaves a message in
/// `pz_err_msg` for the host to free with `sqlite3_free`.
///
/// # Safety
///
/// Must only be called by SQLite (or something honouring the same contract):
/// `p_api` must be null or a valid routine table and `pz_err_msg` null or
/// writable, for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn sqlite3_skylite_init(
    _db: *mut ffi::sqlite3,
    pz_err_msg: *mut *mut c_char,
    p_api: *mut ffi::sqlite3_api_routines,
) -> c_int {
    let table = CapabilityTable::from_raw(p_api, pz_err_msg);
    let registrar = SkyliteRegistrar::from_env();

    // unwinding into the host's C frames is undefined behaviour
    match panic::catch_unwind(AssertUnwindSafe(|| initialize(table, &registrar))) {
        Ok(rc) => rc,
        Err(_) => {
            error!("Panic while loading the skylite extension");
            ffi::SQLITE_INTERNAL
        }
    }
}
