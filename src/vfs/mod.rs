//! SQLite VFS registry
//!
//! SQLite keeps its VFS list in process-global state. [`VfsRegistry`] puts that
//! list behind a trait so the registrar can be driven against a test double; the
//! host implementation is only available on a bound API.

pub mod registrar;

pub use registrar::{Registrar, SkyliteRegistrar};

use crate::error::{Result, SkyliteError};
use crate::ext::BoundApi;
use crate::validation::VfsName;
use libsqlite3_sys as ffi;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;
use tracing::debug;

/// Process-wide set of VFSes known to the database engine
pub trait VfsRegistry {
    /// Whether a VFS named `name` is registered
    fn contains(&self, name: &VfsName) -> bool;

    /// Register a VFS named `name` that delegates every method to `base`, or to
    /// the current default VFS when `base` is `None`
    ///
    /// The registration is permanent.
    fn install_alias(&self, name: &VfsName, base: Option<&VfsName>, make_default: bool)
        -> Result<()>;
}

fn c_name(name: &VfsName) -> Result<CString> {
    CString::new(name.as_str()).map_err(|e| SkyliteError::InvalidVfsName(e.to_string()))
}

impl VfsRegistry for BoundApi<'_> {
    fn contains(&self, name: &VfsName) -> bool {
        let Ok(name) = c_name(name) else {
            return false;
        };
        // SAFETY: bound API; name is a valid C string for the call
        !unsafe { ffi::sqlite3_vfs_find(name.as_ptr()) }.is_null()
    }

    fn install_alias(
        &self,
        name: &VfsName,
        base: Option<&VfsName>,
        make_default: bool,
    ) -> Result<()> {
        let base_name = base.map(c_name).transpose()?;
        // SAFETY: bound API; base_name outlives the call, null selects the default
        let base_ptr = unsafe {
            ffi::sqlite3_vfs_find(base_name.as_ref().map_or(ptr::null(), |n| n.as_ptr()))
        };
        if base_ptr.is_null() {
            return Err(SkyliteError::BaseVfsNotFound(
                base.map_or("<default>", |b| b.as_str()).to_string(),
            ));
        }

        // SQLite holds on to both the struct and its name for the life of the
        // process, so both are leaked unless registration fails
        let z_name: *mut c_char = c_name(name)?.into_raw();
        // SAFETY: non-null and registered, so it points to a live sqlite3_vfs
        let mut vfs = unsafe { ptr::read(base_ptr) };
        vfs.zName = z_name;
        vfs.pNext = ptr::null_mut();
        let vfs_ptr = Box::into_raw(Box::new(vfs));

        unsafe {
            let rc = ffi::sqlite3_vfs_register(vfs_ptr, make_default as c_int);
            if rc != ffi::SQLITE_OK {
                drop(Box::from_raw(vfs_ptr));
                drop(CString::from_raw(z_name));
                return Err(SkyliteError::VFSRegistrationFailed(rc));
            }
        }

        debug!(
            "Registered VFS '{}' over '{}' (default: {})",
            name,
            base.map_or("<default>", |b| b.as_str()),
            make_default
        );
        Ok(())
    }
}
