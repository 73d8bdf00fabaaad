//! Host capability table
//!
//! SQLite hands a loadable extension a `sqlite3_api_routines` table and every
//! host API must be reached through it. [`CapabilityTable`] wraps the table as
//! received and exposes nothing; [`BoundApi`] only exists once the handshake has
//! succeeded, so no host call can be made before binding.

use super::{BoundHost, Handshake};
use crate::error::{Result, SkyliteError};
use libsqlite3_sys as ffi;
use std::marker::PhantomData;
use std::os::raw::c_char;
use std::ptr;
use tracing::{debug, warn};

/// Unbound capability table, borrowed from the host for the duration of the
/// entry-point call
pub struct CapabilityTable<'a> {
    api: *mut ffi::sqlite3_api_routines,
    err_msg: *mut *mut c_char,
    _host: PhantomData<&'a ffi::sqlite3_api_routines>,
}

impl<'a> CapabilityTable<'a> {
    /// Wrap the raw pointers handed to the entry point
    ///
    /// # Safety
    ///
    /// `api` must be null or point to a valid routine table, and `err_msg` must
    /// be null or point to writable storage for one pointer, both for `'a`.
    pub unsafe fn from_raw(api: *mut ffi::sqlite3_api_routines, err_msg: *mut *mut c_char) -> Self {
        Self {
            api,
            err_msg,
            _host: PhantomData,
        }
    }
}

impl<'a> Handshake for CapabilityTable<'a> {
    type Bound = BoundApi<'a>;

    fn bind(self) -> Result<BoundApi<'a>> {
        if self.api.is_null() {
            return Err(SkyliteError::NullApiPointer);
        }

        // SAFETY: non-null and valid for 'a per from_raw's contract
        unsafe { ffi::rusqlite_extension_init2(self.api) }
            .map_err(|e| SkyliteError::Handshake(format!("{:?}", e)))?;

        debug!("Extension API routines bound");
        Ok(BoundApi {
            err_msg: self.err_msg,
            _host: PhantomData,
        })
    }
}

/// Capability to call host APIs, produced by a successful handshake
pub struct BoundApi<'a> {
    err_msg: *mut *mut c_char,
    _host: PhantomData<&'a ffi::sqlite3_api_routines>,
}

impl BoundHost for BoundApi<'_> {
    fn report(&self, message: &str) {
        if self.err_msg.is_null() {
            return;
        }

        let bytes = message.as_bytes();
        // SAFETY: bound, so sqlite3_malloc64 routes to the host allocator; the
        // host frees the message with sqlite3_free
        unsafe {
            let buf = ffi::sqlite3_malloc64((bytes.len() + 1) as ffi::sqlite3_uint64) as *mut u8;
            if buf.is_null() {
                warn!("Could not allocate error message for host: {}", message);
                return;
            }
            ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len());
            *buf.add(bytes.len()) = 0;
            *self.err_msg = buf as *mut c_char;
        }
    }
}
