//! C-level types shared across the system call wrappers and the exported entry points.

#[allow(non_camel_case_types)]
pub type c_int = core::ffi::c_int;

#[allow(non_camel_case_types)]
pub type c_char = core::ffi::c_char;

pub type CStr = core::ffi::CStr;

/// Raw result of a directory change, exactly as the C library reported it.
///
/// Zero is success.  Failure is `-1`, with the reason in the calling thread's `errno`.
pub type Status = c_int;

pub const SUCCESS: Status = 0;
pub const FAILURE: Status = -1;
