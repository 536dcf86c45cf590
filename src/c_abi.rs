//! C ABI entry point for bindings which do not go through JNI.
//!
//! ```c
//! int jchdir_chdir(const char *path);
//! ```

use crate::types::*;

/// Same contract as the C library's `chdir`: its status, unchanged, with `errno` as it left it.
///
/// A null `path` never reaches the C library and yields [`crate::err::rejected`].
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string that stays valid for the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jchdir_chdir(path: *const c_char) -> c_int {
    if path.is_null() {
        return crate::err::rejected();
    }

    // SAFETY: non-null and NUL-terminated per this function's contract
    let path = unsafe { CStr::from_ptr(path) };
    let status = crate::os::chdir(path);
    crate::err::preserve_errno(|| log::trace!("jchdir_chdir({path:?}) = {status}"));
    status
}
