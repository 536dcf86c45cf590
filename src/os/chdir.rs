use crate::types::*;
use std::path::Path;

/// Make `path` the process's current working directory.
///
/// `path` goes to the C library's `chdir` exactly once, unvalidated, and its status and `errno`
/// are left exactly as the C library set them.
#[cfg(unix)]
#[inline]
pub fn chdir(path: &CStr) -> Status {
    // SAFETY: `path` is NUL-terminated and outlives the call
    unsafe { crate::syscall::chdir(path) }
}

/// Make `path` the process's current working directory.
///
/// Windows wants UTF-16, so the bytes are decoded as UTF-8 first.  Anything that does not decode
/// never reaches the CRT and yields [`rejected`](crate::err::rejected).
#[cfg(windows)]
pub fn chdir(path: &CStr) -> Status {
    match path.to_str() {
        Ok(path) => chdir_path(Path::new(path)),
        Err(_) => crate::err::rejected(),
    }
}

/// [`chdir`] for a Rust path.  The native copy is dropped as soon as the call returns.
///
/// A path with an interior NUL cannot be expressed natively and yields
/// [`rejected`](crate::err::rejected).
#[cfg(unix)]
pub fn chdir_path(path: &Path) -> Status {
    use std::os::unix::ffi::OsStrExt;

    match std::ffi::CString::new(path.as_os_str().as_bytes()) {
        Ok(native) => chdir(&native),
        Err(_) => crate::err::rejected(),
    }
}

/// [`chdir`] for a Rust path.  The native copy is dropped as soon as the call returns.
///
/// A path with an interior NUL cannot be expressed natively and yields
/// [`rejected`](crate::err::rejected).
#[cfg(windows)]
pub fn chdir_path(path: &Path) -> Status {
    use std::os::windows::ffi::OsStrExt;

    let native: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();
    if native[..native.len() - 1].contains(&0) {
        return crate::err::rejected();
    }

    // SAFETY: `native` is NUL-terminated and outlives the call
    unsafe { crate::syscall::chdir(&native) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chdir_path_rejects_interior_nul() {
        #[cfg(unix)]
        let path = {
            use std::os::unix::ffi::OsStrExt;
            Path::new(std::ffi::OsStr::from_bytes(b"/tmp\0/evil"))
        };
        #[cfg(windows)]
        let path = Path::new("C:\\tmp\0\\evil");

        assert_eq!(chdir_path(path), crate::err::rejected());
    }
}
