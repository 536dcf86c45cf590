use crate::types::*;

// `man 3p chdir`:
//
// SYNOPSIS
//        int chdir(const char *path);
//
// DESCRIPTION
//        The chdir() function shall cause the directory named by the pathname
//        pointed to by the path argument to become the current working directory.
//
// RETURN VALUE
//        Upon successful completion, 0 shall be returned. Otherwise, -1 shall be
//        returned, the current working directory shall remain unchanged, and
//        errno shall be set to indicate the error.
#[cfg(unix)]
pub unsafe fn chdir(path: &CStr) -> c_int {
    unsafe { libc::chdir(path.as_ptr()) }
}

// `_wchdir` (corecrt_wdirect.h):
//
// SYNOPSIS
//        int _wchdir(const wchar_t *dirname);
//
// RETURN VALUE
//        These functions return a value of 0 if successful. A return value of -1
//        indicates failure, and errno is set to ENOENT.
//
// `path` must be NUL-terminated UTF-16.
#[cfg(windows)]
pub unsafe fn chdir(path: &[u16]) -> c_int {
    unsafe extern "C" {
        fn _wchdir(dirname: *const u16) -> c_int;
    }

    debug_assert_eq!(path.last(), Some(&0));
    unsafe { _wchdir(path.as_ptr()) }
}
