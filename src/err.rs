//! # Error handling
//!
//! Two layers, matching the two kinds of caller:
//!
//! - The exported entry points (JNI and C ABI) never raise anything.  They hand the C library's
//!   status back verbatim and leave its `errno` for the caller to inspect.  The only failure we
//!   ever make up ourselves is [`rejected`], for a path that could not be turned into native text
//!   and so never reached the C library.  It still follows the C convention: `-1` plus `errno`.
//! - The Rust-facing [`ChangeDir`](crate::change_dir::ChangeDir) and
//!   [`ChdirConfig`](crate::config::ChdirConfig) return typed errors.

use crate::types::*;
use std::panic::Location;
use std::path::PathBuf;

#[cfg(unix)]
const EINVAL: c_int = libc::EINVAL;
#[cfg(windows)]
const EINVAL: c_int = 22;

#[cfg(any(target_os = "linux", target_os = "emscripten", target_os = "redox"))]
fn errno_location() -> *mut c_int {
    // SAFETY: always returns the calling thread's errno slot
    unsafe { libc::__errno_location() }
}

#[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
fn errno_location() -> *mut c_int {
    // SAFETY: always returns the calling thread's errno slot
    unsafe { libc::__errno() }
}

#[cfg(any(target_vendor = "apple", target_os = "freebsd", target_os = "dragonfly"))]
fn errno_location() -> *mut c_int {
    // SAFETY: always returns the calling thread's errno slot
    unsafe { libc::__error() }
}

#[cfg(windows)]
fn errno_location() -> *mut c_int {
    unsafe extern "C" {
        fn _errno() -> *mut c_int;
    }

    // SAFETY: always returns the calling thread's CRT errno slot
    unsafe { _errno() }
}

/// The calling thread's C library `errno`.
pub fn errno() -> c_int {
    // SAFETY: the slot is thread-local and valid for the thread's lifetime
    unsafe { *errno_location() }
}

pub fn set_errno(value: c_int) {
    // SAFETY: the slot is thread-local and valid for the thread's lifetime
    unsafe { *errno_location() = value };
}

/// Run `f`, then put `errno` back the way it was, so logging never clobbers the caller's view.
pub fn preserve_errno<R>(f: impl FnOnce() -> R) -> R {
    let saved = errno();
    let r = f();
    set_errno(saved);
    r
}

/// Status for a path which never reached the C library, e.g. a null pointer or a Java string the
/// JVM refused to hand over.  Sets `errno` to `EINVAL` like a C library rejecting its argument.
pub fn rejected() -> Status {
    set_errno(EINVAL);
    FAILURE
}

/// The `errno` left behind by a failed call, if the call set one.
///
/// Must run on the same thread as the call, before anything else can clobber `errno`.  Callers
/// clear `errno` beforehand so that backends which never touch it yield `None` rather than a
/// stale value.
pub fn status_error() -> Option<std::io::Error> {
    match errno() {
        0 => None,
        #[cfg(unix)]
        e => Some(std::io::Error::from_raw_os_error(e)),
        // CRT errno values are not Win32 error codes.
        #[cfg(windows)]
        e => Some(std::io::Error::other(format!("CRT errno {e}"))),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChangeDirError {
    #[error("cannot set working directory to non-existent path {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot set working directory to non-directory {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot use path {}: {source}", path.display())]
    Unusable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("native directory change to {} failed with status {status}", path.display())]
    Native {
        path: PathBuf,
        status: Status,
        source: Option<std::io::Error>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid log level `{0}`")]
    InvalidLogLevel(String),
    #[error("configuration was already initialized at {0}")]
    AlreadyInitialized(&'static Location<'static>),
    #[error("no home directory to hold the user configuration file")]
    NoHomeDir,
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed properties: {0}")]
    Properties(#[from] java_properties::PropertiesError),
    #[error("unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
