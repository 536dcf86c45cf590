//! Native backends the [`ChangeDir`](crate::change_dir::ChangeDir) can drive.

use crate::types::*;
use std::path::Path;

pub trait NativeChangeDir: Send + Sync {
    /// Change the process's working directory to `dir`, returning the native status.
    fn change_dir(&self, dir: &Path) -> Status;

    /// Higher wins when [`select`] picks between available backends.
    ///
    /// - 0: no native support
    /// - 1: direct system call
    fn preference(&self) -> i32;
}

/// Calls the operating system directly.
pub struct SyscallChangeDir;

impl NativeChangeDir for SyscallChangeDir {
    fn change_dir(&self, dir: &Path) -> Status {
        crate::os::chdir_path(dir)
    }

    fn preference(&self) -> i32 {
        1
    }
}

/// Stand-in when nothing better is available.  Every change fails.
pub struct NoNativeChangeDir;

impl NativeChangeDir for NoNativeChangeDir {
    fn change_dir(&self, _dir: &Path) -> Status {
        crate::err::rejected()
    }

    fn preference(&self) -> i32 {
        0
    }
}

/// Pick the highest-preference backend.  On ties the earliest candidate wins.
pub fn select(candidates: Vec<Box<dyn NativeChangeDir>>) -> Box<dyn NativeChangeDir> {
    let mut best: Option<Box<dyn NativeChangeDir>> = None;
    for candidate in candidates {
        if best
            .as_ref()
            .is_none_or(|b| candidate.preference() > b.preference())
        {
            best = Some(candidate);
        }
    }
    best.unwrap_or_else(|| Box::new(NoNativeChangeDir))
}

/// Every backend this build knows about.
pub fn available() -> Vec<Box<dyn NativeChangeDir>> {
    vec![Box::new(SyscallChangeDir)]
}
