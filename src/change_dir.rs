//! Serialized, validated working directory changes.
//!
//! [`crate::os::chdir`] hands whatever it is given to the operating system.  [`ChangeDir`] sits on
//! top for Rust callers that want more: it resolves the target to an absolute canonical
//! directory, rejects anything that is not one, serializes concurrent changes and remembers where
//! it last moved the process.

use crate::config::ChdirConfig;
use crate::err::*;
use crate::lock::Lock;
use crate::native::{self, NativeChangeDir};
use crate::types::*;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static INSTANCE: OnceLock<ChangeDir> = OnceLock::new();

pub struct ChangeDir {
    /// Last directory this changer moved the process to.  Absent if the starting directory
    /// could not be read.
    dir: Lock<Option<PathBuf>>,
    log_level: LevelFilter,
    native: Box<dyn NativeChangeDir>,
}

impl ChangeDir {
    /// The process-wide changer, configured from [`ChdirConfig::instance`] and backed by the
    /// highest-preference native backend.
    pub fn instance() -> &'static ChangeDir {
        INSTANCE.get_or_init(|| {
            Self::new(
                ChdirConfig::instance(),
                native::select(native::available()),
            )
        })
    }

    pub fn new(config: &ChdirConfig, native: Box<dyn NativeChangeDir>) -> Self {
        let dir = std::env::current_dir()
            .inspect_err(|e| log::warn!("jchdir: unable to read working directory: {e}"))
            .ok();
        Self {
            dir: Lock::new(dir, config.fair_lock()),
            log_level: config.log_level(),
            native,
        }
    }

    /// Make `dir` the process's working directory.
    ///
    /// Relative paths resolve against the process's current working directory.  On failure the
    /// working directory and [`Self::cwd`] are unchanged.
    pub fn change_dir(&self, dir: impl AsRef<Path>) -> Result<(), ChangeDirError> {
        let dir = dir.as_ref();
        self.dir.with(|current| {
            let target = absolute_dir(dir)?;

            set_errno(0);
            let status = self.native.change_dir(&target);
            if status != SUCCESS {
                return Err(ChangeDirError::Native {
                    source: status_error(),
                    path: target,
                    status,
                });
            }

            *current = Some(target);
            Ok(())
        })
        .inspect_err(|e| self.log(format_args!("{e}")))
    }

    /// The directory this changer last moved the process to, or the starting directory.
    pub fn cwd(&self) -> Option<PathBuf> {
        self.dir.with(|current| current.clone())
    }

    pub fn is_fair(&self) -> bool {
        self.dir.is_fair()
    }

    fn log(&self, args: std::fmt::Arguments) {
        if let Some(level) = self.log_level.to_level() {
            log::log!(level, "jchdir: {args}");
        }
    }
}

/// Resolve `dir` to an absolute, canonical, existing directory.
fn absolute_dir(dir: &Path) -> Result<PathBuf, ChangeDirError> {
    let canonical = match std::fs::canonicalize(dir) {
        Ok(path) => path,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ChangeDirError::NotFound(dir.to_path_buf()));
        }
        Err(source) => {
            return Err(ChangeDirError::Unusable {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    if !canonical.is_dir() {
        return Err(ChangeDirError::NotADirectory(canonical));
    }
    Ok(canonical)
}
