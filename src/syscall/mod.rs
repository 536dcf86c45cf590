//! Raw, per-platform system call wrappers.  Callers are expected to go through [`crate::os`].

mod chdir;

pub use chdir::*;
