//! Safe wrappers around [`crate::syscall`].

mod chdir;

pub use chdir::*;
