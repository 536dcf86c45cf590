//! Change the process's current working directory from the JVM.
//!
//! The JVM has no way to move the whole process to another directory.  This library exports
//! `JniChDir.chDir` (see [`jni_abi`]) and a plain C entry point (see [`c_abi`]) which hand the
//! path to the operating system's `chdir` and return its status untouched.
//!
//! Rust callers can use [`change_directory`] for the same thin call, or
//! [`ChangeDir`](change_dir::ChangeDir) for validated, serialized changes.

pub mod c_abi;
pub mod change_dir;
pub mod config;
pub mod err;
pub mod jni_abi;
pub mod lock;
pub mod native;
pub mod os;
pub mod syscall;
pub mod types;

pub use os::chdir as change_directory;
