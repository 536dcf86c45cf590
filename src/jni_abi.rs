//! JNI entry point backing `io.github.zebalu.badidea.chdir.native_impl.jni.JniChDir#chDir`.
//!
//! ```java
//! class JniChDir {
//!     native int chDir(String dir);
//! }
//! ```

use crate::types::*;
use jni::JNIEnv;
use jni::objects::{JObject, JString};
use jni::strings::JavaStr;
use jni::sys::jint;

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_github_zebalu_badidea_chdir_native_1impl_jni_JniChDir_chDir<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    dir: JString<'local>,
) -> jint {
    // `JavaStr` holds the GetStringUTFChars buffer and releases it when dropped, on every path.
    let status = match env.get_string(&dir) {
        Ok(native) => chdir_java(&native),
        Err(e) => {
            log::debug!("chDir: unable to read directory argument: {e}");
            crate::err::rejected()
        }
    };

    status as jint
}

/// Modified UTF-8 goes to `chdir` as-is, the same bytes a C caller of `GetStringUTFChars` passes.
#[cfg(unix)]
fn chdir_java(dir: &JavaStr) -> Status {
    // SAFETY: `get_raw` points at the NUL-terminated buffer owned by `dir`, which outlives `path`
    let path = unsafe { CStr::from_ptr(dir.get_raw()) };
    let status = crate::os::chdir(path);
    crate::err::preserve_errno(|| log::trace!("chDir({path:?}) = {status}"));
    status
}

/// Windows needs UTF-16, so decode the modified UTF-8 properly rather than reinterpret it.
#[cfg(windows)]
fn chdir_java(dir: &JavaStr) -> Status {
    let path = std::borrow::Cow::<str>::from(dir);
    let status = crate::os::chdir_path(std::path::Path::new(path.as_ref()));
    crate::err::preserve_errno(|| log::trace!("chDir({path:?}) = {status}"));
    status
}
