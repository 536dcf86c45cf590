//! Integration tests for the validated, serialized `ChangeDir`.

use jchdir_jni::change_dir::ChangeDir;
use jchdir_jni::config::ChdirConfig;
use jchdir_jni::err::{ChangeDirError, errno, rejected};
use jchdir_jni::native::{NativeChangeDir, NoNativeChangeDir, SyscallChangeDir};
use jchdir_jni::types::{FAILURE, Status};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_LOCK: Mutex<()> = Mutex::new(());

struct CwdGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    fn new() -> Self {
        let lock = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        Self {
            original: std::env::current_dir().expect("cwd should be readable"),
            _lock: lock,
        }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

fn scratch_dir(tag: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("jchdir-cd-{tag}-{}-{stamp}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    std::fs::canonicalize(&dir).expect("scratch dir should resolve")
}

fn cwd() -> PathBuf {
    std::env::current_dir().expect("cwd should be readable")
}

fn changer(fair: bool) -> ChangeDir {
    let config = ChdirConfig::default().with_fair_lock(fair);
    ChangeDir::new(&config, Box::new(SyscallChangeDir))
}

/// Records what it was asked to do, and fails.
struct Refusing(Arc<Mutex<Vec<PathBuf>>>);

impl NativeChangeDir for Refusing {
    fn change_dir(&self, dir: &Path) -> Status {
        self.0.lock().unwrap().push(dir.to_path_buf());
        rejected()
    }

    fn preference(&self) -> i32 {
        99
    }
}

#[test]
fn change_dir_moves_process_and_tracks_cwd() {
    let _guard = CwdGuard::new();
    let dir = scratch_dir("moves");
    let changer = changer(false);

    changer.change_dir(&dir).unwrap();
    assert_eq!(cwd(), dir);
    assert_eq!(changer.cwd(), Some(dir));
}

#[test]
fn starting_cwd_is_tracked() {
    let _guard = CwdGuard::new();
    assert_eq!(changer(false).cwd(), Some(cwd()));
}

#[test]
fn relative_target_is_made_absolute() {
    let _guard = CwdGuard::new();
    let parent = scratch_dir("relative");
    std::fs::create_dir(parent.join("child")).unwrap();
    let changer = changer(true);

    changer.change_dir(&parent).unwrap();
    changer.change_dir("child/./../child").unwrap();
    assert_eq!(changer.cwd(), Some(parent.join("child")));
    assert_eq!(cwd(), parent.join("child"));
}

#[test]
fn missing_target_is_not_found() {
    let _guard = CwdGuard::new();
    let missing = scratch_dir("missing").join("gone");
    let changer = changer(false);
    let before = changer.cwd();

    let err = changer.change_dir(&missing).unwrap_err();
    assert!(matches!(err, ChangeDirError::NotFound(p) if p == missing));
    assert_eq!(changer.cwd(), before);
}

#[test]
fn file_target_is_not_a_directory() {
    let _guard = CwdGuard::new();
    let file = scratch_dir("file").join("plain");
    std::fs::write(&file, b"x").unwrap();
    let changer = changer(false);
    let before = cwd();

    let err = changer.change_dir(&file).unwrap_err();
    assert!(matches!(err, ChangeDirError::NotADirectory(p) if p == file));
    assert_eq!(cwd(), before);
}

#[test]
fn native_failure_leaves_tracked_dir_alone() {
    let _guard = CwdGuard::new();
    let dir = scratch_dir("native");
    let calls = Arc::new(Mutex::new(Vec::new()));
    let changer = ChangeDir::new(
        &ChdirConfig::default(),
        Box::new(Refusing(Arc::clone(&calls))),
    );
    let before = changer.cwd();

    let err = changer.change_dir(&dir).unwrap_err();
    assert!(matches!(
        err,
        ChangeDirError::Native { ref path, status, .. } if *path == dir && status == rejected()
    ));
    assert_eq!(changer.cwd(), before);
    assert_eq!(cwd(), before.unwrap());
    assert_eq!(*calls.lock().unwrap(), vec![dir]);
    let ChangeDirError::Native { source, .. } = err else {
        unreachable!()
    };
    assert!(source.is_some(), "errno set by the backend is reported");
}

/// Fails without touching `errno`.
struct Silent;

impl NativeChangeDir for Silent {
    fn change_dir(&self, _dir: &Path) -> Status {
        5
    }

    fn preference(&self) -> i32 {
        99
    }
}

#[test]
fn native_failure_without_errno_has_no_source() {
    let _guard = CwdGuard::new();
    let dir = scratch_dir("silent");
    let changer = ChangeDir::new(&ChdirConfig::default(), Box::new(Silent));

    // Leave a stale errno behind from an unrelated failure.
    assert_eq!(rejected(), FAILURE);
    assert_ne!(errno(), 0);

    let err = changer.change_dir(&dir).unwrap_err();
    assert!(matches!(
        err,
        ChangeDirError::Native { status: 5, source: None, .. }
    ));
}

#[test]
fn invalid_target_never_reaches_backend() {
    let _guard = CwdGuard::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let changer = ChangeDir::new(
        &ChdirConfig::default(),
        Box::new(Refusing(Arc::clone(&calls))),
    );

    let _ = changer.change_dir(scratch_dir("invalid").join("missing"));
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn no_native_backend_always_fails() {
    let _guard = CwdGuard::new();
    let dir = scratch_dir("no-native");
    let changer = ChangeDir::new(&ChdirConfig::default(), Box::new(NoNativeChangeDir));

    assert!(matches!(
        changer.change_dir(&dir),
        Err(ChangeDirError::Native { .. })
    ));
}

#[test]
fn concurrent_changes_are_serialized() {
    let _guard = CwdGuard::new();
    let root = scratch_dir("concurrent");
    let targets: Vec<PathBuf> = (0..4)
        .map(|i| {
            let dir = root.join(format!("t{i}"));
            std::fs::create_dir(&dir).unwrap();
            dir
        })
        .collect();

    for fair in [false, true] {
        let changer = Arc::new(changer(fair));
        let handles: Vec<_> = targets
            .iter()
            .cloned()
            .map(|dir| {
                let changer = Arc::clone(&changer);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        changer.change_dir(&dir).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let tracked = changer.cwd().unwrap();
        assert!(targets.contains(&tracked));
        assert_eq!(cwd(), tracked);
    }
}

#[test]
fn process_wide_instance_uses_syscalls() {
    let _guard = CwdGuard::new();
    let dir = scratch_dir("instance");
    let changer = ChangeDir::instance();

    assert!(std::ptr::eq(changer, ChangeDir::instance()));
    changer.change_dir(&dir).unwrap();
    assert_eq!(cwd(), dir);
    assert_eq!(changer.cwd(), Some(dir));
}
