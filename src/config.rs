//! # Configuration
//!
//! Two settings:
//!
//! - `logLevel`: the level [`ChangeDir`](crate::change_dir::ChangeDir) reports failures at.
//!   Default `DEBUG`.
//! - `fairLock`: whether concurrent directory changes are served in arrival order.  Default
//!   `false`.
//!
//! Sources, weakest first:
//!
//! 1. built-in defaults
//! 2. the user file, `~/.jchdir.rc`
//! 3. environment variables `JCHDIR_LOGLEVEL` and `JCHDIR_FAIRLOCK`
//! 4. an override closure handed to [`ChdirConfig::init_with`]
//!
//! The configuration is process-wide and can only be initialized once.

use crate::err::ConfigError;
use log::LevelFilter;
use java_properties::PropertiesWriter;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::panic::Location;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const CONFIG_FILE_NAME: &str = ".jchdir.rc";

pub const PROPS_LOG_LEVEL: &str = "logLevel";
pub const PROPS_FAIR_LOCK: &str = "fairLock";

pub const ENV_LOG_LEVEL: &str = "JCHDIR_LOGLEVEL";
pub const ENV_FAIR_LOCK: &str = "JCHDIR_FAIRLOCK";

const DEFAULT_LOG_LEVEL: &str = "DEBUG";
const DEFAULT_FAIR_LOCK: &str = "false";

static INSTANCE: OnceLock<(ChdirConfig, &'static Location<'static>)> = OnceLock::new();

/// Flat `key=value` settings, in the `java.util.Properties` file format.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn defaults() -> Self {
        let mut props = Self::default();
        props.set(PROPS_LOG_LEVEL, DEFAULT_LOG_LEVEL);
        props.set(PROPS_FAIR_LOCK, DEFAULT_FAIR_LOCK);
        props
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Parse a properties file.  ISO-8859-1 with `\uXXXX` escapes, like `Properties.load`.
    pub fn read(input: impl Read) -> Result<Self, ConfigError> {
        Ok(Self(java_properties::read(input)?.into_iter().collect()))
    }

    /// Overlay every entry of `other` on top of these.
    pub fn extend(&mut self, other: Properties) {
        self.0.extend(other.0);
    }

    /// Write as a properties file, headed by `comment`.  Keys are written in sorted order.
    pub fn write(&self, output: impl Write, comment: &str) -> Result<(), ConfigError> {
        let mut writer = PropertiesWriter::new(output);
        writer.write_comment(comment)?;
        for (key, value) in &self.0 {
            writer.write(key, value)?;
        }
        writer.finish()?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChdirConfig {
    log_level: LevelFilter,
    fair_lock: bool,
}

impl Default for ChdirConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Debug,
            fair_lock: false,
        }
    }
}

impl ChdirConfig {
    /// The process-wide configuration, loading it on first use.
    ///
    /// An invalid merged configuration is logged and replaced by the defaults.
    #[track_caller]
    pub fn instance() -> &'static ChdirConfig {
        let caller = Location::caller();
        let (config, _) = INSTANCE.get_or_init(|| {
            let config = Self::from_properties(&Self::merged_properties()).unwrap_or_else(|e| {
                log::warn!("jchdir: {e}, using default configuration");
                Self::default()
            });
            (config, caller)
        });
        config
    }

    /// Initialize the process-wide configuration, letting `f` adjust the merged properties first.
    ///
    /// Fails if the configuration was already initialized, by this or by [`Self::instance`].
    #[track_caller]
    pub fn init_with(
        f: impl FnOnce(&mut Properties),
    ) -> Result<&'static ChdirConfig, ConfigError> {
        let caller = Location::caller();
        if let Some((_, first)) = INSTANCE.get() {
            return Err(ConfigError::AlreadyInitialized(*first));
        }

        let mut props = Self::merged_properties();
        f(&mut props);
        let config = Self::from_properties(&props)?;

        // Another thread may have won the race since the check above.
        INSTANCE.set((config, caller)).map_err(|_| {
            ConfigError::AlreadyInitialized(Self::initialized_at().unwrap_or(caller))
        })?;
        Ok(Self::instance())
    }

    /// Where the process-wide configuration was initialized, if it has been.
    pub fn initialized_at() -> Option<&'static Location<'static>> {
        INSTANCE.get().map(|(_, at)| *at)
    }

    pub fn from_properties(props: &Properties) -> Result<Self, ConfigError> {
        let log_level = props.get(PROPS_LOG_LEVEL).unwrap_or(DEFAULT_LOG_LEVEL);
        let fair_lock = props.get(PROPS_FAIR_LOCK).unwrap_or(DEFAULT_FAIR_LOCK);
        Ok(Self {
            log_level: parse_log_level(log_level)?,
            fair_lock: fair_lock.eq_ignore_ascii_case("true"),
        })
    }

    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::default();
        props.set(PROPS_LOG_LEVEL, log_level_name(self.log_level));
        props.set(PROPS_FAIR_LOCK, if self.fair_lock { "true" } else { "false" });
        props
    }

    /// Defaults, overlaid by the user file and then the environment.
    ///
    /// A user file that cannot be read or parsed is logged and skipped.
    pub fn merged_properties() -> Properties {
        let user_file = Self::config_file().and_then(|path| {
            if !path.exists() {
                return None;
            }
            File::open(&path)
                .map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })
                .and_then(Properties::read)
                .inspect_err(|e| log::info!("jchdir: skipping config file: {e}"))
                .ok()
        });
        merge(user_file, |key| std::env::var(key).ok())
    }

    /// `~/.jchdir.rc`, if a home directory can be determined.
    pub fn config_file() -> Option<PathBuf> {
        #[cfg(windows)]
        let home = std::env::var_os("USERPROFILE");
        #[cfg(not(windows))]
        let home = std::env::var_os("HOME");

        home.filter(|h| !h.is_empty())
            .map(|h| PathBuf::from(h).join(CONFIG_FILE_NAME))
    }

    /// Write these settings to the user file, replacing it.
    #[track_caller]
    pub fn save_as_user_settings(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_file().ok_or(ConfigError::NoHomeDir)?;
        let comment = format!("saved from {}", Location::caller());
        let mut out = Vec::new();
        self.to_properties().write(&mut out, &comment)?;
        std::fs::write(&path, out).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn fair_lock(&self) -> bool {
        self.fair_lock
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_fair_lock(mut self, fair_lock: bool) -> Self {
        self.fair_lock = fair_lock;
        self
    }
}

/// Layer the user file and environment over the defaults.
fn merge(user_file: Option<Properties>, env: impl Fn(&str) -> Option<String>) -> Properties {
    let mut props = Properties::defaults();
    if let Some(file) = user_file {
        props.extend(file);
    }
    for (env_key, props_key) in [
        (ENV_LOG_LEVEL, PROPS_LOG_LEVEL),
        (ENV_FAIR_LOCK, PROPS_FAIR_LOCK),
    ] {
        if let Some(value) = env(env_key) {
            props.set(props_key, value);
        }
    }
    props
}

/// Accepts the `java.lang.System.Logger.Level` names as well as `WARN`.  Surrounding whitespace
/// is not ignored.
pub fn parse_log_level(s: &str) -> Result<LevelFilter, ConfigError> {
    match s.to_ascii_uppercase().as_str() {
        "ALL" | "TRACE" => Ok(LevelFilter::Trace),
        "DEBUG" => Ok(LevelFilter::Debug),
        "INFO" => Ok(LevelFilter::Info),
        "WARNING" | "WARN" => Ok(LevelFilter::Warn),
        "ERROR" => Ok(LevelFilter::Error),
        "OFF" => Ok(LevelFilter::Off),
        _ => Err(ConfigError::InvalidLogLevel(s.to_owned())),
    }
}

fn log_level_name(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Trace => "TRACE",
        LevelFilter::Debug => "DEBUG",
        LevelFilter::Info => "INFO",
        LevelFilter::Warn => "WARNING",
        LevelFilter::Error => "ERROR",
        LevelFilter::Off => "OFF",
    }
}
