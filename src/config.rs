// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names and defaults for hosts that configure the guard
//! from the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SESSION_GUARD_STORAGE_KEY` | Storage key of the validation marker | `session-guard.validating` |
//! | `SESSION_GUARD_TRIGGER_AUTH_FLOW` | Redirect to sign-in when no user is found | `true` |
//! | `SESSION_GUARD_CALLBACK_ROUTE` | Path on which validation never runs | unset |
//! | `SESSION_GUARD_DATA_DIR` | Directory for the persistent marker database | unset (in-memory) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,session_guard=debug` |

use std::path::PathBuf;
use std::sync::Arc;

use crate::logging::LogFormat;
use crate::storage::marker::DEFAULT_STORAGE_KEY;
use crate::storage::{MemoryStorage, RedbStorage, SessionStorage, StorageResult};

/// Environment variable name for the marker storage key.
pub const STORAGE_KEY_ENV: &str = "SESSION_GUARD_STORAGE_KEY";

/// Environment variable name for the sign-in redirect switch.
pub const TRIGGER_AUTH_FLOW_ENV: &str = "SESSION_GUARD_TRIGGER_AUTH_FLOW";

/// Environment variable name for the sign-in callback route.
///
/// The provider redirects back to this path with the authorization response;
/// validating there would start a second sign-in before the first completes.
pub const CALLBACK_ROUTE_ENV: &str = "SESSION_GUARD_CALLBACK_ROUTE";

/// Environment variable name for the persistent storage directory.
pub const DATA_DIR_ENV: &str = "SESSION_GUARD_DATA_DIR";

/// Environment variable name for the log format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Guard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Storage key of the validation marker.
    pub storage_key: String,
    /// Redirect to sign-in when the provider has no usable user.
    pub trigger_auth_flow: bool,
    /// Path on which validation is skipped.
    pub callback_route: Option<String>,
    /// Directory for [`RedbStorage`]; `None` keeps the marker in memory.
    pub data_dir: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            trigger_auth_flow: true,
            callback_route: None,
            data_dir: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl GuardConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            storage_key: non_empty(STORAGE_KEY_ENV).unwrap_or(defaults.storage_key),
            trigger_auth_flow: non_empty(TRIGGER_AUTH_FLOW_ENV)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.trigger_auth_flow),
            callback_route: non_empty(CALLBACK_ROUTE_ENV),
            data_dir: non_empty(DATA_DIR_ENV).map(PathBuf::from),
            log_format: non_empty(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        }
    }

    /// Open the storage backend this configuration selects.
    pub fn open_storage(&self) -> StorageResult<Arc<dyn SessionStorage>> {
        match &self.data_dir {
            Some(dir) => Ok(Arc::new(RedbStorage::open_in_dir(dir)?)),
            None => Ok(Arc::new(MemoryStorage::new())),
        }
    }
}

/// Anything but an explicit "off" value enables the flag.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = GuardConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GuardConfig::default());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.trigger_auth_flow);
    }

    #[test]
    fn reads_all_variables() {
        let config = GuardConfig::from_lookup(lookup(&[
            (STORAGE_KEY_ENV, "app.validating"),
            (TRIGGER_AUTH_FLOW_ENV, "false"),
            (CALLBACK_ROUTE_ENV, "/callback"),
            (DATA_DIR_ENV, "/var/lib/app"),
            (LOG_FORMAT_ENV, "json"),
        ]));

        assert_eq!(config.storage_key, "app.validating");
        assert!(!config.trigger_auth_flow);
        assert_eq!(config.callback_route.as_deref(), Some("/callback"));
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/app")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = GuardConfig::from_lookup(lookup(&[
            (STORAGE_KEY_ENV, "  "),
            (CALLBACK_ROUTE_ENV, ""),
        ]));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.callback_route.is_none());
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("OFF"));
        assert!(!parse_flag(" 0 "));
    }

    #[test]
    fn open_storage_picks_backend() {
        let memory = GuardConfig::default().open_storage().unwrap();
        memory.set_item("k", "v").unwrap();
        assert_eq!(memory.get_item("k").unwrap().as_deref(), Some("v"));

        let dir = tempfile::TempDir::new().unwrap();
        let config = GuardConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..GuardConfig::default()
        };
        let persistent = config.open_storage().unwrap();
        persistent.set_item("k", "v").unwrap();
        assert!(dir.path().join(crate::storage::redb_store::DATABASE_FILE).exists());
    }
}
