//! Server configuration read from the environment at startup.

use spotlight_query::{FilesystemEngine, MdfindEngine, MetadataEngine};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::tools::{ScopePolicy, ToolRouter};

pub const ENGINE_ENV: &str = "SPOTLIGHT_MCP_ENGINE";
pub const STRICT_SCOPE_ENV: &str = "SPOTLIGHT_MCP_STRICT_SCOPE";
pub const ALLOWED_ROOTS_ENV: &str = "SPOTLIGHT_MCP_ALLOWED_ROOTS";
pub const TEXT_CONTENT_MAX_BYTES_ENV: &str = "SPOTLIGHT_MCP_TEXT_CONTENT_MAX_BYTES";

/// Metadata engine backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Spotlight via `mdfind`/`mdls` (macOS)
    Mdfind,
    /// Directory walk with synthesized attributes
    Filesystem,
}

impl EngineKind {
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mdfind
        } else {
            Self::Filesystem
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mdfind" | "spotlight" => Some(Self::Mdfind),
            "filesystem" | "fs" => Some(Self::Filesystem),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mdfind => "mdfind",
            Self::Filesystem => "filesystem",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub engine: EngineKind,
    pub scope_policy: ScopePolicy,
    pub allowed_roots: Vec<PathBuf>,
    pub text_content_max_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::platform_default(),
            scope_policy: ScopePolicy::default(),
            allowed_roots: Vec::new(),
            text_content_max_bytes: FilesystemEngine::DEFAULT_TEXT_CONTENT_MAX_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Invalid values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read(ENGINE_ENV) {
            match EngineKind::parse(&value) {
                Some(engine) => config.engine = engine,
                None => log::warn!(
                    "Unknown {ENGINE_ENV} '{value}', using {}",
                    config.engine.as_str()
                ),
            }
        }

        if let Some(value) = read(STRICT_SCOPE_ENV) {
            match parse_flag(&value) {
                Some(true) => config.scope_policy = ScopePolicy::Strict,
                Some(false) => config.scope_policy = ScopePolicy::Lenient,
                None => log::warn!("Ignoring {STRICT_SCOPE_ENV}='{value}' (expected 1/0/true/false)"),
            }
        }

        if let Some(value) = read(ALLOWED_ROOTS_ENV) {
            config.allowed_roots = parse_roots(&value);
        }

        if let Some(value) = read(TEXT_CONTENT_MAX_BYTES_ENV) {
            match value.parse::<u64>() {
                Ok(max) => config.text_content_max_bytes = max,
                Err(_) => log::warn!(
                    "Ignoring {TEXT_CONTENT_MAX_BYTES_ENV}='{value}' (expected a byte count)"
                ),
            }
        }

        config
    }

    pub fn build_engine(&self) -> Arc<dyn MetadataEngine> {
        match self.engine {
            EngineKind::Mdfind => Arc::new(MdfindEngine::new()),
            EngineKind::Filesystem => Arc::new(
                FilesystemEngine::new().with_text_content_max_bytes(self.text_content_max_bytes),
            ),
        }
    }

    pub fn build_router(&self) -> ToolRouter {
        ToolRouter::new(self.build_engine())
            .with_scope_policy(self.scope_policy)
            .with_allowed_roots(self.allowed_roots.clone())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    if value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("no")
    {
        Some(false)
    } else {
        None
    }
}

/// `:`-separated absolute directories; relative entries are dropped with a warning
pub fn parse_roots(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let path = Path::new(entry);
            if path.is_absolute() {
                Some(path.to_path_buf())
            } else {
                log::warn!("Ignoring relative allowed root '{entry}'");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ENV_MUTEX;
    use std::collections::HashMap;

    struct EnvGuard {
        saved: Vec<(String, Option<std::ffi::OsString>)>,
    }

    impl EnvGuard {
        fn new(keys: &[&str]) -> Self {
            let saved = keys
                .iter()
                .map(|&key| {
                    let value = env::var_os(key);
                    env::remove_var(key);
                    (key.to_string(), value)
                })
                .collect();
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..) {
                match value {
                    Some(v) => env::set_var(&key, v),
                    None => env::remove_var(&key),
                }
            }
        }
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.scope_policy, ScopePolicy::Lenient);
        assert_eq!(config.text_content_max_bytes, 4 * 1024 * 1024);
    }

    #[test]
    fn reads_every_setting() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENGINE_ENV, "FileSystem"),
            (STRICT_SCOPE_ENV, "true"),
            (ALLOWED_ROOTS_ENV, "/Users/me/Documents: relative :/tmp"),
            (TEXT_CONTENT_MAX_BYTES_ENV, "1024"),
        ]));
        assert_eq!(config.engine, EngineKind::Filesystem);
        assert_eq!(config.scope_policy, ScopePolicy::Strict);
        assert_eq!(
            config.allowed_roots,
            vec![PathBuf::from("/Users/me/Documents"), PathBuf::from("/tmp")]
        );
        assert_eq!(config.text_content_max_bytes, 1024);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENGINE_ENV, "everything"),
            (STRICT_SCOPE_ENV, "maybe"),
            (TEXT_CONTENT_MAX_BYTES_ENV, "lots"),
        ]));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn from_env_reads_process_environment() {
        let _lock = ENV_MUTEX.lock().expect("ENV_MUTEX");
        let _guard = EnvGuard::new(&[
            ENGINE_ENV,
            STRICT_SCOPE_ENV,
            ALLOWED_ROOTS_ENV,
            TEXT_CONTENT_MAX_BYTES_ENV,
        ]);

        env::set_var(ENGINE_ENV, "filesystem");
        env::set_var(STRICT_SCOPE_ENV, "1");
        let config = ServerConfig::from_env();
        assert_eq!(config.engine, EngineKind::Filesystem);
        assert_eq!(config.scope_policy, ScopePolicy::Strict);
        assert!(config.allowed_roots.is_empty());
    }
}
