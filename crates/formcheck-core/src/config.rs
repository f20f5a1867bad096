//! Run-scoped configuration.
//!
//! A [`Config`] is assembled once per `validate` call from explicit
//! [`ConfigOverrides`] layered over the process default. The process default
//! is empty unless [`install_global_config`] was called at startup.

use std::sync::{Arc, OnceLock};

use crate::error::ConfigError;
use crate::message::{Locale, MessageSource};

/// Configuration threaded through one validation run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Language used to pick locale messages.
    pub lang: Option<String>,
    /// Fallback message used before the locale's global message.
    pub message: Option<MessageSource>,
    /// Stop iterating object fields at the first issue.
    pub abort_early: bool,
    /// Stop iterating pipe steps at the first issue.
    pub abort_pipe_early: bool,
    /// Message tables for this run.
    pub locale: Arc<Locale>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a run config from overrides and the installed global config.
    ///
    /// `message` is never inherited from the global config; it only applies
    /// when passed explicitly.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        let global = global_config();
        Self {
            lang: overrides
                .lang
                .or_else(|| global.and_then(|g| g.lang.clone())),
            message: overrides.message,
            abort_early: overrides
                .abort_early
                .or_else(|| global.map(|g| g.abort_early))
                .unwrap_or(false),
            abort_pipe_early: overrides
                .abort_pipe_early
                .or_else(|| global.map(|g| g.abort_pipe_early))
                .unwrap_or(false),
            locale: overrides
                .locale
                .or_else(|| global.map(|g| Arc::clone(&g.locale)))
                .unwrap_or_default(),
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_abort_early(mut self, abort_early: bool) -> Self {
        self.abort_early = abort_early;
        self
    }

    pub fn with_abort_pipe_early(mut self, abort_pipe_early: bool) -> Self {
        self.abort_pipe_early = abort_pipe_early;
        self
    }
}

/// Partial configuration supplied by a caller; unset fields fall back to the
/// global config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub lang: Option<String>,
    pub message: Option<MessageSource>,
    pub abort_early: Option<bool>,
    pub abort_pipe_early: Option<bool>,
    pub locale: Option<Arc<Locale>>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn message(mut self, message: impl Into<MessageSource>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn abort_early(mut self, abort_early: bool) -> Self {
        self.abort_early = Some(abort_early);
        self
    }

    pub fn abort_pipe_early(mut self, abort_pipe_early: bool) -> Self {
        self.abort_pipe_early = Some(abort_pipe_early);
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(Arc::new(locale));
        self
    }
}

/// Process-wide defaults, installed once at startup.
#[derive(Debug, Clone, Default)]
pub struct GlobalConfig {
    pub lang: Option<String>,
    pub abort_early: bool,
    pub abort_pipe_early: bool,
    pub locale: Arc<Locale>,
}

static GLOBAL_CONFIG: OnceLock<GlobalConfig> = OnceLock::new();

/// Installs the process-wide defaults.
///
/// Fails if defaults were already installed; the first installation wins.
pub fn install_global_config(config: GlobalConfig) -> Result<(), ConfigError> {
    GLOBAL_CONFIG
        .set(config)
        .map_err(|_| ConfigError::GlobalAlreadyInstalled)?;
    tracing::debug!("installed global validation config");
    Ok(())
}

/// Returns the installed process-wide defaults, if any.
pub fn global_config() -> Option<&'static GlobalConfig> {
    GLOBAL_CONFIG.get()
}
