//! Message sources and the language tables they are looked up in.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::issue::Issue;
use crate::schema::Reference;

type MessageFn = dyn Fn(&Issue) -> String + Send + Sync;

/// A message that is either fixed text or computed from the issue.
#[derive(Clone)]
pub enum MessageSource {
    Static(String),
    Factory(Arc<MessageFn>),
}

impl MessageSource {
    /// Wraps a closure that builds the message from the finished issue.
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Issue) -> String + Send + Sync + 'static,
    {
        MessageSource::Factory(Arc::new(f))
    }

    /// Builds a message that substitutes `{label}`, `{expected}` and
    /// `{received}` from the issue.
    pub fn template(text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.contains('{') {
            return MessageSource::Static(text);
        }
        MessageSource::factory(move |issue| {
            text.replace("{label}", issue.label)
                .replace("{expected}", issue.expected.as_deref().unwrap_or(""))
                .replace("{received}", &issue.received)
        })
    }

    /// Produces the final text for `issue`.
    pub fn render(&self, issue: &Issue) -> String {
        match self {
            MessageSource::Static(text) => text.clone(),
            MessageSource::Factory(f) => f(issue),
        }
    }
}

impl fmt::Debug for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSource::Static(text) => f.debug_tuple("Static").field(text).finish(),
            MessageSource::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<&str> for MessageSource {
    fn from(text: &str) -> Self {
        MessageSource::Static(text.to_string())
    }
}

impl From<String> for MessageSource {
    fn from(text: String) -> Self {
        MessageSource::Static(text)
    }
}

/// Candidate messages for one issue, highest priority first.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageChain<'a> {
    /// Passed by the node when it raised the issue.
    pub overrides: Option<&'a MessageSource>,
    /// Attached to the node when the schema was built.
    pub node: Option<&'a MessageSource>,
    /// Locale entry for this node's reference and language.
    pub specific: Option<&'a MessageSource>,
    /// Locale entry for schema-kind failures in this language.
    pub schema: Option<&'a MessageSource>,
    /// Fallback carried by the run's config.
    pub config: Option<&'a MessageSource>,
    /// Locale entry for any failure in this language.
    pub global: Option<&'a MessageSource>,
}

/// Picks the first available message in the chain and renders it.
///
/// Returns `None` when no source is set, in which case the caller keeps the
/// built-in default text.
pub fn resolve_message(chain: &MessageChain<'_>, issue: &Issue) -> Option<String> {
    chain
        .overrides
        .or(chain.node)
        .or(chain.specific)
        .or(chain.schema)
        .or(chain.config)
        .or(chain.global)
        .map(|source| source.render(issue))
}

type LangKey = Option<String>;

/// Immutable per-language message tables.
///
/// A `None` language entry applies when the run has no language set.
#[derive(Debug, Clone, Default)]
pub struct Locale {
    global: HashMap<LangKey, MessageSource>,
    schema: HashMap<LangKey, MessageSource>,
    specific: HashMap<(Reference, LangKey), MessageSource>,
}

impl Locale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global_message(
        mut self,
        lang: Option<&str>,
        message: impl Into<MessageSource>,
    ) -> Self {
        self.global.insert(lang.map(str::to_string), message.into());
        self
    }

    pub fn with_schema_message(
        mut self,
        lang: Option<&str>,
        message: impl Into<MessageSource>,
    ) -> Self {
        self.schema.insert(lang.map(str::to_string), message.into());
        self
    }

    pub fn with_specific_message(
        mut self,
        reference: Reference,
        lang: Option<&str>,
        message: impl Into<MessageSource>,
    ) -> Self {
        self.specific
            .insert((reference, lang.map(str::to_string)), message.into());
        self
    }

    pub fn global_message(&self, lang: Option<&str>) -> Option<&MessageSource> {
        self.global.get(&lang.map(str::to_string))
    }

    pub fn schema_message(&self, lang: Option<&str>) -> Option<&MessageSource> {
        self.schema.get(&lang.map(str::to_string))
    }

    pub fn specific_message(
        &self,
        reference: Reference,
        lang: Option<&str>,
    ) -> Option<&MessageSource> {
        self.specific.get(&(reference, lang.map(str::to_string)))
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.schema.is_empty() && self.specific.is_empty()
    }

    /// Loads message tables from a TOML file.
    ///
    /// ```toml
    /// [messages]
    /// "*" = "Invalid input"
    /// id = "Input tidak valid"
    ///
    /// [schema_messages]
    /// id = "Tipe tidak valid"
    ///
    /// [validator_messages.min_length]
    /// id = "Minimal {expected} karakter"
    /// ```
    ///
    /// The `"*"` language key applies when no language is set.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LocaleFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        file.into_locale()
    }

    /// Parses message tables from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: LocaleFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        file.into_locale()
    }
}

#[derive(Debug, Default, Deserialize)]
struct LocaleFile {
    #[serde(default)]
    messages: BTreeMap<String, String>,
    #[serde(default)]
    schema_messages: BTreeMap<String, String>,
    #[serde(default)]
    validator_messages: BTreeMap<String, BTreeMap<String, String>>,
}

impl LocaleFile {
    fn into_locale(self) -> Result<Locale, ConfigError> {
        let mut locale = Locale::new();
        for (lang, text) in self.messages {
            locale = locale.with_global_message(lang_key(&lang), MessageSource::template(text));
        }
        for (lang, text) in self.schema_messages {
            locale = locale.with_schema_message(lang_key(&lang), MessageSource::template(text));
        }
        for (name, table) in self.validator_messages {
            let reference = Reference::from_str(&name)?;
            if !reference.reports_issues() {
                return Err(ConfigError::UnknownReference(name));
            }
            for (lang, text) in table {
                locale = locale.with_specific_message(
                    reference,
                    lang_key(&lang),
                    MessageSource::template(text),
                );
            }
        }
        Ok(locale)
    }
}

fn lang_key(lang: &str) -> Option<&str> {
    if lang == "*" {
        None
    } else {
        Some(lang)
    }
}
