//! # Generator Options
//!
//! Caller-supplied configuration and the ordered override chains that decide
//! the direction view, the application package and the application class.

use crate::contract::{Info, EXT_JAVA_CLASS, EXT_JAVA_PACKAGE, EXT_VIEW};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Package used when neither the contract nor the caller names one.
pub const DEFAULT_PACKAGE: &str = "com.company";
/// Application class used when neither the contract nor the caller names one.
pub const DEFAULT_APPLICATION_CLASS: &str = "Application";
/// Binder used when the caller does not select one.
pub const DEFAULT_BINDER: &str = "kafka";

/// Which side of a publish/subscribe pair produces messages.
///
/// `Client`: the application does what the contract's clients do, so `publish`
/// operations are produced and `subscribe` operations are consumed.
/// `Provider`: the inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    /// Default view.
    #[default]
    Client,
    /// Inverted view.
    Provider,
}

impl View {
    /// True when `publish` is the producing side in this view.
    pub fn publish_is_producer(self) -> bool {
        matches!(self, View::Client)
    }
}

impl FromStr for View {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(View::Client),
            "provider" => Ok(View::Provider),
            other => Err(AppError::General(format!(
                "Unknown view '{}': expected client or provider",
                other
            ))),
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Client => write!(f, "client"),
            View::Provider => write!(f, "provider"),
        }
    }
}

/// The supported protocol binders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Binder {
    /// Apache Kafka.
    Kafka,
    /// RabbitMQ.
    Rabbit,
    /// Solace PubSub+, the only binder with durable-queue bindings.
    Solace,
}

impl FromStr for Binder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kafka" => Ok(Binder::Kafka),
            "rabbit" => Ok(Binder::Rabbit),
            "solace" => Ok(Binder::Solace),
            _ => Err(AppError::UnsupportedBinder(s.to_string())),
        }
    }
}

impl Display for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binder::Kafka => write!(f, "kafka"),
            Binder::Rabbit => write!(f, "rabbit"),
            Binder::Solace => write!(f, "solace"),
        }
    }
}

fn default_binder() -> String {
    DEFAULT_BINDER.to_string()
}

/// Caller-supplied generation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Protocol binder name, validated by [`GeneratorOptions::binder`].
    #[serde(default = "default_binder")]
    pub binder: String,
    /// Direction view, consulted after the contract's own `x-view`.
    #[serde(default)]
    pub view: Option<View>,
    /// Package, consulted after the contract's `x-java-package`.
    #[serde(default)]
    pub java_package: Option<String>,
    /// Application class, consulted after the contract's `x-java-class`.
    #[serde(default)]
    pub application_class: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            binder: default_binder(),
            view: None,
            java_package: None,
            application_class: None,
        }
    }
}

impl GeneratorOptions {
    /// Parses an options file.
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        serde_yaml::from_str(text).map_err(|e| AppError::Parse(format!("Invalid options: {}", e)))
    }

    /// Validates the binder selection.
    pub fn binder(&self) -> AppResult<Binder> {
        self.binder.parse()
    }

    /// View: `info.x-view`, then the caller's option, then [`View::Client`].
    ///
    /// An unparseable `x-view` is ignored with a warning.
    pub fn resolve_view(&self, info: &Info) -> View {
        let from_contract = info.extension(EXT_VIEW).and_then(|raw| match raw.parse() {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!(value = raw, "Ignoring {}: {}", EXT_VIEW, e);
                None
            }
        });
        OverrideChain::new()
            .source("contract", from_contract)
            .source("options", self.view)
            .resolve_or(View::default())
    }

    /// Package: `info.x-java-package`, then the caller's option, then [`DEFAULT_PACKAGE`].
    pub fn resolve_package(&self, info: &Info) -> String {
        OverrideChain::new()
            .source("contract", non_blank(info.extension(EXT_JAVA_PACKAGE)))
            .source("options", non_blank(self.java_package.as_deref()))
            .resolve_or(DEFAULT_PACKAGE)
            .to_string()
    }

    /// Application class: `info.x-java-class`, then the caller's option, then
    /// [`DEFAULT_APPLICATION_CLASS`].
    pub fn resolve_application_class(&self, info: &Info) -> String {
        OverrideChain::new()
            .source("contract", non_blank(info.extension(EXT_JAVA_CLASS)))
            .source("options", non_blank(self.application_class.as_deref()))
            .resolve_or(DEFAULT_APPLICATION_CLASS)
            .to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Ordered list of optional sources, evaluated top to bottom.
#[derive(Debug, Clone)]
pub struct OverrideChain<T> {
    sources: Vec<(&'static str, Option<T>)>,
}

impl<T> Default for OverrideChain<T> {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
        }
    }
}

impl<T> OverrideChain<T> {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a labelled source with lower precedence than the ones before it.
    pub fn source(mut self, label: &'static str, value: Option<T>) -> Self {
        self.sources.push((label, value));
        self
    }

    /// First present value with the label of its source.
    pub fn resolve(self) -> Option<(&'static str, T)> {
        self.sources
            .into_iter()
            .find_map(|(label, value)| value.map(|v| (label, v)))
    }

    /// First present value, else `fallback`.
    pub fn resolve_or(self, fallback: T) -> T {
        match self.resolve() {
            Some((label, value)) => {
                tracing::trace!(source = label, "override resolved");
                value
            }
            None => fallback,
        }
    }
}
