//! Named, toggleable interceptor features and their registry.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::{CompoundInterceptor, InterceptorType, MutationInterceptor};
use crate::core::{Error, Result};

/// A capability an interceptor factory provides, switchable by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Upper-case feature name, e.g. `FRETEQUIV`.
    pub name: &'static str,
    /// Whether the feature is active without an explicit setting.
    pub on_by_default: bool,
    pub description: &'static str,
}

impl Feature {
    /// A feature that is off by default and undescribed.
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            on_by_default: false,
            description: "",
        }
    }

    pub const fn with_on_by_default(mut self, on: bool) -> Self {
        self.on_by_default = on;
        self
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Whether `name` refers to this feature.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Builds fresh interceptors for a feature.
///
/// A new interceptor is created for every class, so interceptors never leak
/// state between classes or threads.
pub trait InterceptorFactory: Send + Sync {
    /// Human-readable description of the interceptors this creates.
    fn description(&self) -> &'static str;

    /// The feature under which the interceptor is switched on and off.
    fn provides(&self) -> Feature;

    /// Declared type of the interceptors this creates.
    fn interceptor_type(&self) -> InterceptorType {
        InterceptorType::Filter
    }

    /// Create a new interceptor.
    fn create_interceptor(&self) -> Box<dyn MutationInterceptor>;
}

/// One `+NAME` / `-NAME` toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSetting {
    pub name: String,
    pub enabled: bool,
}

impl FeatureSetting {
    pub fn enable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
        }
    }

    pub fn disable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: false,
        }
    }

    /// Parse a list of settings, skipping blank entries.
    pub fn parse_all<S: AsRef<str>>(settings: &[S]) -> Result<Vec<Self>> {
        settings
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for FeatureSetting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (enabled, name) = match s.chars().next() {
            Some('+') => (true, &s[1..]),
            Some('-') => (false, &s[1..]),
            _ => (true, s),
        };
        let name = name.trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::config(format!("invalid feature setting: {s:?}")));
        }
        Ok(if enabled {
            Self::enable(name)
        } else {
            Self::disable(name)
        })
    }
}

impl fmt::Display for FeatureSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.enabled { '+' } else { '-' };
        write!(f, "{sign}{}", self.name)
    }
}

/// A registered feature as seen under some settings.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureStatus {
    #[serde(flatten)]
    pub feature: Feature,
    /// Description of the providing factory.
    pub factory: &'static str,
    pub interceptor_type: InterceptorType,
    /// Whether the feature is active under the settings.
    pub enabled: bool,
}

/// Registry of all available interceptor factories.
pub struct FeatureRegistry {
    factories: Vec<Box<dyn InterceptorFactory>>,
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Register a factory.
    pub fn register(&mut self, factory: Box<dyn InterceptorFactory>) {
        self.factories.push(factory);
    }

    /// Every registered factory paired with whether `settings` enable it.
    ///
    /// Later settings win over earlier ones. Naming a feature nobody
    /// provides is an error.
    pub fn resolve(
        &self,
        settings: &[FeatureSetting],
    ) -> Result<Vec<(&dyn InterceptorFactory, bool)>> {
        for setting in settings {
            if !self
                .factories
                .iter()
                .any(|f| f.provides().matches(&setting.name))
            {
                return Err(Error::UnknownFeature(setting.name.clone()));
            }
        }

        Ok(self
            .factories
            .iter()
            .map(|factory| {
                let feature = factory.provides();
                let enabled = settings
                    .iter()
                    .rev()
                    .find(|s| feature.matches(&s.name))
                    .map_or(feature.on_by_default, |s| s.enabled);
                (factory.as_ref(), enabled)
            })
            .collect())
    }

    /// Factories enabled under `settings`.
    pub fn enabled(&self, settings: &[FeatureSetting]) -> Result<Vec<&dyn InterceptorFactory>> {
        Ok(self
            .resolve(settings)?
            .into_iter()
            .filter_map(|(factory, enabled)| {
                if !enabled && factory.provides().on_by_default {
                    tracing::debug!("feature {} disabled by configuration", factory.provides().name);
                }
                enabled.then_some(factory)
            })
            .collect())
    }

    /// Every registered feature and whether `settings` leave it enabled.
    pub fn describe(&self, settings: &[FeatureSetting]) -> Result<Vec<FeatureStatus>> {
        Ok(self
            .resolve(settings)?
            .into_iter()
            .map(|(factory, enabled)| FeatureStatus {
                feature: factory.provides(),
                factory: factory.description(),
                interceptor_type: factory.interceptor_type(),
                enabled,
            })
            .collect())
    }

    /// A fresh interceptor chain holding every enabled feature's interceptor.
    pub fn build_chain(&self, settings: &[FeatureSetting]) -> Result<CompoundInterceptor> {
        let children = self
            .enabled(settings)?
            .into_iter()
            .map(|factory| factory.create_interceptor())
            .collect();
        Ok(CompoundInterceptor::named("chain", children))
    }
}
