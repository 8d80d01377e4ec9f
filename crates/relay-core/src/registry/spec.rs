//! Declarative backend specification

use serde::Serialize;
use serde_json::{Map, Value};

/// How a spec participates in lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    /// Per-provider backend, matched by model identifier
    Standard,
    /// Routing layer in front of many models, matched by name, credential
    /// prefix or base URL
    Gateway,
    /// Self-hosted gateway (vLLM and friends)
    Local,
}

impl SpecKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Gateway => "gateway",
            Self::Local => "local",
        }
    }
}

/// Parameters merged into the outbound request for models whose lower-cased
/// identifier contains `pattern`. A `null` value drops the parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterOverride {
    pub pattern: &'static str,
    pub params: Map<String, Value>,
}

impl ParameterOverride {
    pub fn new(pattern: &'static str, params: Value) -> Self {
        Self {
            pattern,
            params: params.as_object().cloned().unwrap_or_default(),
        }
    }
}

/// Registry entry describing one kind of backend.
///
/// Adding a backend is a data change: build a spec and register it; no
/// orchestration code branches on provider identity.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSpec {
    /// Config name, e.g. "openrouter"
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: SpecKind,
    /// Substrings of a model identifier that select this spec
    pub keywords: &'static [&'static str],
    /// Environment variable the credential is published under
    pub credential_env_key: &'static str,
    /// Prefix prepended to wire identifiers, without the trailing `/`
    pub identifier_prefix: Option<&'static str>,
    /// Identifiers starting with any of these are already qualified
    pub skip_prefixes: &'static [&'static str],
    /// Auxiliary variables; values may contain `{api_key}` / `{api_base}`
    pub env_extras: &'static [(&'static str, &'static str)],
    pub detect_by_key_prefix: Option<&'static str>,
    pub detect_by_base_keyword: Option<&'static str>,
    pub default_base_url: Option<&'static str>,
    /// Gateway only: drop any `vendor/` qualification before prefixing
    pub strip_existing_prefix: bool,
    pub parameter_overrides: Vec<ParameterOverride>,
}

impl BackendSpec {
    fn base(
        name: &'static str,
        display_name: &'static str,
        kind: SpecKind,
        credential_env_key: &'static str,
    ) -> Self {
        Self {
            name,
            display_name,
            kind,
            keywords: &[],
            credential_env_key,
            identifier_prefix: None,
            skip_prefixes: &[],
            env_extras: &[],
            detect_by_key_prefix: None,
            detect_by_base_keyword: None,
            default_base_url: None,
            strip_existing_prefix: false,
            parameter_overrides: Vec::new(),
        }
    }

    pub fn standard(
        name: &'static str,
        display_name: &'static str,
        credential_env_key: &'static str,
    ) -> Self {
        Self::base(name, display_name, SpecKind::Standard, credential_env_key)
    }

    pub fn gateway(
        name: &'static str,
        display_name: &'static str,
        credential_env_key: &'static str,
    ) -> Self {
        Self::base(name, display_name, SpecKind::Gateway, credential_env_key)
    }

    pub fn local(
        name: &'static str,
        display_name: &'static str,
        credential_env_key: &'static str,
    ) -> Self {
        Self::base(name, display_name, SpecKind::Local, credential_env_key)
    }

    pub fn with_keywords(mut self, keywords: &'static [&'static str]) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.identifier_prefix = Some(prefix);
        self
    }

    pub fn with_skip_prefixes(mut self, prefixes: &'static [&'static str]) -> Self {
        self.skip_prefixes = prefixes;
        self
    }

    pub fn with_env_extras(mut self, extras: &'static [(&'static str, &'static str)]) -> Self {
        self.env_extras = extras;
        self
    }

    pub fn detect_key_prefix(mut self, prefix: &'static str) -> Self {
        self.detect_by_key_prefix = Some(prefix);
        self
    }

    pub fn detect_base_keyword(mut self, keyword: &'static str) -> Self {
        self.detect_by_base_keyword = Some(keyword);
        self
    }

    pub fn with_default_base_url(mut self, url: &'static str) -> Self {
        self.default_base_url = Some(url);
        self
    }

    pub fn strip_existing_prefix(mut self) -> Self {
        self.strip_existing_prefix = true;
        self
    }

    pub fn with_override(mut self, pattern: &'static str, params: Value) -> Self {
        self.parameter_overrides
            .push(ParameterOverride::new(pattern, params));
        self
    }

    /// Gateways and local deployments
    pub fn is_gateway(&self) -> bool {
        matches!(self.kind, SpecKind::Gateway | SpecKind::Local)
    }

    /// Overrides of the first pattern contained in the identifier
    pub fn overrides_for(&self, model: &str) -> Option<&Map<String, Value>> {
        let lower = model.to_lowercase();
        self.parameter_overrides
            .iter()
            .find(|o| lower.contains(o.pattern))
            .map(|o| &o.params)
    }

    /// Length of the explicit `name/` or `prefix/` qualification the
    /// lower-cased identifier starts with
    pub(super) fn qualifier_match_len(&self, lower_model: &str) -> Option<usize> {
        std::iter::once(self.name)
            .chain(self.identifier_prefix)
            .filter(|q| {
                lower_model.len() > q.len()
                    && lower_model.starts_with(q)
                    && lower_model.as_bytes()[q.len()] == b'/'
            })
            .map(|q| q.len() + 1)
            .max()
    }

    /// Length of the longest keyword contained in the lower-cased identifier
    pub(super) fn keyword_match_len(&self, lower_model: &str) -> Option<usize> {
        self.keywords
            .iter()
            .filter(|kw| lower_model.contains(*kw))
            .map(|kw| kw.len())
            .max()
    }

    /// Whether the identifier already carries one of the skip prefixes
    pub fn is_already_qualified(&self, model: &str) -> bool {
        self.skip_prefixes.iter().any(|p| model.starts_with(p))
    }

    /// Base URL a caller-supplied one falls back to
    pub fn effective_base_url<'a>(&'a self, base_url: Option<&'a str>) -> Option<&'a str> {
        base_url.filter(|u| !u.is_empty()).or(self.default_base_url)
    }

    /// Auxiliary entries with placeholders substituted. A missing base URL
    /// substitutes the empty string.
    pub fn resolve_env_extras(
        &self,
        credential: &str,
        base_url: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let base = self.effective_base_url(base_url).unwrap_or("");
        self.env_extras
            .iter()
            .map(|(name, template)| {
                let value = template
                    .replace("{api_key}", credential)
                    .replace("{api_base}", base);
                (*name, value)
            })
            .collect()
    }
}
