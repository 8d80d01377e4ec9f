//! Backend registry
//!
//! A static table of [`BackendSpec`]s looked up by model identifier or by
//! gateway identity. Lookups never fail: `None` means "pass the identifier
//! through unchanged".

mod builtin;
mod spec;


use std::sync::{Arc, LazyLock};

pub use spec::{BackendSpec, ParameterOverride, SpecKind};

static BUILTIN: LazyLock<Arc<BackendRegistry>> =
    LazyLock::new(|| Arc::new(BackendRegistry::new(builtin::builtin_specs())));

/// Read-only collection of backend specs
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    specs: Vec<BackendSpec>,
}

impl BackendRegistry {
    pub fn new(specs: Vec<BackendSpec>) -> Self {
        Self { specs }
    }

    /// The shared built-in registry
    pub fn builtin() -> Arc<BackendRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Built-in specs plus extra entries, appended after them
    pub fn builtin_with(extra: Vec<BackendSpec>) -> Self {
        let mut specs = builtin::builtin_specs();
        specs.extend(extra);
        Self::new(specs)
    }

    pub fn all_specs(&self) -> &[BackendSpec] {
        &self.specs
    }

    /// Case-insensitive lookup by config name
    pub fn find_spec_by_name(&self, name: &str) -> Option<&BackendSpec> {
        self.specs
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Most specific standard spec for a model identifier.
    ///
    /// An explicit `name/` or `prefix/` qualification wins; otherwise the
    /// longest keyword contained in the identifier; ties go to the earlier
    /// table entry. Gateways never match here.
    pub fn find_spec_by_model(&self, model: &str) -> Option<&BackendSpec> {
        let lower = model.to_lowercase();
        let standard = || self.specs.iter().filter(|s| !s.is_gateway());

        first_longest(standard().filter_map(|s| s.qualifier_match_len(&lower).map(|n| (n, s))))
            .or_else(|| {
                first_longest(
                    standard().filter_map(|s| s.keyword_match_len(&lower).map(|n| (n, s))),
                )
            })
    }

    /// Gateway or local deployment behind a backend entry.
    ///
    /// Checked in order: explicit name, credential prefix, base URL keyword.
    pub fn find_spec_by_gateway(
        &self,
        name: Option<&str>,
        credential: Option<&str>,
        base_url: Option<&str>,
    ) -> Option<&BackendSpec> {
        if let Some(spec) = name.and_then(|n| self.find_spec_by_name(n)) {
            if spec.is_gateway() {
                return Some(spec);
            }
        }

        let base_lower = base_url.map(str::to_lowercase);
        self.specs.iter().filter(|s| s.is_gateway()).find(|spec| {
            let by_key = matches!(
                (spec.detect_by_key_prefix, credential),
                (Some(prefix), Some(key)) if key.starts_with(prefix)
            );
            let by_base = matches!(
                (spec.detect_by_base_keyword, base_lower.as_deref()),
                (Some(keyword), Some(base)) if base.contains(keyword)
            );
            by_key || by_base
        })
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new(builtin::builtin_specs())
    }
}

fn first_longest<'a>(
    candidates: impl Iterator<Item = (usize, &'a BackendSpec)>,
) -> Option<&'a BackendSpec> {
    let mut best: Option<(usize, &BackendSpec)> = None;
    for (len, spec) in candidates {
        if best.is_none_or(|(best_len, _)| len > best_len) {
            best = Some((len, spec));
        }
    }
    best.map(|(_, spec)| spec)
}

/// [`BackendRegistry::find_spec_by_model`] on the built-in registry
pub fn find_spec_by_model(model: &str) -> Option<BackendSpec> {
    BUILTIN.find_spec_by_model(model).cloned()
}

/// [`BackendRegistry::find_spec_by_gateway`] on the built-in registry
pub fn find_spec_by_gateway(
    name: Option<&str>,
    credential: Option<&str>,
    base_url: Option<&str>,
) -> Option<BackendSpec> {
    BUILTIN
        .find_spec_by_gateway(name, credential, base_url)
        .cloned()
}
