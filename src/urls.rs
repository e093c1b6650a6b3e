//! Named URL registry: reversal and resolution.
//!
//! [`UrlRegistry`] is built from the `urls` settings block. Each route is
//! addressed by its qualified name (`namespace:name`) and expands to
//! `prefix + path`, where `:param` segments are filled from arguments.
//!
//! - [`UrlRegistry::reverse`] returns `Result<String, NoReverseMatch>`.
//! - [`UrlRegistry::safe_url`] is the template-facing variant: it returns an
//!   empty string on any failure so a missing app never breaks rendering.
//! - [`UrlRegistry::resolve`] maps a request path back to a
//!   [`ResolverMatch`] using specificity scoring: literal segments beat
//!   parameter segments, and the highest score wins.

use std::collections::{BTreeMap, HashMap};

use crate::config::model::UrlNamespace;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoReverseMatch {
    #[error("'{0}' is not a registered namespace")]
    UnknownNamespace(String),

    #[error("reverse for '{0}' not found")]
    UnknownRoute(String),

    #[error("reverse for '{name}' expects {expected} arguments, got {got}")]
    ArgumentCount {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("reverse for '{name}' with keyword arguments {got:?} does not match parameters {expected:?}")]
    KeywordMismatch {
        name: String,
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("reverse for '{0}' cannot mix positional and keyword arguments")]
    MixedArguments(String),

    #[error("argument {value:?} for '{name}' is not a valid path segment")]
    InvalidArgument { name: String, value: String },
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct UrlPattern {
    namespace: String,
    name: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl UrlPattern {
    fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(p) => Some(p.as_str()),
            Segment::Literal(_) => None,
        })
    }

    fn param_count(&self) -> usize {
        self.params().count()
    }

    fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }

    fn expand(&self, mut value_for: impl FnMut(&str) -> String) -> String {
        let mut path = String::from("/");
        let mut first = true;
        for segment in &self.segments {
            if !first {
                path.push('/');
            }
            first = false;
            match segment {
                Segment::Literal(lit) => path.push_str(lit),
                Segment::Param(p) => path.push_str(&urlencoding::encode(&value_for(p))),
            }
        }
        if self.trailing_slash && !self.segments.is_empty() {
            path.push('/');
        }
        path
    }
}

/// A resolved request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverMatch {
    pub app_name: String,
    pub url_name: String,
    pub kwargs: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct UrlRegistry {
    patterns: Vec<UrlPattern>,
    by_name: HashMap<String, usize>,
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl UrlRegistry {
    #[must_use]
    pub fn from_settings(namespaces: &[UrlNamespace]) -> Self {
        let mut registry = Self::default();
        for ns in namespaces {
            for route in &ns.routes {
                let full = format!("{}{}", ns.prefix, route.path);
                let segments = split_segments(&full)
                    .into_iter()
                    .map(|s| {
                        s.strip_prefix(':').map_or_else(
                            || Segment::Literal(s.to_string()),
                            |p| Segment::Param(p.to_string()),
                        )
                    })
                    .collect();
                let pattern = UrlPattern {
                    namespace: ns.namespace.clone(),
                    name: route.name.clone(),
                    segments,
                    trailing_slash: full.ends_with('/'),
                };
                registry
                    .by_name
                    .insert(pattern.qualified_name(), registry.patterns.len());
                registry.patterns.push(pattern);
            }
        }
        registry
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.patterns.iter().any(|p| p.namespace == namespace)
    }

    /// Reverse a qualified route name into a path.
    ///
    /// Positional `args` fill parameters in order; `kwargs` fill them by
    /// name. Supplying both is an error, as is any count or name mismatch.
    pub fn reverse(
        &self,
        name: &str,
        args: &[&str],
        kwargs: &[(&str, &str)],
    ) -> Result<String, NoReverseMatch> {
        let Some(&idx) = self.by_name.get(name) else {
            if let Some((ns, _)) = name.split_once(':') {
                if !self.has_namespace(ns) {
                    return Err(NoReverseMatch::UnknownNamespace(ns.to_string()));
                }
            }
            return Err(NoReverseMatch::UnknownRoute(name.to_string()));
        };
        let pattern = &self.patterns[idx];

        if !args.is_empty() && !kwargs.is_empty() {
            return Err(NoReverseMatch::MixedArguments(name.to_string()));
        }

        for value in args.iter().copied().chain(kwargs.iter().map(|(_, v)| *v)) {
            if value.is_empty() || value.contains('/') {
                return Err(NoReverseMatch::InvalidArgument {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if kwargs.is_empty() {
            if args.len() != pattern.param_count() {
                return Err(NoReverseMatch::ArgumentCount {
                    name: name.to_string(),
                    expected: pattern.param_count(),
                    got: args.len(),
                });
            }
            let mut values = args.iter();
            return Ok(pattern.expand(|_| values.next().map(|v| (*v).to_string()).unwrap_or_default()));
        }

        let given: BTreeMap<&str, &str> = kwargs.iter().copied().collect();
        let mut expected: Vec<String> = pattern.params().map(String::from).collect();
        expected.sort();
        let got: Vec<String> = given.keys().map(|k| (*k).to_string()).collect();
        if expected != got {
            return Err(NoReverseMatch::KeywordMismatch {
                name: name.to_string(),
                expected,
                got,
            });
        }
        Ok(pattern.expand(|p| given.get(p).map(|v| (*v).to_string()).unwrap_or_default()))
    }

    /// Reverse, or the empty string when the route cannot be reversed.
    #[must_use]
    pub fn safe_url(&self, name: &str, args: &[&str], kwargs: &[(&str, &str)]) -> String {
        self.reverse(name, args, kwargs).unwrap_or_else(|e| {
            tracing::debug!(url_name = %name, error = %e, "safe_url fell back to empty string");
            String::new()
        })
    }

    /// Find the most specific route matching `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<ResolverMatch> {
        let request_segments = split_segments(path);
        let request_trailing = path.ends_with('/') && !request_segments.is_empty();

        let mut best: Option<(usize, HashMap<String, String>)> = None;
        let mut best_specificity: i64 = -1;

        for (idx, pattern) in self.patterns.iter().enumerate() {
            if pattern.segments.len() != request_segments.len() {
                continue;
            }
            if !pattern.segments.is_empty() && pattern.trailing_slash != request_trailing {
                continue;
            }

            let mut kwargs = HashMap::new();
            let mut specificity: i64 = 0;
            let mut matched = true;

            for (segment, actual) in pattern.segments.iter().zip(request_segments.iter()) {
                match segment {
                    Segment::Param(p) => {
                        let decoded = urlencoding::decode(actual)
                            .map_or_else(|_| (*actual).to_string(), |d| d.into_owned());
                        kwargs.insert(p.clone(), decoded);
                        specificity += 5;
                    }
                    Segment::Literal(lit) if lit == actual => specificity += 10,
                    Segment::Literal(_) => {
                        matched = false;
                        break;
                    }
                }
            }

            if matched && specificity > best_specificity {
                best = Some((idx, kwargs));
                best_specificity = specificity;
            }
        }

        best.map(|(idx, kwargs)| {
            let pattern = &self.patterns[idx];
            ResolverMatch {
                app_name: pattern.namespace.clone(),
                url_name: pattern.name.clone(),
                kwargs,
            }
        })
    }
}
