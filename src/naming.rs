use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::topology::TopologyKind;

pub const NAME_PATTERN: &str = "^[a-z0-9-]+$";

static NAME_REGEX: OnceLock<Regex> = OnceLock::new();

/// Whether `name` is lowercase alphanumerics and hyphens only. Shared by the
/// deriver and the prefix check in config.
pub fn is_valid_name(name: &str) -> bool {
    return NAME_REGEX
        .get_or_init(|| Regex::new(NAME_PATTERN).expect("NAME_PATTERN is a valid regex"))
        .is_match(name);
}

#[derive(thiserror::Error, Debug, PartialEq, Clone)]
pub enum ValidationError {
    #[error("'name' must be in format ^[a-z0-9-]+$")]
    InvalidName(String),

    #[error("'domainName' must form a valid hostname")]
    InvalidHostname(String),
}

/// How raw tenant input turns into a stack name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingScheme {
    /// `{prefix}-{name}`, name restricted to lowercase alphanumerics and hyphens.
    Name,
    /// `{prefix}.{domainName}` with dots turned into hyphens.
    Hostname,
}

impl NamingScheme {
    /// Key of the create request body field carrying the raw input.
    pub fn input_field(&self) -> &'static str {
        return match self {
            NamingScheme::Name => "name",
            NamingScheme::Hostname => "domainName",
        };
    }

    pub fn rejection(&self, value: String) -> ValidationError {
        return match self {
            NamingScheme::Name => ValidationError::InvalidName(value),
            NamingScheme::Hostname => ValidationError::InvalidHostname(value),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackIdentity(String);

impl StackIdentity {
    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for StackIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stack name plus the template parameter values, ordered as
/// [`TopologyKind::parameter_names`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedIdentity {
    pub stack: StackIdentity,
    pub topology: TopologyKind,
    pub bindings: Vec<String>,
}

impl DerivedIdentity {
    pub fn parameters(&self) -> Vec<(&'static str, &str)> {
        return self
            .topology
            .parameter_names()
            .iter()
            .copied()
            .zip(self.bindings.iter().map(String::as_str))
            .collect();
    }
}

pub struct NameDeriver {
    prefix: String,
    topology: TopologyKind,
    scheme: NamingScheme,
}

impl NameDeriver {
    pub fn new(prefix: &str, topology: TopologyKind, scheme: NamingScheme) -> Self {
        return Self {
            prefix: prefix.to_string(),
            topology,
            scheme,
        };
    }

    pub fn scheme(&self) -> NamingScheme {
        return self.scheme;
    }

    pub fn derive(&self, input: &str) -> Result<DerivedIdentity, ValidationError> {
        return match self.scheme {
            NamingScheme::Name => self.derive_from_name(input),
            NamingScheme::Hostname => self.derive_from_hostname(input),
        };
    }

    fn derive_from_name(&self, name: &str) -> Result<DerivedIdentity, ValidationError> {
        if !is_valid_name(name) {
            return Err(self.scheme.rejection(name.to_string()));
        }

        let stack = StackIdentity(format!("{}-{}", self.prefix, name));
        let bindings = match self.topology {
            TopologyKind::Single => vec![stack.0.clone()],
            TopologyKind::ProductionStaging => vec![
                format!("{}-production-{}", self.prefix, name),
                format!("{}-staging-{}", self.prefix, name),
            ],
        };

        return Ok(DerivedIdentity {
            stack,
            topology: self.topology,
            bindings,
        });
    }

    fn derive_from_hostname(&self, domain_name: &str) -> Result<DerivedIdentity, ValidationError> {
        let invalid = || ValidationError::InvalidHostname(domain_name.to_string());

        let url = Url::parse(&format!("https://{}.{}", self.prefix, domain_name))
            .map_err(|_| invalid())?;

        // Anything besides a bare host would let the input move the prefix
        // out of the hostname (userinfo) or hide part of it (port, path).
        if !url.username().is_empty()
            || url.password().is_some()
            || url.port().is_some()
            || url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
        {
            return Err(invalid());
        }

        let host_prefix = format!("{}.", self.prefix);
        let hostname = match url.host_str() {
            Some(host) if host.len() > host_prefix.len() && host.starts_with(&host_prefix) => {
                host.to_string()
            }
            _ => return Err(invalid()),
        };

        // CloudFormation stack names cannot contain dots.
        let stack = StackIdentity(hostname.replace('.', "-"));

        return Ok(DerivedIdentity {
            stack,
            topology: self.topology,
            bindings: vec![hostname],
        });
    }
}
