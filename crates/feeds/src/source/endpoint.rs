//! Endpoint configuration and URL templating.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::FetchError;
use crate::models::LookupKey;

/// How credentials are attached to a request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndpointAuth {
    /// No credentials.
    #[default]
    None,
    /// Key sent in a named header (e.g. `x-apisports-key`).
    Header {
        name: String,
        #[serde(default)]
        key: Option<String>,
    },
    /// `Authorization: Bearer <key>`.
    Bearer {
        #[serde(default)]
        key: Option<String>,
    },
    /// Key sent as a query parameter (e.g. `?apikey=`).
    Query {
        param: String,
        #[serde(default)]
        key: Option<String>,
    },
}

impl EndpointAuth {
    /// Fill in the key, keeping the configured delivery mode.
    ///
    /// Has no effect on [`EndpointAuth::None`].
    pub fn with_key(self, api_key: impl Into<String>) -> Self {
        let api_key = Some(api_key.into());
        match self {
            Self::None => Self::None,
            Self::Header { name, .. } => Self::Header { name, key: api_key },
            Self::Bearer { .. } => Self::Bearer { key: api_key },
            Self::Query { param, .. } => Self::Query {
                param,
                key: api_key,
            },
        }
    }

    /// Whether a mode other than `None` is configured without a key.
    pub fn is_missing_key(&self) -> bool {
        match self {
            Self::None => false,
            Self::Header { key, .. } | Self::Bearer { key } | Self::Query { key, .. } => {
                key.as_deref().map_or(true, str::is_empty)
            }
        }
    }
}

impl fmt::Debug for EndpointAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| if key.is_some() { "<redacted>" } else { "<unset>" };
        match self {
            Self::None => write!(f, "None"),
            Self::Header { name, key } => write!(f, "Header({name}: {})", redact(key)),
            Self::Bearer { key } => write!(f, "Bearer({})", redact(key)),
            Self::Query { param, key } => write!(f, "Query({param}={})", redact(key)),
        }
    }
}

/// A single HTTP JSON endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Name used in logs and diagnostics (e.g. "primary", "proxy").
    pub name: String,

    /// URL template; `{param}` placeholders are filled from the lookup key.
    pub url: String,

    #[serde(default)]
    pub auth: EndpointAuth,

    /// Extra static headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl EndpointConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            auth: EndpointAuth::None,
            headers: BTreeMap::new(),
        }
    }

    /// Render the URL for `key`.
    pub fn render_url(&self, key: &LookupKey) -> Result<String, FetchError> {
        render_template(&self.url, key).map_err(|placeholder| FetchError::UnresolvedTemplate {
            endpoint: self.name.clone(),
            placeholder,
        })
    }
}

/// Placeholder names referenced by a template, in order of appearance.
pub fn template_placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                names.push(after[..close].to_string());
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

/// Substitute `{param}` placeholders with URL-encoded values from `key`.
///
/// Returns the name of the first placeholder the key cannot fill.
fn render_template(template: &str, key: &LookupKey) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            // Unbalanced brace: keep the remainder verbatim.
            out.push_str(&rest[open..]);
            return Ok(out);
        };
        let name = &after[..close];
        let value = key.param(name).ok_or_else(|| name.to_string())?;
        out.push_str(&urlencoding::encode(&value));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
