//! File hosting services the relay forwards uploads to.
//!
//! Each host implements [`FileHost`]; the [`HostRegistry`] maps the
//! `service` form value onto the configured host.
//!
//! - [`catbox`] - anonymous or userhash-bound uploads to catbox.moe
//! - [`imgur`] - image uploads through the Imgur API (needs a client id)

pub mod catbox;
pub mod imgur;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::error::HostResult;

pub use catbox::CatboxHost;
pub use imgur::ImgurHost;

// =============================================================================
// Service
// =============================================================================

/// Upload destination named by the `service` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Catbox,
    Imgur,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Catbox, Service::Imgur];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Catbox => "catbox",
            Service::Imgur => "imgur",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Service::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown service '{}' (expected catbox or imgur)", wanted))
    }
}

// =============================================================================
// Upload payload
// =============================================================================

/// A file ready to be forwarded to a host.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Sanitized file name
    pub file_name: String,
    /// Valid MIME type
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Sanitize the name and settle the content type: the declared one if it
    /// parses, else a guess from the extension.
    pub fn new(file_name: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let file_name = sanitize_file_name(file_name);
        let content_type = content_type
            .filter(|ct| ct.parse::<mime_guess::mime::Mime>().is_ok())
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Reduce a client-supplied name to a safe base name.
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`; whitespace becomes `_` and
/// anything else (non-ASCII included) is dropped. Only the base name is kept,
/// with leading and trailing dots or underscores trimmed.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Host trait and registry
// =============================================================================

/// A service that stores a file and returns its public link.
#[async_trait]
pub trait FileHost: Send + Sync {
    fn service(&self) -> Service;

    async fn upload(&self, file: UploadFile) -> HostResult<String>;
}

/// Configured hosts, keyed by service.
#[derive(Clone, Default)]
pub struct HostRegistry {
    hosts: BTreeMap<Service, Arc<dyn FileHost>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catbox is always available; Imgur only with a client id.
    pub fn from_config(config: &Config) -> HostResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dropload/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut registry = Self::new()
            .with(Arc::new(CatboxHost::new(client.clone(), config.catbox_userhash.clone())));

        match &config.imgur_client_id {
            Some(client_id) => {
                registry = registry.with(Arc::new(ImgurHost::new(client, client_id.clone())));
            }
            None => tracing::warn!("IMGUR_CLIENT_ID not set, imgur uploads disabled"),
        }

        Ok(registry)
    }

    /// Add or replace the host for its service.
    pub fn with(mut self, host: Arc<dyn FileHost>) -> Self {
        self.hosts.insert(host.service(), host);
        self
    }

    pub fn get(&self, service: Service) -> Option<Arc<dyn FileHost>> {
        self.hosts.get(&service).cloned()
    }

    /// Available services, in a stable order.
    pub fn services(&self) -> Vec<Service> {
        self.hosts.keys().copied().collect()
    }
}
