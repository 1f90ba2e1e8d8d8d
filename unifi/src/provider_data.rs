//! Provider data structure passed to resources and data sources

use crate::api::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct UnifiProviderData {
    pub client: Arc<Client>,
    /// Site used when a resource does not name one
    pub site: String,
}

impl UnifiProviderData {
    pub fn new(client: Client, site: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            site: site.into(),
        }
    }

    /// The resource's own site if it has a non-empty one, else the provider's
    pub fn site_or_default<'a>(&'a self, site: Option<&'a str>) -> &'a str {
        match site {
            Some(site) if !site.is_empty() => site,
            _ => &self.site,
        }
    }
}
