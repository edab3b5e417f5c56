//! config.rs — connection settings for the hosted table service.
//!
//! Both values are mandatory. Construction fails fast when either one is
//! missing, so nothing downstream ever holds a half-configured client.

use std::{env, time::Duration};

use url::Url;

use crate::error::{Error, Result};

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_ANON_KEY";

pub const DEFAULT_TABLE: &str = "celulas";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct Config {
    base_url: Url,
    api_key:  String,
    pub table:   String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let url = url.trim();
        let api_key = api_key.trim();
        if url.is_empty() {
            return Err(Error::MissingConfig(URL_VAR));
        }
        if api_key.is_empty() {
            return Err(Error::MissingConfig(KEY_VAR));
        }

        let base_url = Url::parse(url).map_err(|e| Error::InvalidUrl {
            url:    url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl {
                url:    url.to_string(),
                reason: format!("unsupported scheme {:?}", base_url.scheme()),
            });
        }

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            table:   DEFAULT_TABLE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Read both values from the process environment.
    pub fn from_env() -> Result<Self> {
        let url = env::var(URL_VAR).map_err(|_| Error::MissingConfig(URL_VAR))?;
        let key = env::var(KEY_VAR).map_err(|_| Error::MissingConfig(KEY_VAR))?;
        Self::new(&url, &key)
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// `{base}/rest/v1/{table}?select=*`
    pub fn rest_endpoint(&self, table: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/rest/v1/{table}?select=*")
    }
}
