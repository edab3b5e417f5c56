//! supabase.rs — read-only access to the hosted `celulas` table.
//!
//! One query: every row of one table through the REST endpoint, authorised
//! by the public key alone. No pagination, no retries, no writes.

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{Error, Result},
    point::CelulaRow,
};

/// Anything that can hand the controller the raw `celulas` rows.
pub trait CelulaSource {
    fn fetch_rows(&self) -> Result<Vec<CelulaRow>>;
}

pub struct SupabaseClient {
    config: Config,
    agent:  ureq::Agent,
}

impl SupabaseClient {
    pub fn new(config: Config) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { config, agent }
    }

    /// `SELECT *` over one table, decoded as a JSON array of `T`.
    pub fn select_all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let url = self.config.rest_endpoint(table);
        let key = self.config.api_key();
        debug!(%url, "querying table");

        let resp = self
            .agent
            .get(&url)
            .set("apikey", key)
            .set("Authorization", &format!("Bearer {key}"))
            .set("Accept", "application/json")
            .set("Accept-Encoding", "identity")
            .call();

        let resp = match resp {
            Ok(r) => r,
            Err(ureq::Error::Status(code, r)) => {
                let body = r.into_string().unwrap_or_default();
                return Err(Error::Status { url, code, body });
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(Error::Http { url, source: Box::new(t) });
            }
        };

        let rows: Vec<T> = resp
            .into_json()
            .map_err(|source| Error::Json { url: url.clone(), source })?;
        info!(table, rows = rows.len(), "fetched rows");
        Ok(rows)
    }
}

impl CelulaSource for SupabaseClient {
    fn fetch_rows(&self) -> Result<Vec<CelulaRow>> {
        self.select_all(&self.config.table)
    }
}
