use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, trace};
use vigil_types::{ProbeOutcome, VigilError, VigilResult};

use super::classify::{classify_error, error_detail};
use super::profile::ProbeProfile;

const MAX_REDIRECTS: usize = 10;

#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str, profile: &ProbeProfile) -> ProbeOutcome;
}

#[derive(Clone)]
pub struct ProbeClient {
    verifying: Client,
    insecure: Client,
}

impl ProbeClient {
    pub fn new() -> VigilResult<Self> {
        Ok(Self {
            verifying: Self::build(true)?,
            insecure: Self::build(false)?,
        })
    }

    fn build(verify_tls: bool) -> VigilResult<Client> {
        Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| VigilError::Network(format!("Failed to build probe client: {}", e)))
    }

    fn client_for(&self, profile: &ProbeProfile) -> &Client {
        if profile.verify_tls {
            &self.verifying
        } else {
            &self.insecure
        }
    }
}

#[async_trait]
impl Prober for ProbeClient {
    async fn probe(&self, url: &str, profile: &ProbeProfile) -> ProbeOutcome {
        let mut request = self.client_for(profile).get(url).timeout(profile.timeout);
        for (name, value) in &profile.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        trace!("Probe [{}] GET {}", profile.name, url);
        let started = Instant::now();

        match request.send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                let elapsed = started.elapsed();
                debug!(
                    "Probe [{}] {} -> {} in {:.2}s",
                    profile.name,
                    url,
                    code,
                    elapsed.as_secs_f64()
                );
                ProbeOutcome::responded(code, elapsed)
            }
            Err(e) => {
                let status = classify_error(&e);
                debug!("Probe [{}] {} failed: {} ({})", profile.name, url, status, e);
                ProbeOutcome::failed(status, error_detail(&e))
            }
        }
    }
}
