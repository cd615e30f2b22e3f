use std::time::Duration;

use crate::config::ProbeConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeProfile {
    pub name: &'static str,
    pub timeout: Duration,
    pub verify_tls: bool,
    pub headers: Vec<(String, String)>,
}

impl ProbeProfile {
    pub fn standard(config: &ProbeConfig) -> Self {
        Self {
            name: "standard",
            timeout: config.http_timeout(),
            verify_tls: config.verify_tls,
            headers: vec![
                ("User-Agent".into(), config.browser_user_agent.clone()),
                (
                    "Accept".into(),
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into(),
                ),
                ("Accept-Language".into(), config.accept_language.clone()),
                ("Accept-Encoding".into(), "gzip, deflate".into()),
                ("Connection".into(), "keep-alive".into()),
            ],
        }
    }

    pub fn lightweight(config: &ProbeConfig) -> Self {
        Self {
            name: "lightweight",
            timeout: config.secondary_timeout(),
            verify_tls: config.verify_tls,
            headers: vec![("User-Agent".into(), config.monitor_user_agent.clone())],
        }
    }

    pub fn fast_check(config: &ProbeConfig) -> Self {
        let short_agent = config
            .browser_user_agent
            .split(" (KHTML")
            .next()
            .unwrap_or(&config.browser_user_agent)
            .to_string();

        Self {
            name: "fast_check",
            timeout: config.fast_check_timeout(),
            verify_tls: config.verify_tls,
            headers: vec![
                ("User-Agent".into(), short_agent),
                ("Accept".into(), "text/html,application/xhtml+xml".into()),
            ],
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
