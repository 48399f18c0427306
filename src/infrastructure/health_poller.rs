//! Polls the health endpoints of dependent services

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::{HealthSettings, HealthTargetSettings};
use crate::domain::DomainError;

/// Last known state of a polled service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceStatus {
    /// No result yet
    #[default]
    Checking,
    Online,
    Offline,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking..."),
            Self::Online => write!(f, "Online"),
            Self::Offline => write!(f, "Offline"),
        }
    }
}

/// A named endpoint to poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthTarget {
    pub name: String,
    pub url: String,
}

impl HealthTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl From<&HealthTargetSettings> for HealthTarget {
    fn from(settings: &HealthTargetSettings) -> Self {
        Self::new(settings.name.clone(), settings.url.clone())
    }
}

/// Polls a fixed set of targets and remembers their last status
#[derive(Debug)]
pub struct HealthPoller {
    client: Client,
    targets: Vec<(HealthTarget, ServiceStatus)>,
}

impl HealthPoller {
    pub fn new(targets: Vec<HealthTarget>, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            targets: targets
                .into_iter()
                .map(|target| (target, ServiceStatus::Checking))
                .collect(),
        })
    }

    pub fn from_settings(settings: &HealthSettings) -> Result<Self, DomainError> {
        Self::new(
            settings.targets.iter().map(HealthTarget::from).collect(),
            Duration::from_millis(settings.timeout_ms),
        )
    }

    /// Current status of every target, in configuration order
    pub fn statuses(&self) -> impl Iterator<Item = (&HealthTarget, ServiceStatus)> {
        self.targets.iter().map(|(target, status)| (target, *status))
    }

    /// Polls every target once, updating its status
    pub async fn poll_once(&mut self) {
        for (target, status) in &mut self.targets {
            *status = check(&self.client, target).await;
        }
    }

    /// One `Name: Status` line per target
    pub fn render(&self) -> Vec<String> {
        self.statuses()
            .map(|(target, status)| format!("{}: {}", target.name, status))
            .collect()
    }
}

async fn check(client: &Client, target: &HealthTarget) -> ServiceStatus {
    match client.get(&target.url).send().await {
        Ok(response) if response.status().is_success() => ServiceStatus::Online,
        Ok(response) => {
            debug!(target = %target.name, status = %response.status(), "Health check failed");
            ServiceStatus::Offline
        }
        Err(e) => {
            debug!(target = %target.name, error = %e, "Health check unreachable");
            ServiceStatus::Offline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn poller(targets: Vec<HealthTarget>) -> HealthPoller {
        HealthPoller::new(targets, Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn test_initial_status_is_checking() {
        let poller = poller(vec![HealthTarget::new("API Service", "http://localhost/health")]);

        assert_eq!(poller.render(), vec!["API Service: Checking..."]);
    }

    #[tokio::test]
    async fn test_success_is_online() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut poller = poller(vec![HealthTarget::new(
            "API Service",
            format!("{}/health", server.uri()),
        )]);
        poller.poll_once().await;

        assert_eq!(poller.render(), vec!["API Service: Online"]);
    }

    #[tokio::test]
    async fn test_error_status_is_offline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ready"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut poller = poller(vec![HealthTarget::new(
            "Database",
            format!("{}/ready", server.uri()),
        )]);
        poller.poll_once().await;

        let statuses: Vec<_> = poller.statuses().map(|(_, s)| s).collect();
        assert_eq!(statuses, vec![ServiceStatus::Offline]);
    }

    #[tokio::test]
    async fn test_unreachable_is_offline() {
        // Nothing listens on port 9 (discard) in the test environment
        let mut poller = poller(vec![HealthTarget::new("Recommendation", "http://127.0.0.1:9/health")]);
        poller.poll_once().await;

        assert_eq!(poller.render(), vec!["Recommendation: Offline"]);
    }

    #[tokio::test]
    async fn test_targets_keep_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut poller = poller(vec![
            HealthTarget::new("API Service", format!("{}/health", server.uri())),
            HealthTarget::new("Database", format!("{}/missing", server.uri())),
        ]);
        poller.poll_once().await;

        assert_eq!(
            poller.render(),
            vec!["API Service: Online", "Database: Offline"]
        );
    }

    #[test]
    fn test_from_settings() {
        let poller = HealthPoller::from_settings(&HealthSettings::default()).unwrap();

        assert!(poller.render().iter().all(|line| line.ends_with("Checking...")));
    }
}
