// HTTP exporter - Asks the reporting API to produce an export for the current filters
use crate::application::quick_actions::Exporter;
use crate::domain::filters::Filters;
use crate::infrastructure::config::prepare_template;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait ExportTransport: Send + Sync {
    async fn request_export(&self, url: &str, filters: &Filters) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExportTransport for ReqwestTransport {
    async fn request_export(&self, url: &str, filters: &Filters) -> anyhow::Result<()> {
        let response = self
            .client
            .post(url)
            .json(filters)
            .send()
            .await
            .context("Failed to send export request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Export request failed with status {}: {}", status, body);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct HttpExporter {
    url_template: String,
    transport: Arc<dyn ExportTransport>,
}

impl HttpExporter {
    pub fn new(url_template: String, transport: Arc<dyn ExportTransport>) -> Self {
        Self {
            url_template,
            transport,
        }
    }

    pub fn export_url(&self, report: &str, filters: &Filters) -> String {
        let join = |set: &std::collections::BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join(",");

        let mut vars = HashMap::new();
        vars.insert("report".to_string(), report.to_string());
        vars.insert("start".to_string(), filters.date_range.start.to_string());
        vars.insert("end".to_string(), filters.date_range.end.to_string());
        vars.insert("clubs".to_string(), join(&filters.clubs));
        vars.insert("courts".to_string(), join(&filters.courts));
        prepare_template(&self.url_template, &vars)
    }
}

impl Exporter for HttpExporter {
    /// Spawns the request and returns immediately; failures are only logged.
    fn export(&self, report: &str, filters: &Filters) {
        let url = self.export_url(report, filters);
        let transport = self.transport.clone();
        let filters = filters.clone();
        let report = report.to_string();

        tokio::spawn(async move {
            match transport.request_export(&url, &filters).await {
                Ok(()) => tracing::info!("Requested {} export", report),
                Err(e) => tracing::warn!("Export of {} failed: {:#}", report, e),
            }
        });
    }
}
