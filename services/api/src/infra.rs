use async_trait::async_trait;
use boardprep::config::RegistrationSinkConfig;
use boardprep::error::AppError;
use boardprep::workflows::registration::{
    Attachment, HttpSubmissionSink, SinkError, SubmissionPayload, SubmissionSink, UnconfiguredSink,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Sink selected from configuration; unconfigured deployments refuse submissions.
pub(crate) fn configured_sink(
    config: &RegistrationSinkConfig,
) -> Result<Arc<dyn SubmissionSink>, AppError> {
    match config.endpoint.as_deref() {
        Some(endpoint) => Ok(Arc::new(HttpSubmissionSink::new(endpoint, config.mode)?)),
        None => {
            warn!("REGISTRATION_SINK_URL is not set; submissions will be refused");
            Ok(Arc::new(UnconfiguredSink))
        }
    }
}

/// Dry-run sink for the demo: keeps payloads in memory instead of sending them.
#[derive(Default, Clone)]
pub(crate) struct PreviewSink {
    payloads: Arc<Mutex<Vec<SubmissionPayload>>>,
}

#[async_trait]
impl SubmissionSink for PreviewSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError> {
        let mut guard = self.payloads.lock().expect("preview mutex poisoned");
        guard.push(payload.clone());
        Ok(())
    }
}

impl PreviewSink {
    pub(crate) fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().expect("preview mutex poisoned").clone()
    }
}

/// Read a proof document from disk, guessing its media type from the extension.
pub(crate) fn load_attachment(path: &Path) -> Result<Attachment, AppError> {
    let bytes = std::fs::read(path)?;
    let media_type = mime_guess::from_path(path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Attachment::new(file_name, media_type.essence_str(), bytes)?)
}
