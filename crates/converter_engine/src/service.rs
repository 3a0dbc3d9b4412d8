use std::path::Path;
use std::time::Duration;

use engine_logging::engine_debug;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{HistoryEnvelope, PreviewEnvelope, UploadEnvelope};
use crate::{FailureKind, HistoryReply, PreviewReply, ServiceError, UploadReply};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Upper bound for a whole request; conversion can be slow.
    pub request_timeout: Duration,
}

impl ServiceSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The remote conversion service.
#[async_trait::async_trait]
pub trait ConversionService: Send + Sync {
    /// `POST /upload-file`.
    async fn upload_file(&self, path: &Path, file_name: &str)
        -> Result<UploadReply, ServiceError>;

    /// `POST /preview-excel`.
    async fn preview_file(
        &self,
        path: &Path,
        file_name: &str,
    ) -> Result<PreviewReply, ServiceError>;

    /// `GET /preview-history/{id}`.
    async fn preview_history(&self, id: &str) -> Result<PreviewReply, ServiceError>;

    /// `GET /history`.
    async fn history(&self) -> Result<HistoryReply, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestService {
    settings: ServiceSettings,
}

impl ReqwestService {
    pub fn new(settings: ServiceSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ServiceError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))
    }

    /// Appends path segments to the base URL, keeping any base path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ServiceError::new(FailureKind::InvalidUrl, "service url cannot take a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_file<T: DeserializeOwned>(
        &self,
        segment: &str,
        path: &Path,
        file_name: &str,
    ) -> Result<T, ServiceError> {
        let url = self.endpoint(&[segment])?;
        let form = file_form(path, file_name).await?;
        let client = self.build_client()?;
        engine_debug!("POST {} file={}", url, file_name);
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_envelope(response).await
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ServiceError> {
        let url = self.endpoint(segments)?;
        let client = self.build_client()?;
        engine_debug!("GET {}", url);
        let response = client.get(url).send().await.map_err(map_reqwest_error)?;
        read_envelope(response).await
    }
}

#[async_trait::async_trait]
impl ConversionService for ReqwestService {
    async fn upload_file(
        &self,
        path: &Path,
        file_name: &str,
    ) -> Result<UploadReply, ServiceError> {
        let envelope: UploadEnvelope = self.post_file("upload-file", path, file_name).await?;
        envelope.interpret()
    }

    async fn preview_file(
        &self,
        path: &Path,
        file_name: &str,
    ) -> Result<PreviewReply, ServiceError> {
        let envelope: PreviewEnvelope = self.post_file("preview-excel", path, file_name).await?;
        Ok(envelope.interpret())
    }

    async fn preview_history(&self, id: &str) -> Result<PreviewReply, ServiceError> {
        let envelope: PreviewEnvelope = self.get(&["preview-history", id]).await?;
        Ok(envelope.interpret())
    }

    async fn history(&self) -> Result<HistoryReply, ServiceError> {
        let envelope: HistoryEnvelope = self.get(&["history"]).await?;
        Ok(envelope.interpret())
    }
}

async fn file_form(path: &Path, file_name: &str) -> Result<Form, ServiceError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        ServiceError::new(FailureKind::Io, format!("{}: {}", path.display(), err))
    })?;
    let part = Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(XLSX_MIME)
        .map_err(|err| ServiceError::new(FailureKind::Io, err.to_string()))?;
    Ok(Form::new().part("file", part))
}

/// The envelope is read whatever the HTTP status; the service reports
/// failures in its `status` field.
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| {
        ServiceError::new(
            FailureKind::InvalidResponse,
            format!("http {}: {}", status.as_u16(), err),
        )
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ServiceError::new(FailureKind::InvalidResponse, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base: &str) -> ReqwestService {
        ReqwestService::new(ServiceSettings::new(Url::parse(base).unwrap()))
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let url = service("http://host:8000").endpoint(&["history"]).unwrap();
        assert_eq!(url.as_str(), "http://host:8000/history");

        let url = service("http://host/api/")
            .endpoint(&["preview-history", "12"])
            .unwrap();
        assert_eq!(url.as_str(), "http://host/api/preview-history/12");
    }

    #[test]
    fn endpoint_escapes_ids() {
        let url = service("http://host")
            .endpoint(&["preview-history", "a/b c"])
            .unwrap();
        assert_eq!(url.as_str(), "http://host/preview-history/a%2Fb%20c");
    }
}
