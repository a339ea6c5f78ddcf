use std::time::{Duration, Instant};

use http::Method;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::get_code_version;
use crate::model::api::{Envelope, Request};
use crate::model::file::FileItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend rejected the operation and said why.
    Endpoint { status: u16, message: String },
    InvalidAuth,
    ExpiredAuth,
    InternalError,
    Serialize(String),
    SendFailed(String),
    ReceiveFailed(String),
    Deserialize(String),
}

#[derive(Debug, Clone)]
pub struct Network {
    pub client: Client,
    pub base_url: String,
    pub get_code_version: fn() -> &'static str,
}

impl Network {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Default::default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            get_code_version,
        }
    }

    /// Issues a typed request against the backend. The bearer token rides in
    /// the `Authorization` header; GET and DELETE requests serialize their
    /// fields as the query string, everything else as a JSON body.
    #[instrument(level = "debug", skip(self, token, request), fields(route = %request.route()), err(Debug))]
    pub async fn request<T: Request>(
        &self, token: Option<&str>, request: T,
    ) -> Result<T::Response, ApiError> {
        let method = T::METHOD;
        let url = format!("{}{}", self.base_url, request.route());

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header("X-Client-Version", (self.get_code_version)());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = if method == Method::GET || method == Method::DELETE {
            builder.query(&request)
        } else {
            builder.json(&request)
        };

        let start = Instant::now();
        let sent = builder
            .send()
            .await
            .map_err(|err| ApiError::SendFailed(err.to_string()))?;
        if start.elapsed() > Duration::from_millis(1000) {
            warn!("network request took {:?}", start.elapsed());
        }

        let status = sent.status();
        let body = sent
            .bytes()
            .await
            .map_err(|err| ApiError::ReceiveFailed(err.to_string()))?;
        deserialize_envelope(status, &body)
    }

    /// Multipart upload of one file's bytes plus its metadata fields.
    #[instrument(level = "debug", skip(self, token, bytes), err(Debug))]
    pub async fn upload(
        &self, token: &str, parent: Option<Uuid>, name: &str, mime: &str, bytes: Vec<u8>,
    ) -> Result<FileItem, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(name.to_string())
            .mime_str(mime)
            .map_err(|err| ApiError::Serialize(err.to_string()))?;
        let mut form = Form::new().part("file", part);
        if let Some(parent) = parent {
            form = form.text("parentId", parent.to_string());
        }

        let start = Instant::now();
        let sent = self
            .client
            .post(format!("{}/api/files/upload", self.base_url))
            .header("X-Client-Version", (self.get_code_version)())
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ApiError::SendFailed(err.to_string()))?;
        if start.elapsed() > Duration::from_millis(5000) {
            warn!("upload took {:?}", start.elapsed());
        }

        let status = sent.status();
        let body = sent
            .bytes()
            .await
            .map_err(|err| ApiError::ReceiveFailed(err.to_string()))?;
        deserialize_envelope(status, &body)
    }

    /// Fetches a file's raw content.
    #[instrument(level = "debug", skip(self, token), err(Debug))]
    pub async fn download(&self, token: &str, id: Uuid) -> Result<Vec<u8>, ApiError> {
        self.raw_get(token, &format!("/api/files/{id}/download"))
            .await
            .map(|(bytes, _)| bytes)
    }

    /// Fetches a file's preview rendition along with its content type.
    #[instrument(level = "debug", skip(self, token), err(Debug))]
    pub async fn preview(
        &self, token: &str, id: Uuid,
    ) -> Result<(Vec<u8>, Option<String>), ApiError> {
        self.raw_get(token, &format!("/api/files/{id}/preview")).await
    }

    async fn raw_get(
        &self, token: &str, route: &str,
    ) -> Result<(Vec<u8>, Option<String>), ApiError> {
        let sent = self
            .client
            .get(format!("{}{}", self.base_url, route))
            .header("X-Client-Version", (self.get_code_version)())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| ApiError::SendFailed(err.to_string()))?;

        let status = sent.status();
        let content_type = sent
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = sent
            .bytes()
            .await
            .map_err(|err| ApiError::ReceiveFailed(err.to_string()))?;

        if status.is_success() {
            Ok((body.to_vec(), content_type))
        } else {
            Err(status_to_error(status, &body))
        }
    }
}

fn deserialize_envelope<R: DeserializeOwned>(
    status: StatusCode, body: &[u8],
) -> Result<R, ApiError> {
    if !status.is_success() {
        return Err(status_to_error(status, body));
    }

    // endpoints with nothing to report may answer with an empty body
    let envelope: Envelope<R> = if body.is_empty() {
        Envelope { data: None, message: None }
    } else {
        serde_json::from_slice(body).map_err(|err| ApiError::Deserialize(err.to_string()))?
    };

    match envelope.data {
        Some(data) => Ok(data),
        None => serde_json::from_value(Value::Null)
            .map_err(|err| ApiError::Deserialize(err.to_string())),
    }
}

fn status_to_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = || {
        serde_json::from_slice::<Envelope<Value>>(body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| format!("server returned {status}"))
    };
    match status.as_u16() {
        401 => ApiError::InvalidAuth,
        403 => ApiError::ExpiredAuth,
        // 507 is the server's way of saying the data cap is hit, keep its message
        507 => ApiError::Endpoint { status: 507, message: message() },
        500..=599 => ApiError::InternalError,
        code => ApiError::Endpoint { status: code, message: message() },
    }
}

#[cfg(test)]
mod unit_tests {
    use reqwest::StatusCode;

    use crate::io::network::{ApiError, deserialize_envelope};
    use crate::model::file::FileItem;
    use crate::model::usage::StorageStats;

    #[test]
    fn unwraps_data_payloads() {
        let body = br#"{"data":{"used":120,"total":5000,"files":3},"message":"ok"}"#;
        let stats: StorageStats = deserialize_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(stats, StorageStats { used: 120, total: 5000, files: 3 });
    }

    #[test]
    fn tolerates_empty_success() {
        deserialize_envelope::<()>(StatusCode::OK, b"").unwrap();
        deserialize_envelope::<()>(StatusCode::OK, br#"{"message":"bin emptied"}"#).unwrap();
    }

    #[test]
    fn missing_data_is_an_error_for_typed_responses() {
        let err =
            deserialize_envelope::<StorageStats>(StatusCode::OK, br#"{"message":"hm"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));
    }

    #[test]
    fn maps_error_statuses() {
        let unauthorized =
            deserialize_envelope::<()>(StatusCode::UNAUTHORIZED, b"{}").unwrap_err();
        assert_eq!(unauthorized, ApiError::InvalidAuth);

        let conflict = deserialize_envelope::<()>(
            StatusCode::CONFLICT,
            br#"{"message":"a file with that name exists"}"#,
        )
        .unwrap_err();
        assert_eq!(
            conflict,
            ApiError::Endpoint { status: 409, message: "a file with that name exists".to_string() }
        );
    }

    #[test]
    fn parses_file_items_from_js_shaped_json() {
        let body = br#"{"data":[{
            "id":"9f2c7a46-5f2d-4db4-a8fd-3b5ba5a6b7c1",
            "name":"report.pdf",
            "type":"file",
            "size":10485760,
            "mimeType":"application/pdf",
            "parentId":null,
            "createdAt":"2025-11-02T09:30:00Z",
            "updatedAt":"2025-11-02T09:30:00Z",
            "isBin":false
        }]}"#;
        let files: Vec<FileItem> = deserialize_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "report.pdf");
        assert_eq!(files[0].size, Some(10485760));
        assert!(files[0].is_document());
    }
}
