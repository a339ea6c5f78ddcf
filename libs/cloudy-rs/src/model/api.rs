use http::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::model::account::User;
use crate::model::file::{FileItem, FileLocation};
use crate::model::usage::StorageStats;

/// One implementor per backend endpoint. `route` is a function rather than a
/// constant because most file routes carry the id in the path.
pub trait Request: Serialize {
    type Response: Debug + DeserializeOwned;
    const METHOD: Method;
    fn route(&self) -> String;
}

/// Every Cloudy response is wrapped in this envelope; `data` carries the
/// payload on success and `message` carries the human readable error (or an
/// informational note) otherwise.
#[derive(Deserialize, Debug, Clone)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// ---- users ----

#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Request for RegisterRequest {
    type Response = User;
    const METHOD: Method = Method::POST;
    fn route(&self) -> String {
        "/api/users/register".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Request for LoginRequest {
    type Response = AuthResponse;
    const METHOD: Method = Method::POST;
    fn route(&self) -> String {
        "/api/users/login".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GoogleAuthRequest {
    pub credential: String,
}

impl Request for GoogleAuthRequest {
    type Response = AuthResponse;
    const METHOD: Method = Method::POST;
    fn route(&self) -> String {
        "/api/users/google".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct LogoutRequest {}

impl Request for LogoutRequest {
    type Response = ();
    const METHOD: Method = Method::POST;
    fn route(&self) -> String {
        "/api/users/logout".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ProfileRequest {}

impl Request for ProfileRequest {
    type Response = User;
    const METHOD: Method = Method::GET;
    fn route(&self) -> String {
        "/api/users/profile".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct VerifyEmailRequest {
    #[serde(skip)]
    pub token: String,
}

impl Request for VerifyEmailRequest {
    type Response = ();
    const METHOD: Method = Method::GET;
    fn route(&self) -> String {
        format!("/api/users/verify/{}", self.token)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SendVerificationRequest {}

impl Request for SendVerificationRequest {
    type Response = ();
    const METHOD: Method = Method::POST;
    fn route(&self) -> String {
        "/api/users/send-verification".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct DeleteAccountRequest {}

impl Request for DeleteAccountRequest {
    type Response = ();
    const METHOD: Method = Method::DELETE;
    fn route(&self) -> String {
        "/api/users/account".to_string()
    }
}

// ---- files ----

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesRequest {
    pub parent_id: Option<Uuid>,
    pub is_bin: bool,
}

impl Request for ListFilesRequest {
    type Response = Vec<FileItem>;
    const METHOD: Method = Method::GET;
    fn route(&self) -> String {
        "/api/files".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct PathLookupRequest {
    #[serde(skip)]
    pub path: String,
    pub location: FileLocation,
}

impl Request for PathLookupRequest {
    type Response = FileItem;
    const METHOD: Method = Method::GET;
    fn route(&self) -> String {
        format!("/api/files/path/{}", encode_path_segment(&self.path))
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RenameFileRequest {
    #[serde(skip)]
    pub id: Uuid,
    pub name: String,
}

impl Request for RenameFileRequest {
    type Response = FileItem;
    const METHOD: Method = Method::PUT;
    fn route(&self) -> String {
        format!("/api/files/{}/rename", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MoveFileRequest {
    #[serde(skip)]
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
}

impl Request for MoveFileRequest {
    type Response = FileItem;
    const METHOD: Method = Method::PUT;
    fn route(&self) -> String {
        format!("/api/files/{}/move", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct DuplicateFileRequest {
    #[serde(skip)]
    pub id: Uuid,
}

impl Request for DuplicateFileRequest {
    type Response = FileItem;
    const METHOD: Method = Method::POST;
    fn route(&self) -> String {
        format!("/api/files/{}/duplicate", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct BinFileRequest {
    #[serde(skip)]
    pub id: Uuid,
}

impl Request for BinFileRequest {
    type Response = FileItem;
    const METHOD: Method = Method::PUT;
    fn route(&self) -> String {
        format!("/api/files/{}/bin", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RestoreFileRequest {
    #[serde(skip)]
    pub id: Uuid,
}

impl Request for RestoreFileRequest {
    type Response = FileItem;
    const METHOD: Method = Method::POST;
    fn route(&self) -> String {
        format!("/api/files/{}/restore", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct DeleteFileRequest {
    #[serde(skip)]
    pub id: Uuid,
    pub permanent: bool,
}

impl Request for DeleteFileRequest {
    type Response = ();
    const METHOD: Method = Method::DELETE;
    fn route(&self) -> String {
        format!("/api/files/{}", self.id)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct EmptyBinRequest {}

impl Request for EmptyBinRequest {
    type Response = ();
    const METHOD: Method = Method::POST;
    fn route(&self) -> String {
        "/api/files/empty-bin".to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GetStatsRequest {}

impl Request for GetStatsRequest {
    type Response = StorageStats;
    const METHOD: Method = Method::GET;
    fn route(&self) -> String {
        "/api/files/stats".to_string()
    }
}

/// Percent-encodes a single path segment so server paths with spaces or
/// slashes survive the trip through the url.
pub fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod unit_tests {
    use uuid::Uuid;

    use crate::model::api::{
        DeleteFileRequest, PathLookupRequest, Request, encode_path_segment,
    };
    use crate::model::file::FileLocation;

    #[test]
    fn encodes_path_segments() {
        assert_eq!(encode_path_segment("report.pdf"), "report.pdf");
        assert_eq!(encode_path_segment("tax docs/2024"), "tax%20docs%2F2024");
    }

    #[test]
    fn routes_carry_ids() {
        let id = Uuid::nil();
        assert_eq!(
            DeleteFileRequest { id, permanent: true }.route(),
            format!("/api/files/{id}")
        );
        let lookup =
            PathLookupRequest { path: "docs/report.pdf".to_string(), location: FileLocation::Drive };
        assert_eq!(lookup.route(), "/api/files/path/docs%2Freport.pdf");
    }
}
