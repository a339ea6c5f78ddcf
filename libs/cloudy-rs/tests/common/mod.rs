use chrono::Utc;
use cloudy_rs::Cloudy;
use cloudy_rs::model::account::{AuthProvider, Session, User};
use cloudy_rs::model::config::Config;
use cloudy_rs::model::file::{FileItem, FileType};
use cloudy_rs::Uuid;
use tempfile::TempDir;

/// A config pointed at a throwaway directory and a server that is never
/// there: connection refused, immediately. Logs stay off so tests do not
/// fight over the global subscriber.
pub fn test_config(dir: &TempDir) -> Config {
    Config {
        writeable_path: dir.path().to_string_lossy().to_string(),
        api_url: "http://127.0.0.1:9".to_string(),
        background_work: false,
        logs: false,
        stdout_logs: false,
        colored_logs: false,
    }
}

pub async fn test_cloudy(dir: &TempDir) -> Cloudy {
    Cloudy::init(test_config(dir)).await.unwrap()
}

pub fn test_user() -> User {
    User {
        id: Uuid::new_v4(),
        email: "amy@example.com".to_string(),
        username: Some("amy".to_string()),
        is_verified: true,
        auth_provider: AuthProvider::Local,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_session(remember: bool) -> Session {
    Session { token: "test-token".to_string(), remember, user: test_user() }
}

pub fn test_file(name: &str) -> FileItem {
    FileItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        file_type: FileType::Document,
        size: Some(1024),
        mime_type: Some("application/pdf".to_string()),
        parent_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        is_bin: false,
    }
}
