use std::backtrace::Backtrace;
use std::fmt::Display;
use std::fmt::{self, Formatter};
use std::io;
use std::panic::Location;

use tracing::error;

use crate::io::network::ApiError;

pub type CloudResult<T> = Result<T, CloudErr>;

#[derive(Debug)]
pub struct CloudErr {
    pub kind: CloudErrKind,
    pub backtrace: Option<Backtrace>,
}

/// The purpose of this Display implementation is to provide uniformity for the
/// description of errors that a customer may see, and to give the UI layer
/// something it can show without further processing.
impl Display for CloudErr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Display for CloudErrKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CloudErrKind::AccountExists => write!(f, "You are already signed in"),
            CloudErrKind::AccountNonexistent => write!(f, "You need to sign in to do that"),
            CloudErrKind::BatchTooLarge => {
                write!(f, "That selection exceeds the 5 GB per-batch limit")
            }
            CloudErrKind::CredentialsInvalid => write!(f, "Wrong email or password"),
            CloudErrKind::DiskPathInvalid => write!(f, "That disk path is invalid"),
            CloudErrKind::EmailTaken => write!(f, "An account with that email already exists"),
            CloudErrKind::EmailUnverified => {
                write!(f, "Please verify your email address first")
            }
            CloudErrKind::FileNameContainsSlash => write!(f, "A file name cannot contain slashes"),
            CloudErrKind::FileNameEmpty => write!(f, "A file name cannot be empty"),
            CloudErrKind::FileNameTooLong => write!(f, "That file name is too long"),
            CloudErrKind::FileNonexistent => write!(f, "That file does not exist"),
            CloudErrKind::FileNotDocument => write!(f, "That file is not a document"),
            CloudErrKind::FileNotInBin => write!(f, "That file is not in the bin"),
            CloudErrKind::FileTooLarge => {
                write!(f, "That file exceeds the 25 MB per-file limit")
            }
            CloudErrKind::GoogleTokenInvalid => write!(f, "That Google sign-in token is invalid"),
            CloudErrKind::InvalidAuth => {
                write!(f, "The server rejected your credentials, please sign in again")
            }
            CloudErrKind::PathNonexistent => write!(f, "Nothing exists at that path"),
            CloudErrKind::ServerUnreachable => write!(f, "Could not reach server"),
            CloudErrKind::SessionExpired => {
                write!(f, "Your session has expired, please sign in again")
            }
            CloudErrKind::UsageIsOverDataCap => write!(f, "You're out of space"),
            CloudErrKind::UsernameInvalid => write!(f, "That username is invalid"),
            CloudErrKind::UsernameTaken => write!(f, "That username is not available"),
            CloudErrKind::Server(msg) => write!(f, "{msg}"),
            CloudErrKind::Unexpected(msg) => write!(f, "Unexpected error: {msg}"),
        }
    }
}

impl From<CloudErrKind> for CloudErr {
    fn from(kind: CloudErrKind) -> Self {
        Self { kind, backtrace: Some(Backtrace::force_capture()) }
    }
}

impl From<io::Error> for CloudErr {
    fn from(err: io::Error) -> Self {
        CloudErrKind::Unexpected(format!("{err:#?}")).into()
    }
}

impl From<ApiError> for CloudErr {
    fn from(err: ApiError) -> Self {
        CloudErrKind::from(err).into()
    }
}

impl From<ApiError> for CloudErrKind {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidAuth => CloudErrKind::InvalidAuth,
            ApiError::ExpiredAuth => CloudErrKind::SessionExpired,
            ApiError::Endpoint { status: 404, .. } => CloudErrKind::FileNonexistent,
            ApiError::Endpoint { status: 413, .. } => CloudErrKind::FileTooLarge,
            ApiError::Endpoint { status: 507, .. } => CloudErrKind::UsageIsOverDataCap,
            ApiError::Endpoint { message, .. } => CloudErrKind::Server(message),
            ApiError::InternalError => {
                CloudErrKind::Unexpected("the server had an internal error".to_string())
            }
            ApiError::SendFailed(_) => CloudErrKind::ServerUnreachable,
            ApiError::Serialize(err)
            | ApiError::ReceiveFailed(err)
            | ApiError::Deserialize(err) => CloudErrKind::Unexpected(err),
        }
    }
}

pub fn core_err_unexpected<T: fmt::Debug>(err: T) -> CloudErrKind {
    CloudErrKind::Unexpected(format!("{err:?}"))
}

pub trait Unexpected<T> {
    fn log_and_ignore(self) -> Option<T>;
    fn map_unexpected(self) -> CloudResult<T>;
}

impl<T, E: fmt::Debug> Unexpected<T> for Result<T, E> {
    #[track_caller]
    fn map_unexpected(self) -> CloudResult<T> {
        let location = Location::caller();
        self.map_err(|err| {
            CloudErrKind::Unexpected(format!(
                "unexpected error at {}:{} {err:?}",
                location.file(),
                location.line(),
            ))
            .into()
        })
    }

    #[track_caller]
    fn log_and_ignore(self) -> Option<T> {
        let location = Location::caller();
        if let Err(e) = &self {
            error!("error ignored at {}:{} {e:?}", location.file(), location.line());
        }

        self.ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudErrKind {
    AccountExists,
    AccountNonexistent,
    BatchTooLarge,
    CredentialsInvalid,
    DiskPathInvalid,
    EmailTaken,
    EmailUnverified,
    FileNameContainsSlash,
    FileNameEmpty,
    FileNameTooLong,
    FileNonexistent,
    FileNotDocument,
    FileNotInBin,
    FileTooLarge,
    GoogleTokenInvalid,
    InvalidAuth,
    PathNonexistent,
    ServerUnreachable,
    SessionExpired,
    UsageIsOverDataCap,
    UsernameInvalid,
    UsernameTaken,

    /// The backend rejected the operation; the payload is the human readable
    /// `message` field of its error envelope.
    Server(String),

    /// If no programmer in any part of the stack (including tests) expects
    /// to see a particular error, we debug format the underlying error to
    /// keep the number of error types in check. Commonly used for errors
    /// originating in other crates.
    Unexpected(String),
}
