use crate::Cloudy;
use crate::model::account::{GoogleClaims, MAX_USERNAME_LENGTH, Session, User};
use crate::model::api::{
    DeleteAccountRequest, GoogleAuthRequest, LoginRequest, LogoutRequest, ProfileRequest,
    RegisterRequest, SendVerificationRequest, VerifyEmailRequest,
};
use crate::model::errors::{CloudErr, CloudErrKind, CloudResult, Unexpected};

impl Cloudy {
    /// Creates a local account. The server sends a verification email; the
    /// caller signs in separately once that is done (or immediately, if the
    /// deployment does not enforce verification).
    #[instrument(level = "debug", skip(self, password), err(Debug))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> CloudResult<User> {
        if self.session.is_signed_in().await {
            return Err(CloudErrKind::AccountExists.into());
        }

        let username = username.trim().to_lowercase();
        if username.is_empty() || username.len() > MAX_USERNAME_LENGTH {
            return Err(CloudErrKind::UsernameInvalid.into());
        }
        if email.trim().is_empty() || password.is_empty() {
            return Err(CloudErrKind::CredentialsInvalid.into());
        }

        let user = self
            .client
            .request(
                None,
                RegisterRequest {
                    username,
                    email: email.trim().to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        info!("registered account {}", user.email);
        Ok(user)
    }

    /// Signs in with email + password. With `remember` the session survives
    /// the process, otherwise it is gone on drop.
    #[instrument(level = "debug", skip(self, password), err(Debug))]
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> CloudResult<User> {
        if self.session.is_signed_in().await {
            return Err(CloudErrKind::AccountExists.into());
        }

        let auth = self
            .client
            .request(
                None,
                LoginRequest { email: email.trim().to_string(), password: password.to_string() },
            )
            .await
            .map_err(|err| {
                // a 401 on the login route is a bad password, not a bad session
                match CloudErrKind::from(err) {
                    CloudErrKind::InvalidAuth => CloudErrKind::CredentialsInvalid,
                    kind => kind,
                }
            })
            .map_err(CloudErr::from)?;

        let user = auth.user.clone();
        self.cache_session(Session { token: auth.token, remember, user: user.clone() })
            .await?;
        self.idle.record_activity().await;

        info!("signed in as {}", user.display_name());
        Ok(user)
    }

    /// Signs in with a Google ID token. The claims are decoded locally for
    /// immediate feedback; the server validates the token on its own before
    /// answering.
    #[instrument(level = "debug", skip(self, id_token), err(Debug))]
    pub async fn google_login(&self, id_token: &str, remember: bool) -> CloudResult<User> {
        if self.session.is_signed_in().await {
            return Err(CloudErrKind::AccountExists.into());
        }

        let claims = GoogleClaims::from_id_token(id_token)?;
        debug!("google token claims to be {}", claims.email);

        let auth = self
            .client
            .request(None, GoogleAuthRequest { credential: id_token.to_string() })
            .await?;

        let user = auth.user.clone();
        self.cache_session(Session { token: auth.token, remember, user: user.clone() })
            .await?;
        self.idle.record_activity().await;

        info!("signed in as {} via google", user.display_name());
        Ok(user)
    }

    /// Ends the session. The server is told on a best-effort basis; local
    /// state is cleared even when it cannot be reached.
    #[instrument(level = "debug", skip(self))]
    pub async fn logout(&self) {
        let Some(session) = self.forget_session().await else {
            return;
        };

        self.client
            .request(Some(&session.token), LogoutRequest {})
            .await
            .log_and_ignore();

        self.caches.drive.invalidate().await;
        self.caches.bin.invalidate().await;
        self.caches.stats.invalidate().await;
        self.store.reset().await;

        info!("signed out {}", session.user.display_name());
    }

    /// Fetches the freshest profile and folds it into the session.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn profile(&self) -> CloudResult<User> {
        let token = self.bearer().await?;
        let user = self.client.request(Some(&token), ProfileRequest {}).await?;

        let mut session = self.session.get().await?;
        session.user = user.clone();
        self.cache_session(session).await?;

        Ok(user)
    }

    #[instrument(level = "debug", skip(self, token), err(Debug))]
    pub async fn verify_email(&self, token: &str) -> CloudResult<()> {
        self.client
            .request(None, VerifyEmailRequest { token: token.to_string() })
            .await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn send_verification(&self) -> CloudResult<()> {
        let token = self.bearer().await?;
        self.client
            .request(Some(&token), SendVerificationRequest {})
            .await?;
        Ok(())
    }

    /// Deletes the account server-side, then clears all local state.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn delete_account(&self) -> CloudResult<()> {
        let token = self.bearer().await?;
        self.client
            .request(Some(&token), DeleteAccountRequest {})
            .await?;

        self.forget_session().await;
        self.store.reset().await;
        warn!("account deleted");
        Ok(())
    }
}
