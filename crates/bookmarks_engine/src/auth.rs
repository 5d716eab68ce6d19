use std::sync::{Mutex, PoisonError};

use bookmarks_logging::{bm_info, bm_warn};
use reqwest::StatusCode;

use crate::http::{authorize, build_client, endpoint, map_reqwest_error, read_json, send_checked};
use crate::{FailureKind, ServiceSettings, StoreError, UserIdentity};

/// Session gate backend: who is signed in, and how to sign in or out.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    /// The signed-in user, or `None` when there is no valid session.
    async fn current_user(&self) -> Result<Option<UserIdentity>, StoreError>;

    /// Starts a third-party OAuth handshake and returns the URL the user must
    /// open. Completion is only observable on a later `current_user` call.
    async fn sign_in_with_provider(&self, provider: &str) -> Result<String, StoreError>;

    /// Invalidates the session.
    async fn sign_out(&self) -> Result<(), StoreError>;
}

/// Auth client for the service's `/auth/v1` endpoints.
pub struct RestAuthGateway {
    settings: ServiceSettings,
    client: reqwest::Client,
    redirect_to: Option<String>,
    token: Mutex<Option<String>>,
}

impl RestAuthGateway {
    pub fn new(settings: ServiceSettings, redirect_to: Option<String>) -> Result<Self, StoreError> {
        let client = build_client(&settings)?;
        let token = Mutex::new(settings.access_token.clone());
        Ok(Self {
            settings,
            client,
            redirect_to,
            token,
        })
    }

    fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl AuthGateway for RestAuthGateway {
    async fn current_user(&self) -> Result<Option<UserIdentity>, StoreError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        let url = endpoint(&self.settings, "auth/v1/user")?;
        let request = authorize(self.client.get(url), &self.settings, Some(&token));
        let response = request.send().await.map_err(map_reqwest_error)?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                bm_info!("Access token rejected; no session");
                Ok(None)
            }
            status if status.is_success() => {
                let user: UserIdentity = read_json(response).await?;
                Ok(Some(user))
            }
            status => Err(StoreError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )),
        }
    }

    async fn sign_in_with_provider(&self, provider: &str) -> Result<String, StoreError> {
        if provider.trim().is_empty() {
            return Err(StoreError::new(FailureKind::InvalidUrl, "empty provider"));
        }
        let mut url = endpoint(&self.settings, "auth/v1/authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", provider);
            if let Some(redirect_to) = &self.redirect_to {
                query.append_pair("redirect_to", redirect_to);
            }
        }
        bm_info!("Sign-in handed off to provider {}", provider);
        Ok(url.to_string())
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        let Some(token) = self.token() else {
            return Ok(());
        };
        let url = endpoint(&self.settings, "auth/v1/logout")?;
        let request = authorize(self.client.post(url), &self.settings, Some(&token));
        match send_checked(request).await {
            Ok(_) => {}
            // An already-expired token means the session is gone anyway.
            Err(err) if err.kind == FailureKind::Unauthorized => {
                bm_warn!("Logout with expired token: {}", err);
            }
            Err(err) => return Err(err),
        }
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Fixed-identity gateway for the in-memory backend and tests.
pub struct StaticAuthGateway {
    user: Mutex<Option<UserIdentity>>,
}

impl StaticAuthGateway {
    pub fn signed_in(user: UserIdentity) -> Self {
        Self {
            user: Mutex::new(Some(user)),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl AuthGateway for StaticAuthGateway {
    async fn current_user(&self) -> Result<Option<UserIdentity>, StoreError> {
        Ok(self.user.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn sign_in_with_provider(&self, provider: &str) -> Result<String, StoreError> {
        Ok(format!("memory://sign-in?provider={provider}"))
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
