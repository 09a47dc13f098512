//! Identity-provider client: REST calls, session persistence, event hub.
//!
//! # Design
//! - One client per boot owns the transient session and the auth event hub.
//! - Subscriptions are owned handles with an explicit `dispose`; a torn-down
//!   view must not keep mutating state through a stale listener.
//! - Sign-out always clears the local session, even when the network call
//!   fails; callers log the failure and move on.

use crate::app::preferences::{
    SESSION_KEY, delete_storage, provider_base_url, provider_publishable_key, set_storage,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;
use gloo_net::http::{Request, Response};
use serde::Deserialize;
use sitedesk_identity::error::ProviderError;
use sitedesk_identity::events::{AuthChange, AuthEvent};
use sitedesk_identity::gateway::IdentityGateway;
use sitedesk_identity::recovery::location_indicates_recovery;
use sitedesk_identity::session::{Session, UserIdentity};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use uuid::Uuid;
use yew::Callback;

type ListenerMap = Rc<RefCell<HashMap<u64, Callback<AuthChange>>>>;

/// Owned auth-event subscription handle.
pub(crate) struct AuthSubscription {
    id: u64,
    listeners: Weak<RefCell<HashMap<u64, Callback<AuthChange>>>>,
}

impl AuthSubscription {
    /// Unregister this listener; later events are no longer delivered.
    pub(crate) fn dispose(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().remove(&self.id);
        }
    }
}

/// REST client for the managed auth provider.
pub(crate) struct ProviderClient {
    base_url: String,
    publishable_key: String,
    session: RefCell<Option<Session>>,
    listeners: ListenerMap,
    next_listener: Cell<u64>,
}

impl ProviderClient {
    /// Build the client, restoring any persisted session into memory.
    pub(crate) fn new() -> Self {
        Self {
            base_url: provider_base_url(),
            publishable_key: provider_publishable_key(),
            session: RefCell::new(LocalStorage::get::<Session>(SESSION_KEY).ok()),
            listeners: Rc::new(RefCell::new(HashMap::new())),
            next_listener: Cell::new(0),
        }
    }

    /// Register a listener for auth lifecycle events.
    pub(crate) fn subscribe(&self, callback: Callback<AuthChange>) -> AuthSubscription {
        let id = self.next_listener.get() + 1;
        self.next_listener.set(id);
        self.listeners.borrow_mut().insert(id, callback);
        AuthSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Establish the boot-time session and emit the matching event.
    ///
    /// Recovery links exchange their fragment tokens for a session and emit
    /// `PASSWORD_RECOVERY`; otherwise a persisted session is revalidated
    /// (refreshing when expired) or dropped.
    pub(crate) async fn boot(&self) {
        let location = window().location();
        let search = location.search().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        if location_indicates_recovery(&search, &hash) {
            match self.exchange_recovery_tokens(&hash).await {
                Ok(()) => self.emit(AuthEvent::PasswordRecovery),
                Err(err) => console::error!("recovery token exchange failed", err.to_string()),
            }
            return;
        }

        let stored = self.session.borrow().clone();
        let Some(session) = stored else { return };
        if session.is_expired(Utc::now()) {
            match self.refresh(&session.refresh_token).await {
                Ok(fresh) => {
                    self.store_session(Some(fresh));
                    self.emit(AuthEvent::SignedIn);
                }
                Err(err) => {
                    console::warn!("session refresh failed", err.to_string());
                    self.store_session(None);
                    self.emit(AuthEvent::SignedOut);
                }
            }
        } else {
            self.emit(AuthEvent::SignedIn);
        }
    }

    /// Provider base URL, shared with the data-store client.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Publishable key, shared with the data-store client.
    pub(crate) fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    /// Access token of the held session, if any.
    pub(crate) fn access_token(&self) -> Option<String> {
        self.session
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    fn emit(&self, event: AuthEvent) {
        let change = AuthChange {
            event,
            session: self.session.borrow().clone(),
        };
        let listeners: Vec<Callback<AuthChange>> =
            self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener.emit(change.clone());
        }
    }

    fn store_session(&self, session: Option<Session>) {
        match &session {
            Some(value) => set_storage(SESSION_KEY, value),
            None => delete_storage(SESSION_KEY),
        }
        *self.session.borrow_mut() = session;
    }

    async fn exchange_recovery_tokens(&self, hash: &str) -> Result<(), ProviderError> {
        let params = parse_fragment(hash);
        let access = params
            .get("access_token")
            .cloned()
            .ok_or_else(|| ProviderError::new(None, "recovery link missing access token"))?;
        let refresh = params.get("refresh_token").cloned().unwrap_or_default();
        let expires_at = params
            .get("expires_at")
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
        let user = self.fetch_user(&access).await?;
        self.store_session(Some(Session {
            access_token: access,
            refresh_token: refresh,
            expires_at,
            user,
        }));
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, ProviderError> {
        let dto: SessionDto = self
            .post_json(
                "/auth/v1/token?grant_type=refresh_token",
                &serde_json::json!({ "refresh_token": refresh_token }),
                None,
            )
            .await?;
        Ok(session_from_dto(dto))
    }

    async fn fetch_user(&self, access_token: &str) -> Result<UserIdentity, ProviderError> {
        let response = Request::get(&format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.publishable_key)
            .header("Authorization", &format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(transport_error)?;
        if response.ok() {
            let dto: UserDto = response.json().await.map_err(transport_error)?;
            Ok(UserIdentity {
                id: dto.id,
                email: dto.email,
            })
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<T, ProviderError> {
        let mut request = Request::post(&format!("{}{}", self.base_url, path))
            .header("apikey", &self.publishable_key);
        if let Some(token) = bearer {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        let response = request
            .json(body)
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;
        if response.ok() {
            response.json::<T>().await.map_err(transport_error)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn post_no_content(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<(), ProviderError> {
        let mut request = Request::post(&format!("{}{}", self.base_url, path))
            .header("apikey", &self.publishable_key);
        if let Some(token) = bearer {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        let response = match body {
            Some(body) => request.json(body).map_err(transport_error)?.send().await,
            None => request.send().await,
        }
        .map_err(transport_error)?;
        if response.ok() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

#[async_trait(?Send)]
impl IdentityGateway for ProviderClient {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.session.borrow().clone())
    }

    async fn current_user(&self) -> Result<Option<UserIdentity>, ProviderError> {
        let token = self.access_token();
        let Some(token) = token else { return Ok(None) };
        match self.fetch_user(&token).await {
            Ok(user) => Ok(Some(user)),
            // A rejected token is "no user", not a transport failure.
            Err(err) if err.status == Some(401) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let dto: SessionDto = self
            .post_json(
                "/auth/v1/token?grant_type=password",
                &serde_json::json!({ "email": email, "password": password }),
                None,
            )
            .await?;
        let session = session_from_dto(dto);
        self.store_session(Some(session.clone()));
        self.emit(AuthEvent::SignedIn);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, ProviderError> {
        let dto: UserDto = self
            .post_json(
                "/auth/v1/signup",
                &serde_json::json!({ "email": email, "password": password }),
                None,
            )
            .await?;
        Ok(UserIdentity {
            id: dto.id,
            email: dto.email,
        })
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let token = self.access_token();
        let had_session = token.is_some();
        let result = match token {
            Some(token) => {
                self.post_no_content("/auth/v1/logout", None, Some(&token))
                    .await
            }
            None => Ok(()),
        };
        self.store_session(None);
        if had_session {
            self.emit(AuthEvent::SignedOut);
        }
        result
    }

    async fn update_credential(&self, new_password: &str) -> Result<(), ProviderError> {
        let token = self
            .access_token()
            .ok_or_else(|| ProviderError::new(Some(401), "no active session"))?;
        let response = Request::put(&format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.publishable_key)
            .header("Authorization", &format!("Bearer {token}"))
            .json(&serde_json::json!({ "password": new_password }))
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;
        if response.ok() {
            self.emit(AuthEvent::UserUpdated);
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn send_recovery_email(&self, email: &str) -> Result<(), ProviderError> {
        self.post_no_content(
            "/auth/v1/recover",
            Some(&serde_json::json!({ "email": email })),
            None,
        )
        .await
    }
}

#[derive(Deserialize)]
struct SessionDto {
    access_token: String,
    refresh_token: String,
    expires_at: Option<i64>,
    user: UserDto,
}

#[derive(Deserialize)]
struct UserDto {
    id: Uuid,
    email: String,
}

fn session_from_dto(dto: SessionDto) -> Session {
    Session {
        access_token: dto.access_token,
        refresh_token: dto.refresh_token,
        expires_at: dto
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        user: UserIdentity {
            id: dto.user.id,
            email: dto.user.email,
        },
    }
}

fn parse_fragment(hash: &str) -> HashMap<String, String> {
    hash.trim_start_matches('#')
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

fn transport_error(err: gloo_net::Error) -> ProviderError {
    ProviderError::new(None, err.to_string())
}

async fn error_from_response(response: Response) -> ProviderError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.into_message(),
        Err(_) => format!("http {status}"),
    };
    ProviderError::new(Some(status), message)
}

#[derive(Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .unwrap_or_else(|| "provider error".to_string())
    }
}
