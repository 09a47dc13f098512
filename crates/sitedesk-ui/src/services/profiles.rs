//! REST access to the `profiles` table.

use crate::services::provider::ProviderClient;
use async_trait::async_trait;
use gloo::console;
use gloo_net::http::Request;
use serde::Deserialize;
use sitedesk_identity::error::StoreError;
use sitedesk_identity::gateway::ProfileStore;
use sitedesk_identity::profile::{Profile, UserId};
use sitedesk_identity::role::Role;
use std::rc::Rc;
use uuid::Uuid;

/// Profile reads and latch writes over the provider's table REST surface.
pub(crate) struct RestProfileStore {
    client: Rc<ProviderClient>,
}

impl RestProfileStore {
    /// Build the store over the shared provider client.
    pub(crate) fn new(client: Rc<ProviderClient>) -> Self {
        Self { client }
    }

    fn row_url(&self, user_id: UserId) -> String {
        format!(
            "{}/rest/v1/profiles?user_id=eq.{user_id}",
            self.client.base_url()
        )
    }

    fn authorize(&self, request: Request) -> Request {
        let request = request.header("apikey", self.client.publishable_key());
        match self.client.access_token() {
            Some(token) => request.header("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

#[async_trait(?Send)]
impl ProfileStore for RestProfileStore {
    async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>, StoreError> {
        let url = format!(
            "{}&select=user_id,role,password_reset_in_progress",
            self.row_url(user_id)
        );
        let response = self
            .authorize(Request::get(&url).header("Accept", "application/json"))
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        if !response.ok() {
            return Err(StoreError::Rejected(format!("http {}", response.status())));
        }
        let rows: Vec<ProfileRow> = response
            .json()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        Ok(rows.into_iter().next().map(profile_from_row))
    }

    async fn set_reset_latch(&self, user_id: UserId, value: bool) -> Result<(), StoreError> {
        let response = self
            .authorize(
                Request::patch(&self.row_url(user_id)).header("Prefer", "return=minimal"),
            )
            .json(&serde_json::json!({ "password_reset_in_progress": value }))
            .map_err(|err| StoreError::Transport(err.to_string()))?
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        if response.ok() {
            Ok(())
        } else {
            Err(StoreError::Rejected(format!("http {}", response.status())))
        }
    }
}

#[derive(Deserialize)]
struct ProfileRow {
    user_id: Uuid,
    role: Option<String>,
    password_reset_in_progress: bool,
}

fn profile_from_row(row: ProfileRow) -> Profile {
    let role = row.role.as_deref().and_then(Role::parse);
    if row.role.is_some() && role.is_none() {
        // Anything outside the closed role set is treated as unassigned.
        console::warn!("unknown role value on profile", row.user_id.to_string());
    }
    Profile {
        user_id: row.user_id,
        role,
        password_reset_in_progress: row.password_reset_in_progress,
    }
}
