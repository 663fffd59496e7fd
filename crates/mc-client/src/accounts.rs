//! Messaging account resources.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

const ACCOUNTS_PATH: &str = "/accounts";

/// A messaging account as returned by the backend.
///
/// Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassChatAccount {
    /// Account id.
    pub id: Option<i64>,
    /// Linked live-chat channel.
    pub im_livechat_channel_id: Option<i64>,
    /// Owning company.
    pub company_id: Option<i64>,
    /// Pipeline stage.
    pub mass_chat_stage_id: Option<i64>,
    /// Creating user.
    pub create_uid: Option<i64>,
    /// Last modifying user.
    pub write_uid: Option<i64>,
    /// Display name.
    pub name: Option<String>,
    /// Provider endpoint URL.
    pub endpoint: Option<String>,
    /// Provider instance id.
    #[serde(rename = "instanceId")]
    pub instance_id: Option<String>,
    /// Provider API token.
    pub token: Option<String>,
    /// Phone number bound to the account.
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    /// Creation timestamp, as sent by the backend.
    pub create_date: Option<String>,
    /// Last modification timestamp.
    pub write_date: Option<String>,
    /// Messaging provider.
    pub provider: Option<String>,
    /// Conversation timeout in hours.
    pub timeout_hours: Option<i64>,
    /// Greeting sent to new conversations.
    pub welcome_text: Option<String>,
    /// Media attached to the greeting.
    pub welcome_url_media: Option<String>,
}

/// Request body for creating an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    /// Display name. Required.
    pub name: String,
    /// Messaging provider. Required.
    pub provider: String,
    /// Phone number bound to the account.
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    /// Provider endpoint URL.
    pub endpoint: Option<String>,
    /// Greeting sent to new conversations.
    pub welcome_text: Option<String>,
}

impl NewAccount {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            ..Self::default()
        }
    }

    /// Sets the phone number. Blank values are sent as null.
    #[must_use]
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = non_blank(phone_number.into());
        self
    }

    /// Sets the endpoint. Blank values are sent as null.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = non_blank(endpoint.into());
        self
    }

    /// Sets the welcome text. Blank values are sent as null.
    #[must_use]
    pub fn with_welcome_text(mut self, welcome_text: impl Into<String>) -> Self {
        self.welcome_text = non_blank(welcome_text.into());
        self
    }

    /// Checks required fields.
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation("Name is required".to_string()));
        }
        if self.provider.trim().is_empty() {
            return Err(ClientError::Validation("Provider is required".to_string()));
        }
        Ok(())
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Account endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    client: &'a ApiClient,
}

impl<'a> Accounts<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists all accounts.
    pub async fn list(&self) -> ClientResult<Vec<MassChatAccount>> {
        self.client.get(ACCOUNTS_PATH).await
    }

    /// Fetches one account.
    pub async fn get(&self, id: i64) -> ClientResult<MassChatAccount> {
        self.client.get(&format!("{ACCOUNTS_PATH}/{id}")).await
    }

    /// Creates an account after validating required fields.
    pub async fn create(&self, account: &NewAccount) -> ClientResult<MassChatAccount> {
        account.validate()?;
        let created: MassChatAccount = self.client.post(ACCOUNTS_PATH, account).await?;
        tracing::info!(id = ?created.id, name = %account.name, "account created");
        Ok(created)
    }
}
