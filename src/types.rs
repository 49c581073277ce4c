//! mailcow API payloads and records
//!
//! Request bodies mirror the JSON the mailcow admin API expects;
//! [`MailboxRecord`] is what a mailbox lookup returns.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delivery and login state of a mailbox.
///
/// Sent to mailcow as the bare integer code.
///
/// # Examples
///
/// ```
/// use mailcow_accounts::ActivityState;
///
/// assert_eq!(u8::from(ActivityState::LoginDisabled), 2);
/// assert_eq!("enabled".parse::<ActivityState>().unwrap(), ActivityState::Enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ActivityState {
    /// No incoming mail, no login (`0`).
    #[default]
    Disabled,
    /// Incoming mail and login allowed (`1`).
    Enabled,
    /// Incoming mail allowed, login refused (`2`).
    LoginDisabled,
}

impl ActivityState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::LoginDisabled => "login-disabled",
        }
    }
}

impl From<ActivityState> for u8 {
    fn from(state: ActivityState) -> Self {
        match state {
            ActivityState::Disabled => 0,
            ActivityState::Enabled => 1,
            ActivityState::LoginDisabled => 2,
        }
    }
}

impl TryFrom<u8> for ActivityState {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Enabled),
            2 => Ok(Self::LoginDisabled),
            other => Err(format!("unknown activity state {other}")),
        }
    }
}

impl FromStr for ActivityState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "disabled" => Ok(Self::Disabled),
            "1" | "enabled" => Ok(Self::Enabled),
            "2" | "login-disabled" => Ok(Self::LoginDisabled),
            other => Err(format!(
                "invalid activity state '{other}' \
                 (expected 0, 1, 2, disabled, enabled or login-disabled)"
            )),
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mailbox owner permission in mailcow's `user_acl` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAcl {
    SpamAlias,
    TlsPolicy,
    SpamScore,
    SpamPolicy,
    DelimiterAction,
    Syncjobs,
    EasReset,
    SogoProfileReset,
    Quarantine,
    QuarantineAttachments,
    QuarantineNotification,
    QuarantineCategory,
    AppPasswds,
    Pushover,
}

impl UserAcl {
    /// Permissions granted to every newly provisioned mailbox.
    pub const PROVISIONING_SET: [Self; 7] = [
        Self::SpamAlias,
        Self::TlsPolicy,
        Self::SpamScore,
        Self::SpamPolicy,
        Self::DelimiterAction,
        Self::Quarantine,
        Self::QuarantineNotification,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpamAlias => "spam_alias",
            Self::TlsPolicy => "tls_policy",
            Self::SpamScore => "spam_score",
            Self::SpamPolicy => "spam_policy",
            Self::DelimiterAction => "delimiter_action",
            Self::Syncjobs => "syncjobs",
            Self::EasReset => "eas_reset",
            Self::SogoProfileReset => "sogo_profile_reset",
            Self::Quarantine => "quarantine",
            Self::QuarantineAttachments => "quarantine_attachments",
            Self::QuarantineNotification => "quarantine_notification",
            Self::QuarantineCategory => "quarantine_category",
            Self::AppPasswds => "app_passwds",
            Self::Pushover => "pushover",
        }
    }
}

impl fmt::Display for UserAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST api/v1/add/mailbox`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailboxPostRequest {
    pub active: ActivityState,
    pub force_pw_update: bool,
    pub local_part: String,
    pub domain: String,
    pub name: String,
    pub quota: u64,
    pub password: String,
    pub password2: String,
    pub tls_enforce_in: bool,
    pub tls_enforce_out: bool,
}

/// Editable mailbox attributes. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MailboxAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<ActivityState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MailboxAttributes {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.active.is_none() && self.name.is_none()
    }
}

/// Body of `POST api/v1/edit/mailbox`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailboxEditRequest {
    pub items: Vec<String>,
    pub attr: MailboxAttributes,
}

/// Mailboxes to remove with `POST api/v1/delete/mailbox`.
///
/// mailcow expects the bare address array as the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MailboxDeleteRequest {
    pub mailboxes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclAttributes {
    pub user_acl: Vec<UserAcl>,
}

/// Body of `POST api/v1/edit/user-acl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclEditRequest {
    pub items: String,
    pub attr: AclAttributes,
}

/// A mailbox as reported by `GET api/v1/get/mailbox/{email}`.
///
/// Only the fields an existence check reads are decoded; everything
/// else in the record is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailboxRecord {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_int: u8,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Result of an existence check. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountExistence {
    pub exists: bool,
    pub active: ActivityState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AccountExistence {
    #[must_use]
    pub const fn missing() -> Self {
        Self {
            exists: false,
            active: ActivityState::Disabled,
            name: None,
        }
    }
}

/// A freshly created mailbox and its one-time password.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedMailbox {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for ProvisionedMailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionedMailbox")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
