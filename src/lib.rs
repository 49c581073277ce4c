//! mailcow mailbox provisioning library
//!
//! Creates, edits, deletes and inspects mailbox accounts through the
//! [mailcow](https://mailcow.email) admin API. New mailboxes get a
//! random 32-character password and a fixed set of user ACLs.
//!
//! ```no_run
//! use mailcow_accounts::{ActivityState, ApiConfig, MailboxManager, MailcowClient};
//!
//! # async fn run() -> mailcow_accounts::Result<()> {
//! let client = MailcowClient::new(&ApiConfig::from_env()?)?;
//! let manager = MailboxManager::new(client);
//!
//! let created = manager
//!     .provision("alice@example.org", "Alice", ActivityState::Enabled, 2048)
//!     .await?;
//! println!("password for {}: {}", created.email, created.password);
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod error;
mod manager;
mod password;
mod types;

pub use api::MailboxApi;
pub use client::MailcowClient;
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use manager::MailboxManager;
pub use password::{PASSWORD_LENGTH, generate_password};
pub use types::{
    AccountExistence, AclAttributes, AclEditRequest, ActivityState, MailboxAttributes,
    MailboxDeleteRequest, MailboxEditRequest, MailboxPostRequest, MailboxRecord,
    ProvisionedMailbox, UserAcl,
};
