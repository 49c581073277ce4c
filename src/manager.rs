//! Mailbox account lifecycle: provision, edit, delete, inspect

use crate::api::MailboxApi;
use crate::client::MailcowClient;
use crate::error::{Error, Result};
use crate::password::{PASSWORD_LENGTH, generate_password};
use crate::types::{
    AccountExistence, AclAttributes, AclEditRequest, ActivityState, MailboxAttributes,
    MailboxDeleteRequest, MailboxEditRequest, MailboxPostRequest, ProvisionedMailbox, UserAcl,
};
use tracing::{debug, info, warn};

/// Manages mailbox accounts through a [`MailboxApi`].
///
/// Holds no state besides the API handle, so concurrent calls on
/// different addresses are independent. Calls on the same address are
/// not coordinated.
#[derive(Debug, Clone)]
pub struct MailboxManager<A = MailcowClient> {
    api: A,
}

impl<A: MailboxApi> MailboxManager<A> {
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Create a mailbox with a fresh random password and the
    /// provisioning ACL set.
    ///
    /// The ACL is only applied once creation succeeded. If applying it
    /// fails, the new mailbox is deleted again and
    /// [`Error::PartialProvision`] reports whether that worked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] unless `email` contains exactly
    /// one `@`, or the remote error of the failing request.
    pub async fn provision(
        &self,
        email: &str,
        name: &str,
        active: ActivityState,
        quota: u64,
    ) -> Result<ProvisionedMailbox> {
        let (local_part, domain) = split_address(email)?;
        let password = generate_password(PASSWORD_LENGTH);

        let mailbox = MailboxPostRequest {
            active,
            force_pw_update: false,
            local_part: local_part.to_string(),
            domain: domain.to_string(),
            name: name.to_string(),
            quota,
            password: password.clone(),
            password2: password.clone(),
            tls_enforce_in: false,
            tls_enforce_out: false,
        };

        debug!("Creating mailbox {}", email);
        self.api.create_mailbox(&mailbox).await?;

        let acl = AclEditRequest {
            items: email.to_string(),
            attr: AclAttributes {
                user_acl: UserAcl::PROVISIONING_SET.to_vec(),
            },
        };

        if let Err(e) = self.api.edit_user_acl(&acl).await {
            warn!("Setting ACL for {} failed, removing mailbox: {}", email, e);
            let rolled_back = match self.api.delete_mailbox(&delete_request(email)).await {
                Ok(()) => true,
                Err(delete_err) => {
                    warn!("Rollback of {} failed: {}", email, delete_err);
                    false
                }
            };
            return Err(Error::PartialProvision {
                email: email.to_string(),
                rolled_back,
                source: Box::new(e),
            });
        }

        info!("Provisioned mailbox {}", email);
        Ok(ProvisionedMailbox {
            email: email.to_string(),
            password,
        })
    }

    /// Change the supplied attributes of an existing mailbox.
    ///
    /// # Errors
    ///
    /// Returns the remote error, e.g. when the mailbox does not exist.
    pub async fn edit(&self, email: &str, attributes: MailboxAttributes) -> Result<()> {
        let request = MailboxEditRequest {
            items: vec![email.to_string()],
            attr: attributes,
        };
        debug!("Editing mailbox {}", email);
        self.api.edit_mailbox(&request).await?;
        info!("Edited mailbox {}", email);
        Ok(())
    }

    /// Delete a mailbox.
    ///
    /// # Errors
    ///
    /// Returns the remote error unchanged; deleting an unknown mailbox
    /// fails or succeeds as mailcow decides.
    pub async fn delete(&self, email: &str) -> Result<()> {
        debug!("Deleting mailbox {}", email);
        self.api.delete_mailbox(&delete_request(email)).await?;
        info!("Deleted mailbox {}", email);
        Ok(())
    }

    /// Report whether a mailbox exists, with its state and display name.
    ///
    /// Only the first matching record is consulted. A record whose
    /// display name is missing or `null` reports `name: None`.
    ///
    /// # Errors
    ///
    /// Any lookup failure is returned as [`Error::Lookup`] wrapping the
    /// original error. A record whose `active_int` is not one of the
    /// three known codes is also a lookup failure, wrapping
    /// [`Error::InvalidResponse`], since it has no [`ActivityState`].
    pub async fn check_exists(&self, email: &str) -> Result<AccountExistence> {
        let lookup = |source: Error| Error::Lookup {
            email: email.to_string(),
            source: Box::new(source),
        };

        let records = self.api.get_mailbox(email).await.map_err(lookup)?;
        let Some(record) = records.into_iter().next() else {
            debug!("Mailbox {} not found", email);
            return Ok(AccountExistence::missing());
        };

        let active = ActivityState::try_from(record.active_int)
            .map_err(|e| lookup(Error::InvalidResponse(e)))?;

        Ok(AccountExistence {
            exists: true,
            active,
            name: record.name,
        })
    }
}

fn delete_request(email: &str) -> MailboxDeleteRequest {
    MailboxDeleteRequest {
        mailboxes: vec![email.to_string()],
    }
}

/// Split an address into local part and domain.
///
/// The address must contain exactly one `@`; with none or several there
/// is no unambiguous domain, so nothing is sent. The parts themselves
/// are not validated further, mailcow does that.
fn split_address(email: &str) -> Result<(&str, &str)> {
    match email.split_once('@') {
        Some((local_part, domain)) if !domain.contains('@') => Ok((local_part, domain)),
        _ => Err(Error::InvalidAddress(email.to_string())),
    }
}
