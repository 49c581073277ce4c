//! The remote mailbox-administration API

use crate::error::Result;
use crate::types::{
    AclEditRequest, MailboxDeleteRequest, MailboxEditRequest, MailboxPostRequest, MailboxRecord,
};
use std::future::Future;

/// One method per mailcow endpoint used by
/// [`MailboxManager`](crate::MailboxManager).
///
/// [`MailcowClient`](crate::MailcowClient) is the HTTP implementation.
pub trait MailboxApi: Send + Sync {
    fn create_mailbox(
        &self,
        request: &MailboxPostRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    fn edit_mailbox(
        &self,
        request: &MailboxEditRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    fn delete_mailbox(
        &self,
        request: &MailboxDeleteRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    fn edit_user_acl(
        &self,
        request: &AclEditRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Mailbox records matching `email`; empty when there are none.
    fn get_mailbox(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Vec<MailboxRecord>>> + Send;
}
