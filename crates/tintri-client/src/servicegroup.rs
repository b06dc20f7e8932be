//! Service group operations (Global Center).
//!
//! Service groups exist on Global Center servers only; callers gate on the
//! product name and a minimum minor version of 31 before using these.

use crate::client::TintriClient;
use crate::models::{CollectionChangeRequest, ServiceGroup};
use crate::session::Session;
use crate::Result;
use tintri_core::page::Page;
use tintri_core::Error;

pub(crate) const SERVICE_GROUP_PATH: &str = "/v310/servicegroup";

/// Minimum minor version the service group endpoints were verified against.
pub const SERVICE_GROUP_MIN_MINOR: u32 = 31;

impl TintriClient {
    /// List all service groups.
    ///
    /// # Errors
    ///
    /// API fault on non-200, parse fault on an undecodable body.
    pub async fn list_service_groups(&self, session: &Session) -> Result<Page<ServiceGroup>> {
        self.get(SERVICE_GROUP_PATH, Some(session)).await?.json()
    }

    /// Find a service group by display name.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no group carries that name.
    pub async fn find_service_group(&self, name: &str, session: &Session) -> Result<ServiceGroup> {
        let page = self.list_service_groups(session).await?;
        page.items
            .into_iter()
            .find(|group| group.name == name)
            .ok_or_else(|| Error::NotFound(format!("service group {name} doesn't exist")))
    }

    /// Add VMs to a service group's static members; the endpoint answers 204.
    ///
    /// # Errors
    ///
    /// API fault on any other status.
    pub async fn add_service_group_members(
        &self,
        group_uuid: &str,
        vm_uuids: Vec<String>,
        session: &Session,
    ) -> Result<()> {
        let request = CollectionChangeRequest::adding(vm_uuids);
        self.put(
            &format!("{SERVICE_GROUP_PATH}/{group_uuid}/members/static"),
            &request,
            session,
        )
        .await?
        .expect_status(204)
        .map(|_| ())
    }
}
