//! VM listing, pagination, and QoS operations.

use crate::client::TintriClient;
use crate::models::{MultipleSelectionRequest, QosConfig, Vm, VmFilter};
use crate::session::Session;
use crate::Result;
use tintri_core::page::Page;
use tintri_core::Error;

pub(crate) const VM_PATH: &str = "/v310/vm";

impl TintriClient {
    /// Fetch a single page of VMs matching `filter`.
    ///
    /// # Errors
    ///
    /// API fault on non-200, parse fault on an undecodable body.
    pub async fn list_vms(&self, filter: &VmFilter, session: &Session) -> Result<Page<Vm>> {
        self.get_query(VM_PATH, &filter.to_params(), session)
            .await?
            .json()
    }

    /// Fetch every VM matching `filter`, following `next` cursors.
    ///
    /// Pages are fetched strictly one after another; the union of all pages
    /// matches the total the first page reports.
    ///
    /// # Errors
    ///
    /// Propagates the first fault from any page fetch.
    pub async fn list_vms_paged(
        &self,
        filter: &VmFilter,
        page_size: u32,
        session: &Session,
    ) -> Result<Vec<Vm>> {
        let mut first = filter.clone();
        first.offset = Some(0);
        first.limit = Some(page_size);

        let mut page = self.list_vms(&first, session).await?;
        let total = page.total();
        let mut vms = Vec::new();
        loop {
            vms.append(&mut page.items);
            let Some(next) = page.next_query().map(String::from) else {
                break;
            };
            page = self
                .get(&format!("{VM_PATH}?{next}"), Some(session))
                .await?
                .json()?;
        }
        tracing::debug!(total, fetched = vms.len(), "completed paged VM listing");
        Ok(vms)
    }

    /// Fetch one VM by its Tintri UUID.
    ///
    /// # Errors
    ///
    /// API fault on non-200, parse fault on an undecodable body.
    pub async fn get_vm(&self, uuid: &str, session: &Session) -> Result<Vm> {
        self.get(&format!("{VM_PATH}/{uuid}"), Some(session))
            .await?
            .json()
    }

    /// Find a VM by its hypervisor name.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no VM carries that name.
    pub async fn find_vm_by_name(&self, name: &str, session: &Session) -> Result<Vm> {
        let filter = VmFilter {
            name: Some(name.to_string()),
            ..VmFilter::default()
        };
        let page = self.list_vms(&filter, session).await?;
        page.items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("VM {name} doesn't exist")))
    }

    /// Update min/max normalized IOPS on the given VMs.
    ///
    /// Sends a bulk update to `/v310/vm/qosConfig`; the endpoint answers 204.
    ///
    /// # Errors
    ///
    /// API fault on any other status.
    pub async fn update_qos(
        &self,
        vm_uuids: Vec<String>,
        qos: QosConfig,
        session: &Session,
    ) -> Result<()> {
        let request = MultipleSelectionRequest::new(
            vm_uuids,
            qos,
            vec!["minNormalizedIops", "maxNormalizedIops"],
        );
        self.put(&format!("{VM_PATH}/qosConfig"), &request, session)
            .await?
            .expect_status(204)
            .map(|_| ())
    }
}
