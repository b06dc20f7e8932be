//! Downloadable VM reports (Global Center).

use crate::client::TintriClient;
use crate::models::VmReportFilter;
use crate::session::Session;
use crate::Result;

pub(crate) const VM_REPORT_PATH: &str = "/v310/vm/vmListDownloadable";

impl TintriClient {
    /// Request a downloadable VM report.
    ///
    /// The endpoint answers 200 with the download URL as plain response
    /// text; the URL stays valid for a fixed window on the server side.
    ///
    /// # Errors
    ///
    /// API fault on any other status.
    pub async fn generate_vm_report(
        &self,
        filter: &VmReportFilter,
        session: &Session,
    ) -> Result<String> {
        let response = self
            .post(VM_REPORT_PATH, Some(filter), session)
            .await?
            .expect_status(200)?;
        Ok(response.body().trim().to_string())
    }
}
