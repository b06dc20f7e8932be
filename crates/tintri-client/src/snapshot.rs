//! Snapshot operations.

use crate::client::TintriClient;
use crate::models::{Snapshot, SnapshotSpec};
use crate::session::Session;
use crate::Result;
use tintri_core::page::Page;
use tintri_core::query::QueryParams;

pub(crate) const SNAPSHOT_PATH: &str = "/v310/snapshot";

impl TintriClient {
    /// Take manual snapshots.
    ///
    /// The endpoint accepts a list of specifications and answers 200 with a
    /// JSON array of the created snapshot UUIDs, in order.
    ///
    /// # Errors
    ///
    /// API fault on any other status, parse fault on an undecodable body.
    pub async fn create_snapshots(
        &self,
        specs: &[SnapshotSpec],
        session: &Session,
    ) -> Result<Vec<String>> {
        self.post(SNAPSHOT_PATH, Some(specs), session)
            .await?
            .expect_status(200)?
            .json()
    }

    /// List snapshots matching `query` (e.g. per-VM or oldest-first).
    ///
    /// # Errors
    ///
    /// API fault on non-200, parse fault on an undecodable body.
    pub async fn list_snapshots(
        &self,
        query: &QueryParams,
        session: &Session,
    ) -> Result<Page<Snapshot>> {
        self.get_query(SNAPSHOT_PATH, query, session).await?.json()
    }

    /// Delete one snapshot by UUID; the endpoint answers 200.
    ///
    /// # Errors
    ///
    /// API fault on any other status.
    pub async fn delete_snapshot(&self, uuid: &str, session: &Session) -> Result<()> {
        self.delete(&format!("{SNAPSHOT_PATH}/{uuid}"), session)
            .await?
            .expect_status(200)
            .map(|_| ())
    }
}
