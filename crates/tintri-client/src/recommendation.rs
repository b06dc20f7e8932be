//! VMstore pool scale-out recommendations (Global Center).

use crate::client::TintriClient;
use crate::models::{Recommendation, VmstorePool};
use crate::session::Session;
use crate::Result;
use tintri_core::page::Page;

pub(crate) const VMSTORE_POOL_PATH: &str = "/v310/vmstorePool";

/// Minimum minor version carrying pool recommendations.
pub const RECOMMENDATION_MIN_MINOR: u32 = 51;

impl TintriClient {
    /// List VMstore pools.
    ///
    /// # Errors
    ///
    /// API fault on non-200, parse fault on an undecodable body.
    pub async fn list_vmstore_pools(&self, session: &Session) -> Result<Page<VmstorePool>> {
        self.get(VMSTORE_POOL_PATH, Some(session)).await?.json()
    }

    /// Fetch the current recommendation for one pool.
    ///
    /// # Errors
    ///
    /// API fault on non-200, parse fault on an undecodable body.
    pub async fn current_recommendation(
        &self,
        pool_uuid: &str,
        session: &Session,
    ) -> Result<Recommendation> {
        self.get(
            &format!("{VMSTORE_POOL_PATH}/{pool_uuid}/recommendation/current"),
            Some(session),
        )
        .await?
        .json()
    }

    /// Accept and execute a recommendation.
    ///
    /// A trigger POST with no payload; the endpoint answers 204.
    ///
    /// # Errors
    ///
    /// API fault on any other status.
    pub async fn accept_recommendation(
        &self,
        pool_uuid: &str,
        reco_id: &str,
        session: &Session,
    ) -> Result<()> {
        self.post::<()>(
            &format!("{VMSTORE_POOL_PATH}/{pool_uuid}/recommendation/{reco_id}/accept"),
            None,
            session,
        )
        .await?
        .expect_status(204)
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn current_recommendation_decodes_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v310/vmstorePool/pool-1/recommendation/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "reco-1",
                "state": "AVAILABLE",
                "expectedOutcomes": []
            })))
            .mount(&server)
            .await;

        let client = TintriClient::new(server.uri()).unwrap();
        let reco = client
            .current_recommendation("pool-1", &Session::new("S"))
            .await
            .unwrap();
        assert_eq!(reco.id, "reco-1");
        assert!(reco.is_available());
    }

    #[tokio::test]
    async fn accept_recommendation_posts_trigger_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v310/vmstorePool/pool-1/recommendation/reco-1/accept"))
            .and(header("Cookie", "JSESSIONID=S"))
            .and(body_string(""))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = TintriClient::new(server.uri()).unwrap();
        client
            .accept_recommendation("pool-1", "reco-1", &Session::new("S"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn accept_recommendation_faults_on_non_204() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v310/vmstorePool/pool-1/recommendation/reco-1/accept"))
            .respond_with(ResponseTemplate::new(409).set_body_string("already executing"))
            .mount(&server)
            .await;

        let client = TintriClient::new(server.uri()).unwrap();
        let err = client
            .accept_recommendation("pool-1", "reco-1", &Session::new("S"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert!(err.to_string().contains("already executing"));
    }

    #[tokio::test]
    async fn list_vmstore_pools_decodes_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v310/vmstorePool"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "filteredTotal": 1,
                "items": [{"uuid": {"uuid": "pool-1"}, "name": "east"}]
            })))
            .mount(&server)
            .await;

        let client = TintriClient::new(server.uri()).unwrap();
        let page = client
            .list_vmstore_pools(&Session::new("S"))
            .await
            .unwrap();
        assert_eq!(page.total(), Some(1));
        assert_eq!(page.items[0].name, "east");
    }
}
