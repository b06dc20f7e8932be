//! Appliance information (VMstore).

use crate::client::TintriClient;
use crate::models::ApplianceInfo;
use crate::session::Session;
use crate::Result;

pub(crate) const APPLIANCE_INFO_PATH: &str = "/v310/appliance/default/info";

impl TintriClient {
    /// Fetch model and OS information for the default appliance.
    ///
    /// # Errors
    ///
    /// API fault on non-200, parse fault on an undecodable body.
    pub async fn appliance_info(&self, session: &Session) -> Result<ApplianceInfo> {
        self.get(APPLIANCE_INFO_PATH, Some(session)).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn appliance_info_decodes_model_and_os() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v310/appliance/default/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "modelName": "T5080",
                "osVersion": "4.2.1.1-7706.35097.22100",
                "uptime": 1234
            })))
            .mount(&server)
            .await;

        let client = TintriClient::new(server.uri()).unwrap();
        let info = client.appliance_info(&Session::new("S")).await.unwrap();
        assert_eq!(info.model_name.as_deref(), Some("T5080"));
        assert_eq!(info.os_version.as_deref(), Some("4.2.1.1-7706.35097.22100"));
        assert!(info.extra.contains_key("uptime"));
    }
}
