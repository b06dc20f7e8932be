//! Parsing tests against realistic appliance response bodies.

use tintri_client::models::{ApplianceInfo, Vm};
use tintri_core::page::Page;
use tintri_core::version::{VersionInfo, PRODUCT_VMSTORE};

#[test]
fn parses_info_endpoint_body() {
    let body = r#"{
        "productName": "Tintri VMstore",
        "preferredVersion": "v310.51",
        "supportedVersions": ["v310.51", "v310.31", "v310.21"],
        "osVersion": "4.2.1.1-7706.35097.22100"
    }"#;
    let info: VersionInfo = serde_json::from_str(body).unwrap();
    assert_eq!(info.product_name, PRODUCT_VMSTORE);
    let version = info.preferred().unwrap();
    assert_eq!(version.major, "v310");
    assert_eq!(version.minor, 51);
    assert!(info.check(PRODUCT_VMSTORE, 31).is_ok());
}

#[test]
fn parses_vm_page_with_stats_and_qos() {
    let body = r#"{
        "typeId": "com.tintri.api.rest.v310.dto.CollectionResult",
        "filteredTotal": 2,
        "absoluteTotal": 17,
        "offset": 0,
        "limit": 25,
        "next": "offset=25&limit=25",
        "items": [
            {
                "typeId": "com.tintri.api.rest.v310.dto.domain.VirtualMachine",
                "uuid": {"uuid": "916A67F1-5A1E-20D8-A88E-5B1C0A73F8D9-VIM-000A"},
                "vmware": {"name": "web01", "storageContainers": ["default"]},
                "isLive": true,
                "qosConfig": {
                    "typeId": "com.tintri.api.rest.v310.dto.domain.beans.perf.VirtualMachineQoSConfig",
                    "minNormalizedIops": 100,
                    "maxNormalizedIops": 2000
                },
                "stat": {
                    "sortedStats": [
                        {"spaceUsedGiB": 12.5, "operationsTotalIops": 341, "latencyTotalMs": 1.2}
                    ]
                }
            },
            {
                "uuid": {"uuid": "916A67F1-5A1E-20D8-A88E-5B1C0A73F8D9-VIM-000B"},
                "vmware": {"name": "db01"},
                "isLive": false
            }
        ]
    }"#;
    let page: Page<Vm> = serde_json::from_str(body).unwrap();
    assert_eq!(page.total(), Some(2));
    assert_eq!(page.next_query(), Some("offset=25&limit=25"));
    assert_eq!(page.items.len(), 2);

    let web01 = &page.items[0];
    assert_eq!(web01.name(), Some("web01"));
    assert_eq!(web01.is_live, Some(true));
    let qos = web01.qos_config.as_ref().unwrap();
    assert_eq!(qos.min_normalized_iops, Some(100));
    assert_eq!(qos.max_normalized_iops, Some(2000));
    assert!(qos.type_id.as_deref().unwrap().ends_with("QoSConfig"));

    let latest = web01.stat.as_ref().unwrap().latest().unwrap();
    assert_eq!(latest["operationsTotalIops"], 341);

    let db01 = &page.items[1];
    assert!(db01.qos_config.is_none());
    assert!(db01.stat.is_none());
}

#[test]
fn parses_appliance_info_body() {
    let body = r#"{
        "typeId": "com.tintri.api.rest.v310.dto.domain.beans.hardware.ApplianceInfo",
        "modelName": "T5080",
        "osVersion": "4.2.1.1-7706.35097.22100",
        "totalRawSpace": 103079215104
    }"#;
    let info: ApplianceInfo = serde_json::from_str(body).unwrap();
    assert_eq!(info.model_name.as_deref(), Some("T5080"));
    assert!(info.extra.contains_key("totalRawSpace"));
}
