//! Wire models for the Tintri REST API.
//!
//! Request objects carry the `typeId` discriminator the server expects;
//! response objects keep unknown fields in a flattened map so callers can
//! reach attributes these structs do not name.

use serde::{Deserialize, Serialize};
use tintri_core::error::Error;
use tintri_core::query::QueryParams;

pub(crate) const CREDENTIALS_TYPE_ID: &str =
    "com.tintri.api.rest.vcommon.dto.rbac.RestApiCredentials";
const SNAPSHOT_SPEC_TYPE_ID: &str =
    "com.tintri.api.rest.v310.dto.domain.beans.snapshot.SnapshotSpec";
const MULTIPLE_SELECTION_TYPE_ID: &str = "com.tintri.api.rest.v310.dto.MultipleSelectionRequest";
const COLLECTION_CHANGE_TYPE_ID: &str = "com.tintri.api.rest.v310.dto.CollectionChangeRequest";
const VM_REPORT_FILTER_TYPE_ID: &str =
    "com.tintri.api.rest.v310.dto.domain.beans.vm.VirtualMachineDownloadableReportFilter";

/// Login payload: credentials plus the fixed type discriminator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    type_id: &'static str,
}

impl<'a> LoginRequest<'a> {
    pub(crate) fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            username,
            password,
            type_id: CREDENTIALS_TYPE_ID,
        }
    }
}

/// Vendor-format object identifier, nested as `{"uuid": "..."}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TintriUuid {
    /// Identifier string.
    pub uuid: String,
}

/// Hypervisor-sourced attributes of a VM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmwareInfo {
    /// VM name as known to the hypervisor.
    pub name: String,
    /// Remaining hypervisor attributes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// QoS configuration of a VM: minimum and maximum normalized IOPS.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QosConfig {
    /// Minimum normalized IOPS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_normalized_iops: Option<u64>,
    /// Maximum normalized IOPS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_normalized_iops: Option<u64>,
    /// Server-side type discriminator, echoed back on updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
}

/// Per-VM statistics envelope; `sortedStats` holds the newest slice first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmStats {
    /// Statistic slices, newest first.
    #[serde(default)]
    pub sorted_stats: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl VmStats {
    /// The most recent statistic slice, when one is present.
    #[must_use]
    pub fn latest(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.sorted_stats.first()
    }
}

/// A virtual machine as returned by `/v310/vm`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vm {
    /// Tintri-assigned VM identifier.
    pub uuid: TintriUuid,
    /// Hypervisor attributes, including the VM name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmware: Option<VmwareInfo>,
    /// QoS configuration, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos_config: Option<QosConfig>,
    /// Statistics, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<VmStats>,
    /// Whether the VM is live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_live: Option<bool>,
    /// Remaining VM attributes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Vm {
    /// The hypervisor VM name, when reported.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.vmware.as_ref().map(|vmware| vmware.name.as_str())
    }
}

/// Filters supported by the `/v310/vm` list endpoint.
#[derive(Debug, Default, Clone)]
pub struct VmFilter {
    /// Filter by hypervisor VM name.
    pub name: Option<String>,
    /// Restrict to live (or non-live) VMs.
    pub live: Option<bool>,
    /// Restrict to specific Tintri UUIDs (repeated key).
    pub uuids: Vec<String>,
    /// Page size limit.
    pub limit: Option<u32>,
    /// Page offset.
    pub offset: Option<u32>,
}

impl VmFilter {
    /// Select live VMs only, matching the `live=TRUE` filter convention.
    #[must_use]
    pub fn live_only() -> Self {
        Self {
            live: Some(true),
            ..Self::default()
        }
    }

    /// Convert the filter into query parameters.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("name", self.name.as_deref());
        // The server expects the literal uppercase booleans here.
        params.push_opt_with("live", self.live, |live| {
            if live { "TRUE" } else { "FALSE" }.to_string()
        });
        params.push_all("uuid", &self.uuids);
        params.push_opt("offset", self.offset);
        params.push_opt("limit", self.limit);
        params
    }
}

/// Snapshot consistency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Consistency {
    /// Crash-consistent snapshot (the default).
    CrashConsistent,
    /// VM-consistent snapshot.
    VmConsistent,
}

impl std::str::FromStr for Consistency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "crash" => Ok(Self::CrashConsistent),
            "vm" => Ok(Self::VmConsistent),
            other => Err(Error::Config(format!(
                "consistency type is not 'crash' or 'vm': {other}"
            ))),
        }
    }
}

/// Specification for one manual snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSpec {
    type_id: &'static str,
    /// Consistency level.
    pub consistency: Consistency,
    /// Retention in minutes.
    pub retention_minutes: u32,
    /// Snapshot display name.
    pub snapshot_name: String,
    /// Tintri UUID of the source VM.
    #[serde(rename = "sourceVmTintriUUID")]
    pub source_vm_uuid: String,
}

impl SnapshotSpec {
    /// Default retention for manual snapshots: four hours.
    pub const DEFAULT_RETENTION_MINUTES: u32 = 240;

    /// Build a snapshot specification with the default retention.
    #[must_use]
    pub fn new(
        source_vm_uuid: impl Into<String>,
        snapshot_name: impl Into<String>,
        consistency: Consistency,
    ) -> Self {
        Self {
            type_id: SNAPSHOT_SPEC_TYPE_ID,
            consistency,
            retention_minutes: Self::DEFAULT_RETENTION_MINUTES,
            snapshot_name: snapshot_name.into(),
            source_vm_uuid: source_vm_uuid.into(),
        }
    }
}

/// A snapshot as returned by `/v310/snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Tintri-assigned snapshot identifier.
    pub uuid: TintriUuid,
    /// Name of the VM the snapshot belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_name: Option<String>,
    /// Creation time, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    /// Remaining snapshot attributes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Bulk property update applied to a set of objects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleSelectionRequest<T> {
    type_id: &'static str,
    /// Tintri UUIDs of the objects to update.
    pub ids: Vec<String>,
    /// Object carrying the new property values.
    pub new_value: T,
    /// Names of the properties to take from `new_value`.
    pub property_names: Vec<&'static str>,
}

impl<T: Serialize> MultipleSelectionRequest<T> {
    /// Build a bulk update request.
    #[must_use]
    pub fn new(ids: Vec<String>, new_value: T, property_names: Vec<&'static str>) -> Self {
        Self {
            type_id: MULTIPLE_SELECTION_TYPE_ID,
            ids,
            new_value,
            property_names,
        }
    }
}

/// Membership change applied to a collection (e.g. service group members).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionChangeRequest {
    type_id: &'static str,
    /// Object IDs to add to the collection.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub object_ids_added: Vec<String>,
    /// Object IDs to remove from the collection.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub object_ids_removed: Vec<String>,
}

impl CollectionChangeRequest {
    /// Build a request that adds the given IDs.
    #[must_use]
    pub fn adding(object_ids: Vec<String>) -> Self {
        Self {
            type_id: COLLECTION_CHANGE_TYPE_ID,
            object_ids_added: object_ids,
            object_ids_removed: Vec::new(),
        }
    }

    /// Build a request that removes the given IDs.
    #[must_use]
    pub fn removing(object_ids: Vec<String>) -> Self {
        Self {
            type_id: COLLECTION_CHANGE_TYPE_ID,
            object_ids_added: Vec::new(),
            object_ids_removed: object_ids,
        }
    }
}

/// A service group as returned by `/v310/servicegroup` (Global Center).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGroup {
    /// Tintri-assigned group identifier.
    pub uuid: TintriUuid,
    /// Group display name.
    pub name: String,
    /// Remaining group attributes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A VMstore pool as returned by `/v310/vmstorePool` (Global Center).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmstorePool {
    /// Tintri-assigned pool identifier.
    pub uuid: TintriUuid,
    /// Pool display name.
    pub name: String,
    /// Remaining pool attributes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A scale-out recommendation for one VMstore pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Recommendation identifier, quoted when accepting.
    pub id: String,
    /// Lifecycle state, e.g. `AVAILABLE` or `NO_RECOMMENDATION_NEEDED`.
    pub state: String,
    /// Remaining recommendation attributes (issues, actions, outcomes).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Recommendation {
    /// State of a recommendation that is ready to be accepted.
    pub const STATE_AVAILABLE: &'static str = "AVAILABLE";

    /// Returns true when the recommendation can be accepted.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state == Self::STATE_AVAILABLE
    }
}

/// Appliance hardware and software description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceInfo {
    /// Hardware model name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Appliance OS version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    /// Remaining appliance attributes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Filter posted to the downloadable VM report endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmReportFilter {
    type_id: &'static str,
    /// Attachment (output) file name.
    pub attachment: String,
    /// Attribute names to include in the report.
    pub attributes: Vec<String>,
    /// Start of the reporting window; empty for unbounded.
    pub since: String,
    /// End of the reporting window; empty for unbounded.
    pub until: String,
    /// Report format.
    pub format: String,
}

impl VmReportFilter {
    /// Build a CSV report filter over the full reporting window.
    #[must_use]
    pub fn csv(attachment: impl Into<String>, attributes: Vec<String>) -> Self {
        Self {
            type_id: VM_REPORT_FILTER_TYPE_ID,
            attachment: attachment.into(),
            attributes,
            since: String::new(),
            until: String::new(),
            format: "CSV".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_request_carries_type_discriminator() {
        let value = serde_json::to_value(LoginRequest::new("admin", "pw")).unwrap();
        assert_eq!(
            value,
            json!({
                "username": "admin",
                "password": "pw",
                "typeId": "com.tintri.api.rest.vcommon.dto.rbac.RestApiCredentials"
            })
        );
    }

    #[test]
    fn snapshot_spec_serializes_like_the_server_expects() {
        let spec = SnapshotSpec::new("916-aaaa", "web01-snap", Consistency::CrashConsistent);
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({
                "typeId": "com.tintri.api.rest.v310.dto.domain.beans.snapshot.SnapshotSpec",
                "consistency": "CRASH_CONSISTENT",
                "retentionMinutes": 240,
                "snapshotName": "web01-snap",
                "sourceVmTintriUUID": "916-aaaa"
            })
        );
    }

    #[test]
    fn consistency_parses_cli_spellings() {
        assert_eq!("crash".parse::<Consistency>().unwrap(), Consistency::CrashConsistent);
        assert_eq!("vm".parse::<Consistency>().unwrap(), Consistency::VmConsistent);
        assert!("warm".parse::<Consistency>().is_err());
    }

    #[test]
    fn vm_filter_renders_uppercase_live_and_repeated_uuids() {
        let filter = VmFilter {
            live: Some(true),
            uuids: vec!["a-1".to_string(), "a-2".to_string()],
            ..VmFilter::default()
        };
        let pairs = filter.to_params().into_pairs();
        assert_eq!(
            pairs,
            vec![
                ("live", "TRUE".to_string()),
                ("uuid", "a-1".to_string()),
                ("uuid", "a-2".to_string()),
            ]
        );
    }

    #[test]
    fn multiple_selection_request_shape() {
        let request = MultipleSelectionRequest::new(
            vec!["u-1".to_string(), "u-2".to_string()],
            QosConfig {
                min_normalized_iops: Some(100),
                max_normalized_iops: Some(2000),
                type_id: None,
            },
            vec!["minNormalizedIops", "maxNormalizedIops"],
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "typeId": "com.tintri.api.rest.v310.dto.MultipleSelectionRequest",
                "ids": ["u-1", "u-2"],
                "newValue": {"minNormalizedIops": 100, "maxNormalizedIops": 2000},
                "propertyNames": ["minNormalizedIops", "maxNormalizedIops"]
            })
        );
    }

    #[test]
    fn collection_change_request_omits_empty_side() {
        let value = serde_json::to_value(CollectionChangeRequest::adding(vec![
            "u-1".to_string(),
        ]))
        .unwrap();
        assert_eq!(
            value,
            json!({
                "typeId": "com.tintri.api.rest.v310.dto.CollectionChangeRequest",
                "objectIdsAdded": ["u-1"]
            })
        );
    }

    #[test]
    fn report_filter_defaults_to_full_window_csv() {
        let filter = VmReportFilter::csv("vms.csv", vec!["vmName".to_string()]);
        let value = serde_json::to_value(&filter).unwrap();
        assert_eq!(value["format"], "CSV");
        assert_eq!(value["since"], "");
        assert_eq!(value["attachment"], "vms.csv");
        assert_eq!(
            value["typeId"],
            "com.tintri.api.rest.v310.dto.domain.beans.vm.VirtualMachineDownloadableReportFilter"
        );
    }
}
