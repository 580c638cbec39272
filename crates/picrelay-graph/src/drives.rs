//! Drive discovery helpers
//!
//! Operators use these to find the drive id to configure: app-only
//! tenants often expose several document libraries and the target drive
//! id is not discoverable from the Azure portal alone.

use serde::{Deserialize, Serialize};

use crate::client::{decode, GraphClient};
use crate::DriveError;

/// Identity and kind of a drive visible to the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveSummary {
    /// Drive id, as used in every other operation
    pub id: String,
    /// Display name, when the provider reports one
    pub name: Option<String>,
    /// Provider drive kind, such as `business` or `documentLibrary`
    pub drive_type: Option<String>,
}

/// Collection shape for `/drives`
#[derive(Debug, Deserialize)]
struct DriveList {
    #[serde(default)]
    value: Vec<DriveSummary>,
}

/// Lists all drives the application can see
pub async fn list_drives(client: &GraphClient) -> Result<Vec<DriveSummary>, DriveError> {
    let value = client.get_json("/drives").await?;
    let drives: DriveList = decode(value, "drive listing")?;
    Ok(drives.value)
}

/// Fetches one drive's identity by id
pub async fn drive_details(
    client: &GraphClient,
    drive_id: &str,
) -> Result<DriveSummary, DriveError> {
    let value = client.get_json(&format!("/drives/{drive_id}")).await?;
    decode(value, "drive details")
}
