//! Charging session model and trait implementations.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates::DateRange;
use crate::schema::{Field, FieldKind, Record, Schema};
use crate::traits::List;

/// One completed charging session from the charge history.
///
/// Consumed directly by invoicing: `UserEmail` groups users, `Energy`
/// drives cost, start/end drive duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChargingSession {
    pub id: String,
    pub user_user_name: String,
    pub device_id: String,
    #[serde(with = "crate::models::timestamp")]
    pub start_date_time: DateTime<Utc>,
    #[serde(with = "crate::models::timestamp")]
    pub end_date_time: DateTime<Utc>,
    /// Delivered energy in kWh.
    pub energy: f64,
    pub commit_metadata: i64,
    #[serde(with = "crate::models::timestamp")]
    pub commit_end_date_time: DateTime<Utc>,
    pub user_full_name: String,
    pub charger_id: String,
    pub device_name: String,
    pub user_email: String,
    pub user_id: String,
    #[serde(default)]
    pub token_name: Option<String>,
    pub externally_ended: bool,
    pub charger_firmware_version: ChargerFirmware,
}

/// Firmware version reported with a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChargerFirmware {
    pub major: i32,
    pub minor: i32,
    pub build: i32,
    pub revision: i32,
    pub major_revision: i32,
    pub minor_revision: i32,
}

impl std::fmt::Display for ChargerFirmware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}

impl ChargingSession {
    /// Wall-clock time between start and end.
    pub fn duration(&self) -> TimeDelta {
        self.end_date_time - self.start_date_time
    }
}

impl Record for ChargerFirmware {
    const SCHEMA: &'static Schema = &Schema {
        name: "ChargerFirmware",
        fields: &[
            Field::required("Major", FieldKind::Integer),
            Field::required("Minor", FieldKind::Integer),
            Field::required("Build", FieldKind::Integer),
            Field::required("Revision", FieldKind::Integer),
            Field::required("MajorRevision", FieldKind::Integer),
            Field::required("MinorRevision", FieldKind::Integer),
        ],
    };
}

impl Record for ChargingSession {
    const SCHEMA: &'static Schema = &Schema {
        name: "ChargingSession",
        fields: &[
            Field::required("Id", FieldKind::String),
            Field::required("UserUserName", FieldKind::String),
            Field::required("DeviceId", FieldKind::String),
            Field::required("StartDateTime", FieldKind::DateTime),
            Field::required("EndDateTime", FieldKind::DateTime),
            Field::required("Energy", FieldKind::Number),
            Field::required("CommitMetadata", FieldKind::Integer),
            Field::required("CommitEndDateTime", FieldKind::DateTime),
            Field::required("UserFullName", FieldKind::String),
            Field::required("ChargerId", FieldKind::String),
            Field::required("DeviceName", FieldKind::String),
            Field::required("UserEmail", FieldKind::String),
            Field::required("UserId", FieldKind::String),
            Field::optional("TokenName", FieldKind::String),
            Field::required("ExternallyEnded", FieldKind::Bool),
            Field::required(
                "ChargerFirmwareVersion",
                FieldKind::Object(ChargerFirmware::SCHEMA),
            ),
        ],
    };

    /// `SignedSession` is large and never needed.
    fn prepare(raw: &mut Value) {
        if let Some(object) = raw.as_object_mut() {
            object.remove("SignedSession");
        }
    }
}

/// Query for the charge history endpoint.
#[derive(Debug, Clone)]
pub struct ChargeHistoryQuery {
    pub installation_id: String,
    pub range: DateRange,
}

impl ChargeHistoryQuery {
    pub fn new(installation_id: impl Into<String>, range: DateRange) -> Self {
        Self {
            installation_id: installation_id.into(),
            range,
        }
    }
}

impl List for ChargingSession {
    type Query = ChargeHistoryQuery;

    const PATH: &'static str = "api/chargehistory";

    fn params(query: &Self::Query) -> Vec<(String, String)> {
        vec![
            ("installationId".to_string(), query.installation_id.clone()),
            ("From".to_string(), query.range.from_zulu()),
            ("To".to_string(), query.range.to_zulu()),
            ("DetailLevel".to_string(), "0".to_string()),
        ]
    }
}
