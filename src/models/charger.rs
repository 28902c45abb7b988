//! Charger model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{Field, FieldKind, Record, Schema};
use crate::traits::List;

/// A charger visible to the authenticated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Charger {
    pub id: Uuid,
    pub operating_mode: i32,
    pub is_online: bool,
    #[serde(rename = "MID")]
    pub mid: String,
    pub device_id: String,
    pub serial_no: String,
    pub name: String,
    #[serde(with = "crate::models::timestamp")]
    pub created_on_date: DateTime<Utc>,
    pub circuit_id: Uuid,
    pub active: bool,
    pub current_user_roles: i64,
    pub pin: String,
    pub device_type: i32,
    pub installation_name: String,
    pub installation_id: Uuid,
    pub authentication_type: i32,
    pub is_authorization_required: bool,
}

impl Record for Charger {
    const SCHEMA: &'static Schema = &Schema {
        name: "Charger",
        fields: &[
            Field::required("Id", FieldKind::Uuid),
            Field::required("OperatingMode", FieldKind::Integer),
            Field::required("IsOnline", FieldKind::Bool),
            Field::required("MID", FieldKind::String),
            Field::required("DeviceId", FieldKind::String),
            Field::required("SerialNo", FieldKind::String),
            Field::required("Name", FieldKind::String),
            Field::required("CreatedOnDate", FieldKind::DateTime),
            Field::required("CircuitId", FieldKind::Uuid),
            Field::required("Active", FieldKind::Bool),
            Field::required("CurrentUserRoles", FieldKind::Integer),
            Field::required("Pin", FieldKind::String),
            Field::required("DeviceType", FieldKind::Integer),
            Field::required("InstallationName", FieldKind::String),
            Field::required("InstallationId", FieldKind::Uuid),
            Field::required("AuthenticationType", FieldKind::Integer),
            Field::required("IsAuthorizationRequired", FieldKind::Bool),
        ],
    };
}

impl List for Charger {
    type Query = ();

    const PATH: &'static str = "api/chargers";

    fn params(_query: &Self::Query) -> Vec<(String, String)> {
        Vec::new()
    }
}
