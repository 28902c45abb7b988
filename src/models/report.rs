//! Installation report model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::HttpClient;
use crate::dates::DateRange;
use crate::error::Result;
use crate::schema::{self, Field, FieldKind, Record, Schema};
use crate::traits::Get;

/// Per-user energy summary for an installation over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallationReport {
    pub installation_name: String,
    pub installation_address: String,
    pub installation_zip_code: String,
    pub installation_city: String,
    pub installation_time_zone: String,
    pub grouped_by: String,
    #[serde(rename = "Fromdate")]
    pub from_date: String,
    #[serde(rename = "Enddate")]
    pub end_date: String,
    #[serde(rename = "totalUserChargerReportModel")]
    pub user_reports: Vec<TotalUserChargerReport>,
}

/// Totals for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TotalUserChargerReport {
    pub group_as_string: String,
    pub user_details: UserDetails,
    pub total_charge_session_count: u64,
    /// kWh.
    pub total_charge_session_energy: f64,
    /// Hours.
    pub total_charge_session_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDetails {
    pub id: String,
    pub email: String,
    pub full_name: String,
}

impl InstallationReport {
    /// Energy summed over all users.
    pub fn total_energy(&self) -> f64 {
        self.user_reports
            .iter()
            .map(|r| r.total_charge_session_energy)
            .sum()
    }

    /// Session count summed over all users.
    pub fn total_sessions(&self) -> u64 {
        self.user_reports
            .iter()
            .map(|r| r.total_charge_session_count)
            .sum()
    }
}

impl Record for UserDetails {
    const SCHEMA: &'static Schema = &Schema {
        name: "UserDetails",
        fields: &[
            Field::required("Id", FieldKind::String),
            Field::required("Email", FieldKind::String),
            Field::required("FullName", FieldKind::String),
        ],
    };
}

impl Record for TotalUserChargerReport {
    const SCHEMA: &'static Schema = &Schema {
        name: "TotalUserChargerReport",
        fields: &[
            Field::required("GroupAsString", FieldKind::String),
            Field::required("UserDetails", FieldKind::Object(UserDetails::SCHEMA)),
            Field::required("TotalChargeSessionCount", FieldKind::Integer),
            Field::required("TotalChargeSessionEnergy", FieldKind::Number),
            Field::required("TotalChargeSessionDuration", FieldKind::Number),
        ],
    };
}

impl Record for InstallationReport {
    const SCHEMA: &'static Schema = &Schema {
        name: "InstallationReport",
        fields: &[
            Field::required("InstallationName", FieldKind::String),
            Field::required("InstallationAddress", FieldKind::String),
            Field::required("InstallationZipCode", FieldKind::String),
            Field::required("InstallationCity", FieldKind::String),
            Field::required("InstallationTimeZone", FieldKind::String),
            Field::required("GroupedBy", FieldKind::String),
            Field::required("Fromdate", FieldKind::String),
            Field::required("Enddate", FieldKind::String),
            Field::required(
                "totalUserChargerReportModel",
                FieldKind::ListOf(TotalUserChargerReport::SCHEMA),
            ),
        ],
    };
}

/// Parameters for the installation report endpoint.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub installation_id: String,
    pub range: DateRange,
}

impl ReportQuery {
    pub fn new(installation_id: impl Into<String>, range: DateRange) -> Self {
        Self {
            installation_id: installation_id.into(),
            range,
        }
    }

    /// JSON body; this endpoint takes dates without the `Z` suffix.
    pub fn body(&self) -> ReportRequestBody<'_> {
        ReportRequestBody {
            from_date: self.range.from_local(),
            end_date: self.range.to_local(),
            installation_id: &self.installation_id,
            group_by: 0,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequestBody<'a> {
    pub from_date: String,
    pub end_date: String,
    pub installation_id: &'a str,
    pub group_by: u8,
}

#[async_trait]
impl Get for InstallationReport {
    type Params = ReportQuery;

    const PATH: &'static str = "api/chargehistory/installationreport";

    #[tracing::instrument(skip(client))]
    async fn get(client: &HttpClient, params: &Self::Params) -> Result<Self> {
        let response = client.post(Self::PATH, &params.body()).await?;
        schema::validate(response.json()?)
    }
}
