//! Installation model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{Field, FieldKind, Record, Schema};
use crate::traits::List;

/// A site with one or more chargers.
///
/// Only the fields this crate relies on are declared; the API returns many
/// more, which are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Installation {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub zip_code: String,
    pub city: String,
    pub country_id: Uuid,
    #[serde(default)]
    pub vat_number: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    pub installation_type: i32,
    pub max_current: f64,
    pub available_current: f64,
    pub installation_category: String,
    pub use_load_balancing: bool,
    pub is_required_authentication: bool,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub notes: Option<String>,
    pub active: bool,
    #[serde(with = "crate::models::timestamp")]
    pub created_on_date: DateTime<Utc>,
    #[serde(with = "crate::models::timestamp")]
    pub updated_on: DateTime<Utc>,
    pub current_user_roles: i64,
    pub authentication_type: i32,
    #[serde(default)]
    pub time_zone_name: Option<String>,
    #[serde(default)]
    pub time_zone_iana_name: Option<String>,
    #[serde(default)]
    pub installation_users: Option<Vec<InstallationUser>>,
    #[serde(default)]
    pub active_charger_count: Option<i64>,
}

/// A user with access to an installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallationUser {
    pub user_id: Uuid,
    pub user_full_name: String,
    pub user_email: String,
    pub user_tokens: Vec<String>,
}

impl Record for InstallationUser {
    const SCHEMA: &'static Schema = &Schema {
        name: "InstallationUser",
        fields: &[
            Field::required("UserId", FieldKind::Uuid),
            Field::required("UserFullName", FieldKind::String),
            Field::required("UserEmail", FieldKind::String),
            Field::required("UserTokens", FieldKind::ListOfStrings),
        ],
    };
}

impl Record for Installation {
    const SCHEMA: &'static Schema = &Schema {
        name: "Installation",
        fields: &[
            Field::required("Id", FieldKind::Uuid),
            Field::required("Name", FieldKind::String),
            Field::required("Address", FieldKind::String),
            Field::required("ZipCode", FieldKind::String),
            Field::required("City", FieldKind::String),
            Field::required("CountryId", FieldKind::Uuid),
            Field::optional("VatNumber", FieldKind::String),
            Field::optional("ContactEmail", FieldKind::String),
            Field::required("InstallationType", FieldKind::Integer),
            Field::required("MaxCurrent", FieldKind::Number),
            Field::required("AvailableCurrent", FieldKind::Number),
            Field::required("InstallationCategory", FieldKind::String),
            Field::required("UseLoadBalancing", FieldKind::Bool),
            Field::required("IsRequiredAuthentication", FieldKind::Bool),
            Field::required("Latitude", FieldKind::Number),
            Field::required("Longitude", FieldKind::Number),
            Field::optional("Notes", FieldKind::String),
            Field::required("Active", FieldKind::Bool),
            Field::required("CreatedOnDate", FieldKind::DateTime),
            Field::required("UpdatedOn", FieldKind::DateTime),
            Field::required("CurrentUserRoles", FieldKind::Integer),
            Field::required("AuthenticationType", FieldKind::Integer),
            Field::optional("TimeZoneName", FieldKind::String),
            Field::optional("TimeZoneIanaName", FieldKind::String),
            Field::optional(
                "InstallationUsers",
                FieldKind::ListOf(InstallationUser::SCHEMA),
            ),
            Field::optional("ActiveChargerCount", FieldKind::Integer),
        ],
    };
}

impl List for Installation {
    type Query = ();

    const PATH: &'static str = "api/installation";

    fn params(_query: &Self::Query) -> Vec<(String, String)> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZaptecError;
    use crate::schema::validate;
    use serde_json::json;

    fn raw_installation() -> serde_json::Value {
        json!({
            "Id": "550e8400-e29b-41d4-a716-446655440000",
            "Name": "Brf Solrosen",
            "Address": "Storgatan 1",
            "ZipCode": "11122",
            "City": "Stockholm",
            "CountryId": "550e8400-e29b-41d4-a716-4466554400aa",
            "InstallationType": 0,
            "MaxCurrent": 63.0,
            "AvailableCurrent": 40,
            "InstallationCategory": "Residential",
            "UseLoadBalancing": true,
            "IsRequiredAuthentication": true,
            "Latitude": 59.33,
            "Longitude": 18.06,
            "Active": true,
            "CreatedOnDate": "2022-01-10T09:00:00",
            "UpdatedOn": "2024-01-10T09:00:00Z",
            "CurrentUserRoles": 14,
            "AuthenticationType": 0,
            "InstallationUsers": [{
                "UserId": "550e8400-e29b-41d4-a716-4466554400bb",
                "UserFullName": "Anna Andersson",
                "UserEmail": "anna@example.com",
                "UserTokens": ["rfid-1"]
            }],
            "SupportGroup": {"Name": "ignored"}
        })
    }

    #[test]
    fn test_installation_validates() {
        let installation: Installation = validate(raw_installation()).unwrap();
        assert_eq!(installation.city, "Stockholm");
        assert_eq!(installation.available_current, 40.0);
        let users = installation.installation_users.unwrap();
        assert_eq!(users[0].user_tokens, vec!["rfid-1"]);
    }

    #[test]
    fn test_nested_user_paths() {
        let mut raw = raw_installation();
        raw["InstallationUsers"][0]["UserTokens"] = json!([1]);
        raw["InstallationUsers"][0]
            .as_object_mut()
            .unwrap()
            .remove("UserEmail");

        match validate::<Installation>(raw).unwrap_err() {
            ZaptecError::SchemaValidation {
                missing_fields,
                unexpected_types,
                ..
            } => {
                assert_eq!(missing_fields, vec!["InstallationUsers[0].UserEmail"]);
                assert_eq!(
                    unexpected_types,
                    vec!["InstallationUsers[0].UserTokens[0]: expected string, found integer"]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
