//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    Charger, ChargerFirmware, ChargingSession, DateRange, Installation, InstallationReport,
    TotalUserChargerReport, UserDetails,
};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// February 2024 as fetched by a report run in March.
    pub fn february() -> DateRange {
        DateRange::previous_month(NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date"))
    }

    // =========================================================================
    // Session Fixtures
    // =========================================================================

    /// A session for `user` on charger `device_name` starting at `start`.
    pub fn session(
        id: &str,
        user: &str,
        device_name: &str,
        start: DateTime<Utc>,
        energy: f64,
    ) -> ChargingSession {
        let end = start + TimeDelta::hours(2);
        ChargingSession {
            id: id.to_string(),
            user_user_name: user.to_string(),
            device_id: format!("ZAP{:06}", device_name.len()),
            start_date_time: start,
            end_date_time: end,
            energy,
            commit_metadata: 5,
            commit_end_date_time: end,
            user_full_name: user.to_string(),
            charger_id: format!("charger-{device_name}"),
            device_name: device_name.to_string(),
            user_email: format!("{}@example.com", user.to_lowercase().replace(' ', ".")),
            user_id: format!("user-{}", user.to_lowercase().replace(' ', "-")),
            token_name: None,
            externally_ended: false,
            charger_firmware_version: ChargerFirmware {
                major: 3,
                minor: 2,
                build: 0,
                revision: 1,
                major_revision: 0,
                minor_revision: 1,
            },
        }
    }

    /// `count` sessions spread over February 2024, one per hour.
    pub fn sessions_in_february(count: usize) -> Vec<ChargingSession> {
        let first = Utc
            .with_ymd_and_hms(2024, 2, 1, 6, 0, 0)
            .single()
            .expect("valid timestamp");
        (0..count)
            .map(|i| {
                let hours = i64::try_from(i).unwrap_or(i64::MAX);
                Self::session(
                    &format!("session-{i:04}"),
                    if i % 2 == 0 { "Anna Andersson" } else { "Bo Berg" },
                    &format!("Plats {:02}", i % 12 + 1),
                    first + TimeDelta::hours(hours),
                    1.5,
                )
            })
            .collect()
    }

    // =========================================================================
    // Charger and Installation Fixtures
    // =========================================================================

    pub fn charger(name: &str, online: bool) -> Charger {
        Charger {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()),
            operating_mode: 3,
            is_online: online,
            mid: format!("ZAP-{name}"),
            device_id: format!("ZAP-{name}"),
            serial_no: format!("ZAP-{name}"),
            name: name.to_string(),
            created_on_date: Utc
                .with_ymd_and_hms(2023, 5, 1, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
            circuit_id: Uuid::nil(),
            active: true,
            current_user_roles: 2,
            pin: "0000".to_string(),
            device_type: 4,
            installation_name: "Garage".to_string(),
            installation_id: Uuid::nil(),
            authentication_type: 0,
            is_authorization_required: false,
        }
    }

    pub fn installation(name: &str) -> Installation {
        let created = Utc
            .with_ymd_and_hms(2022, 1, 10, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Installation {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()),
            name: name.to_string(),
            address: "Storgatan 1".to_string(),
            zip_code: "11122".to_string(),
            city: "Stockholm".to_string(),
            country_id: Uuid::nil(),
            vat_number: None,
            contact_email: None,
            installation_type: 0,
            max_current: 63.0,
            available_current: 40.0,
            installation_category: "Residential".to_string(),
            use_load_balancing: true,
            is_required_authentication: true,
            latitude: 59.33,
            longitude: 18.06,
            notes: None,
            active: true,
            created_on_date: created,
            updated_on: created,
            current_user_roles: 14,
            authentication_type: 0,
            time_zone_name: None,
            time_zone_iana_name: Some("Europe/Stockholm".to_string()),
            installation_users: None,
            active_charger_count: Some(12),
        }
    }

    // =========================================================================
    // Report Fixtures
    // =========================================================================

    /// Report with one entry per `(name, sessions, energy)`.
    pub fn report(users: &[(&str, u64, f64)]) -> InstallationReport {
        let range = Self::february();
        InstallationReport {
            installation_name: "Brf Solrosen".to_string(),
            installation_address: "Storgatan 1".to_string(),
            installation_zip_code: "11122".to_string(),
            installation_city: "Stockholm".to_string(),
            installation_time_zone: "W. Europe Standard Time".to_string(),
            grouped_by: "User".to_string(),
            from_date: range.from_local(),
            end_date: range.to_local(),
            user_reports: users
                .iter()
                .map(|(name, sessions, energy)| TotalUserChargerReport {
                    group_as_string: name.to_string(),
                    user_details: UserDetails {
                        id: format!("user-{}", name.to_lowercase().replace(' ', "-")),
                        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                        full_name: name.to_string(),
                    },
                    total_charge_session_count: *sessions,
                    total_charge_session_energy: *energy,
                    total_charge_session_duration: *sessions as f64 * 2.0,
                })
                .collect(),
        }
    }
}
