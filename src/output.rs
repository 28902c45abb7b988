//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{ChargingSession, InstallationReport};

/// Trait for human-readable key-value output.
///
/// Implemented by record types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for InstallationReport {
    fn pretty_print(&self) -> String {
        let header = format!("Installation: {}", self.installation_name);
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![
            header,
            divider,
            format!(
                "Address:        {}, {} {}",
                self.installation_address, self.installation_zip_code, self.installation_city
            ),
            format!("Period:         {} - {}", self.from_date, self.end_date),
            format!("Grouped by:     {}", self.grouped_by),
            format!(
                "Total:          {:.2} kWh in {} sessions",
                self.total_energy(),
                self.total_sessions()
            ),
        ];

        for user in &self.user_reports {
            lines.push(format!(
                "  {:<24} {:>9.2} kWh {:>4} sessions {:>7.1} h  <{}>",
                user.group_as_string,
                user.total_charge_session_energy,
                user.total_charge_session_count,
                user.total_charge_session_duration,
                user.user_details.email
            ));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ChargingSession {
    fn pretty_print(&self) -> String {
        let header = format!("Session: {}", self.id);
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("User:           {} <{}>", self.user_full_name, self.user_email),
            format!("Charger:        {}", self.device_name),
            format!(
                "Started:        {}",
                self.start_date_time.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            format!(
                "Ended:          {}",
                self.end_date_time.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            format!("Energy:         {:.3} kWh", self.energy),
        ];

        if let Some(ref token) = self.token_name {
            lines.push(format!("Token:          {}", token));
        }

        if self.externally_ended {
            lines.push("Ended by:       external".to_string());
        }

        lines.join("\n")
    }
}
