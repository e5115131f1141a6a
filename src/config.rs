//! Session configuration.

use serde::{Deserialize, Serialize};

/// Columns offered as filters when a session is created with [`SessionConfig::default`].
pub const DEFAULT_FILTER_COLUMNS: [&str; 9] = [
    "Job Family",
    "Job Function",
    "FLSA Status",
    "Employee Classification Type",
    "Employee Type",
    "Department",
    "Business Unit",
    "Division",
    "Country",
];

/// Configuration for a [`crate::session::DashboardSession`].
///
/// The filter allow-list is fixed for the lifetime of a session and does not depend on the
/// uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Designated filter columns, in display order.
    pub filter_columns: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            filter_columns: DEFAULT_FILTER_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl SessionConfig {
    /// Create a config with a custom allow-list.
    pub fn with_filter_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter_columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a config from JSON. Missing fields fall back to [`Default`].
    ///
    /// ```
    /// use dashboard_data::config::SessionConfig;
    ///
    /// let cfg = SessionConfig::from_json_str(r#"{"filter_columns": ["Region"]}"#).unwrap();
    /// assert_eq!(cfg.filter_columns, vec!["Region"]);
    /// ```
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}
