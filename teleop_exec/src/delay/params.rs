//! Parameters structure for the delay policy

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the delay policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DelayParams {

    /// Fixed delay profiles the operator can choose from.
    pub profiles: Vec<ProfileParams>,

    /// Profile active at startup, may be the manual profile.
    pub initial_profile: String,

    /// Number of decimal places kept on manual delays, matching the operator
    /// field.
    pub manual_decimals: i32,
}

/// A single fixed delay profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileParams {
    /// Name shown to the operator
    pub name: String,

    /// Other names the profile can be selected by
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Delay applied to every command.
    ///
    /// Units: seconds
    pub delay_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            profiles: vec![
                ProfileParams::new("Moon", &["Lune"], 0.0),
                ProfileParams::new("Venus", &[], 1.0),
                ProfileParams::new("Mars", &[], 2.5),
            ],
            initial_profile: String::from("Moon"),
            manual_decimals: 1,
        }
    }
}

impl ProfileParams {
    pub fn new(name: &str, aliases: &[&str], delay_s: f64) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            delay_s
        }
    }

    /// Returns true if the profile answers to `name`, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name) 
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}
