//! Implementations for the delay policy state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;
use std::time::Duration;

// Internal
use super::{
    DelayError, DelayParams, ProfileParams,
    is_manual_name, validate_delay, MANUAL_PROFILE_NAME
};
use util::time::seconds_to_duration;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The delay policy, holds the profile table and the value shown in the
/// operator's delay field.
#[derive(Debug, Clone)]
pub struct DelayPolicy {
    profiles: Vec<ProfileParams>,
    active: ActiveProfile,

    /// The value of the operator's delay field, which is the delay in use.
    ///
    /// Units: seconds
    field_s: f64,

    manual_decimals: i32,
}

/// Snapshot of the policy for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayStatus {
    /// Name of the active profile
    pub profile: String,

    /// Delay currently applied to commands
    ///
    /// Units: seconds
    pub delay_s: f64,

    /// True if the delay field is read only
    pub locked: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum ActiveProfile {
    /// Index into the fixed profile table
    Fixed(usize),
    Manual
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DelayPolicy {
    /// Build the policy from its parameters, activating the initial profile.
    pub fn new(params: &DelayParams) -> Result<Self, DelayError> {
        for p in params.profiles.iter() {
            validate_delay(p.delay_s)?;
        }

        let mut policy = Self {
            profiles: params.profiles.clone(),
            active: ActiveProfile::Manual,
            field_s: 0.0,
            manual_decimals: params.manual_decimals.max(0),
        };

        policy.select(&params.initial_profile)?;

        Ok(policy)
    }

    /// Make the named profile active.
    ///
    /// Selecting a fixed profile forces the delay field to the profile's
    /// constant and locks it. Selecting the manual profile unlocks the field
    /// and leaves its value as it was.
    pub fn select(&mut self, name: &str) -> Result<(), DelayError> {
        if is_manual_name(name) {
            self.active = ActiveProfile::Manual;
            info!(
                "Delay profile {} selected, delay unlocked at {:.1} s", 
                MANUAL_PROFILE_NAME, 
                self.field_s
            );
            return Ok(())
        }

        let index = self.profiles.iter()
            .position(|p| p.matches(name))
            .ok_or_else(|| DelayError::UnknownProfile(name.to_string()))?;

        self.active = ActiveProfile::Fixed(index);
        self.field_s = self.profiles[index].delay_s;

        info!(
            "Delay profile {} selected, delay locked at {:.1} s", 
            self.profiles[index].name, 
            self.field_s
        );

        Ok(())
    }

    /// Set the operator's manual delay.
    ///
    /// Only accepted while the manual profile is active. The value is
    /// rounded to the resolution of the operator field.
    pub fn set_manual_delay(&mut self, delay_s: f64) -> Result<(), DelayError> {
        let delay_s = validate_delay(delay_s)?;

        if let ActiveProfile::Fixed(i) = self.active {
            return Err(DelayError::Locked(self.profiles[i].name.clone()))
        }

        let scale = 10f64.powi(self.manual_decimals);
        self.field_s = (delay_s * scale).round() / scale;

        debug!("Manual delay set to {:.1} s", self.field_s);

        Ok(())
    }

    /// The delay to apply to commands.
    pub fn current_delay(&self) -> Duration {
        seconds_to_duration(self.field_s)
    }

    /// The delay to apply to commands in seconds.
    pub fn current_delay_s(&self) -> f64 {
        self.field_s
    }

    /// Name of the active profile.
    pub fn active_profile(&self) -> &str {
        match self.active {
            ActiveProfile::Fixed(i) => &self.profiles[i].name,
            ActiveProfile::Manual => MANUAL_PROFILE_NAME
        }
    }

    /// True if the delay field is read only.
    pub fn is_locked(&self) -> bool {
        !matches!(self.active, ActiveProfile::Manual)
    }

    /// Names of every selectable profile, manual last.
    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.iter()
            .map(|p| p.name.as_str())
            .chain(std::iter::once(MANUAL_PROFILE_NAME))
            .collect()
    }

    pub fn status(&self) -> DelayStatus {
        DelayStatus {
            profile: self.active_profile().to_string(),
            delay_s: self.field_s,
            locked: self.is_locked()
        }
    }
}
