//! Observable queue state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::QueueEntry;

use super::error::QueueError;

/// How many completions may be outstanding at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPolicy {
    /// One per entry; different entries may complete concurrently
    #[default]
    PerEntry,

    /// One in total
    Single,
}

impl FromStr for FlightPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_entry" | "entry" => Ok(Self::PerEntry),
            "single" => Ok(Self::Single),
            other => Err(format!("unknown flight policy: {other}")),
        }
    }
}

/// Where an in-flight completion currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStage {
    /// Waiting for the backend to acknowledge
    Submitting,

    /// Acknowledged, waiting for the follow-up queue fetch
    Refreshing,
}

/// Coordinator phase derived from the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    /// Users whose completion is still being submitted
    Completing(Vec<u64>),
}

/// Everything a view needs to render the queue panel
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    /// Last snapshot received from the backend
    pub snapshot: Vec<QueueEntry>,

    /// In-flight markers keyed by user id
    pub in_flight: BTreeMap<u64, FlightStage>,

    /// Queue fetches currently outstanding
    pub refreshes_pending: usize,

    /// Kept until the next successful fetch or an explicit clear
    pub last_error: Option<QueueError>,
}

impl QueueState {
    pub fn phase(&self) -> Phase {
        let submitting: Vec<u64> = self
            .in_flight
            .iter()
            .filter(|(_, stage)| **stage == FlightStage::Submitting)
            .map(|(user, _)| *user)
            .collect();

        if !submitting.is_empty() {
            Phase::Completing(submitting)
        } else if self.refreshes_pending > 0 {
            Phase::Fetching
        } else {
            Phase::Idle
        }
    }

    /// Whether the control for `user_id` should be disabled
    pub fn is_busy(&self, user_id: u64) -> bool {
        self.in_flight.contains_key(&user_id)
    }

    /// Entries paired with their busy flag, in snapshot order
    pub fn rows(&self) -> impl Iterator<Item = (&QueueEntry, bool)> {
        self.snapshot
            .iter()
            .map(move |entry| (entry, self.is_busy(entry.user)))
    }
}
