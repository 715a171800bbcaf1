// Outbox row model and its status state machine.
//
// Purpose
// - One row per event awaiting delivery, durable alongside the business state
//   it describes.
//
// Responsibilities
// - Transitions: New/Retry -> Sent | Retry | Failed; Failed -> Retry only via
//   requeue. Sent never regresses.
// - Stamp `updated_at` explicitly in every mutation function.
//
// Boundaries
// - The payload is written once at construction and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::outbox::core::backoff::{BackoffDecision, BackoffPolicy};

/// Stored failure messages are capped at this many characters.
pub const LAST_ERROR_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutboxStatus {
    New,
    Retry,
    Sent,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub topic: String,
    pub key: String,
    pub payload: String,
    pub status: OutboxStatus,
    pub attempts: u32,
    pub next_attempt_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

impl OutboxEvent {
    pub fn new(
        topic: impl Into<String>,
        key: impl Into<String>,
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        payload: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            aggregate_type: aggregate_type.into(),
            aggregate_id: aggregate_id.into(),
            topic: topic.into(),
            key: key.into(),
            payload: payload.into(),
            status: OutboxStatus::New,
            attempts: 0,
            next_attempt_at: None,
            created_at: now,
            updated_at: now,
            last_error: None,
        }
    }

    /// A row is due when it is pending and its retry delay (if any) has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, OutboxStatus::New | OutboxStatus::Retry)
            && self.next_attempt_at.is_none_or(|at| at <= now)
    }

    pub fn mark_sent(&mut self, now: DateTime<Utc>) {
        self.status = OutboxStatus::Sent;
        self.updated_at = now;
    }

    /// Records one failed publish attempt and applies the backoff policy.
    ///
    /// `next_attempt_at` is written even on the transition to Failed; it is no
    /// longer consulted there but records the last computed delay.
    pub fn record_failure(
        &mut self,
        error: &str,
        now: DateTime<Utc>,
        policy: &BackoffPolicy,
    ) -> BackoffDecision {
        self.attempts += 1;
        let decision = policy.decide(self.attempts);
        let delay = match decision {
            BackoffDecision::Retry { delay } => {
                self.status = OutboxStatus::Retry;
                delay
            }
            BackoffDecision::Failed { delay } => {
                self.status = OutboxStatus::Failed;
                delay
            }
        };
        self.next_attempt_at = Some(now + delay);
        self.last_error = Some(truncate_error(error));
        self.updated_at = now;
        decision
    }

    /// Moves a Failed row back into rotation. Returns false for any other
    /// status, making requeue idempotent.
    pub fn requeue(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != OutboxStatus::Failed {
            return false;
        }
        self.status = OutboxStatus::Retry;
        self.attempts = 0;
        self.next_attempt_at = None;
        self.last_error = None;
        self.updated_at = now;
        true
    }
}

fn truncate_error(error: &str) -> String {
    error.chars().take(LAST_ERROR_MAX_CHARS).collect()
}
