//! One assistant conversation.
//!
//! # Responsibility
//! - Serialize user queries into resolver calls, one at a time.
//! - Keep the append-only transcript, including failure and greeting turns.
//!
//! # Invariants
//! - State is `Idle` or `Resolving`; at most one turn is in flight.
//! - A submission while `Resolving` is dropped: no transcript entry, no error.
//! - Resolver errors and panics become a fixed assistant turn; `submit`
//!   itself never fails.
//! - The greeting is the first turn and is added once per session.

use crate::assistant::context::{ContextAggregator, ContextSnapshot};
use crate::assistant::rules::{ResolveError, Resolver};
use crate::model::conversation::ConversationTurn;
use crate::logging::panic_payload_summary;
use crate::model::user::CurrentUser;
use log::{info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

pub const PROCESSING_ERROR_RESPONSE: &str = "I'm sorry, I encountered an error while processing \
     your request. Please try again or contact support if the issue persists.";
pub const TIMEOUT_RESPONSE: &str =
    "I'm sorry, that request took too long to answer. Please ask again.";

const MAX_PANIC_SUMMARY_CHARS: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Resolving,
}

/// What happened to one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Resolver answered; user and assistant turns appended.
    Answered,
    /// Resolver failed; user turn and the processing-error turn appended.
    Failed,
    /// Session was resolving; input discarded.
    Dropped,
    /// Input was blank after trimming; nothing appended.
    Blank,
    /// The completed turn had already expired; result discarded.
    Stale,
}

/// An accepted submission waiting for its answer.
///
/// Produced by `begin`, consumed by `complete`.
#[derive(Debug)]
pub struct PendingTurn {
    ticket: u64,
    text: String,
    snapshot: ContextSnapshot,
}

impl PendingTurn {
    /// Trimmed user text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Context read when the turn was accepted.
    pub fn snapshot(&self) -> &ContextSnapshot {
        &self.snapshot
    }
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: u64,
    started_at: Instant,
}

pub struct AssistantSession {
    user: CurrentUser,
    context: ContextAggregator,
    resolver: Box<dyn Resolver>,
    transcript: Vec<ConversationTurn>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    resolution_timeout: Option<Duration>,
}

impl AssistantSession {
    /// Starts a session and seeds the greeting turn.
    pub fn new(user: CurrentUser, context: ContextAggregator, resolver: Box<dyn Resolver>) -> Self {
        let greeting = ConversationTurn::assistant(greeting_text(&user));
        info!("event=assistant_start module=assistant status=ok role={}", user.role);
        Self {
            user,
            context,
            resolver,
            transcript: vec![greeting],
            in_flight: None,
            next_ticket: 0,
            resolution_timeout: None,
        }
    }

    /// Expires an in-flight turn older than `timeout` when the next
    /// submission arrives. Without a timeout a stuck turn blocks the session.
    pub fn with_resolution_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.resolution_timeout = timeout;
        self
    }

    pub fn state(&self) -> SessionState {
        if self.in_flight.is_some() {
            SessionState::Resolving
        } else {
            SessionState::Idle
        }
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    /// Resolves one message to completion.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let pending = match self.begin(text) {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };

        let resolver = &self.resolver;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            resolver.resolve(pending.text(), pending.snapshot())
        }))
        .unwrap_or_else(|payload| {
            Err(ResolveError::Panicked(panic_payload_summary(
                &*payload,
                MAX_PANIC_SUMMARY_CHARS,
            )))
        });

        self.complete(pending, result)
    }

    /// Accepts a message and moves to `Resolving`.
    ///
    /// Returns the outcome instead when the message is blank or another turn
    /// is in flight.
    pub fn begin(&mut self, text: &str) -> Result<PendingTurn, SubmitOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitOutcome::Blank);
        }

        if let Some(in_flight) = self.in_flight {
            if !self.expire_if_stale(in_flight) {
                info!(
                    "event=assistant_submit module=assistant status=dropped pending_ticket={}",
                    in_flight.ticket
                );
                return Err(SubmitOutcome::Dropped);
            }
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.transcript.push(ConversationTurn::user(text));
        self.in_flight = Some(InFlight {
            ticket,
            started_at: Instant::now(),
        });
        info!(
            "event=assistant_submit module=assistant status=accepted ticket={ticket} chars={}",
            text.chars().count()
        );

        Ok(PendingTurn {
            ticket,
            text: text.to_string(),
            snapshot: self.context.snapshot(&self.user),
        })
    }

    /// Records the answer for `pending` and returns to `Idle`.
    pub fn complete(
        &mut self,
        pending: PendingTurn,
        result: Result<String, ResolveError>,
    ) -> SubmitOutcome {
        match self.in_flight {
            Some(in_flight) if in_flight.ticket == pending.ticket => {}
            _ => {
                info!(
                    "event=assistant_complete module=assistant status=stale ticket={}",
                    pending.ticket
                );
                return SubmitOutcome::Stale;
            }
        }
        self.in_flight = None;

        match result {
            Ok(answer) => {
                self.transcript.push(ConversationTurn::assistant(answer));
                info!(
                    "event=assistant_complete module=assistant status=ok ticket={}",
                    pending.ticket
                );
                SubmitOutcome::Answered
            }
            Err(err) => {
                warn!(
                    "event=assistant_complete module=assistant status=error ticket={} error={err}",
                    pending.ticket
                );
                self.transcript
                    .push(ConversationTurn::assistant(PROCESSING_ERROR_RESPONSE));
                SubmitOutcome::Failed
            }
        }
    }

    fn expire_if_stale(&mut self, in_flight: InFlight) -> bool {
        let Some(timeout) = self.resolution_timeout else {
            return false;
        };
        if in_flight.started_at.elapsed() < timeout {
            return false;
        }
        warn!(
            "event=assistant_timeout module=assistant status=expired ticket={} timeout_ms={}",
            in_flight.ticket,
            timeout.as_millis()
        );
        self.transcript
            .push(ConversationTurn::assistant(TIMEOUT_RESPONSE));
        self.in_flight = None;
        true
    }
}

pub fn greeting_text(user: &CurrentUser) -> String {
    format!(
        "Hello {}! I'm your academic assistant. I can help you with information about notices, \
         exams, calendar events, and general academic queries. How can I assist you today?",
        user.name
    )
}
