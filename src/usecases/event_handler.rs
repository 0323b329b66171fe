//! Entry use case: one content-change event -> extract mentions -> dispatch.
//!
//! Events for anything but posts and replies are ignored. No state is carried
//! between events.

use crate::domain::{extract_mentions, ContentEvent, DispatchOutcome, DispatchStats, DomainError};
use crate::ports::EventSource;
use crate::usecases::dispatcher::NotificationDispatcher;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct EventHandler {
    dispatcher: Arc<NotificationDispatcher>,
}

impl EventHandler {
    pub fn new(dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Handle one event. Returns the per-mention outcomes (empty when skipped).
    pub async fn handle(&self, event: &ContentEvent) -> Vec<DispatchOutcome> {
        info!(kind = %event.kind, "mention handler started");

        if !event.kind.is_taggable() {
            debug!(kind = %event.kind, "entity is neither post nor reply; skipping");
            return Vec::new();
        }

        debug!(content = %event.content, "processing content");
        let candidates = extract_mentions(&event.content);
        info!(
            count = candidates.len(),
            "tagged usernames: {}",
            candidates.join(", ")
        );

        let outcomes = self.dispatcher.dispatch(&candidates, &event.content).await;
        for recipient in outcomes.iter().filter_map(DispatchOutcome::recipient) {
            debug!(
                candidate = %recipient.candidate,
                to = %recipient.address,
                "recipient resolved"
            );
        }

        let stats = DispatchStats::from_outcomes(&outcomes);
        info!(
            kind = %event.kind,
            sent = stats.sent,
            no_matching_user = stats.no_matching_user,
            lookup_errors = stats.lookup_errors,
            delivery_failures = stats.delivery_failures,
            "mention handler finished"
        );
        outcomes
    }

    /// Drain `source`, handling each event in arrival order. Bad messages are
    /// logged and skipped; a closed stream ends the loop. Returns totals across
    /// all handled events.
    pub async fn run(&self, source: &mut dyn EventSource) -> DispatchStats {
        let mut totals = DispatchStats::default();
        loop {
            match source.next_event().await {
                Ok(Some(event)) => {
                    let stats = DispatchStats::from_outcomes(&self.handle(&event).await);
                    totals.sent += stats.sent;
                    totals.no_matching_user += stats.no_matching_user;
                    totals.lookup_errors += stats.lookup_errors;
                    totals.delivery_failures += stats.delivery_failures;
                }
                Ok(None) => break,
                Err(DomainError::StreamClosed(reason)) => {
                    error!(reason = %reason, "event stream failed; stopping");
                    break;
                }
                Err(e) => warn!(error = %e, "skipping unreadable event"),
            }
        }
        info!(
            sent = totals.sent,
            no_matching_user = totals.no_matching_user,
            lookup_errors = totals.lookup_errors,
            delivery_failures = totals.delivery_failures,
            "event stream closed"
        );
        totals
    }
}
