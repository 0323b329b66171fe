//! Notification dispatch: resolve each mention, email the resolved ones.
//!
//! - One lookup and at most one send per mention occurrence
//! - A failed lookup or send is recorded and the loop moves on
//! - Every lookup/send runs under its own timeout
//! - Outcomes come back in candidate order, also when processed in parallel

use crate::domain::{DispatchOutcome, DomainError, Notification};
use crate::ports::{Mailer, UserDirectory};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Per-call budgets and parallelism for [`NotificationDispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub lookup_timeout: Duration,
    pub send_timeout: Duration,
    /// 1 = strictly sequential.
    pub concurrency: usize,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
            send_timeout: Duration::from_secs(10),
            concurrency: 1,
        }
    }
}

/// Dispatcher. Owns the directory and mailer handles it was built with.
pub struct NotificationDispatcher {
    delivery: Delivery,
    concurrency: usize,
}

impl NotificationDispatcher {
    pub fn new(directory: Arc<dyn UserDirectory>, mailer: Arc<dyn Mailer>) -> Self {
        Self::with_policy(directory, mailer, DispatchPolicy::default())
    }

    pub fn with_policy(
        directory: Arc<dyn UserDirectory>,
        mailer: Arc<dyn Mailer>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            delivery: Delivery {
                directory,
                mailer,
                lookup_timeout: policy.lookup_timeout,
                send_timeout: policy.send_timeout,
            },
            concurrency: policy.concurrency.max(1),
        }
    }

    /// Notify every candidate that resolves to an address. Returns exactly one
    /// outcome per candidate, in the same order.
    pub async fn dispatch(&self, candidates: &[String], content: &str) -> Vec<DispatchOutcome> {
        let notification = Arc::new(Notification::tagged(content));

        if self.concurrency == 1 || candidates.len() < 2 {
            let mut outcomes = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                outcomes.push(
                    self.delivery
                        .process(candidate.clone(), &notification)
                        .await,
                );
            }
            return outcomes;
        }

        self.dispatch_parallel(candidates, notification).await
    }

    async fn dispatch_parallel(
        &self,
        candidates: &[String],
        notification: Arc<Notification>,
    ) -> Vec<DispatchOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let sem = Arc::clone(&semaphore);
            let delivery = self.delivery.clone();
            let notification = Arc::clone(&notification);
            let candidate = candidate.clone();
            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire().await.ok();
                delivery.process(candidate, &notification).await
            }));
        }

        // Joined in spawn order so outcomes line up with candidates.
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => std::panic::resume_unwind(e.into_panic()),
            }
        }
        outcomes
    }
}

/// Resolve-then-send for a single candidate. Cheap to clone into tasks.
#[derive(Clone)]
struct Delivery {
    directory: Arc<dyn UserDirectory>,
    mailer: Arc<dyn Mailer>,
    lookup_timeout: Duration,
    send_timeout: Duration,
}

impl Delivery {
    async fn process(&self, candidate: String, notification: &Notification) -> DispatchOutcome {
        let name = candidate.trim();
        debug!(candidate = %name, "fetching email for user");

        let lookup = timeout(
            self.lookup_timeout,
            self.directory.lookup_by_display_name(name),
        )
        .await
        .unwrap_or_else(|_| {
            Err(DomainError::Timeout {
                operation: "directory lookup",
                after_ms: millis(self.lookup_timeout),
            })
        });

        let address = match lookup {
            Ok(Some(address)) => address,
            Ok(None) => {
                info!(candidate = %name, "no email found for user");
                return DispatchOutcome::NoMatchingUser { candidate };
            }
            Err(e) => {
                warn!(candidate = %name, error = %e, "directory lookup failed; skipping");
                return DispatchOutcome::LookupError {
                    candidate,
                    error: e.to_string(),
                };
            }
        };

        debug!(candidate = %name, to = %address, "email resolved");
        info!(to = %address, "sending tag notification");

        let sent = timeout(
            self.send_timeout,
            self.mailer
                .send(&address, &notification.subject, &notification.body),
        )
        .await
        .unwrap_or_else(|_| {
            Err(DomainError::Timeout {
                operation: "mail send",
                after_ms: millis(self.send_timeout),
            })
        });

        match sent {
            Ok(()) => DispatchOutcome::Sent { candidate, address },
            Err(e) => {
                warn!(to = %address, error = %e, "tag notification not delivered");
                DispatchOutcome::DeliveryFailed {
                    candidate,
                    address,
                    error: e.to_string(),
                }
            }
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OutcomeKind, TAGGED_SUBJECT};
    use crate::test_utils::{Lookup, RecordingMailer, ScriptedDirectory};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn kinds(outcomes: &[DispatchOutcome]) -> Vec<OutcomeKind> {
        outcomes.iter().map(DispatchOutcome::kind).collect()
    }

    #[tokio::test]
    async fn test_lookup_error_does_not_stop_later_candidates() {
        let directory = Arc::new(
            ScriptedDirectory::new()
                .user("Ann", "ann@x.com")
                .with("Bea", Lookup::Fail("store offline".into()))
                .user("Cid", "cid@x.com"),
        );
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(directory.clone(), mailer.clone());

        let outcomes = dispatcher
            .dispatch(&names(&["Ann", "Bea", "Cid"]), "hi @Ann")
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            kinds(&outcomes),
            vec![
                OutcomeKind::Sent,
                OutcomeKind::LookupError,
                OutcomeKind::Sent
            ]
        );
        assert_eq!(directory.calls(), names(&["Ann", "Bea", "Cid"]));
        let to: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(to, names(&["ann@x.com", "cid@x.com"]));
    }

    #[tokio::test]
    async fn test_unknown_user_sends_nothing() {
        let directory = Arc::new(ScriptedDirectory::new());
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(directory.clone(), mailer.clone());

        let outcomes = dispatcher.dispatch(&names(&["Ghost"]), "@Ghost").await;

        assert_eq!(
            outcomes,
            vec![DispatchOutcome::NoMatchingUser {
                candidate: "Ghost".into()
            }]
        );
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_is_recorded_and_loop_continues() {
        let directory = Arc::new(
            ScriptedDirectory::new()
                .user("Ann", "ann@x.com")
                .user("Bea", "bea@x.com"),
        );
        let mailer = Arc::new(RecordingMailer::rejecting("ann@x.com"));
        let dispatcher = NotificationDispatcher::new(directory, mailer.clone());

        let outcomes = dispatcher.dispatch(&names(&["Ann", "Bea"]), "x").await;

        assert_eq!(
            kinds(&outcomes),
            vec![OutcomeKind::DeliveryFailed, OutcomeKind::Sent]
        );
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_mail_uses_fixed_subject_and_quotes_content() {
        let directory = Arc::new(ScriptedDirectory::new().user("Ann", "ann@x.com"));
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(directory, mailer.clone());

        dispatcher.dispatch(&names(&["Ann"]), "lunch @Ann").await;

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, TAGGED_SUBJECT);
        assert_eq!(sent[0].body, "You were tagged in a post/reply: lunch @Ann");
    }

    #[tokio::test]
    async fn test_repeated_mentions_are_each_processed() {
        let directory = Arc::new(ScriptedDirectory::new().user("Ann", "ann@x.com"));
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(directory.clone(), mailer.clone());

        let outcomes = dispatcher.dispatch(&names(&["Ann", "Ann"]), "x").await;

        assert_eq!(kinds(&outcomes), vec![OutcomeKind::Sent, OutcomeKind::Sent]);
        assert_eq!(directory.calls().len(), 2);
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_twice_gives_same_outcome_kinds() {
        let directory = Arc::new(
            ScriptedDirectory::new()
                .user("Ann", "ann@x.com")
                .with("Bea", Lookup::Fail("boom".into())),
        );
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(directory, mailer);
        let candidates = names(&["Ann", "Bea", "Nobody"]);

        let first = dispatcher.dispatch(&candidates, "x").await;
        let second = dispatcher.dispatch(&candidates, "x").await;

        assert_eq!(kinds(&first), kinds(&second));
    }

    #[tokio::test]
    async fn test_candidate_is_trimmed_for_lookup_only() {
        let directory = Arc::new(ScriptedDirectory::new().user("Ann", "ann@x.com"));
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(directory.clone(), mailer);

        let outcomes = dispatcher.dispatch(&names(&[" Ann\t"]), "x").await;

        assert_eq!(directory.calls(), names(&["Ann"]));
        assert_eq!(outcomes[0].candidate(), " Ann\t");
        assert_eq!(outcomes[0].kind(), OutcomeKind::Sent);
    }

    #[tokio::test]
    async fn test_no_candidates_no_work() {
        let directory = Arc::new(ScriptedDirectory::new());
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(directory.clone(), mailer.clone());

        assert!(dispatcher.dispatch(&[], "plain text").await.is_empty());
        assert!(directory.calls().is_empty());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_slow_lookup_times_out_as_lookup_error() {
        let directory = Arc::new(
            ScriptedDirectory::new()
                .with("Slow", Lookup::Hang)
                .user("Ann", "ann@x.com"),
        );
        let mailer = Arc::new(RecordingMailer::new());
        let policy = DispatchPolicy {
            lookup_timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let dispatcher = NotificationDispatcher::with_policy(directory, mailer.clone(), policy);

        let outcomes = dispatcher.dispatch(&names(&["Slow", "Ann"]), "x").await;

        assert_eq!(
            kinds(&outcomes),
            vec![OutcomeKind::LookupError, OutcomeKind::Sent]
        );
        match &outcomes[0] {
            DispatchOutcome::LookupError { error, .. } => assert!(error.contains("timed out")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_parallel_dispatch_keeps_candidate_order() {
        let directory = Arc::new(
            ScriptedDirectory::new()
                .user("Ann", "ann@x.com")
                .with("Bea", Lookup::Fail("boom".into()))
                .with("Slow", Lookup::Hang)
                .user("Dan", "dan@x.com"),
        );
        let mailer = Arc::new(RecordingMailer::new());
        let policy = DispatchPolicy {
            lookup_timeout: Duration::from_millis(50),
            concurrency: 4,
            ..Default::default()
        };
        let dispatcher =
            NotificationDispatcher::with_policy(directory.clone(), mailer.clone(), policy);
        let candidates = names(&["Ann", "Bea", "Slow", "Nobody", "Dan"]);

        let outcomes = dispatcher.dispatch(&candidates, "x").await;

        let order: Vec<&str> = outcomes.iter().map(DispatchOutcome::candidate).collect();
        assert_eq!(order, vec!["Ann", "Bea", "Slow", "Nobody", "Dan"]);
        assert_eq!(
            kinds(&outcomes),
            vec![
                OutcomeKind::Sent,
                OutcomeKind::LookupError,
                OutcomeKind::LookupError,
                OutcomeKind::NoMatchingUser,
                OutcomeKind::Sent,
            ]
        );
        assert_eq!(directory.calls().len(), 5);
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_slow_send_times_out_as_delivery_failure() {
        let directory = Arc::new(
            ScriptedDirectory::new()
                .user("Slow", "slow@x.com")
                .user("Ann", "ann@x.com"),
        );
        let mailer = Arc::new(RecordingMailer::hanging("slow@x.com"));
        let policy = DispatchPolicy {
            send_timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let dispatcher = NotificationDispatcher::with_policy(directory, mailer.clone(), policy);

        let outcomes = dispatcher.dispatch(&names(&["Slow", "Ann"]), "x").await;

        assert_eq!(
            kinds(&outcomes),
            vec![OutcomeKind::DeliveryFailed, OutcomeKind::Sent]
        );
        match &outcomes[0] {
            DispatchOutcome::DeliveryFailed { address, error, .. } => {
                assert_eq!(address, "slow@x.com");
                assert!(error.contains("timed out"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        let to: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(to, names(&["slow@x.com", "ann@x.com"]));
    }
}
