//! Create-or-update reconciliation against the DNS provider.

use crate::error::ReconcileError;
use dnspin_provider::{DnsProvider, DnsRecord, RecordPayload};
use std::fmt;

/// Which write the reconciler issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Created => "created",
            Action::Updated => "updated",
        })
    }
}

/// Write `desired` to the provider: update when a record already exists,
/// create otherwise.
///
/// The write is unconditional; the existing record's content is never
/// compared against `desired` first. Re-running with identical inputs
/// issues the same update again and is safe to repeat.
pub async fn reconcile(
    provider: &dyn DnsProvider,
    existing: Option<&DnsRecord>,
    desired: &RecordPayload,
) -> Result<(Action, DnsRecord), ReconcileError> {
    let written = match existing {
        Some(record) => (
            Action::Updated,
            provider.update_record(&record.id, desired).await?,
        ),
        None => (Action::Created, provider.create_record(desired).await?),
    };
    Ok(written)
}

/*──────── tests ────────*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CycleError;
    use crate::testutil::{FakeProvider, WriteCall, existing_record};

    fn desired() -> RecordPayload {
        RecordPayload::a(
            "home.example.com",
            "203.0.113.7".parse().unwrap(),
            3600,
            false,
        )
    }

    #[tokio::test]
    async fn creates_when_no_record_exists() {
        let provider = FakeProvider::default();
        let (action, record) = reconcile(&provider, None, &desired()).await.unwrap();
        assert_eq!(action, Action::Created);
        assert_eq!(record.content, "203.0.113.7");
        assert_eq!(provider.writes(), vec![WriteCall::Create(desired())]);
    }

    #[tokio::test]
    async fn updates_addressed_by_the_existing_id() {
        let provider = FakeProvider::with_existing(existing_record("abc123", "203.0.113.1"));
        let existing = provider.existing.clone();
        let (action, record) = reconcile(&provider, existing.as_ref(), &desired())
            .await
            .unwrap();
        assert_eq!(action, Action::Updated);
        assert_eq!(record.id, "abc123");
        assert_eq!(
            provider.writes(),
            vec![WriteCall::Update {
                id: "abc123".into(),
                payload: desired(),
            }]
        );
    }

    #[tokio::test]
    async fn payload_ignores_the_existing_content() {
        // The existing record points somewhere else entirely; the write body
        // must still carry the desired values, with no comparison shortcut.
        let provider = FakeProvider::with_existing(existing_record("abc123", "10.0.0.1"));
        let existing = provider.existing.clone();
        reconcile(&provider, existing.as_ref(), &desired())
            .await
            .unwrap();
        let writes = provider.writes();
        let WriteCall::Update { payload, .. } = &writes[0] else {
            panic!("expected an update");
        };
        assert_eq!(payload.content, "203.0.113.7");
        assert_eq!(payload.ttl, 3600);
        assert!(!payload.proxied);
    }

    #[tokio::test]
    async fn repeated_runs_issue_identical_updates() {
        let provider = FakeProvider::with_existing(existing_record("abc123", "203.0.113.7"));
        let existing = provider.existing.clone();
        reconcile(&provider, existing.as_ref(), &desired())
            .await
            .unwrap();
        reconcile(&provider, existing.as_ref(), &desired())
            .await
            .unwrap();

        let writes = provider.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], writes[1]);
    }

    #[tokio::test]
    async fn write_failure_maps_to_a_reconcile_error() {
        let provider = FakeProvider {
            fail_write: true,
            ..FakeProvider::default()
        };
        let err = reconcile(&provider, None, &desired()).await.unwrap_err();
        assert!(matches!(CycleError::from(err), CycleError::Reconcile(_)));
    }
}
