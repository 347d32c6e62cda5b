//! Explorer source verification with status polling

use std::time::Duration;

use tracing::{info, warn, Instrument};

use crate::config::PollingConfig;
use crate::error::{OftError, Result};
use crate::spans;
use crate::traits::{Clock, SourceVerifier};
use crate::verification::{
    Submission, VerificationOutcome, VerificationRequest, VerificationStatus,
};

/// Submits `request` and polls until the explorer settles the job.
///
/// Transient status-check errors are logged and retried until the attempt
/// budget runs out.
pub async fn poll_verification<V, C>(
    verifier: &V,
    clock: &C,
    polling: PollingConfig,
    request: &VerificationRequest,
) -> Result<VerificationOutcome>
where
    V: SourceVerifier + ?Sized,
    C: Clock + ?Sized,
{
    let span = spans::verify_contract(
        &request.address(),
        polling.max_attempts,
        polling.poll_interval_secs,
    );

    async move {
        let guid = match verifier.submit(request).await? {
            Submission::AlreadyVerified => {
                info!(address = %request.address(), event = "already_verified");
                return Ok(VerificationOutcome::AlreadyVerified);
            }
            Submission::Queued { guid } => guid,
        };

        info!(
            address = %request.address(),
            guid = %guid,
            event = "verification_submitted"
        );

        for attempt in 1..=polling.max_attempts {
            clock
                .sleep(Duration::from_secs(polling.poll_interval_secs))
                .await;

            match verifier.check_status(&guid).await {
                Ok(VerificationStatus::Pending) => {
                    info!(attempt = attempt, event = "verification_pending");
                }
                Ok(VerificationStatus::Verified) => {
                    info!(attempt = attempt, event = "verification_passed");
                    return Ok(VerificationOutcome::Verified);
                }
                Ok(VerificationStatus::AlreadyVerified) => {
                    return Ok(VerificationOutcome::AlreadyVerified);
                }
                Ok(VerificationStatus::Failed(reason)) => {
                    return Ok(VerificationOutcome::failed(reason));
                }
                Err(e) => {
                    warn!(attempt = attempt, error = %e, event = "verification_status_error");
                }
            }
        }

        let err = OftError::VerificationTimeout {
            attempts: polling.max_attempts,
        };
        spans::record_error_with_context("VerificationTimeout", &err.to_string(), None);
        Err(err)
    }
    .instrument(span)
    .await
}

/// [`poll_verification`] with every error folded into
/// [`VerificationOutcome::Failed`]; verification never fails a deployment.
pub async fn verify_best_effort<V, C>(
    verifier: &V,
    clock: &C,
    polling: PollingConfig,
    request: &VerificationRequest,
) -> VerificationOutcome
where
    V: SourceVerifier + ?Sized,
    C: Clock + ?Sized,
{
    match poll_verification(verifier, clock, polling, request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(
                address = %request.address(),
                error = %e,
                event = "verification_failed"
            );
            VerificationOutcome::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClock, FakeVerifier};
    use alloy_primitives::Address;

    fn request() -> VerificationRequest {
        VerificationRequest::builder()
            .address(Address::with_last_byte(9))
            .contract_name("contracts/RdatOFT.sol:RdatOFT")
            .compiler_version("v0.8.22+commit.4fc1097e")
            .source("{}")
            .build()
    }

    #[tokio::test]
    async fn test_pending_then_verified() {
        let verifier = FakeVerifier::queued(vec![
            VerificationStatus::Pending,
            VerificationStatus::Pending,
            VerificationStatus::Verified,
        ]);
        let clock = FakeClock::new();

        let outcome = poll_verification(&verifier, &clock, PollingConfig::default(), &request())
            .await
            .unwrap();

        assert_eq!(outcome, VerificationOutcome::Verified);
        assert_eq!(clock.sleep_count(), 3);
        assert_eq!(clock.total_sleep_time(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_already_verified_skips_polling() {
        let verifier = FakeVerifier::already_verified();
        let clock = FakeClock::new();

        let outcome = poll_verification(&verifier, &clock, PollingConfig::default(), &request())
            .await
            .unwrap();

        assert_eq!(outcome, VerificationOutcome::AlreadyVerified);
        assert_eq!(clock.sleep_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_after_max_attempts() {
        let verifier = FakeVerifier::queued(vec![VerificationStatus::Pending; 10]);
        let clock = FakeClock::new();
        let polling = PollingConfig::default().with_max_attempts(4);

        let err = poll_verification(&verifier, &clock, polling, &request())
            .await
            .unwrap_err();

        assert!(matches!(err, OftError::VerificationTimeout { attempts: 4 }));
        assert_eq!(verifier.status_checks(), 4);
    }

    #[tokio::test]
    async fn test_best_effort_folds_submit_error() {
        let verifier = FakeVerifier::rejecting("Invalid API Key");
        let clock = FakeClock::new();

        let outcome =
            verify_best_effort(&verifier, &clock, PollingConfig::default(), &request()).await;

        assert!(matches!(
            outcome,
            VerificationOutcome::Failed { reason } if reason.contains("Invalid API Key")
        ));
    }
}
