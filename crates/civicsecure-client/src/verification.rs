//! Simulated Aadhaar identity verification.
//!
//! A successful verification is cached under `aadhaarVerification` for ten
//! minutes and unlocks the `verified` reporter type.

use std::future::Future;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use civicsecure_shared::FieldErrors;

use crate::cache::{Clock, TtlCache};
use crate::error::{ClientError, Result};
use crate::local_store::LocalStore;
use crate::upload::ImageUpload;

pub const VERIFICATION_KEY: &str = "aadhaarVerification";

pub fn verification_ttl() -> Duration {
    Duration::minutes(10)
}

/// Twelve ASCII digits, the first in 2..=9.
pub fn validate_aadhaar_number(number: &str) -> bool {
    number.len() == 12
        && number.bytes().all(|b| b.is_ascii_digit())
        && matches!(number.as_bytes()[0], b'2'..=b'9')
}

/// Keep at most `max` ASCII digits of user input.
pub fn digits_only(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// `XXXX XXXX 1234`
pub fn mask_aadhaar(number: &str) -> String {
    let tail: String = number
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("XXXX XXXX {tail}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationRequest {
    pub aadhaar_number: String,
    pub front: Option<ImageUpload>,
    pub back: Option<ImageUpload>,
}

impl VerificationRequest {
    pub fn validate(&self) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.aadhaar_number.trim().is_empty() {
            errors.insert("aadhaar", "Aadhaar number is required");
        } else if !validate_aadhaar_number(&self.aadhaar_number) {
            errors.insert("aadhaar", "Please enter a valid 12-digit Aadhaar number");
        }

        check_side(&mut errors, "frontImage", "Front side image is required", &self.front);
        check_side(&mut errors, "backImage", "Back side image is required", &self.back);

        errors.into_result(())
    }
}

fn check_side(
    errors: &mut FieldErrors,
    field: &'static str,
    missing: &'static str,
    image: &Option<ImageUpload>,
) {
    match image {
        None => errors.insert(field, missing),
        Some(upload) => {
            if let Err(reason) = upload.check() {
                errors.insert(field, reason);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Accepted { reference: String },
    Rejected { reason: String },
}

/// External identity-verification service.
pub trait VerificationProvider {
    fn verify(
        &self,
        request: &VerificationRequest,
    ) -> impl Future<Output = Result<VerificationOutcome>> + Send;
}

/// Accepts every well-formed request after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    pub delay: StdDuration,
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self {
            delay: StdDuration::from_secs(2),
        }
    }
}

impl VerificationProvider for SimulatedProvider {
    async fn verify(&self, _request: &VerificationRequest) -> Result<VerificationOutcome> {
        tokio::time::sleep(self.delay).await;
        let reference = uuid::Uuid::new_v4().simple().to_string();
        Ok(VerificationOutcome::Accepted {
            reference: format!("VRF-{}", reference[..8].to_ascii_uppercase()),
        })
    }
}

/// Cached proof of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AadhaarVerification {
    pub aadhaar_number: String,
    pub reference: String,
    pub verified_at: DateTime<Utc>,
}

pub struct VerificationFlow<P, S, C> {
    provider: P,
    cache: TtlCache<S, C>,
}

impl<P, S, C> VerificationFlow<P, S, C>
where
    P: VerificationProvider,
    S: LocalStore,
    C: Clock,
{
    pub fn new(provider: P, cache: TtlCache<S, C>) -> Self {
        Self { provider, cache }
    }

    /// Validate, hand the documents to the provider and cache the result.
    pub async fn submit(&self, request: &VerificationRequest) -> Result<AadhaarVerification> {
        request.validate()?;

        match self.provider.verify(request).await? {
            VerificationOutcome::Accepted { reference } => {
                let record = AadhaarVerification {
                    aadhaar_number: request.aadhaar_number.clone(),
                    reference,
                    verified_at: self.cache.clock().now(),
                };
                self.cache.set(VERIFICATION_KEY, &record)?;
                tracing::info!(
                    aadhaar = %mask_aadhaar(&record.aadhaar_number),
                    reference = %record.reference,
                    "Aadhaar verification accepted"
                );
                Ok(record)
            }
            VerificationOutcome::Rejected { reason } => {
                tracing::warn!(%reason, "Aadhaar verification rejected");
                let mut errors = FieldErrors::new();
                errors.insert("aadhaar", reason);
                Err(ClientError::Validation(errors))
            }
        }
    }

    /// The active verification, if one was accepted within the last ten minutes.
    pub fn current(&self) -> Option<AadhaarVerification> {
        self.cache.get(VERIFICATION_KEY, verification_ttl())
    }

    pub fn is_verified(&self) -> bool {
        self.current().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::local_store::MemoryStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn scan(name: &str) -> Option<ImageUpload> {
        Some(ImageUpload::new(name, "image/jpeg", 200_000))
    }

    fn request() -> VerificationRequest {
        VerificationRequest {
            aadhaar_number: "234567890123".into(),
            front: scan("front.jpg"),
            back: scan("back.jpg"),
        }
    }

    fn flow() -> (
        VerificationFlow<SimulatedProvider, Arc<MemoryStore>, ManualClock>,
        ManualClock,
    ) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let cache = TtlCache::with_clock(Arc::new(MemoryStore::new()), clock.clone());
        (VerificationFlow::new(SimulatedProvider::default(), cache), clock)
    }

    #[test]
    fn aadhaar_number_format() {
        assert!(validate_aadhaar_number("234567890123"));
        assert!(!validate_aadhaar_number("134567890123"));
        assert!(!validate_aadhaar_number("23456789012"));
        assert!(!validate_aadhaar_number("23456789012a"));
        assert_eq!(digits_only("2345-6789-0123-99", 12), "234567890123");
        assert_eq!(mask_aadhaar("234567890123"), "XXXX XXXX 0123");
    }

    #[test]
    fn missing_and_invalid_inputs() {
        let errors = VerificationRequest::default().validate().unwrap_err();
        assert_eq!(errors.get("aadhaar"), Some("Aadhaar number is required"));
        assert_eq!(errors.get("frontImage"), Some("Front side image is required"));
        assert_eq!(errors.get("backImage"), Some("Back side image is required"));

        let bad = VerificationRequest {
            aadhaar_number: "012345678901".into(),
            back: Some(ImageUpload::new("back.pdf", "application/pdf", 10)),
            ..request()
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.get("aadhaar"), Some("Please enter a valid 12-digit Aadhaar number"));
        assert_eq!(errors.get("frontImage"), None);
        assert_eq!(
            errors.get("backImage"),
            Some("Please select a valid image file (JPG, PNG, GIF)")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_verification_lasts_ten_minutes() {
        let (flow, clock) = flow();
        assert!(!flow.is_verified());

        let record = flow.submit(&request()).await.unwrap();
        assert_eq!(record.aadhaar_number, "234567890123");
        assert!(record.reference.starts_with("VRF-"));
        assert!(flow.is_verified());

        clock.advance(Duration::minutes(10));
        assert!(!flow.is_verified());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_requests_never_reach_the_provider() {
        let (flow, _) = flow();
        let err = flow.submit(&VerificationRequest::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(flow.current().is_none());
    }
}
