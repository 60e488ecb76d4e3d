//! User profile form: validation and ten-minute local persistence.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use civicsecure_shared::{FieldErrors, ReporterType};

use crate::cache::{Clock, TtlCache};
use crate::error::Result;
use crate::local_store::LocalStore;
use crate::upload::ImageUpload;
use crate::verification::{digits_only, AadhaarVerification};

pub const PROFILE_KEY: &str = "userProfile";

pub fn profile_ttl() -> Duration {
    Duration::minutes(10)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub aadhaar: String,
    /// Name of the selected photo file.
    pub profile_photo: Option<String>,
}

impl UserProfile {
    pub fn set_phone(&mut self, input: &str) {
        self.phone = digits_only(input, 10);
    }

    pub fn set_aadhaar(&mut self, input: &str) {
        self.aadhaar = digits_only(input, 12);
    }

    /// Accept a new profile photo, or return the reason it was refused.
    pub fn set_photo(&mut self, upload: &ImageUpload) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        match upload.check() {
            Ok(()) => self.profile_photo = Some(upload.file_name.clone()),
            Err(reason) => errors.insert("photo", reason),
        }
        errors.into_result(())
    }

    pub fn validate(&self) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let username_len = self.username.chars().count();
        if self.username.trim().is_empty() {
            errors.insert("username", "Username is required");
        } else if !(3..=20).contains(&username_len) {
            errors.insert("username", "Username must be 3-20 characters long");
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.insert("email", "Please enter a valid email address");
        }

        if self.phone.trim().is_empty() {
            errors.insert("phone", "Phone number is required");
        } else if !is_digits(&self.phone, 10) {
            errors.insert("phone", "Please enter a valid 10-digit phone number");
        }

        if self.aadhaar.trim().is_empty() {
            errors.insert("aadhaar", "Aadhaar number is required");
        } else if !is_digits(&self.aadhaar, 12) {
            errors.insert("aadhaar", "Please enter a valid 12-digit Aadhaar number");
        }

        errors.into_result(())
    }

    /// Fill the Aadhaar number from an active verification when blank.
    pub fn autofill(&mut self, verification: Option<&AadhaarVerification>) {
        if let Some(v) = verification {
            if self.aadhaar.is_empty() {
                self.aadhaar = v.aadhaar_number.clone();
            }
        }
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Reporter types the complaint form may offer.
pub fn allowed_reporter_types(verified: bool) -> Vec<ReporterType> {
    ReporterType::ALL
        .into_iter()
        .filter(|t| verified || *t != ReporterType::Verified)
        .collect()
}

pub struct ProfileStore<S, C> {
    cache: TtlCache<S, C>,
}

impl<S: LocalStore, C: Clock> ProfileStore<S, C> {
    pub fn new(cache: TtlCache<S, C>) -> Self {
        Self { cache }
    }

    pub fn load(&self) -> Option<UserProfile> {
        self.cache.get(PROFILE_KEY, profile_ttl())
    }

    /// Validate and persist. Nothing is written when validation fails.
    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        profile.validate()?;
        self.cache.set(PROFILE_KEY, profile)?;
        tracing::info!(username = %profile.username, "Profile saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.cache.clear(PROFILE_KEY)?;
        Ok(())
    }
}
