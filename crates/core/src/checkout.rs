//! Checkout draft: the buyer's contact and address fields.
//!
//! The draft is a flat record saved as the buyer types. The only rule is
//! presence: every required field must be non-blank before checkout can
//! move on to payment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from validating a [`CheckoutDraft`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    /// One or more required fields are blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Buyer details collected during checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CheckoutDraft {
    /// Required fields, by their serialized name.
    fn required(&self) -> [(&'static str, &str); 8] {
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ]
    }

    /// Names of required fields that are blank after trimming.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.required()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::MissingFields`] listing the blank fields.
    pub fn validate(&self) -> Result<(), DraftError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DraftError::MissingFields(missing))
        }
    }

    /// Shallow-merge the provided fields.
    pub fn merge(&mut self, patch: DraftPatch) {
        let DraftPatch {
            full_name,
            email,
            phone,
            address,
            city,
            state,
            postal_code,
            country,
            company,
            notes,
        } = patch;

        for (slot, value) in [
            (&mut self.full_name, full_name),
            (&mut self.email, email),
            (&mut self.phone, phone),
            (&mut self.address, address),
            (&mut self.city, city),
            (&mut self.state, state),
            (&mut self.postal_code, postal_code),
            (&mut self.country, country),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if company.is_some() {
            self.company = company;
        }
        if notes.is_some() {
            self.notes = notes;
        }
    }
}

/// Partial update of a [`CheckoutDraft`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> CheckoutDraft {
        CheckoutDraft {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 98000 00000".to_string(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            postal_code: "411001".to_string(),
            country: "India".to_string(),
            company: None,
            notes: None,
        }
    }

    #[test]
    fn test_empty_draft_missing_everything() {
        assert_eq!(CheckoutDraft::default().missing_fields().len(), 8);
    }

    #[test]
    fn test_complete_draft_validates() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut draft = complete();
        draft.city = "   ".to_string();
        assert_eq!(
            draft.validate(),
            Err(DraftError::MissingFields(vec!["city"]))
        );
    }

    #[test]
    fn test_error_message_lists_fields() {
        let err = DraftError::MissingFields(vec!["email", "phone"]);
        assert_eq!(err.to_string(), "missing required fields: email, phone");
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut draft = complete();
        draft.merge(DraftPatch {
            city: Some("Mumbai".to_string()),
            notes: Some("Call after 6pm".to_string()),
            ..DraftPatch::default()
        });
        assert_eq!(draft.city, "Mumbai");
        assert_eq!(draft.full_name, "Asha Rao");
        assert_eq!(draft.notes.as_deref(), Some("Call after 6pm"));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let draft: CheckoutDraft = serde_json::from_str(r#"{"fullName":"Asha"}"#).unwrap();
        assert_eq!(draft.full_name, "Asha");
        assert!(draft.email.is_empty());
    }
}
