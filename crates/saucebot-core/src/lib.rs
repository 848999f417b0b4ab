// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for saucebot.
//!
//! Holds the error type, the domain types shared by every crate, the
//! storage and chat-platform traits, and the credential lifecycle that sits
//! on top of storage.

pub mod credentials;
pub mod error;
pub mod events;
pub mod traits;
pub mod types;

pub use credentials::CredentialStore;
pub use error::{FavoriteError, SauceError, ValidationErrorKind};
pub use traits::{ChatPlatform, CredentialRepository, EventLog, StorageAdapter};
pub use types::{
    ChatId, CredentialPatch, CredentialState, Credentials, FavoriteOutcome, LogEvent, MessageId,
    MessageRef, SearchMatch, Site, UserCredential, UserId, ValidationResult,
};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn site_wire_names() {
        let e621: Site = serde_json::from_str("\"e621\"").unwrap();
        assert_eq!(e621, Site::E621);
        let fa: Site = serde_json::from_str("\"FurAffinity\"").unwrap();
        assert_eq!(fa, Site::FurAffinity);
        let other: Site = serde_json::from_str("\"DeviantArt\"").unwrap();
        assert_eq!(other, Site::Unknown);
        assert_eq!(Site::E621.to_string(), "e621");
    }

    #[test]
    fn search_match_deserializes_api_record() {
        let json = serde_json::json!({
            "site": "e621",
            "site_id": 12345,
            "site_id_str": "12345",
            "distance": 0,
            "url": "https://static1.e621.net/data/ab/cd/abcd.png",
            "filename": "abcd.png",
            "artists": ["someone"],
            "tags": ["canine", "solo"],
            "rating": "safe",
            "hash": 42,
            "site_info": { "sources": ["https://example.com/a"] }
        });
        let m: SearchMatch = serde_json::from_value(json).unwrap();
        assert_eq!(m.site, Site::E621);
        assert_eq!(m.external_id, "12345");
        assert_eq!(m.distance, Some(0));
        assert_eq!(m.tags, vec!["canine", "solo"]);
        assert_eq!(
            m.site_info.unwrap().sources.unwrap(),
            vec!["https://example.com/a"]
        );
    }

    #[test]
    fn search_match_tolerates_null_tags_and_missing_distance() {
        let json = serde_json::json!({
            "site": "Twitter",
            "site_id_str": "99",
            "url": "https://twitter.com/x/status/99",
            "tags": null,
            "site_info": null
        });
        let m: SearchMatch = serde_json::from_value(json).unwrap();
        assert!(m.tags.is_empty());
        assert_eq!(m.distance, None);
        assert_eq!(m.distance_key(), u64::MAX);
    }

    #[test]
    fn validation_kind_display_round_trips() {
        for kind in [
            ValidationErrorKind::IncompleteInfo,
            ValidationErrorKind::InvalidInfo,
            ValidationErrorKind::Unknown,
        ] {
            let parsed = ValidationErrorKind::from_str(&kind.to_string()).unwrap();
            assert_eq!(parsed, kind);
        }
        assert_eq!(ValidationErrorKind::InvalidInfo.to_string(), "INVALID_INFO");
    }

    #[test]
    fn credential_state_of_record() {
        assert_eq!(CredentialState::of(None), CredentialState::Absent);
        let partial = UserCredential {
            user_id: UserId(1),
            username: None,
            api_key: Some("k".into()),
        };
        assert_eq!(CredentialState::of(Some(&partial)), CredentialState::Partial);
        assert!(partial.credentials().is_none());
        let complete = UserCredential {
            username: Some("u".into()),
            ..partial
        };
        assert_eq!(CredentialState::of(Some(&complete)), CredentialState::Complete);
        assert_eq!(complete.credentials(), Some(Credentials::new("u", "k")));
    }

    #[test]
    fn validation_result_accessors() {
        let ok = ValidationResult::Valid(Credentials::new("u", "k"));
        assert!(ok.is_valid());
        assert!(ok.error_kind().is_none());
        let bad = ValidationResult::Invalid(ValidationErrorKind::InvalidInfo);
        assert!(!bad.is_valid());
        assert_eq!(bad.error_kind(), Some(ValidationErrorKind::InvalidInfo));
        assert!(bad.credentials().is_none());
    }

    #[test]
    fn log_event_serializes_with_kind_tag() {
        let event = LogEvent::CommandReceived {
            chat_id: ChatId(5),
            user_id: UserId(6),
            command: "start".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "command_received");
        assert_eq!(json["chat_id"], 5);
        assert_eq!(event.user_id(), Some(UserId(6)));
    }
}
