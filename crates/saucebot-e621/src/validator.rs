// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checks a user's e621 login against the live API.
//!
//! Nothing is cached; every call costs one request unless the credentials
//! are incomplete, which is decided locally.

use reqwest::StatusCode;
use saucebot_core::types::{Credentials, UserId, ValidationResult};
use saucebot_core::{CredentialStore, ValidationErrorKind};
use tracing::{debug, warn};

use crate::client::E621Client;

#[derive(Clone)]
pub struct CredentialValidator {
    client: E621Client,
    store: CredentialStore,
}

impl CredentialValidator {
    pub fn new(client: E621Client, store: CredentialStore) -> Self {
        Self { client, store }
    }

    /// Validates a username/key pair. Missing or empty fields short-circuit
    /// to `IncompleteInfo` without a request.
    pub async fn validate(&self, username: Option<&str>, api_key: Option<&str>) -> ValidationResult {
        let (Some(username), Some(api_key)) = (non_empty(username), non_empty(api_key)) else {
            return ValidationResult::Invalid(ValidationErrorKind::IncompleteInfo);
        };
        let creds = Credentials::new(username, api_key);

        match self.client.check_credentials(&creds).await {
            Ok(StatusCode::OK) => {
                debug!(username, "credentials accepted");
                ValidationResult::Valid(creds)
            }
            Ok(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                debug!(username, "credentials rejected");
                ValidationResult::Invalid(ValidationErrorKind::InvalidInfo)
            }
            Ok(status) => {
                warn!(username, status = %status, "unexpected status from credential probe");
                ValidationResult::Invalid(ValidationErrorKind::Unknown)
            }
            Err(e) => {
                warn!(username, error = %e, "credential probe failed");
                ValidationResult::Invalid(ValidationErrorKind::Unknown)
            }
        }
    }

    /// Validates whatever is stored for `user_id`.
    ///
    /// `None` (anonymous sender) is `IncompleteInfo` without a store lookup.
    /// A failed lookup is `Unknown`.
    pub async fn validate_for_user(&self, user_id: Option<UserId>) -> ValidationResult {
        let Some(user_id) = user_id else {
            return ValidationResult::Invalid(ValidationErrorKind::IncompleteInfo);
        };
        match self.store.get(user_id).await {
            Ok(Some(record)) => {
                self.validate(record.username.as_deref(), record.api_key.as_deref())
                    .await
            }
            Ok(None) => ValidationResult::Invalid(ValidationErrorKind::IncompleteInfo),
            Err(e) => {
                warn!(user_id = user_id.0, error = %e, "credential lookup failed");
                ValidationResult::Invalid(ValidationErrorKind::Unknown)
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, store};
    use saucebot_core::types::CredentialPatch;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_answering(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts.json"))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({"posts": []})))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn ok_is_valid_and_echoes_credentials() {
        let server = server_answering(200).await;
        let validator = CredentialValidator::new(client(&server.uri()), store());
        let result = validator.validate(Some("fox"), Some("k")).await;
        assert_eq!(result, ValidationResult::Valid(Credentials::new("fox", "k")));
    }

    #[tokio::test]
    async fn unauthorized_and_forbidden_are_invalid_info() {
        for status in [401, 403] {
            let server = server_answering(status).await;
            let validator = CredentialValidator::new(client(&server.uri()), store());
            let result = validator.validate(Some("fox"), Some("k")).await;
            assert_eq!(result.error_kind(), Some(ValidationErrorKind::InvalidInfo));
        }
    }

    #[tokio::test]
    async fn other_statuses_are_unknown() {
        for status in [204, 500, 503] {
            let server = server_answering(status).await;
            let validator = CredentialValidator::new(client(&server.uri()), store());
            let result = validator.validate(Some("fox"), Some("k")).await;
            assert_eq!(result.error_kind(), Some(ValidationErrorKind::Unknown));
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_unknown() {
        let validator = CredentialValidator::new(client("http://127.0.0.1:9"), store());
        let result = validator.validate(Some("fox"), Some("k")).await;
        assert_eq!(result.error_kind(), Some(ValidationErrorKind::Unknown));
    }

    #[tokio::test]
    async fn missing_or_empty_fields_skip_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let validator = CredentialValidator::new(client(&server.uri()), store());

        for (u, k) in [(None, Some("k")), (Some("fox"), None), (Some(""), Some("k")), (None, None)] {
            let result = validator.validate(u, k).await;
            assert_eq!(result.error_kind(), Some(ValidationErrorKind::IncompleteInfo));
        }
    }

    #[tokio::test]
    async fn anonymous_user_is_incomplete() {
        let validator = CredentialValidator::new(client("http://127.0.0.1:9"), store());
        let result = validator.validate_for_user(None).await;
        assert_eq!(result.error_kind(), Some(ValidationErrorKind::IncompleteInfo));
    }

    #[tokio::test]
    async fn stored_credentials_are_checked() {
        let server = server_answering(200).await;
        let store = store();
        store.upsert(UserId(1), CredentialPatch::username("fox")).await;
        store.upsert(UserId(1), CredentialPatch::api_key("k")).await;
        let validator = CredentialValidator::new(client(&server.uri()), store);

        assert!(validator.validate_for_user(Some(UserId(1))).await.is_valid());
        assert_eq!(
            validator.validate_for_user(Some(UserId(2))).await.error_kind(),
            Some(ValidationErrorKind::IncompleteInfo)
        );
    }
}
