// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Login endpoint
//!
//! `POST /login/<provider>?code=...&state=...` turns an OAuth authorization
//! code into a session token:
//!
//! 1. reject an empty `code` before any network call
//! 2. exchange the code for the provider's access token
//! 3. fetch the caller's profile with that token
//! 4. save the identity `{remote_id, display_name, upstream_credential}`
//! 5. sign a session token embedding the credential under `identities`
//! 6. answer `{ "jwt": ..., "user_id": ... }`
//!
//! The first failing step ends the request; nothing is retried.

use log::{debug, info};
use rocket::serde::json::Json;
use rocket::{post, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::error::AuthError;
use super::jwt::{ClaimSet, IdentityClaim, TokenCodec};
use super::oauth::{CallerIdentity, ProviderRegistry};
use crate::store::UserStore;

/// Default bound on a single user store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Successful login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed session token
    pub jwt: String,
    /// The caller's `remoteID`
    pub user_id: String,
}

/// Orchestrates providers, user store and token codec for a login
pub struct LoginService {
    providers: ProviderRegistry,
    codec: TokenCodec,
    store: Arc<dyn UserStore>,
    store_timeout: Duration,
}

impl LoginService {
    /// Create the service
    pub fn new(providers: ProviderRegistry, codec: TokenCodec, store: Arc<dyn UserStore>) -> Self {
        Self {
            providers,
            codec,
            store,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Bound every store call by `timeout`
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Registered providers
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Log a caller in through `provider_name`
    pub async fn login(
        &self,
        provider_name: &str,
        code: &str,
        state: &str,
    ) -> Result<AuthResponse, AuthError> {
        if code.is_empty() {
            return Err(AuthError::MissingCode);
        }
        let provider = self.providers.get(provider_name)?;

        let credential = provider.exchange_code(code, state).await?;
        debug!("Authorization code exchanged with {}", provider.name());

        let profile = provider.fetch_profile(&credential).await?;
        let identity = CallerIdentity::from_profile(provider.name(), &profile, credential);
        debug!("Resolved {} as {}", identity.display_name, identity.remote_id);

        self.save(&identity).await?;

        let claims = ClaimSet::for_subject(&identity.remote_id).with_identity(IdentityClaim::new(
            provider.name(),
            &profile.user_id,
            identity.upstream_credential.as_str(),
        ));
        let jwt = self.codec.sign(&claims)?;

        info!(
            "User {} logged in through {}",
            identity.remote_id,
            provider.name()
        );
        Ok(AuthResponse {
            jwt,
            user_id: identity.remote_id,
        })
    }

    async fn save(&self, identity: &CallerIdentity) -> Result<(), AuthError> {
        match tokio::time::timeout(self.store_timeout, self.store.save(identity)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AuthError::StoreFailure(e.to_string())),
            Err(_) => Err(AuthError::StoreFailure(format!(
                "save timed out after {:?}",
                self.store_timeout
            ))),
        }
    }
}

/// Exchange an authorization code for a session token
#[post("/login/<provider>?<code>&<state>")]
pub async fn login(
    provider: &str,
    code: Option<String>,
    state: Option<String>,
    service: &State<LoginService>,
) -> Result<Json<AuthResponse>, AuthError> {
    service
        .login(
            provider,
            code.as_deref().unwrap_or_default(),
            state.as_deref().unwrap_or_default(),
        )
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::context::UpstreamCredential;
    use crate::auth::oauth::{OAuthProvider, ProviderProfile};
    use crate::store::{MockUserStore, StoreError};
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &[u8] = b"login-test-secret";

    struct StubProvider {
        exchange: Result<UpstreamCredential, AuthError>,
        profile: Result<ProviderProfile, AuthError>,
        exchanges: AtomicUsize,
    }

    impl StubProvider {
        fn ok() -> Self {
            Self {
                exchange: Ok(UpstreamCredential::new("xyz")),
                profile: Ok(ProviderProfile {
                    user_id: "42".to_string(),
                    login: "alice".to_string(),
                }),
                exchanges: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OAuthProvider for StubProvider {
        fn name(&self) -> &str {
            "github"
        }

        async fn exchange_code(
            &self,
            _code: &str,
            _state: &str,
        ) -> Result<UpstreamCredential, AuthError> {
            self.exchanges.fetch_add(1, Ordering::SeqCst);
            self.exchange.clone()
        }

        async fn fetch_profile(
            &self,
            credential: &UpstreamCredential,
        ) -> Result<ProviderProfile, AuthError> {
            assert_eq!(credential.as_str(), "xyz");
            self.profile.clone()
        }
    }

    fn service(provider: Arc<StubProvider>, store: MockUserStore) -> LoginService {
        LoginService::new(
            ProviderRegistry::new().with(provider),
            TokenCodec::new(SECRET, ChronoDuration::hours(1)),
            Arc::new(store),
        )
    }

    #[tokio::test]
    async fn successful_login_saves_identity_and_signs_token() {
        let mut store = MockUserStore::new();
        store
            .expect_save()
            .withf(|identity: &CallerIdentity| {
                identity.remote_id == "github|42"
                    && identity.display_name == "alice"
                    && identity.upstream_credential.as_str() == "xyz"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(Arc::new(StubProvider::ok()), store);
        let response = service.login("github", "code", "state").await.unwrap();
        assert_eq!(response.user_id, "github|42");

        let claims = crate::auth::jwt::verify(&response.jwt, SECRET).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("github|42"));
        assert_eq!(claims.first_access_token(), Some("xyz"));
        assert_eq!(claims.providers(), vec!["github"]);
    }

    #[tokio::test]
    async fn empty_code_short_circuits() {
        let mut store = MockUserStore::new();
        store.expect_save().never();
        let provider = Arc::new(StubProvider::ok());

        let service = service(provider.clone(), store);
        assert_eq!(
            service.login("github", "", "state").await,
            Err(AuthError::MissingCode)
        );
        assert_eq!(provider.exchanges.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_provider_is_rejected() {
        let mut store = MockUserStore::new();
        store.expect_save().never();

        let service = service(Arc::new(StubProvider::ok()), store);
        assert_eq!(
            service.login("gitlab", "code", "state").await,
            Err(AuthError::UnknownProvider("gitlab".to_string()))
        );
    }

    #[tokio::test]
    async fn exchange_failure_skips_profile_and_store() {
        let mut store = MockUserStore::new();
        store.expect_save().never();
        let provider = Arc::new(StubProvider {
            exchange: Err(AuthError::UpstreamRejected("bad_verification_code".into())),
            profile: Err(AuthError::UpstreamUnreachable("must not be called".into())),
            exchanges: AtomicUsize::new(0),
        });

        let service = service(provider, store);
        assert_eq!(
            service.login("github", "code", "state").await,
            Err(AuthError::UpstreamRejected("bad_verification_code".into()))
        );
    }

    #[tokio::test]
    async fn profile_failure_skips_store() {
        let mut store = MockUserStore::new();
        store.expect_save().never();
        let provider = Arc::new(StubProvider {
            profile: Err(AuthError::UpstreamMalformedResponse("bad json".into())),
            ..StubProvider::ok()
        });

        let service = service(provider, store);
        assert!(matches!(
            service.login("github", "code", "state").await,
            Err(AuthError::UpstreamMalformedResponse(_))
        ));
    }

    struct SlowStore(Duration);

    #[async_trait]
    impl UserStore for SlowStore {
        async fn save(&self, _identity: &CallerIdentity) -> Result<(), StoreError> {
            tokio::time::sleep(self.0).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let service = LoginService::new(
            ProviderRegistry::new().with(Arc::new(StubProvider::ok())),
            TokenCodec::new(SECRET, ChronoDuration::hours(1)),
            Arc::new(SlowStore(Duration::from_secs(5))),
        )
        .with_store_timeout(Duration::from_millis(50));

        let err = service.login("github", "code", "state").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreFailure(ref detail) if detail.contains("timed out")));
        assert_eq!(err.status(), rocket::http::Status::Unauthorized);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let mut store = MockUserStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("kv down".to_string())));

        let service = service(Arc::new(StubProvider::ok()), store);
        let err = service.login("github", "code", "state").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreFailure(ref detail) if detail.contains("kv down")));
        assert_eq!(err.envelope().message, "Unable to register user");
    }
}
