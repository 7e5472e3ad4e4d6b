// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! User persistence contract
//!
//! The gateway only needs to record who logged in. Stores implement
//! [`UserStore::save`] as an idempotent upsert keyed by `remote_id` and are
//! responsible for their own locking.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::auth::oauth::CallerIdentity;

/// Failure reported by a user store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage is unavailable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The identity was refused
    #[error("identity rejected: {0}")]
    Rejected(String),
}

/// Persistence of caller identities
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or replace the identity keyed by its `remote_id`
    async fn save(&self, identity: &CallerIdentity) -> Result<(), StoreError>;
}

/// Process-local user store
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, CallerIdentity>>,
}

impl InMemoryUserStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity stored under `remote_id`
    pub async fn get(&self, remote_id: &str) -> Option<CallerIdentity> {
        self.users.read().await.get(remote_id).cloned()
    }

    /// Number of stored identities
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, identity: &CallerIdentity) -> Result<(), StoreError> {
        if identity.remote_id.is_empty() {
            return Err(StoreError::Rejected("empty remote id".to_string()));
        }
        debug!("Saving user {}", identity.remote_id);
        self.users
            .write()
            .await
            .insert(identity.remote_id.clone(), identity.clone());
        Ok(())
    }
}
