//! # Identity & Session
//!
//! Registration, credential verification, and opaque bearer-token issuance.
//! Tokens never expire; each login overwrites the previous token, so a user
//! has at most one live session.

use std::sync::Arc;

use domains::{CollectionStore, CredentialHasher, DomainError, DomainResult, TokenSource, User};
use uuid::Uuid;

use crate::{decode, encode, USERS};

pub struct IdentityService {
    store: Arc<dyn CollectionStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenSource>,
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn CollectionStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self { store, hasher, tokens }
    }

    /// Creates an account. The duplicate check is an exact, case-sensitive
    /// email match (login, by contrast, matches case-insensitively — both
    /// behaviors are preserved from the source).
    pub async fn register(&self, username: &str, email: &str, password: &str) -> DomainResult<()> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation("All fields are required".into()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            token: None,
        };

        self.store
            .apply(
                USERS,
                Box::new(move |snapshot| {
                    let mut users: Vec<User> = decode(snapshot)?;
                    if users.iter().any(|u| u.email == user.email) {
                        return Err(DomainError::DuplicateAccount(
                            "An account with this email already exists".into(),
                        ));
                    }
                    users.push(user);
                    encode(users)
                }),
            )
            .await?;
        Ok(())
    }

    /// Verifies credentials and issues a fresh session token, persisting it
    /// on the user record. Unknown email and wrong password surface distinct
    /// messages, matching the source behavior.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<String> {
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation("Email and password are required".into()));
        }

        let token = self.tokens.issue();
        let issued = token.clone();
        let hasher = self.hasher.clone();
        let email = email.to_lowercase();
        let password = password.to_string();

        self.store
            .apply(
                USERS,
                Box::new(move |snapshot| {
                    let mut users: Vec<User> = decode(snapshot)?;
                    let user = users
                        .iter_mut()
                        .find(|u| u.email.to_lowercase() == email)
                        .ok_or_else(|| DomainError::InvalidCredentials("Invalid email".into()))?;
                    if !hasher.verify(&password, &user.password_hash) {
                        return Err(DomainError::InvalidCredentials("Invalid password".into()));
                    }
                    user.token = Some(token);
                    encode(users)
                }),
            )
            .await?;
        Ok(issued)
    }

    /// Capability check: resolves a presented bearer token to the user whose
    /// stored token matches it, if any.
    pub async fn authorize(&self, token: &str) -> DomainResult<Option<User>> {
        let users: Vec<User> = decode(self.store.read(USERS).await?)?;
        Ok(users.into_iter().find(|u| u.token.as_deref() == Some(token)))
    }
}
