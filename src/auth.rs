//! Identity collaborator mapping bearer credentials to user identities.

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the authentication collaborator.
///
/// The backend never inspects credentials itself; it hands the raw bearer
/// token to this trait and receives either a user id or a well-defined
/// "invalid" signal (`None`).
pub trait Identity: Send + Sync {
    /// Resolve a bearer token to a user id, or `None` when the token is invalid.
    fn resolve(&self, token: &str) -> BoxFuture<'static, Option<i64>>;

    /// Issue a fresh bearer token bound to the given user id.
    fn issue(&self, user_id: i64) -> BoxFuture<'static, String>;
}

/// In-memory token registry used as the reference [`Identity`] implementation.
///
/// Tokens are opaque random strings; there is no expiry. A production
/// deployment swaps this for a real credential verifier behind the same trait.
#[derive(Default)]
pub struct TokenRegistry {
    tokens: DashMap<String, i64>,
}

impl TokenRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-agreed token for a user, useful in tests.
    pub fn insert(&self, token: impl Into<String>, user_id: i64) {
        self.tokens.insert(token.into(), user_id);
    }
}

impl Identity for TokenRegistry {
    fn resolve(&self, token: &str) -> BoxFuture<'static, Option<i64>> {
        let resolved = self.tokens.get(token).map(|entry| *entry.value());
        Box::pin(async move { resolved })
    }

    fn issue(&self, user_id: i64) -> BoxFuture<'static, String> {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user_id);
        Box::pin(async move { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_token_resolves_back_to_user() {
        let registry = TokenRegistry::new();
        let token = registry.issue(7).await;
        assert_eq!(registry.resolve(&token).await, Some(7));
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let registry = TokenRegistry::new();
        assert_eq!(registry.resolve("nope").await, None);
    }
}
