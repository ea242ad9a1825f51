//! Shared currency descriptors
//!
//! A [`Currency`] is an immutable value object shared by every wallet and
//! transfer that references it. Sharing uses atomic reference counting:
//! cloning a handle retains the descriptor, dropping it releases it, and the
//! compiler enforces that the two always pair up. Identity is by value over
//! (code, issuer, type), never by pointer.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct CurrencyInner {
    uids: String,
    name: String,
    code: String,
    currency_type: String,
    issuer: Option<String>,
}

/// A shared, immutable currency descriptor
#[derive(Debug, Clone)]
pub struct Currency {
    inner: Arc<CurrencyInner>,
}

impl Currency {
    /// Create a new currency descriptor
    pub fn new(
        uids: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
        currency_type: impl Into<String>,
        issuer: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(CurrencyInner {
                uids: uids.into(),
                name: name.into(),
                code: code.into(),
                currency_type: currency_type.into(),
                issuer,
            }),
        }
    }

    pub fn uids(&self) -> &str {
        &self.inner.uids
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn code(&self) -> &str {
        &self.inner.code
    }

    pub fn currency_type(&self) -> &str {
        &self.inner.currency_type
    }

    /// The issuer, or `None` for a ledger-native currency
    pub fn issuer(&self) -> Option<&str> {
        self.inner.issuer.as_deref()
    }

    /// Number of live handles to this descriptor
    pub fn holder_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two handles point at the same allocation.
    ///
    /// This is a sharing check, not an identity check; use `==` for identity.
    pub fn shares_allocation(&self, other: &Currency) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.inner.code == other.inner.code
            && self.inner.issuer == other.inner.issuer
            && self.inner.currency_type == other.inner.currency_type
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.code.hash(state);
        self.inner.issuer.hash(state);
        self.inner.currency_type.hash(state);
    }
}
