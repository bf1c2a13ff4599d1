//! Request identity.
//!
//! An [`IdentityProvider`] turns request headers into a [`Principal`]. The
//! bundled [`TrustedHeaderIdentity`] trusts headers set by an authenticating
//! gateway in front of the service.

use axum::http::HeaderMap;
use serde::Serialize;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::RecordId;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role; `admin` grants admin rights.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// The caller's donor id.
    pub id: RecordId,
    /// Whether the caller may use the admin routes.
    pub is_admin: bool,
}

impl Principal {
    /// Fails with [`SchedulerError::Forbidden`] unless the caller is an admin.
    pub fn require_admin(&self) -> SchedulerResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(SchedulerError::forbidden("admin role required"))
        }
    }

    /// Fails unless the caller is `donor_id` or an admin.
    pub fn require_self_or_admin(&self, donor_id: RecordId) -> SchedulerResult<()> {
        if self.is_admin || self.id == donor_id {
            Ok(())
        } else {
            Err(SchedulerError::forbidden(format!(
                "user {} may not act for donor {}",
                self.id, donor_id
            )))
        }
    }
}

/// Resolves the caller of a request.
pub trait IdentityProvider: Send + Sync {
    /// Returns the principal, or `None` when the request is anonymous.
    fn authenticate(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// Reads [`USER_ID_HEADER`] and [`USER_ROLE_HEADER`].
///
/// A missing or non-numeric id means anonymous. Any role other than `admin`
/// (case-insensitive) is a plain donor.
///
/// # Example
///
/// ```
/// use axum::http::HeaderMap;
/// use donor_scheduler::identity::{IdentityProvider, TrustedHeaderIdentity};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-user-id", "7".parse().unwrap());
/// headers.insert("x-user-role", "admin".parse().unwrap());
///
/// let principal = TrustedHeaderIdentity.authenticate(&headers).unwrap();
/// assert_eq!(principal.id, 7);
/// assert!(principal.is_admin);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedHeaderIdentity;

impl IdentityProvider for TrustedHeaderIdentity {
    fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        let id = headers
            .get(USER_ID_HEADER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<RecordId>()
            .ok()?;

        let is_admin = headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|role| role.trim().eq_ignore_ascii_case("admin"));

        Some(Principal { id, is_admin })
    }
}
