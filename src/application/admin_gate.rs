//! Bearer-token gate in front of the admin API.
//!
//! Sessions are issued elsewhere; this service only decides whether a
//! presented token matches the configured admin token.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

const ANONYMOUS_ACTOR: &str = "admin:anonymous";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminAuthError {
    #[error("admin token missing")]
    Missing,
    #[error("admin token invalid")]
    Invalid,
}

/// Identity attached to admin requests and used as the actor in log events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    pub label: String,
}

#[derive(Clone)]
pub struct AdminGate {
    token_digest: Option<Vec<u8>>,
}

impl AdminGate {
    /// A gate that checks tokens against `token`. Blank tokens leave the gate
    /// open.
    pub fn new(token: Option<&str>) -> Self {
        let token_digest = token
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(hash_token);
        Self { token_digest }
    }

    /// Gate that admits every request.
    pub fn open() -> Self {
        Self { token_digest: None }
    }

    pub fn is_open(&self) -> bool {
        self.token_digest.is_none()
    }

    pub fn authenticate(&self, token: Option<&str>) -> Result<AdminPrincipal, AdminAuthError> {
        let Some(expected) = self.token_digest.as_ref() else {
            return Ok(AdminPrincipal {
                label: ANONYMOUS_ACTOR.to_string(),
            });
        };

        let token = token
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AdminAuthError::Missing)?;

        let presented = hash_token(token);
        if expected.as_slice().ct_eq(presented.as_slice()).unwrap_u8() == 0 {
            return Err(AdminAuthError::Invalid);
        }

        Ok(AdminPrincipal {
            label: format!("admin:{}", fingerprint(&presented)),
        })
    }
}

fn hash_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

/// Short hex prefix of the digest, safe to log.
fn fingerprint(digest: &[u8]) -> String {
    digest.iter().take(4).map(|b| format!("{b:02x}")).collect()
}
