use thiserror::Error;

/// Token verification failures
///
/// Kept separate from InternalError: these are expected request-level
/// outcomes, not server faults, and every API group maps them to its own
/// 401 variants.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed or has an invalid signature")]
    Malformed,
}
