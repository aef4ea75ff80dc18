use serde::{Deserialize, Serialize};

/// JWT claim set carrying the identity snapshot
///
/// The permission matrix is embedded at issuance time and stays
/// authoritative for the token's lifetime; `permissions` is kept as a raw
/// JSON value here because older tokens carried it string-encoded, and
/// normalization happens during verification.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin id)
    pub sub: String,

    /// Username at issuance time
    pub username: String,

    /// Role at issuance time
    pub role: String,

    /// Super-admin flag at issuance time
    #[serde(default)]
    pub is_super_admin: bool,

    /// Active flag at issuance time (snapshot only; authorization re-reads
    /// the current value)
    #[serde(default)]
    pub is_active: bool,

    /// Permission matrix snapshot (object, or JSON text in older tokens)
    #[serde(default)]
    pub permissions: serde_json::Value,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}
