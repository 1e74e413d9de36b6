use josekit::{jws::JwsHeader, jwt::JwtPayload};

/// A JWT split into its parts without any verification.
/// Nothing read from it may be trusted until a signature has been checked.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    /// JOSE header
    pub header: JwsHeader,
    /// Claims
    pub payload: JwtPayload,
    /// Base64url signature segment
    pub signature: String,
}

impl DecodedToken {
    /// The `alg` header, if present and non-empty
    pub fn algorithm(&self) -> Option<&str> {
        self.header.algorithm().filter(|a| !a.is_empty())
    }

    /// The `kid` header, if present and non-empty
    pub fn key_id(&self) -> Option<&str> {
        self.header.key_id().filter(|k| !k.is_empty())
    }
}
