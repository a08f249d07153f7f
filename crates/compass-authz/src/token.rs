use crate::{AuthzResult, SubjectId};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an agency bearer token.
///
/// `permissions` is informational only; effective permissions are always
/// recomputed from the store when the request is served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialClaims {
    pub role: String,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Decoded, signature- and expiry-checked credential.
///
/// `role` is kept as the raw claim string so that an unrecognised role can be
/// rejected by the resolver instead of failing decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub role: String,
    pub subject_id: SubjectId,
}

pub struct CredentialVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl CredentialVerifier {
    /// Build a verifier for HS256 tokens signed with a shared secret.
    pub fn from_secret(secret: &[u8], leeway: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> AuthzResult<Credential> {
        let data =
            jsonwebtoken::decode::<CredentialClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(Credential {
            role: data.claims.role,
            subject_id: SubjectId::new(data.claims.id),
        })
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}
