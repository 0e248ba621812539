pub mod jwt;
pub mod password;
pub mod validate;

pub use jwt::{Claims, JwtTokenIssuer, TokenIssuer};
pub use password::{Argon2CredentialVerifier, CredentialVerifier};
pub use validate::{PlanId, ValidatedJson};
