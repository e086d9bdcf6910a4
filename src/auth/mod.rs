/// Authentication module
///
/// Password hashing, access token issuance/verification and the
/// username/password check behind the token endpoint.

mod authenticator;
mod claims;
mod jwt;
mod password;

pub use authenticator::authenticate;
pub use claims::Claims;
pub use jwt::issue_access_token;
pub use jwt::verify_access_token;
pub use jwt::DEFAULT_ACCESS_TOKEN_TTL_MINUTES;
pub use password::dummy_hash;
pub use password::hash_password;
pub use password::verify_password;

#[cfg(test)]
pub(crate) use password::TEST_BCRYPT_COST;
