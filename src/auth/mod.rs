pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{IdentityClaim, TokenCodec, TokenError};
pub use middleware::{AuthGate, AuthenticatedUser};
pub use password::{hash_password, verify_password};
