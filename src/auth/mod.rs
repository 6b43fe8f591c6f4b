pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{require_auth, AuthUser};
pub use password::{hash_password, verify_password};
pub use token::{Claims, JwtService};
