pub mod instance;
pub mod user;

pub use instance::{DatabaseEntry, DatabaseInstance, NewInstance};
pub use user::{Role, User};

use uuid::Uuid;

/// Parses a record id taken from a URL. Malformed ids are treated as absent records.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
