//! Entity ID generation.

use chrono::Utc;
use uuid::Uuid;

/// Number of random characters appended after the timestamp.
const SUFFIX_LEN: usize = 9;

/// Generate a collision-resistant entity ID.
///
/// The format is `<prefix>_<unix-millis>_<random suffix>`, e.g.
/// `ticket_1724400000000_a1b2c3d4e`. The millisecond timestamp keeps IDs
/// roughly sortable by creation time and the random suffix avoids
/// collisions within the same millisecond. No global uniqueness guarantee
/// beyond practical collision avoidance.
pub fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, millis, &random[..SUFFIX_LEN])
}
