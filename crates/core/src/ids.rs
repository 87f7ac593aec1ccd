//! Per-request identifier generation. These are cosmetic identifiers, not
//! secrets; `thread_rng` is plenty.

use rand::Rng;
use uuid::Uuid;

const ADJECTIVES: [&str; 5] = ["useful", "bright", "swift", "calm", "bold"];
const NOUNS: [&str; 5] = ["fuze", "wave", "spark", "flow", "core"];

/// Envelope `requestId`: `agent-` plus a fresh UUID v4.
pub fn request_id() -> String {
    format!("agent-{}", Uuid::new_v4())
}

/// Envelope `sessionId`: decimal string of an integer uniform in
/// `[-9e18, 0)`.
pub fn session_id() -> String {
    let n: i64 = rand::thread_rng().gen_range(-9_000_000_000_000_000_000..0);
    n.to_string()
}

/// Envelope `project`: `<adjective>-<noun>-<5 base36 chars>`.
pub fn project_id() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let suffix: String = (0..5)
        .map(|_| char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("{adjective}-{noun}-{suffix}")
}
