// ABOUTME: Session module: the captured record types and their on-disk store.
// ABOUTME: Records live as one JSON file each in the workspace's context directory.

pub mod record;
pub mod store;

pub use record::{MAX_OPEN_FILES, SessionRecord, StoredSession};
pub use store::{DEFAULT_CONTEXT_DIR, SessionStore};
