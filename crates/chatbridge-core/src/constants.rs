//! Wire constants shared across crates.

/// Placeholder id for every item and part the translator creates.
///
/// The real item id is assigned by whoever persists the response; it is not
/// knowable while the stream is still in flight.
pub const FAKE_RESPONSES_ID: &str = "__fake_id__";

/// `object` field of a response snapshot.
pub const RESPONSE_OBJECT: &str = "response";

/// Role of the single message item the translator builds.
pub const ASSISTANT_ROLE: &str = "assistant";
