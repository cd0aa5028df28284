//! Canonical schema constants for structured logging and events
//!
//! Every log line emitted by the operation macros uses these keys, so tests
//! and log pipelines can rely on them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_ELEMENT_ID: &str = "element_id";
pub const FIELD_RELATIONSHIP_ID: &str = "relationship_id";
pub const FIELD_VIEW_KEY: &str = "view_key";
pub const FIELD_CANONICAL_NAME: &str = "canonical_name";

// Collection sizes
pub const FIELD_ELEMENT_COUNT: &str = "element_count";
pub const FIELD_RELATIONSHIP_COUNT: &str = "relationship_count";
pub const FIELD_MATCHED_COUNT: &str = "matched_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_entity_field_keys_are_distinct() {
        let keys = [
            FIELD_ELEMENT_ID,
            FIELD_RELATIONSHIP_ID,
            FIELD_VIEW_KEY,
            FIELD_CANONICAL_NAME,
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
