//! Id generation for elements and relationships
//!
//! A model owns one generator. Snapshot restore swaps in a caller-supplied
//! generator and reports every restored id through [`IdGenerator::found`] so
//! freshly generated ids never collide with restored ones.

use std::fmt;
use std::sync::Mutex;

use uuid::Uuid;

/// Source of model-unique ids
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Produce the next id
    fn generate_id(&self) -> String;

    /// Record an id that entered the model from outside this generator
    fn found(&self, id: &str);
}

/// Monotonic integer ids ("1", "2", ...)
///
/// Guarded by a mutex so concurrent creators never observe the same value.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    last: Mutex<u64>,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest id handed out or found so far
    pub fn current(&self) -> u64 {
        self.last.lock().map(|last| *last).unwrap_or_else(|p| *p.into_inner())
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_id(&self) -> String {
        let mut last = self.last.lock().unwrap_or_else(|p| p.into_inner());
        *last += 1;
        last.to_string()
    }

    fn found(&self, id: &str) {
        // non-numeric ids cannot collide with generated ones
        if let Ok(value) = id.parse::<u64>() {
            let mut last = self.last.lock().unwrap_or_else(|p| p.into_inner());
            if value > *last {
                *last = value;
            }
        }
    }
}

/// Time-ordered UUIDv7 ids
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::now_v7().to_string()
    }

    fn found(&self, _id: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sequential_ids_increase() {
        let generator = SequentialIdGenerator::new();
        assert_eq!(generator.generate_id(), "1");
        assert_eq!(generator.generate_id(), "2");
    }

    #[test]
    fn test_found_bumps_past_external_ids() {
        let generator = SequentialIdGenerator::new();
        generator.found("41");
        generator.found("7");
        generator.found("not-a-number");
        assert_eq!(generator.generate_id(), "42");
    }

    #[test]
    fn test_concurrent_generation_never_repeats() {
        let generator = Arc::new(SequentialIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || {
                    (0..250).map(|_| generator.generate_id()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id generated");
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(generator.current(), 1000);
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let generator = UuidIdGenerator;
        assert_ne!(generator.generate_id(), generator.generate_id());
    }
}
