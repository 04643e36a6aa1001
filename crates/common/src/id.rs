//! Identifier generation.

use ulid::Ulid;

/// Generates primary keys.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Lowercase ULID, sortable by creation time.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ids_are_unique_and_lowercase() {
        let id_gen = IdGenerator::new();
        let a = id_gen.generate();
        let b = id_gen.generate();

        assert_ne!(a, b);
        assert_eq!(a.len(), 26);
        assert_eq!(a, a.to_lowercase());
    }
}
