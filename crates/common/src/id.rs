//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// Length of a generated primary key.
pub const ID_LEN: usize = 26;

/// ID generator for entities and API secrets.
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

    /// Generate a new primary key.
    ///
    /// Lowercase ULIDs sort by creation time, so listing rows by ID
    /// also lists them in insertion order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a secret for a new API key.
    ///
    /// Random UUID v4 without hyphens; carries no time component.
    #[must_use]
    pub fn generate_api_secret(&self) -> String {
        format!("qc_{}", Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), ID_LEN);
        assert_eq!(id2.len(), ID_LEN);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_generate_api_secret() {
        let id_gen = IdGenerator::new();
        let secret = id_gen.generate_api_secret();

        assert!(secret.starts_with("qc_"));
        assert_eq!(secret.len(), 35);
        assert_ne!(secret, id_gen.generate_api_secret());
    }
}
