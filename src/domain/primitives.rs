//! Domain primitives: Symbol.

use serde::{Deserialize, Deserializer, Serialize};

/// Instrument symbol (e.g., "ASML.AS", "AAPL").
///
/// Normalized on construction: surrounding whitespace trimmed, uppercased.
/// All lookups in the instrument list key on the normalized form.
/// Deserialization normalizes as well, so hand-edited documents behave the
/// same as command-created entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: &str) -> Self {
        Symbol(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Symbol::new(&raw))
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalization() {
        assert_eq!(Symbol::new("  asml.as ").as_str(), "ASML.AS");
        assert_eq!(Symbol::new("AAPL"), Symbol::new("aapl"));
    }

    #[test]
    fn test_symbol_deserialize_normalizes() {
        let sym: Symbol = serde_json::from_str("\" msft \"").unwrap();
        assert_eq!(sym.as_str(), "MSFT");
    }

    #[test]
    fn test_symbol_serialize_transparent() {
        let sym = Symbol::new("AAPL");
        assert_eq!(serde_json::to_string(&sym).unwrap(), "\"AAPL\"");
    }
}
