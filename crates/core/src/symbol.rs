//! Asset symbols and insertion-ordered symbol maps.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

/// Pseudo-asset standing for the USD quote currency.
pub const USD_SYMBOL: &str = "USD";

/// Reserve asset symbol (e.g. `WSYS`, `USDC`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Validate and wrap a symbol: non-empty, ASCII alphanumeric or `_`.
    pub fn new(symbol: impl Into<String>) -> Option<Self> {
        let symbol = symbol.into();
        let valid = !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        valid.then_some(Self(symbol))
    }

    /// The USD pseudo-symbol.
    pub fn usd() -> Self {
        Self(USD_SYMBOL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_usd(&self) -> bool {
        self.0 == USD_SYMBOL
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Symbol::new(s.clone())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid asset symbol '{s}'")))
    }
}

/// Symbol-keyed map that keeps insertion order.
///
/// Rate tables are seeded in the order they are written, so iteration order
/// is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMap<T> {
    entries: Vec<(Symbol, T)>,
}

impl<T> Default for SymbolMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> SymbolMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, symbol: Symbol, value: T) -> Option<T> {
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((symbol, value));
                None
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(s, _)| s.as_str() == symbol)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &T)> {
        self.entries.iter().map(|(s, v)| (s, v))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.entries.iter().map(|(s, _)| s)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> FromIterator<(Symbol, T)> for SymbolMap<T> {
    fn from_iter<I: IntoIterator<Item = (Symbol, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (symbol, value) in iter {
            map.insert(symbol, value);
        }
        map
    }
}

impl<T> IntoIterator for SymbolMap<T> {
    type Item = (Symbol, T);
    type IntoIter = std::vec::IntoIter<(Symbol, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SymbolMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SymbolMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for SymbolMapVisitor<T> {
            type Value = SymbolMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table keyed by asset symbol")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut map = SymbolMap::new();
                while let Some((symbol, value)) = access.next_entry::<Symbol, T>()? {
                    if map.insert(symbol.clone(), value).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate asset symbol {symbol}"
                        )));
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(SymbolMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    #[test]
    fn test_symbol_validation() {
        assert!(Symbol::new("WSYS").is_some());
        assert!(Symbol::new("Uni_WBTC").is_some());
        assert!(Symbol::new("").is_none());
        assert!(Symbol::new("US D").is_none());
        assert!(Symbol::usd().is_usd());
    }

    #[test]
    fn test_insert_keeps_position_on_replace() {
        let mut map = SymbolMap::new();
        map.insert(sym("WSYS"), 1);
        map.insert(sym("USDC"), 2);
        assert_eq!(map.insert(sym("WSYS"), 3), Some(1));

        let order: Vec<_> = map.iter().map(|(s, v)| (s.as_str(), *v)).collect();
        assert_eq!(order, vec![("WSYS", 3), ("USDC", 2)]);
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let map: SymbolMap<u64> = toml::from_str(
            r#"
            ZED = 1
            ALPHA = 2
            MID = 3
            "#,
        )
        .unwrap();
        let symbols: Vec<_> = map.symbols().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["ZED", "ALPHA", "MID"]);
    }
}
