//! ConfigFingerprint — deterministic BLAKE3 identity for a backtest configuration (§3, §6).

use serde::{Deserialize, Serialize};
use std::fmt;

/// 32-byte BLAKE3 hash wrapper with hex display and serde as hex string.
macro_rules! hash_id {
    ($name:ident) => {
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub fn from_bytes(data: &[u8]) -> Self {
                Self(*blake3::hash(data).as_bytes())
            }

            pub fn as_hex(&self) -> String {
                self.0.iter().map(|b| format!("{b:02x}")).collect()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), &self.as_hex()[..16])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.as_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.as_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let hex = String::deserialize(d)?;
                let bytes: Vec<u8> = (0..hex.len())
                    .step_by(2)
                    .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
                    .collect::<Result<_, _>>()
                    .map_err(serde::de::Error::custom)?;
                let arr: [u8; 32] = bytes
                    .try_into()
                    .map_err(|_| serde::de::Error::custom("expected 32 bytes"))?;
                Ok(Self(arr))
            }
        }
    };
}

hash_id!(ConfigFingerprint);

impl ConfigFingerprint {
    /// Fingerprint a `(strategy_name, symbol_universe, range, config)` tuple,
    /// the idempotency key the persistence sink keys on (§6).
    pub fn from_parts(strategy_name: &str, symbols: &[String], range_start: &str, range_end: &str, config_json: &str) -> Self {
        let mut sorted_symbols = symbols.to_vec();
        sorted_symbols.sort();
        let canonical = format!(
            "{strategy_name}|{}|{range_start}|{range_end}|{config_json}",
            sorted_symbols.join(",")
        );
        Self::from_bytes(canonical.as_bytes())
    }
}
