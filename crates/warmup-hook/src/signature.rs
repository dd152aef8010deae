//! Platform signatures used to locate a native function.
//!
//! On Windows the server binary is stripped, so functions are found by
//! scanning for a byte pattern. On Linux the symbol table is intact and
//! the mangled name is enough.

use std::fmt;

use crate::HookError;

/// The platform the server binary was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// The platform this process is running on.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }
}

/// A byte pattern with wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytePattern {
    bytes: Vec<Option<u8>>,
}

impl BytePattern {
    /// The byte that stands for "any byte" in raw patterns.
    pub const WILDCARD: u8 = 0x2A;

    /// Builds a pattern from raw bytes, treating [`Self::WILDCARD`] as a
    /// wildcard.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, HookError> {
        let bytes = raw
            .iter()
            .map(|&b| (b != Self::WILDCARD).then_some(b))
            .collect();
        Self::checked(bytes)
    }

    /// Parses space-separated hex text (`"55 8B EC ?? 2A"`). `?`, `??`
    /// and `2A` are wildcards.
    pub fn parse(text: &str) -> Result<Self, HookError> {
        let bytes = text
            .split_whitespace()
            .map(|tok| match tok {
                "?" | "??" => Ok(None),
                _ => u8::from_str_radix(tok, 16)
                    .map(|b| (b != Self::WILDCARD).then_some(b))
                    .map_err(|_| HookError::InvalidPattern(format!("bad byte {tok:?}"))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::checked(bytes)
    }

    fn checked(bytes: Vec<Option<u8>>) -> Result<Self, HookError> {
        if bytes.is_empty() {
            return Err(HookError::InvalidPattern("empty pattern".into()));
        }
        if bytes.iter().all(Option::is_none) {
            return Err(HookError::InvalidPattern("pattern is all wildcards".into()));
        }
        Ok(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset of the first match in `haystack`.
    pub fn find_in(&self, haystack: &[u8]) -> Option<usize> {
        if haystack.len() < self.bytes.len() {
            return None;
        }
        haystack.windows(self.bytes.len()).position(|window| {
            window
                .iter()
                .zip(&self.bytes)
                .all(|(b, p)| p.is_none_or(|p| p == *b))
        })
    }
}

impl fmt::Display for BytePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match b {
                Some(b) => write!(f, "{b:02X}")?,
                None => f.write_str("??")?,
            }
        }
        Ok(())
    }
}

/// How a native function is identified in a binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    Pattern(BytePattern),
    Symbol(String),
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(p) => write!(f, "pattern [{p}]"),
            Self::Symbol(s) => write!(f, "symbol {s}"),
        }
    }
}

/// Windows byte pattern for `CCSGameRules::TerminateRound`.
const TERMINATE_ROUND_PATTERN: &[u8] = &[
    0x55, 0x8B, 0xEC, 0x83, 0xEC, 0x2A, 0x8B, 0x45, 0x0C, 0x53, 0x56, 0x57, 0x33, 0xF6,
];

/// Linux symbol for `CCSGameRules::TerminateRound(float, int)`.
const TERMINATE_ROUND_SYMBOL: &str = "_ZN12CCSGameRules14TerminateRoundEfi";

/// The signature of the engine's round-termination routine on `platform`.
pub fn terminate_round(platform: Platform) -> Signature {
    match platform {
        Platform::Windows => Signature::Pattern(BytePattern {
            bytes: TERMINATE_ROUND_PATTERN
                .iter()
                .map(|&b| (b != BytePattern::WILDCARD).then_some(b))
                .collect(),
        }),
        Platform::Linux => Signature::Symbol(TERMINATE_ROUND_SYMBOL.to_string()),
    }
}
