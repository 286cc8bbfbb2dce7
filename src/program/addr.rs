//! PLC data-table addresses.
//!
//! Example: `B3:2/10` => Address { namespace: B3, group: 2, offset: Some(10) }
//!          `T4:16`   => Address { namespace: Timer, group: 16, offset: None }
//!
//! Ordering is namespace first, then group and offset as integers, so
//! `I:0/2 < I:0/9 < I:0/10`. The derived Ord lets addresses key BTreeSet/Map.

use crate::error::AddressError;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Element part after the file prefix: `<group>` or `<group>/<offset>`.
static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:/(\d+))?$").expect("element pattern compiles")
});

/// Data-table file an address lives in.
///
/// The three binary files are separate memory areas: `B3` is local logic and
/// status, `B11` and `B14` are written by peer controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Input,
    Output,
    B3,
    B11,
    B14,
    Timer,
    Counter,
}

impl Namespace {
    pub const ALL: [Namespace; 7] = [
        Namespace::Input,
        Namespace::Output,
        Namespace::B3,
        Namespace::B11,
        Namespace::B14,
        Namespace::Timer,
        Namespace::Counter,
    ];

    /// File prefix as written before the `:`.
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Input => "I",
            Namespace::Output => "O",
            Namespace::B3 => "B3",
            Namespace::B11 => "B11",
            Namespace::B14 => "B14",
            Namespace::Timer => "T4",
            Namespace::Counter => "C5",
        }
    }

    /// Bit files address single bits (`group/offset`); timers and counters
    /// address whole elements.
    pub fn is_bit(self) -> bool {
        !matches!(self, Namespace::Timer | Namespace::Counter)
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Namespace::ALL.into_iter().find(|ns| ns.prefix() == prefix)
    }
}

// Namespaces order by their prefix text.
impl Ord for Namespace {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix().cmp(other.prefix())
    }
}

impl PartialOrd for Namespace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Namespace {
    type Err = AddressError;

    /// Parse a bare prefix such as `B11` (no colon).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::from_prefix(s.trim()).ok_or_else(|| AddressError::UnknownNamespace(s.to_string()))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    pub namespace: Namespace,
    pub group: u32,
    pub offset: Option<u32>,
}

impl Address {
    pub fn bit(namespace: Namespace, group: u32, offset: u32) -> Self {
        Self {
            namespace,
            group,
            offset: Some(offset),
        }
    }

    /// The word (file + group) this address belongs to.
    pub fn area(&self) -> Area {
        Area {
            namespace: self.namespace,
            group: self.group,
        }
    }
}

/// Split `<prefix>:<element>` and resolve the prefix.
fn split_prefix(s: &str) -> Result<(Namespace, &str), AddressError> {
    let (prefix, rest) = s
        .split_once(':')
        .ok_or_else(|| AddressError::UnknownNamespace(s.to_string()))?;
    let namespace =
        Namespace::from_prefix(prefix).ok_or_else(|| AddressError::UnknownNamespace(s.to_string()))?;
    Ok((namespace, rest))
}

fn parse_number(text: &str, whole: &str) -> Result<u32, AddressError> {
    text.parse::<u32>()
        .map_err(|_| AddressError::Malformed(whole.to_string()))
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        let (namespace, element) = split_prefix(s)?;

        let caps = ELEMENT_RE
            .captures(element)
            .ok_or_else(|| AddressError::Malformed(s.to_string()))?;
        let group = parse_number(&caps[1], s)?;
        let offset = match caps.get(2) {
            Some(m) => Some(parse_number(m.as_str(), s)?),
            None => None,
        };

        match (namespace.is_bit(), offset) {
            (true, None) => Err(AddressError::MissingOffset(s.to_string())),
            (false, Some(_)) => Err(AddressError::UnexpectedOffset(s.to_string())),
            _ => Ok(Address {
                namespace,
                group,
                offset,
            }),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.group)?;
        if let Some(offset) = self.offset {
            write!(f, "/{}", offset)?;
        }
        Ok(())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One word of a bit file, e.g. `B3:2` covers `B3:2/0` through `B3:2/15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Area {
    pub namespace: Namespace,
    pub group: u32,
}

impl FromStr for Area {
    type Err = AddressError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        let (namespace, element) = split_prefix(s)?;
        if element.contains('/') {
            return Err(AddressError::UnexpectedOffset(s.to_string()));
        }
        Ok(Area {
            namespace,
            group: parse_number(element, s)?,
        })
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> Address {
        s.parse().expect("valid address")
    }

    #[test]
    fn parses_every_known_prefix() {
        assert_eq!(addr("I:0/9"), Address::bit(Namespace::Input, 0, 9));
        assert_eq!(addr("O:0/0"), Address::bit(Namespace::Output, 0, 0));
        assert_eq!(addr("B3:10/0"), Address::bit(Namespace::B3, 10, 0));
        assert_eq!(addr("B11:0/1"), Address::bit(Namespace::B11, 0, 1));
        assert_eq!(addr("B14:0/3"), Address::bit(Namespace::B14, 0, 3));
        assert_eq!(
            addr("T4:16"),
            Address {
                namespace: Namespace::Timer,
                group: 16,
                offset: None
            }
        );
        assert_eq!(addr("C5:7").namespace, Namespace::Counter);
    }

    #[test]
    fn b_files_are_distinct_namespaces() {
        assert_ne!(addr("B3:0/1"), addr("B11:0/1"));
        assert_ne!(addr("B11:0/1"), addr("B14:0/1"));
    }

    #[test]
    fn unknown_prefix_is_a_classification_error() {
        assert_eq!(
            "N7:0/1".parse::<Address>(),
            Err(AddressError::UnknownNamespace("N7:0/1".to_string()))
        );
        assert_eq!(
            "garbage".parse::<Address>(),
            Err(AddressError::UnknownNamespace("garbage".to_string()))
        );
    }

    #[test]
    fn rejects_bad_elements() {
        assert_eq!(
            "I:0/x".parse::<Address>(),
            Err(AddressError::Malformed("I:0/x".to_string()))
        );
        assert_eq!(
            "B3:2".parse::<Address>(),
            Err(AddressError::MissingOffset("B3:2".to_string()))
        );
        assert_eq!(
            "T4:1/2".parse::<Address>(),
            Err(AddressError::UnexpectedOffset("T4:1/2".to_string()))
        );
    }

    #[test]
    fn offsets_order_numerically() {
        let mut tags = vec![addr("I:0/9"), addr("I:0/10"), addr("I:0/2"), addr("I:1/0")];
        tags.sort();
        let text: Vec<String> = tags.iter().map(|a| a.to_string()).collect();
        assert_eq!(text, vec!["I:0/2", "I:0/9", "I:0/10", "I:1/0"]);
    }

    #[test]
    fn namespace_orders_before_numbers() {
        let mut tags = vec![addr("O:0/0"), addr("B3:10/0"), addr("B3:2/9"), addr("B3:0/11")];
        tags.sort();
        let text: Vec<String> = tags.iter().map(|a| a.to_string()).collect();
        assert_eq!(text, vec!["B3:0/11", "B3:2/9", "B3:10/0", "O:0/0"]);
    }

    #[test]
    fn display_round_trips_canonical_text() {
        for s in ["I:1/15", "B14:0/2", "T4:0", "C5:3"] {
            assert_eq!(addr(s).to_string(), s);
        }
        assert_eq!(addr(" B3:0/01 ").to_string(), "B3:0/1");
    }

    #[test]
    fn area_parses_and_matches_addresses() {
        let area: Area = "B3:2".parse().expect("area");
        assert_eq!(area, addr("B3:2/13").area());
        assert_ne!(area, addr("B3:20/0").area());
        assert_eq!(area.to_string(), "B3:2");
        assert!("B3:2/0".parse::<Area>().is_err());
    }

    #[test]
    fn address_serializes_as_text() {
        let json = serde_json::to_string(&addr("B3:3/15")).expect("serialize");
        assert_eq!(json, "\"B3:3/15\"");
    }
}
