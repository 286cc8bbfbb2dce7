//! Typed errors for address classification and rung inference.
//!
//! Loader and CLI code stays on `anyhow`; these types exist so callers can
//! see exactly which rung and which address failed.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("unknown address namespace in {0:?}")]
    UnknownNamespace(String),

    #[error("malformed address {0:?}")]
    Malformed(String),

    #[error("bit address {0:?} has no /offset")]
    MissingOffset(String),

    #[error("address {0:?} does not take a /offset")]
    UnexpectedOffset(String),

    #[error("address {address:?} is not a {expected} address")]
    WrongNamespace {
        address: String,
        expected: &'static str,
    },
}

impl AddressError {
    /// The raw text that failed to classify.
    pub fn address(&self) -> &str {
        match self {
            AddressError::UnknownNamespace(a)
            | AddressError::Malformed(a)
            | AddressError::MissingOffset(a)
            | AddressError::UnexpectedOffset(a) => a,
            AddressError::WrongNamespace { address, .. } => address,
        }
    }
}

/// Where in a rung the bad address was referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressRole {
    Input,
    Output,
    Timer,
    Counter,
}

impl fmt::Display for AddressRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressRole::Input => "input",
            AddressRole::Output => "output",
            AddressRole::Timer => "timer",
            AddressRole::Counter => "counter",
        })
    }
}

/// A single rung whose candidacy could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("rung {rung} {role}: {source}")]
pub struct RungError {
    pub rung: String,
    pub role: AddressRole,
    pub address: String,
    #[serde(rename = "message", serialize_with = "serialize_display")]
    pub source: AddressError,
}

fn serialize_display<S: Serializer>(error: &AddressError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl RungError {
    pub fn new(rung: &str, role: AddressRole, source: AddressError) -> Self {
        Self {
            rung: rung.to_string(),
            role,
            address: source.address().to_string(),
            source,
        }
    }
}

/// Every rung failure from one inference pass, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe_failures(.0))]
pub struct InferenceFailures(pub Vec<RungError>);

impl InferenceFailures {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RungError> {
        self.0.iter()
    }
}

fn describe_failures(failures: &[RungError]) -> String {
    let mut out = format!(
        "{} rung address(es) could not be classified",
        failures.len()
    );
    for f in failures {
        out.push_str("\n  - ");
        out.push_str(&f.to_string());
    }
    out
}
