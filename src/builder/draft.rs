//! Tagged definition state carried by every builder

use crate::{Error, Result};

/// A resource definition under construction
///
/// Once a step fails the draft turns `Invalid` and keeps the reason of that
/// first failure; later steps are skipped and the definition stays as it was
/// before the failing step.
#[derive(Clone, Debug, PartialEq)]
pub enum Draft<K> {
    Valid(K),
    Invalid { definition: K, reason: String },
}

impl<K: Clone> Draft<K> {
    pub fn new(definition: K) -> Self {
        Draft::Valid(definition)
    }

    /// Record `reason` unless `condition` holds
    pub fn require(self, condition: bool, reason: impl Into<String>) -> Self {
        match self {
            Draft::Valid(definition) if !condition => Draft::Invalid {
                definition,
                reason: reason.into(),
            },
            other => other,
        }
    }

    /// Run a configuration step against a copy of the definition
    pub fn apply<F>(self, step: F) -> Self
    where
        F: FnOnce(&mut K) -> std::result::Result<(), String>,
    {
        match self {
            Draft::Valid(definition) => {
                let mut next = definition.clone();
                match step(&mut next) {
                    Ok(()) => Draft::Valid(next),
                    Err(reason) => Draft::Invalid { definition, reason },
                }
            }
            invalid => invalid,
        }
    }

    pub fn definition(&self) -> &K {
        match self {
            Draft::Valid(definition) | Draft::Invalid { definition, .. } => definition,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Draft::Valid(_) => None,
            Draft::Invalid { reason, .. } => Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Draft::Valid(_))
    }

    /// The definition, or the recorded reason as a builder error
    pub fn check(&self) -> Result<&K> {
        match self {
            Draft::Valid(definition) => Ok(definition),
            Draft::Invalid { reason, .. } => Err(Error::BuilderError(reason.clone())),
        }
    }
}
