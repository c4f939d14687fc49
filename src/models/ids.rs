//! Strongly-typed ID wrappers for families and goals
//!
//! IDs are assigned by the host data store (e.g. `F001`, `G012`); the engine
//! never generates them. Newtypes keep family and goal IDs from being mixed
//! up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extract an ID from a "labelish" value.
///
/// Hosts often show entities as `"Display Name (F001)"`. A trailing
/// parenthesised token is taken as the ID; anything else is returned trimmed.
/// Blank input yields `None`.
pub fn id_from_labelish(value: &str) -> Option<String> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(body) = s.strip_suffix(')') {
        if let Some(open) = body.rfind('(') {
            let inner = &body[open + 1..];
            if !inner.is_empty() && !inner.contains(')') {
                return Some(inner.to_string());
            }
        }
    }

    Some(s.to_string())
}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from a raw value
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into().trim().to_string())
            }

            /// Parse an ID from a labelish value such as `"Name (ID)"`
            pub fn from_labelish(value: &str) -> Option<Self> {
                id_from_labelish(value).map(Self)
            }

            /// Get the ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Check if the ID is blank
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }
    };
}

define_id!(FamilyId);
define_id!(GoalId);
