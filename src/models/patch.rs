//! Tri-state field for partial updates.

use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

/// A field in a partial-update body.
///
/// `Absent` means the key was not sent and the stored value stays as it is.
/// `Null` means the client explicitly sent `null`. Fields using this type
/// must be annotated with `#[serde(default)]` so a missing key becomes
/// `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    /// Apply to a nullable field: `Null` clears it.
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *field = None,
            Patch::Value(value) => *field = Some(value),
        }
    }

    /// Resolve a patch for a field that cannot be cleared.
    ///
    /// Returns `Ok(None)` when absent and rejects an explicit `null`.
    pub fn required(self, name: &str) -> Result<Option<T>, AppError> {
        match self {
            Patch::Absent => Ok(None),
            Patch::Null => Err(AppError::Validation(format!("{} cannot be null", name))),
            Patch::Value(value) => Ok(Some(value)),
        }
    }
}
