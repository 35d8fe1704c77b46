use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateLength;

/// Represents optional field semantics in PATCH requests.
///
/// - `Unchanged` → field absent from the payload
/// - `SetToNull` → field present as `null`
/// - `SetToValue` → field present with a value
///
/// Structs using it must carry `#[serde(default)]` so absent fields become `Unchanged`.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

// ---------------------- Validation support ----------------------

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            _ => None,
        }
    }
    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            _ => true,
        }
    }
}

// ---------------------- Core helpers ----------------------

impl<T> OptionField<T> {
    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> OptionField<U> {
        match self {
            Self::Unchanged => OptionField::Unchanged,
            Self::SetToNull => OptionField::SetToNull,
            Self::SetToValue(v) => OptionField::SetToValue(f(v)),
        }
    }

    /// Applies the patch to a nullable column.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Self::Unchanged => {}
            Self::SetToNull => *target = None,
            Self::SetToValue(v) => *target = Some(v),
        }
    }

    /// Applies the patch to a required column. `null` cannot clear it and is
    /// reported back as `false` so callers can reject the request.
    pub fn apply_required(self, target: &mut T) -> bool {
        match self {
            Self::Unchanged => true,
            Self::SetToNull => false,
            Self::SetToValue(v) => {
                *target = v;
                true
            }
        }
    }
}
