use serde::{Serialize, Serializer};

/// An identifier that is either known or explicitly unknown.
///
/// Trakt expects every id field to be present in a request body, so an
/// unknown id is never dropped. It is written as the field's sentinel
/// instead: an empty string for text ids and negative infinity for numeric
/// ids. `serde_json` has no infinity literal and writes non-finite floats as
/// `null`, which keeps the key present exactly like the exporter's own
/// tooling did.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdValue<T> {
    Known(T),
    Unknown,
}

pub type NumericId = IdValue<i64>;
pub type TextId = IdValue<String>;

impl<T> IdValue<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, IdValue::Known(_))
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            IdValue::Known(value) => Some(value),
            IdValue::Unknown => None,
        }
    }
}

impl<T> Default for IdValue<T> {
    fn default() -> Self {
        IdValue::Unknown
    }
}

impl<T> From<Option<T>> for IdValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map(IdValue::Known).unwrap_or(IdValue::Unknown)
    }
}

impl Serialize for IdValue<i64> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IdValue::Known(value) => serializer.serialize_i64(*value),
            IdValue::Unknown => serializer.serialize_f64(f64::NEG_INFINITY),
        }
    }
}

impl Serialize for IdValue<String> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IdValue::Known(value) => serializer.serialize_str(value),
            IdValue::Unknown => serializer.serialize_str(""),
        }
    }
}

/// Identifier block attached to every show or movie sent to Trakt.
///
/// `tvdb` is only part of the show shape; movie id blocks leave it out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<NumericId>,
    pub imdb: TextId,
    pub slug: TextId,
    pub tmdb: NumericId,
    pub trakt: NumericId,
}

impl RemoteIds {
    /// Check if no id field carries a real value
    pub fn is_empty(&self) -> bool {
        !self.tvdb.as_ref().is_some_and(IdValue::is_known)
            && !self.imdb.is_known()
            && !self.slug.is_known()
            && !self.tmdb.is_known()
            && !self.trakt.is_known()
    }
}
