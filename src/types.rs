use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// Opaque bincode encoding of a typed argument or return value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn encode<T: Serialize>(val: &T) -> Result<Self, bincode::Error> {
        bincode::serialize(val).map(Payload)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, bincode::Error> {
        bincode::deserialize(&self.0)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload(bytes)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

// A Vec<T> with zero elements and "no Vec at all" encode identically once
// flattened to a length-prefixed list, so absence travels as its own flag.

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NumbersRequest {
    pub numbers: Vec<i32>,
    pub numbers_is_absent: bool,
}

impl NumbersRequest {
    pub fn new(numbers: Vec<i32>) -> Self {
        Self {
            numbers,
            numbers_is_absent: false,
        }
    }

    /// A request standing for "the caller has no sequence".
    pub fn absent() -> Self {
        Self {
            numbers: Vec::new(),
            numbers_is_absent: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NumbersResponse {
    pub processed_numbers: Vec<i32>,
    pub message: String,
    pub metadata: Option<SliceMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringsRequest {
    pub strings: Vec<String>,
    pub strings_is_absent: bool,
}

impl StringsRequest {
    pub fn new<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strings: strings.into_iter().map(Into::into).collect(),
            strings_is_absent: false,
        }
    }

    /// A request standing for "the caller has no sequence".
    pub fn absent() -> Self {
        Self {
            strings: Vec::new(),
            strings_is_absent: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringsResponse {
    pub processed_strings: Vec<String>,
    pub message: String,
    pub metadata: Option<SliceMetadata>,
}

/// What the server observed about the sequence it was sent.
///
/// `slice_capacity` has no meaning beyond the element count and always
/// equals `slice_length`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SliceMetadata {
    pub is_absent: bool,
    pub slice_length: u32,
    pub slice_capacity: u32,
}

impl SliceMetadata {
    pub(crate) fn observe(is_absent: bool, len: usize) -> Self {
        let slice_length = u32::try_from(len).unwrap_or(u32::MAX);
        Self {
            is_absent,
            slice_length,
            slice_capacity: slice_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_requests_differ_only_by_flag() {
        let empty = Payload::encode(&NumbersRequest::new(vec![])).unwrap();
        let absent = Payload::encode(&NumbersRequest::absent()).unwrap();
        assert_ne!(empty, absent);

        let decoded: NumbersRequest = absent.decode().unwrap();
        assert!(decoded.numbers.is_empty());
        assert!(decoded.numbers_is_absent);
    }

    #[test]
    fn capacity_tracks_length() {
        let meta = SliceMetadata::observe(false, 7);
        assert_eq!(meta.slice_length, 7);
        assert_eq!(meta.slice_capacity, 7);
    }

    #[test]
    fn payload_rejects_wrong_shape() {
        let payload = Payload::from(vec![1, 2]);
        assert!(payload.decode::<StringsRequest>().is_err());
    }
}
