use serde::Deserialize;
use serde::Serialize;

/// One catalog item, immutable once fetched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
}

// a named locator for a single record, as listed in a collection index
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

/// A page of a collection index.
///
/// `next` and `previous` are opaque cursors (absolute URLs) and are `None`
/// at either end of the collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct IndexPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<ResourceRef>,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    #[serde(default)]
    front_default: Option<String>,
}

// the per-record document; everything besides these fields is ignored
#[derive(Debug, Deserialize)]
struct RecordDocument {
    id: u32,
    name: String,
    #[serde(default)]
    sprites: Sprites,
}

impl RecordDocument {
    fn into_record(self) -> Record {
        Record {
            id: self.id,
            name: self.name,
            image: self.sprites.front_default.filter(|s| !s.trim().is_empty()),
        }
    }
}

pub(in crate::fetcher) fn decode_index(body: &[u8]) -> Result<IndexPage, serde_json::Error> {
    serde_json::from_slice::<IndexPage>(body)
}

pub(in crate::fetcher) fn decode_record(body: &[u8]) -> Result<Record, serde_json::Error> {
    serde_json::from_slice::<RecordDocument>(body).map(RecordDocument::into_record)
}

#[cfg(test)]
pub(crate) fn decode_index_for_tests(body: &str) -> Result<IndexPage, serde_json::Error> {
    decode_index(body.as_bytes())
}

#[cfg(test)]
pub(crate) fn decode_record_for_tests(body: &str) -> Result<Record, serde_json::Error> {
    decode_record(body.as_bytes())
}
