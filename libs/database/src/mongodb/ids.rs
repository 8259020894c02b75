//! UUID encoding for stored documents and query filters
//!
//! Documents are written through the driver's raw serializer, which encodes
//! a `uuid::Uuid` as generic binary. Filters must use the same encoding or
//! they never match.

use mongodb::bson::{Binary, Bson, Document, spec::BinarySubtype};
use uuid::Uuid;

/// A UUID encoded the way the driver stores it
pub fn uuid_bson(id: Uuid) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    })
}

/// Equality filter `{ field: id }`
pub fn uuid_filter(field: &str, id: Uuid) -> Document {
    let mut filter = Document::new();
    filter.insert(field, uuid_bson(id));
    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::to_raw_document_buf;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Stored {
        #[serde(rename = "_id")]
        id: Uuid,
        owner_id: Option<Uuid>,
    }

    #[test]
    fn test_filter_matches_stored_encoding() {
        let stored = Stored {
            id: Uuid::now_v7(),
            owner_id: Some(Uuid::now_v7()),
        };
        let document = to_raw_document_buf(&stored).unwrap().to_document().unwrap();

        assert_eq!(document.get("_id"), uuid_filter("_id", stored.id).get("_id"));
        assert_eq!(
            document.get("owner_id"),
            Some(&uuid_bson(stored.owner_id.unwrap()))
        );
    }

    #[test]
    fn test_human_readable_encoding_differs() {
        let id = Uuid::now_v7();
        assert_ne!(mongodb::bson::to_bson(&id).unwrap(), uuid_bson(id));
    }
}
