/// Data structures and conversions for users, posts and store mutation results
///
/// Users and posts are schema-less documents; the only structured pieces are
/// the `reacts` list on posts and the mutation results returned by writes.
use bson::oid::ObjectId;
use bson::{Bson, Document};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Field holding the list of user emails that reacted to a post
pub const REACTS_FIELD: &str = "reacts";

/// Field replaced by the post content update
pub const POST_CONTENT_FIELD: &str = "post";

/// Result of a single-document insert
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    #[serde(serialize_with = "serialize_bson")]
    pub inserted_id: Bson,
}

/// Result of a single-document update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[serde(serialize_with = "serialize_optional_bson")]
    pub upserted_id: Option<Bson>,
}

/// Result of a single-document delete
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<mongodb::results::InsertOneResult> for InsertResult {
    fn from(result: mongodb::results::InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: result.inserted_id,
        }
    }
}

impl From<mongodb::results::UpdateResult> for UpdateResult {
    fn from(result: mongodb::results::UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id,
        }
    }
}

impl From<mongodb::results::DeleteResult> for DeleteResult {
    fn from(result: mongodb::results::DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}

fn serialize_bson<S: Serializer>(value: &Bson, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    bson_to_json(value.clone()).serialize(serializer)
}

fn serialize_optional_bson<S: Serializer>(
    value: &Option<Bson>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    value.clone().map(bson_to_json).serialize(serializer)
}

/// Parse a post identifier.
///
/// A missing identifier becomes a freshly generated one, which can never
/// match a stored document.
pub fn parse_object_id(raw: Option<&str>) -> Result<ObjectId> {
    match raw {
        Some(id) => Ok(ObjectId::parse_str(id)?),
        None => Ok(ObjectId::new()),
    }
}

/// Compute the react list after `email` toggles its reaction.
///
/// Present: every occurrence is removed. Absent: appended once. Other
/// entries are kept as stored, strings or not.
pub fn toggle_react(reacts: &[Bson], email: &str) -> Vec<Bson> {
    let target = Bson::String(email.to_string());

    if reacts.contains(&target) {
        reacts.iter().filter(|react| **react != target).cloned().collect()
    } else {
        let mut updated = reacts.to_vec();
        updated.push(target);
        updated
    }
}

/// Read the `reacts` list of a post. Missing or non-array values count as
/// empty.
pub fn reacts_of(post: &Document) -> Vec<Bson> {
    match post.get(REACTS_FIELD) {
        Some(Bson::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Convert a JSON request body into a document.
pub fn json_to_document(value: Value) -> Result<Document> {
    match Bson::try_from(value) {
        Ok(Bson::Document(document)) => Ok(document),
        Ok(other) => Err(AppError::InvalidDocument(format!(
            "Expected a JSON object, got {:?}",
            other.element_type()
        ))),
        Err(e) => Err(AppError::InvalidDocument(e.to_string())),
    }
}

/// Convert a JSON value into BSON without requiring an object.
pub fn json_to_bson(value: Value) -> Result<Bson> {
    Bson::try_from(value).map_err(|e| AppError::InvalidDocument(e.to_string()))
}

/// Render a stored document as plain JSON.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

/// Render a BSON value as plain JSON. ObjectIds become hex strings and
/// datetimes RFC 3339 strings; everything else uses relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Bson::DateTime(dt).into_relaxed_extjson()),
        Bson::Document(document) => document_to_json(document),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    fn emails(list: &[&str]) -> Vec<Bson> {
        list.iter().map(|s| Bson::String(s.to_string())).collect()
    }

    #[test]
    fn toggle_appends_new_email() {
        let reacts = emails(&["a@x.io"]);
        assert_eq!(toggle_react(&reacts, "b@x.io"), emails(&["a@x.io", "b@x.io"]));
    }

    #[test]
    fn toggle_removes_every_occurrence() {
        let reacts = emails(&["a@x.io", "b@x.io", "a@x.io"]);
        assert_eq!(toggle_react(&reacts, "a@x.io"), emails(&["b@x.io"]));
    }

    #[test]
    fn toggle_twice_restores_original() {
        let original = emails(&["a@x.io", "c@x.io"]);
        let once = toggle_react(&original, "b@x.io");
        assert_eq!(toggle_react(&once, "b@x.io"), original);
    }

    #[test]
    fn toggle_keeps_non_string_entries() {
        let original = vec![Bson::String("a@x.io".into()), Bson::Int32(7), Bson::Null];

        let once = toggle_react(&original, "b@x.io");
        assert_eq!(once.len(), 4);
        assert_eq!(toggle_react(&once, "b@x.io"), original);

        assert_eq!(
            toggle_react(&original, "a@x.io"),
            vec![Bson::Int32(7), Bson::Null]
        );
    }

    #[test]
    fn reacts_of_tolerates_missing_and_mixed_fields() {
        assert!(reacts_of(&doc! { "title": "hi" }).is_empty());
        assert!(reacts_of(&doc! { "reacts": "oops" }).is_empty());
        assert_eq!(
            reacts_of(&doc! { "reacts": ["a@x.io", 3, "b@x.io"] }),
            vec![
                Bson::String("a@x.io".into()),
                Bson::Int32(3),
                Bson::String("b@x.io".into())
            ]
        );
    }

    #[test]
    fn parse_object_id_rejects_malformed_tokens() {
        assert!(matches!(
            parse_object_id(Some("not-an-id")),
            Err(AppError::InvalidId(_))
        ));

        let oid = ObjectId::new();
        assert_eq!(parse_object_id(Some(&oid.to_hex())).unwrap(), oid);
        assert!(parse_object_id(None).is_ok());
    }

    #[test]
    fn json_to_document_requires_object() {
        let document = json_to_document(json!({ "email": "a@x.io", "age": 3 })).unwrap();
        assert_eq!(document.get_str("email").unwrap(), "a@x.io");

        assert!(matches!(
            json_to_document(json!(["a", "b"])),
            Err(AppError::InvalidDocument(_))
        ));
    }

    #[test]
    fn object_ids_render_as_hex() {
        let oid = ObjectId::new();
        let rendered = document_to_json(doc! { "_id": oid, "nested": { "ref": oid }, "n": 1 });

        assert_eq!(rendered["_id"], json!(oid.to_hex()));
        assert_eq!(rendered["nested"]["ref"], json!(oid.to_hex()));
        assert_eq!(rendered["n"], json!(1));
    }

    #[test]
    fn update_result_wire_shape() {
        let oid = ObjectId::new();
        let result = UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(Bson::ObjectId(oid)),
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "acknowledged": true,
                "matchedCount": 0,
                "modifiedCount": 0,
                "upsertedCount": 1,
                "upsertedId": oid.to_hex(),
            })
        );
    }
}
