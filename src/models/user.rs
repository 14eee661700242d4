use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User document as persisted in the `users` collection.
///
/// `_id` is assigned by MongoDB at insert and never mutated afterwards.
/// All attributes are optional so partial documents round-trip unchanged;
/// the collection is schemaless on purpose.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
