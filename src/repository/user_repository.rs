// ==================== USER REPOSITORY ====================
// Mapeamento entre o recurso HTTP /users e a collection `users` no MongoDB.
// Toda tradução de identificador (hex string <-> ObjectId) acontece aqui.

use crate::{database::MongoDB, models::User};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::Error;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use serde::Deserialize;

/// Partial set of user attributes for `update`. Only fields present in the
/// request body are written; everything else keeps its prior value.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateUser {
    fn into_set_document(self) -> Document {
        let mut set = Document::new();
        if let Some(name) = self.name {
            set.insert("name", name);
        }
        if let Some(email) = self.email {
            set.insert("email", email);
        }
        if let Some(password) = self.password {
            set.insert("password", password);
        }
        set
    }
}

/// Sole mediator between the resource layer and the `users` collection.
///
/// Absence is always `Ok(None)` (or an empty vec), never an error; store
/// faults propagate untranslated as `mongodb::error::Error`. Holds only a
/// collection handle, so one instance is safe to share across requests.
#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    /// Persists a new user and returns it with the id MongoDB assigned.
    /// Any caller-supplied id is discarded; the store owns identity.
    pub async fn insert(&self, mut user: User) -> Result<User, Error> {
        user.id = None;

        let result = self.collection.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();

        log::debug!("📝 Inserted user {:?}", user.id);

        Ok(user)
    }

    /// Looks a user up by its external (hex string) identifier.
    ///
    /// A malformed identifier fails closed: it is indistinguishable from a
    /// well-formed id that matches nothing, so the resource layer has one
    /// uniform not-found path.
    pub async fn find(&self, id: &str) -> Result<Option<User>, Error> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        self.collection.find_one(doc! { "_id": oid }).await
    }

    /// Returns every user in the collection, in store order.
    pub async fn find_all(&self) -> Result<Vec<User>, Error> {
        let cursor = self.collection.find(doc! {}).await?;
        cursor.try_collect().await
    }

    /// Overwrites only the supplied fields and returns the updated record.
    /// Returns `Ok(None)` when the id is malformed or matches no record, so
    /// callers can tell a no-op apart from a successful update without a
    /// follow-up `find`.
    pub async fn update(&self, id: &str, fields: UpdateUser) -> Result<Option<User>, Error> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        let set = fields.into_set_document();
        if set.is_empty() {
            // Vacuous update: nothing to write, report the current record
            return self.collection.find_one(doc! { "_id": oid }).await;
        }

        self.collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
    }

    /// Deletes the matching user if present; no-op on absent or malformed id.
    pub async fn remove(&self, id: &str) -> Result<(), Error> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(()),
        };

        self.collection.delete_one(doc! { "_id": oid }).await?;

        log::debug!("🗑️  Removed user {}", id);

        Ok(())
    }

    /// Deletes every user. Test harness support only, never on the request path.
    pub async fn clear(&self) -> Result<(), Error> {
        self.collection.delete_many(doc! {}).await?;
        Ok(())
    }
}
