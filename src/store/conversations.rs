//! Conversation façade and merge engine.
//!
//! Saving a conversation is an upsert: when the payload carries an `id` that
//! resolves to a stored document, the stored fields are overwritten in place
//! and the original resolvable identifier is kept; otherwise a new document
//! is inserted and the store assigns the identifier.
//!
//! Message timestamps arrive in whatever shape the client produced (RFC 3339
//! strings, epoch-milliseconds numbers, or nothing at all) and are rewritten
//! to canonical RFC 3339 with the messages sorted oldest-first. This runs on
//! every read and every write: it is an output invariant, not a migration.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::models::{Conversation, RecordKind};
use crate::store::identity::Identity;
use crate::store::{Collection, RecordStore};

pub struct Conversations {
    store: Arc<dyn RecordStore>,
}

/// Parse a client-supplied timestamp value, if it is parseable at all.
/// Accepts RFC 3339 strings and epoch-milliseconds numbers.
pub fn parse_timestamp(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    match raw? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

/// The single timestamp-coercion point: unparsable or absent input defaults
/// to `now`, the wall clock at normalization time.
fn normalize_timestamp(raw: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or(now)
}

fn canonical(ts: DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Rewrite every timestamp in the conversation to canonical form and sort the
/// messages ascending. The sort is stable, so messages that defaulted to the
/// same instant keep their arrival order.
pub fn normalize(conversation: &mut Conversation) {
    let now = Utc::now();

    let mut stamped: Vec<(DateTime<Utc>, crate::models::ChatMessage)> = conversation
        .messages
        .drain(..)
        .map(|mut msg| {
            let ts = normalize_timestamp(msg.timestamp.as_ref(), now);
            msg.timestamp = Some(canonical(ts));
            (ts, msg)
        })
        .collect();
    stamped.sort_by_key(|(ts, _)| *ts);
    conversation.messages = stamped.into_iter().map(|(_, msg)| msg).collect();

    let own = normalize_timestamp(conversation.timestamp.as_ref(), now);
    conversation.timestamp = Some(canonical(own));
}

/// Sort key for the caller-visible listing.
fn listing_timestamp(conversation: &Conversation) -> DateTime<Utc> {
    parse_timestamp(conversation.timestamp.as_ref()).unwrap_or_else(|| Utc.timestamp_millis_opt(0).unwrap())
}

impl Conversations {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Conversations { store }
    }

    /// Every conversation-typed record, normalized, most recent first.
    pub async fn list(&self) -> StoreResult<Vec<Conversation>> {
        let records = self.store.list_all(Collection::Conversations).await?;

        let mut conversations = Vec::new();
        for record in records
            .into_iter()
            .filter(|r| RecordKind::of(&r.doc).is_conversation())
        {
            // A document that carries the conversation tag but no longer
            // parses is corrupt storage, not an empty listing.
            let conversation: Conversation = serde_json::from_value(record.doc).map_err(|e| {
                StoreError::Unavailable(format!(
                    "corrupt conversation document {}: {}",
                    record.native_id, e
                ))
            })?;
            conversations.push(conversation);
        }

        for conversation in &mut conversations {
            normalize(conversation);
        }
        conversations.sort_by(|a, b| listing_timestamp(b).cmp(&listing_timestamp(a)));
        Ok(conversations)
    }

    /// Upsert a conversation and return the saved document.
    ///
    /// Re-saving with the same `id` and the same messages is idempotent: one
    /// stored document, unchanged message count. Two concurrent saves for the
    /// same `id` race and the later write wins; there is no locking, and the
    /// lost-update anomaly is accepted.
    pub async fn save(&self, mut payload: Conversation) -> StoreResult<Conversation> {
        normalize(&mut payload);

        if let Some(id_value) = payload.id.clone() {
            match Identity::resolve_value(&id_value) {
                Ok(identity) => {
                    if let Some(existing) =
                        self.store.find_one(Collection::Conversations, &identity).await?
                    {
                        return self.overwrite(&identity, existing.doc, payload).await;
                    }
                    // Unresolvable id: fall through and create.
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        let doc = serde_json::to_value(&payload)?;
        let saved = self.store.insert(Collection::Conversations, doc).await?;
        let mut conversation: Conversation = serde_json::from_value(saved.doc)?;
        normalize(&mut conversation);
        Ok(conversation)
    }

    /// Full overwrite of the stored fields, keeping the identifier the
    /// document was originally resolvable by.
    async fn overwrite(
        &self,
        identity: &Identity,
        existing: Value,
        payload: Conversation,
    ) -> StoreResult<Conversation> {
        let mut patch = serde_json::to_value(&payload)?;
        if let (Value::Object(fields), Value::Object(stored)) = (&mut patch, &existing) {
            fields.remove("id");
            // Optional fields the payload dropped (email context, client
            // extras) must not survive from the previous save: null them out
            // so the merge clears them.
            for key in stored.keys() {
                if key != "id" && !fields.contains_key(key) {
                    fields.insert(key.clone(), Value::Null);
                }
            }
        }

        let matched = self
            .store
            .update_by_identity(Collection::Conversations, identity, patch)
            .await?;
        if !matched {
            // The record vanished between resolution and update; surface it
            // rather than pretending the save landed.
            return Err(StoreError::NotFound);
        }

        let merged = self
            .store
            .find_one(Collection::Conversations, identity)
            .await?
            .map(|r| r.doc)
            .unwrap_or(existing);
        let mut conversation: Conversation = serde_json::from_value(merged)?;
        normalize(&mut conversation);
        Ok(conversation)
    }

    /// Delete by any identifier encoding; `NotFound` when none match.
    pub async fn delete(&self, token: &str) -> StoreResult<()> {
        let identity = Identity::resolve(token)?;
        if self.store.delete_by_identity(Collection::Conversations, &identity).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
