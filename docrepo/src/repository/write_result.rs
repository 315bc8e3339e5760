use bson::Bson;
use mongodb::results::{DeleteResult, UpdateResult};

/// Result of an `update_one` or `update_many` call.
///
/// A filter that matches nothing is not an error: the outcome simply reports
/// `matched == 0`. When the update ran as an upsert and created a document,
/// `upserted_id` holds the new document's `_id`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateOutcome {
    matched: u64,
    modified: u64,
    upserted_id: Option<Bson>,
}

impl UpdateOutcome {
    pub fn new(matched: u64, modified: u64, upserted_id: Option<Bson>) -> Self {
        Self {
            matched,
            modified,
            upserted_id,
        }
    }

    /// Number of documents the filter matched.
    pub fn matched(&self) -> u64 {
        self.matched
    }

    /// Number of documents actually changed. A document already in the target
    /// state counts as matched but not modified.
    pub fn modified(&self) -> u64 {
        self.modified
    }

    pub fn upserted_id(&self) -> Option<&Bson> {
        self.upserted_id.as_ref()
    }

    pub fn is_upsert(&self) -> bool {
        self.upserted_id.is_some()
    }
}

impl From<UpdateResult> for UpdateOutcome {
    fn from(result: UpdateResult) -> Self {
        UpdateOutcome::new(result.matched_count, result.modified_count, result.upserted_id)
    }
}

/// Result of a `delete_one` or `delete_many` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    deleted: u64,
}

impl DeleteOutcome {
    pub fn new(deleted: u64) -> Self {
        Self { deleted }
    }

    pub fn deleted(&self) -> u64 {
        self.deleted
    }
}

impl From<DeleteResult> for DeleteOutcome {
    fn from(result: DeleteResult) -> Self {
        DeleteOutcome::new(result.deleted_count)
    }
}
