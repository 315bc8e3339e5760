use crate::options::sort_order::{push_sort, SortOrder};
use bson::{Bson, Document};
use mongodb::options::{Collation, Hint};

/// Sparse configuration for `update_one`.
///
/// `array_filters` binds the `$[identifier]` placeholders used in the update
/// document's field paths. One list applies to the whole call. Placeholders without
/// a matching filter are rejected by the server, not here.
///
/// `sort` picks which document is updated when the filter matches several.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::options::UpdateConfig;
///
/// // Only touch the array element whose sku is "A1"
/// let config = UpdateConfig::new().array_filter(doc! { "item.sku": "A1" });
/// orders.update_one(
///     &ctx,
///     doc! { "_id": "order1" },
///     doc! { "$set": { "items.$[item].status": "shipped" } },
///     Some(config),
/// ).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct UpdateConfig {
    pub array_filters: Option<Vec<Document>>,
    pub bypass_document_validation: Option<bool>,
    pub sort: Option<Document>,
    pub comment: Option<Bson>,
    pub hint: Option<Hint>,
    pub let_vars: Option<Document>,
    pub upsert: Option<bool>,
    pub collation: Option<Collation>,
}

/// Sparse configuration for `update_many`.
///
/// Same settings as [`UpdateConfig`] except `sort`, which the server only accepts
/// for single-document updates. The array filters are shared by every matched
/// document.
///
/// ```rust,ignore
/// let config = UpdateManyConfig::new().array_filter(doc! { "item.qty": { "$gte": 1 } });
/// orders.update_many(
///     &ctx,
///     doc! {},
///     doc! { "$set": { "items.$[item].status": "processed" } },
///     Some(config),
/// ).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct UpdateManyConfig {
    pub array_filters: Option<Vec<Document>>,
    pub bypass_document_validation: Option<bool>,
    pub comment: Option<Bson>,
    pub hint: Option<Hint>,
    pub let_vars: Option<Document>,
    pub upsert: Option<bool>,
    pub collation: Option<Collation>,
}

/// Creates an `UpdateConfig` that inserts a new document when nothing matches.
pub fn upsert() -> UpdateConfig {
    UpdateConfig::new().upsert(true)
}

/// Creates an `UpdateConfig` carrying the given array filters.
pub fn array_filters(filters: Vec<Document>) -> UpdateConfig {
    UpdateConfig::new().array_filters(filters)
}

impl UpdateConfig {
    /// Creates an `UpdateConfig` with every setting absent.
    pub fn new() -> UpdateConfig {
        UpdateConfig::default()
    }

    /// Replaces the array filter list.
    pub fn array_filters(mut self, filters: Vec<Document>) -> UpdateConfig {
        self.array_filters = Some(filters);
        self
    }

    /// Appends one filter to the array filter list, creating the list when absent.
    pub fn array_filter(mut self, filter: Document) -> UpdateConfig {
        self.array_filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    /// Skips schema validation for the updated document.
    pub fn bypass_document_validation(mut self, bypass: bool) -> UpdateConfig {
        self.bypass_document_validation = Some(bypass);
        self
    }

    /// Replaces the sort that decides which match gets updated.
    pub fn sort(mut self, sort: Document) -> UpdateConfig {
        self.sort = Some(sort);
        self
    }

    /// Appends a field to the sort specification.
    pub fn sort_by(mut self, field_name: &str, sort_order: SortOrder) -> UpdateConfig {
        self.sort = Some(push_sort(self.sort.take(), field_name, sort_order));
        self
    }

    /// Attaches a comment that shows up in server logs and profiler output.
    pub fn comment(mut self, comment: impl Into<Bson>) -> UpdateConfig {
        self.comment = Some(comment.into());
        self
    }

    /// Forces the index used to find the matching document.
    pub fn hint(mut self, hint: Hint) -> UpdateConfig {
        self.hint = Some(hint);
        self
    }

    /// Binds variables that the filter and update can reference as `$$name`.
    pub fn let_vars(mut self, let_vars: Document) -> UpdateConfig {
        self.let_vars = Some(let_vars);
        self
    }

    /// Inserts a new document when the filter matches nothing.
    pub fn upsert(mut self, upsert: bool) -> UpdateConfig {
        self.upsert = Some(upsert);
        self
    }

    /// Sets the string comparison rules for the filter.
    pub fn collation(mut self, collation: Collation) -> UpdateConfig {
        self.collation = Some(collation);
        self
    }
}

impl UpdateManyConfig {
    /// Creates an `UpdateManyConfig` with every setting absent.
    pub fn new() -> UpdateManyConfig {
        UpdateManyConfig::default()
    }

    /// Replaces the array filter list.
    pub fn array_filters(mut self, filters: Vec<Document>) -> UpdateManyConfig {
        self.array_filters = Some(filters);
        self
    }

    /// Appends one filter to the array filter list, creating the list when absent.
    pub fn array_filter(mut self, filter: Document) -> UpdateManyConfig {
        self.array_filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    /// Skips schema validation for the updated documents.
    pub fn bypass_document_validation(mut self, bypass: bool) -> UpdateManyConfig {
        self.bypass_document_validation = Some(bypass);
        self
    }

    /// Attaches a comment that shows up in server logs and profiler output.
    pub fn comment(mut self, comment: impl Into<Bson>) -> UpdateManyConfig {
        self.comment = Some(comment.into());
        self
    }

    /// Forces the index used to find matching documents.
    pub fn hint(mut self, hint: Hint) -> UpdateManyConfig {
        self.hint = Some(hint);
        self
    }

    /// Binds variables that the filter and update can reference as `$$name`.
    pub fn let_vars(mut self, let_vars: Document) -> UpdateManyConfig {
        self.let_vars = Some(let_vars);
        self
    }

    /// Inserts a new document when the filter matches nothing.
    pub fn upsert(mut self, upsert: bool) -> UpdateManyConfig {
        self.upsert = Some(upsert);
        self
    }

    /// Sets the string comparison rules for the filter.
    pub fn collation(mut self, collation: Collation) -> UpdateManyConfig {
        self.collation = Some(collation);
        self
    }
}
