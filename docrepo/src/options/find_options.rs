use crate::options::sort_order::{push_sort, sort_spec, SortOrder};
use bson::{Bson, Document};
use mongodb::options::{Collation, CursorType, Hint};
use std::time::Duration;

/// Sparse configuration for `find_many`.
///
/// Every field is optional. A field left as `None` is never mentioned to the server,
/// so the server default applies; a field set to `Some(value)` is forwarded as is,
/// including zero, `false` and empty documents.
///
/// Fields are public so a configuration can be written as a struct literal, and the
/// chained setters below cover the common cases.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::options::{FindConfig, SortOrder};
///
/// let config = FindConfig::new()
///     .sort_by("age", SortOrder::Descending)
///     .skip(10)
///     .limit(20);
///
/// let config = FindConfig { limit: Some(1), ..Default::default() };
/// ```
#[derive(Debug, Clone, Default)]
pub struct FindConfig {
    pub allow_disk_use: Option<bool>,
    pub allow_partial_results: Option<bool>,
    pub batch_size: Option<u32>,
    pub limit: Option<i64>,
    pub skip: Option<u64>,
    pub max_await_time: Option<Duration>,
    pub no_cursor_timeout: Option<bool>,
    pub sort: Option<Document>,
    pub comment: Option<Bson>,
    pub hint: Option<Hint>,
    pub let_vars: Option<Document>,
    pub max: Option<Document>,
    pub min: Option<Document>,
    pub projection: Option<Document>,
    pub return_key: Option<bool>,
    pub collation: Option<Collation>,
    pub cursor_type: Option<CursorType>,
}

/// Creates a `FindConfig` sorted by a single field.
pub fn order_by(field_name: &str, sort_order: SortOrder) -> FindConfig {
    FindConfig::new().sort(sort_spec(&[(field_name, sort_order)]))
}

/// Creates a `FindConfig` that skips the first `skip` matches.
pub fn skip_by(skip: u64) -> FindConfig {
    FindConfig::new().skip(skip)
}

/// Creates a `FindConfig` that returns at most `limit` matches.
pub fn limit_to(limit: i64) -> FindConfig {
    FindConfig::new().limit(limit)
}

impl FindConfig {
    /// Creates a configuration with every field absent.
    pub fn new() -> FindConfig {
        FindConfig::default()
    }

    /// Lets the server spill large sorts to temporary files.
    pub fn allow_disk_use(mut self, allow_disk_use: bool) -> FindConfig {
        self.allow_disk_use = Some(allow_disk_use);
        self
    }

    /// Returns what reachable shards have when some shards are down.
    pub fn allow_partial_results(mut self, allow_partial_results: bool) -> FindConfig {
        self.allow_partial_results = Some(allow_partial_results);
        self
    }

    /// Sets how many documents each cursor batch carries.
    pub fn batch_size(mut self, batch_size: u32) -> FindConfig {
        self.batch_size = Some(batch_size);
        self
    }

    /// Sets the maximum number of documents to return.
    ///
    /// The value is passed through unchecked; the server interprets zero as "no limit"
    /// and rejects nothing here.
    pub fn limit(mut self, limit: i64) -> FindConfig {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of documents to skip from the beginning of the result.
    pub fn skip(mut self, skip: u64) -> FindConfig {
        self.skip = Some(skip);
        self
    }

    /// Bounds how long a tailable cursor waits for new documents.
    pub fn max_await_time(mut self, max_await_time: Duration) -> FindConfig {
        self.max_await_time = Some(max_await_time);
        self
    }

    /// Keeps an idle cursor alive on the server.
    pub fn no_cursor_timeout(mut self, no_cursor_timeout: bool) -> FindConfig {
        self.no_cursor_timeout = Some(no_cursor_timeout);
        self
    }

    /// Replaces the sort specification.
    pub fn sort(mut self, sort: Document) -> FindConfig {
        self.sort = Some(sort);
        self
    }

    /// Appends a field to the sort specification.
    pub fn sort_by(mut self, field_name: &str, sort_order: SortOrder) -> FindConfig {
        self.sort = Some(push_sort(self.sort.take(), field_name, sort_order));
        self
    }

    /// Attaches a comment that shows up in server logs and profiler output.
    pub fn comment(mut self, comment: impl Into<Bson>) -> FindConfig {
        self.comment = Some(comment.into());
        self
    }

    /// Forces the index used to answer the query.
    pub fn hint(mut self, hint: Hint) -> FindConfig {
        self.hint = Some(hint);
        self
    }

    /// Hints the index with the given name.
    pub fn hint_index(self, index_name: &str) -> FindConfig {
        self.hint(Hint::Name(index_name.to_string()))
    }

    /// Binds variables that the filter can reference as `$$name`.
    pub fn let_vars(mut self, let_vars: Document) -> FindConfig {
        self.let_vars = Some(let_vars);
        self
    }

    /// Sets the exclusive upper index bound.
    pub fn max(mut self, max: Document) -> FindConfig {
        self.max = Some(max);
        self
    }

    /// Sets the inclusive lower index bound.
    pub fn min(mut self, min: Document) -> FindConfig {
        self.min = Some(min);
        self
    }

    /// Limits the returned fields.
    pub fn projection(mut self, projection: Document) -> FindConfig {
        self.projection = Some(projection);
        self
    }

    /// Returns only the index keys instead of the documents.
    pub fn return_key(mut self, return_key: bool) -> FindConfig {
        self.return_key = Some(return_key);
        self
    }

    /// Sets the string comparison rules for the filter and sort.
    pub fn collation(mut self, collation: Collation) -> FindConfig {
        self.collation = Some(collation);
        self
    }

    /// Selects a tailable cursor for capped collections.
    pub fn cursor_type(mut self, cursor_type: CursorType) -> FindConfig {
        self.cursor_type = Some(cursor_type);
        self
    }
}

/// Sparse configuration for `find_one`.
///
/// Follows the same presence rules as [`FindConfig`], over the subset of fields a
/// single-document lookup accepts.
#[derive(Debug, Clone, Default)]
pub struct FindOneConfig {
    pub allow_partial_results: Option<bool>,
    pub skip: Option<u64>,
    pub sort: Option<Document>,
    pub comment: Option<Bson>,
    pub hint: Option<Hint>,
    pub max: Option<Document>,
    pub min: Option<Document>,
    pub projection: Option<Document>,
    pub return_key: Option<bool>,
    pub collation: Option<Collation>,
}

impl FindOneConfig {
    /// Creates a configuration with every field absent.
    pub fn new() -> FindOneConfig {
        FindOneConfig::default()
    }

    /// Returns what reachable shards have when some shards are down.
    pub fn allow_partial_results(mut self, allow_partial_results: bool) -> FindOneConfig {
        self.allow_partial_results = Some(allow_partial_results);
        self
    }

    /// Sets the number of documents to skip from the beginning of the result.
    pub fn skip(mut self, skip: u64) -> FindOneConfig {
        self.skip = Some(skip);
        self
    }

    /// Replaces the sort specification.
    pub fn sort(mut self, sort: Document) -> FindOneConfig {
        self.sort = Some(sort);
        self
    }

    /// Appends a field to the sort specification.
    pub fn sort_by(mut self, field_name: &str, sort_order: SortOrder) -> FindOneConfig {
        self.sort = Some(push_sort(self.sort.take(), field_name, sort_order));
        self
    }

    /// Attaches a comment that shows up in server logs and profiler output.
    pub fn comment(mut self, comment: impl Into<Bson>) -> FindOneConfig {
        self.comment = Some(comment.into());
        self
    }

    /// Forces the index used to answer the query.
    pub fn hint(mut self, hint: Hint) -> FindOneConfig {
        self.hint = Some(hint);
        self
    }

    /// Sets the exclusive upper index bound.
    pub fn max(mut self, max: Document) -> FindOneConfig {
        self.max = Some(max);
        self
    }

    /// Sets the inclusive lower index bound.
    pub fn min(mut self, min: Document) -> FindOneConfig {
        self.min = Some(min);
        self
    }

    /// Limits the returned fields.
    pub fn projection(mut self, projection: Document) -> FindOneConfig {
        self.projection = Some(projection);
        self
    }

    /// Returns only the index keys instead of the documents.
    pub fn return_key(mut self, return_key: bool) -> FindOneConfig {
        self.return_key = Some(return_key);
        self
    }

    /// Sets the string comparison rules for the filter and sort.
    pub fn collation(mut self, collation: Collation) -> FindOneConfig {
        self.collation = Some(collation);
        self
    }
}
