//! Sparse per-call configuration and its translation into driver options.
//!
//! Every configuration type here has one `Option` per setting. A field left as
//! `None` is not sent at all, so the server applies its own default. A field set
//! to `Some(value)` is always sent, even when the value is `0`, `false`, or an
//! empty document.
//!
//! ```rust,ignore
//! use docrepo::options::{order_by, FindConfig, SortOrder};
//!
//! // { sort: { age: -1 }, limit: 1 }
//! let config = order_by("age", SortOrder::Descending).limit(1);
//!
//! // Only `skip` is sent; the server keeps its own batch size and cursor settings.
//! let config = FindConfig::new().skip(20);
//! ```
//!
//! The [`translate`] module turns these values into `mongodb::options` structs. The
//! repository calls it for you; it is public for callers that talk to the driver
//! directly.

mod database_options;
mod find_options;
mod sort_order;
pub mod translate;
mod update_options;

pub use database_options::*;
pub use find_options::*;
pub use sort_order::*;
pub use update_options::*;
