//! Typed repositories over document collections.
//!
//! A [`Repository<W, R>`] binds one collection to two record types: `W` is what gets
//! written, `R` is what reads decode into. They are independent, so a repository can
//! insert a model without an identity field and read back one that carries `_id`.
//!
//! ```rust,ignore
//! use docrepo::repository::Repository;
//!
//! let users: Repository<NewUser, User> = Repository::new(&db, "users");
//! users.create(&ctx, NewUser { name: "Alice".into(), age: 30 }).await?;
//!
//! let oldest = users
//!     .find_many(&ctx, doc! {}, Some(order_by("age", SortOrder::Descending).limit(1)))
//!     .await?;
//! ```

mod repository;
mod write_result;

pub use repository::*;
pub use write_result::*;
