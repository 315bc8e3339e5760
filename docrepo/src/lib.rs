//! # docrepo - typed repositories over MongoDB
//!
//! docrepo gives any pair of serde record types the same create / find / update /
//! delete / aggregate surface over a named MongoDB collection, and keeps driver
//! option wiring out of application code.
//!
//! ## Key Features
//!
//! - **Typed**: a [`Repository<W, R>`](repository::Repository) writes `W` and reads `R`,
//!   encoded and decoded through `bson` and `serde`
//! - **Sparse options**: per-call configuration where an unset field is never sent,
//!   so server defaults stay in charge
//! - **Array filters**: `$[name]` placeholders in updates, bound per call
//! - **Cancellation**: every call runs under an [`OperationContext`] with an optional
//!   deadline and cancel handle
//! - **Classified errors**: one [`RepoError`] type with an [`ErrorKind`] per failure
//!   category
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docrepo::{Connector, OperationContext, Repository};
//! use docrepo::options::{order_by, SortOrder};
//! use bson::doc;
//!
//! let db = Connector::from_env()?.connect().await?;
//! let users: Repository<User, User> = Repository::new(&db, "users");
//! let ctx = OperationContext::background();
//!
//! users.create(&ctx, User::new("Alice", "alice@test.com", 30, "Developer")).await?;
//! users.create(&ctx, User::new("Bob", "bob@test.com", 35, "QA")).await?;
//!
//! let oldest = users
//!     .find_many(&ctx, doc! {}, Some(order_by("age", SortOrder::Descending).limit(1)))
//!     .await?;
//! assert_eq!(oldest[0].name, "Bob");
//! ```
//!
//! ## Module Organization
//!
//! - [`connector`] - Opening a database handle from a URI and database name
//! - [`context`] - Deadlines and cancellation for individual calls
//! - [`errors`] - Error types and result definitions
//! - [`options`] - Sparse per-call configuration and its translation to driver options
//! - [`repository`] - The typed repository and its write outcomes

pub mod connector;
pub mod context;
pub mod errors;
pub mod options;
pub mod repository;

pub use connector::{Connector, ConnectorBuilder};
pub use context::{CancelHandle, OperationContext};
pub use errors::{ErrorKind, RepoError, RepoResult};
pub use repository::{DeleteOutcome, Repository, UpdateOutcome};
