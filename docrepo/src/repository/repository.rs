use crate::context::OperationContext;
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::options::{translate, FindConfig, FindOneConfig, UpdateConfig, UpdateManyConfig};
use crate::repository::{DeleteOutcome, UpdateOutcome};
use bson::{Bson, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// A typed repository over a single named collection.
///
/// # Purpose
///
/// `Repository` gives every record type the same create / find / update / delete /
/// aggregate surface. Writes encode a `W` into a document; reads decode stored
/// documents into an `R`. Query options are passed as sparse configuration values
/// ([`FindConfig`], [`FindOneConfig`], [`UpdateConfig`], [`UpdateManyConfig`]) and only the fields that are
/// set reach the server.
///
/// # Characteristics
///
/// - **Stateless**: holds only the driver's collection handle, which is itself
///   cheap to clone and safe to share between tasks
/// - **No retries**: each call is one driver round trip; failures are returned
///   as-is, wrapped with the operation name and collection
/// - **Context aware**: every call runs under an [`OperationContext`] and is abandoned
///   when the context is cancelled or its deadline passes
/// - **Materializing**: `find_many` and `aggregate` drain the cursor and return a `Vec`
///
/// # Examples
///
/// ```rust,ignore
/// let users: Repository<User, User> = Repository::new(&db, "users");
/// let ctx = OperationContext::background().with_timeout(Duration::from_secs(5));
///
/// users.create(&ctx, alice).await?;
/// let found = users.find_one(&ctx, doc! { "email": "alice@test.com" }, None).await?;
/// users
///     .update_one(&ctx, doc! { "_id": found.id }, doc! { "$set": { "age": 31 } }, None)
///     .await?;
/// ```
pub struct Repository<W, R> {
    collection: Collection<Document>,
    _models: PhantomData<fn(W) -> R>,
}

impl<W, R> Clone for Repository<W, R> {
    fn clone(&self) -> Self {
        Repository {
            collection: self.collection.clone(),
            _models: PhantomData,
        }
    }
}

impl<W, R> Debug for Repository<W, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &self.collection.name())
            .finish()
    }
}

impl<W, R> Repository<W, R>
where
    W: Serialize,
    R: DeserializeOwned,
{
    /// Creates a repository for the collection `name` in `database`.
    ///
    /// The collection does not need to exist yet; the server creates it on the
    /// first write.
    pub fn new(database: &Database, name: &str) -> Self {
        Self::from_collection(database.collection::<Document>(name))
    }

    /// Wraps an existing collection handle.
    pub fn from_collection(collection: Collection<Document>) -> Self {
        Repository {
            collection,
            _models: PhantomData,
        }
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// Inserts one record and returns the `_id` it was stored under.
    ///
    /// When `W` carries no identity the server generates an `ObjectId`. Inserting a
    /// record whose identity already exists fails with [`ErrorKind::Write`].
    pub async fn create(&self, ctx: &OperationContext, record: W) -> RepoResult<Bson> {
        log::debug!("create on {}", self.collection_name());
        let result = ctx
            .run(async {
                let document = bson::to_document(&record)?;
                let inserted = self.collection.insert_one(document).await?;
                Ok::<_, RepoError>(inserted.inserted_id)
            })
            .await;
        self.finish("create", result)
    }

    /// Returns the first document matching `filter`, decoded into `R`.
    ///
    /// "First" follows the sort in `config` when one is given, otherwise the
    /// server's natural order. No match is reported as [`ErrorKind::NotFound`].
    pub async fn find_one(
        &self,
        ctx: &OperationContext,
        filter: Document,
        config: Option<FindOneConfig>,
    ) -> RepoResult<R> {
        log::debug!("find_one on {}", self.collection_name());
        let options = translate::find_one_options(config);
        let result = ctx
            .run(async {
                let document = self
                    .collection
                    .find_one(filter)
                    .with_options(options)
                    .await?
                    .ok_or_else(|| {
                        RepoError::new("no document matches the filter", ErrorKind::NotFound)
                    })?;
                Ok::<_, RepoError>(bson::from_document::<R>(document)?)
            })
            .await;
        self.finish("find_one", result)
    }

    /// Returns every document matching `filter`, decoded into `R`.
    ///
    /// An empty result is not an error. Any single document that fails to decode
    /// fails the whole call.
    pub async fn find_many(
        &self,
        ctx: &OperationContext,
        filter: Document,
        config: Option<FindConfig>,
    ) -> RepoResult<Vec<R>> {
        log::debug!("find_many on {}", self.collection_name());
        let options = translate::find_options(config);
        let result = ctx
            .run(async {
                let cursor = self.collection.find(filter).with_options(options).await?;
                let documents: Vec<Document> = cursor.try_collect().await?;
                decode_all::<R>(documents)
            })
            .await;
        self.finish("find_many", result)
    }

    /// Applies `update` to the first document matching `filter`.
    ///
    /// `update` holds update operators and may address array elements through
    /// `$[name]` placeholders bound by the config's array filters.
    pub async fn update_one(
        &self,
        ctx: &OperationContext,
        filter: Document,
        update: Document,
        config: Option<UpdateConfig>,
    ) -> RepoResult<UpdateOutcome> {
        log::debug!("update_one on {}", self.collection_name());
        let options = translate::update_one_options(config);
        let result = ctx
            .run(async {
                let updated = self
                    .collection
                    .update_one(filter, update)
                    .with_options(options)
                    .await?;
                Ok::<_, RepoError>(UpdateOutcome::from(updated))
            })
            .await;
        self.finish("update_one", result)
    }

    /// Applies `update` to every document matching `filter`.
    ///
    /// The same array filters apply to every matched document.
    pub async fn update_many(
        &self,
        ctx: &OperationContext,
        filter: Document,
        update: Document,
        config: Option<UpdateManyConfig>,
    ) -> RepoResult<UpdateOutcome> {
        log::debug!("update_many on {}", self.collection_name());
        let options = translate::update_many_options(config);
        let result = ctx
            .run(async {
                let updated = self
                    .collection
                    .update_many(filter, update)
                    .with_options(options)
                    .await?;
                Ok::<_, RepoError>(UpdateOutcome::from(updated))
            })
            .await;
        self.finish("update_many", result)
    }

    /// Removes the first document matching `filter`. Deleting nothing succeeds.
    pub async fn delete_one(
        &self,
        ctx: &OperationContext,
        filter: Document,
    ) -> RepoResult<DeleteOutcome> {
        log::debug!("delete_one on {}", self.collection_name());
        let result = ctx
            .run(async {
                let deleted = self.collection.delete_one(filter).await?;
                Ok::<_, RepoError>(DeleteOutcome::from(deleted))
            })
            .await;
        self.finish("delete_one", result)
    }

    /// Removes every document matching `filter`. Deleting nothing succeeds.
    pub async fn delete_many(
        &self,
        ctx: &OperationContext,
        filter: Document,
    ) -> RepoResult<DeleteOutcome> {
        log::debug!("delete_many on {}", self.collection_name());
        let result = ctx
            .run(async {
                let deleted = self.collection.delete_many(filter).await?;
                Ok::<_, RepoError>(DeleteOutcome::from(deleted))
            })
            .await;
        self.finish("delete_many", result)
    }

    /// Runs an aggregation pipeline and decodes each output document into `R`.
    ///
    /// Results keep the pipeline's output order.
    pub async fn aggregate(
        &self,
        ctx: &OperationContext,
        pipeline: Vec<Document>,
    ) -> RepoResult<Vec<R>> {
        self.run_pipeline("aggregate", ctx, pipeline).await
    }

    /// Runs an aggregation pipeline whose output has a different shape than `R`,
    /// such as a `$group` or `$count` stage.
    pub async fn aggregate_as<T>(
        &self,
        ctx: &OperationContext,
        pipeline: Vec<Document>,
    ) -> RepoResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.run_pipeline("aggregate_as", ctx, pipeline).await
    }

    /// Counts the documents matching `filter`.
    pub async fn count(&self, ctx: &OperationContext, filter: Document) -> RepoResult<u64> {
        log::debug!("count on {}", self.collection_name());
        let result = ctx
            .run(async {
                let count = self.collection.count_documents(filter).await?;
                Ok::<_, RepoError>(count)
            })
            .await;
        self.finish("count", result)
    }

    /// Drops the collection with all its documents and indexes.
    pub async fn drop(&self, ctx: &OperationContext) -> RepoResult<()> {
        log::debug!("drop on {}", self.collection_name());
        let result = ctx
            .run(async {
                self.collection.drop().await?;
                Ok::<_, RepoError>(())
            })
            .await;
        self.finish("drop", result)
    }

    async fn run_pipeline<T>(
        &self,
        operation: &'static str,
        ctx: &OperationContext,
        pipeline: Vec<Document>,
    ) -> RepoResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        log::debug!(
            "{} on {} with {} stage(s)",
            operation,
            self.collection_name(),
            pipeline.len()
        );
        let result = ctx
            .run(async {
                let cursor = self.collection.aggregate(pipeline).await?;
                let documents: Vec<Document> = cursor.try_collect().await?;
                decode_all::<T>(documents)
            })
            .await;
        self.finish(operation, result)
    }

    fn finish<T>(&self, operation: &'static str, result: RepoResult<T>) -> RepoResult<T> {
        result.map_err(|err| {
            let err = err.with_context(operation, self.collection_name());
            match err.kind() {
                ErrorKind::NotFound => log::debug!("{}", err),
                ErrorKind::Canceled | ErrorKind::Timeout => log::warn!("{}", err),
                _ => log::error!("{}", err),
            }
            err
        })
    }
}

fn decode_all<T: DeserializeOwned>(documents: Vec<Document>) -> RepoResult<Vec<T>> {
    documents
        .into_iter()
        .map(|document| bson::from_document::<T>(document).map_err(RepoError::from))
        .collect()
}
