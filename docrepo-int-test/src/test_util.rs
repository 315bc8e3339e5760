use docrepo::connector::{DATABASE_NAME_VAR, MONGODB_URI_VAR};
use docrepo::{Connector, ErrorKind, OperationContext, RepoError, RepoResult, Repository};
use mongodb::Database;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

/// Runs a test against a live server and drops every collection it created.
///
/// The test is skipped with a log line when `MONGODB_URI` or `DATABASE_NAME` is not
/// set. Collections are dropped even when the test fails or panics; the failure is
/// reported afterwards.
pub async fn run_test<T, F>(test: T)
where
    T: FnOnce(TestContext) -> F,
    F: Future<Output = RepoResult<()>> + Send + 'static,
{
    let ctx = match create_test_context().await {
        Ok(Some(ctx)) => ctx,
        Ok(None) => {
            log::warn!(
                "Skipping test: {} and {} must both be set",
                MONGODB_URI_VAR,
                DATABASE_NAME_VAR
            );
            return;
        }
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let outcome = tokio::spawn(test(ctx.clone())).await;
    let after = cleanup(&ctx).await;

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(join_error) if join_error.is_panic() => {
            std::panic::resume_unwind(join_error.into_panic())
        }
        Err(join_error) => panic!("Test task aborted: {}", join_error),
    }
    if let Err(e) = after {
        panic!("After run failed: {:?}", e);
    }
}

/// A connected database plus a run id that keeps collection names unique per test.
#[derive(Clone)]
pub struct TestContext {
    db: Database,
    run_id: String,
}

impl TestContext {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            run_id: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn db(&self) -> Database {
        self.db.clone()
    }

    /// Returns a collection name unique to this test run, such as `users_3f2a...`.
    pub fn collection_name(&self, base: &str) -> String {
        format!("{}_{}", base, self.run_id)
    }

    pub fn repository<W, R>(&self, base: &str) -> Repository<W, R>
    where
        W: Serialize,
        R: DeserializeOwned,
    {
        Repository::new(&self.db, &self.collection_name(base))
    }

    pub fn op_context(&self) -> OperationContext {
        OperationContext::background().with_timeout(Duration::from_secs(30))
    }
}

/// Connects using the environment, or returns `None` when it is not configured.
pub async fn create_test_context() -> RepoResult<Option<TestContext>> {
    const MAX_ATTEMPTS: u32 = 3;

    if std::env::var(MONGODB_URI_VAR).is_err() || std::env::var(DATABASE_NAME_VAR).is_err() {
        return Ok(None);
    }
    let connector = Connector::from_env()?;

    let mut last_error: Option<RepoError> = None;
    for attempt in 1..=MAX_ATTEMPTS {
        match connector.connect().await {
            Ok(db) => return Ok(Some(TestContext::new(db))),
            Err(e) => {
                log::warn!(
                    "Failed to connect (attempt {}/{}): {}",
                    attempt,
                    MAX_ATTEMPTS,
                    e
                );
                last_error = Some(e);
                tokio::time::sleep(Duration::from_millis(50 * attempt as u64)).await;
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        RepoError::new("Failed to create test context", ErrorKind::Connection)
    }))
}

/// Drops every collection created under this context's run id.
pub async fn cleanup(ctx: &TestContext) -> RepoResult<()> {
    let suffix = format!("_{}", ctx.run_id);
    let names = ctx.db.list_collection_names().await?;
    for name in names.iter().filter(|name| name.ends_with(&suffix)) {
        ctx.db.collection::<bson::Document>(name).drop().await?;
    }
    Ok(())
}
