use crate::repository::{alice, bob, seeded_users, User};
use bson::{doc, Bson};
use docrepo::options::{order_by, FindConfig, FindOneConfig, SortOrder};
use docrepo::{RepoResult, Repository};
use docrepo_int_test::test_util::{run_test, TestContext};

#[tokio::test]
async fn test_create_then_find_one() {
    run_test(create_then_find_one).await;
}

async fn create_then_find_one(ctx: TestContext) -> RepoResult<()> {
    let users: Repository<User, User> = ctx.repository("users");
    let op = ctx.op_context();

    let id = users.create(&op, alice()).await?;
    assert_eq!(id, Bson::String("1".to_string()));

    let found = users
        .find_one(&op, doc! { "email": "alice@test.com" }, None)
        .await?;
    assert_eq!(found, alice());
    Ok(())
}

#[tokio::test]
async fn test_create_without_identity_generates_id() {
    run_test(create_without_identity_generates_id).await;
}

async fn create_without_identity_generates_id(ctx: TestContext) -> RepoResult<()> {
    let users: Repository<User, User> = ctx.repository("users");
    let op = ctx.op_context();

    let mut anonymous = alice();
    anonymous.id = None;
    let id = users.create(&op, anonymous).await?;
    assert!(matches!(id, Bson::ObjectId(_)));

    let found = users.find_one(&op, doc! { "_id": id }, None).await?;
    assert_eq!(found.name, "Alice");
    assert!(found.id.is_none());
    Ok(())
}

#[tokio::test]
async fn test_find_many_sorted_with_limit() {
    run_test(find_many_sorted_with_limit).await;
}

async fn find_many_sorted_with_limit(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<User>(&ctx).await?;
    let op = ctx.op_context();

    let oldest = users
        .find_many(&op, doc! {}, Some(order_by("age", SortOrder::Descending).limit(1)))
        .await?;
    assert_eq!(oldest, vec![bob()]);

    let all = users
        .find_many(&op, doc! {}, Some(order_by("age", SortOrder::Ascending)))
        .await?;
    assert_eq!(all, vec![alice(), bob()]);
    Ok(())
}

#[tokio::test]
async fn test_find_many_with_skip_and_projection() {
    run_test(find_many_with_skip_and_projection).await;
}

async fn find_many_with_skip_and_projection(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<bson::Document>(&ctx).await?;
    let op = ctx.op_context();

    let config = FindConfig::new()
        .sort_by("age", SortOrder::Ascending)
        .skip(1)
        .projection(doc! { "_id": 0, "name": 1 });
    let rest = users.find_many(&op, doc! {}, Some(config)).await?;
    assert_eq!(rest, vec![doc! { "name": "Bob" }]);
    Ok(())
}

#[tokio::test]
async fn test_find_many_no_match_is_empty() {
    run_test(find_many_no_match_is_empty).await;
}

async fn find_many_no_match_is_empty(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<User>(&ctx).await?;
    let found = users
        .find_many(&ctx.op_context(), doc! { "age": { "$gt": 100 } }, None)
        .await?;
    assert!(found.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_find_one_follows_sort() {
    run_test(find_one_follows_sort).await;
}

async fn find_one_follows_sort(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<User>(&ctx).await?;
    let op = ctx.op_context();

    let youngest = users
        .find_one(&op, doc! {}, Some(FindOneConfig::new().sort_by("age", SortOrder::Ascending)))
        .await?;
    assert_eq!(youngest.name, "Alice");

    let oldest = users
        .find_one(&op, doc! {}, Some(FindOneConfig::new().sort_by("age", SortOrder::Descending)))
        .await?;
    assert_eq!(oldest.name, "Bob");
    Ok(())
}

#[tokio::test]
async fn test_count() {
    run_test(count_matching).await;
}

async fn count_matching(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<User>(&ctx).await?;
    let op = ctx.op_context();

    assert_eq!(users.count(&op, doc! {}).await?, 2);
    assert_eq!(users.count(&op, doc! { "position": "QA" }).await?, 1);
    assert_eq!(users.count(&op, doc! { "position": "Manager" }).await?, 0);
    Ok(())
}
