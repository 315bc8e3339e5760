use crate::repository::{seeded_users, Order, OrderItem, User};
use bson::doc;
use docrepo::options::{upsert, UpdateConfig, UpdateManyConfig};
use docrepo::{RepoResult, Repository};
use docrepo_int_test::test_util::{run_test, TestContext};

#[tokio::test]
async fn test_update_one_sets_field() {
    run_test(update_one_sets_field).await;
}

async fn update_one_sets_field(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<User>(&ctx).await?;
    let op = ctx.op_context();

    let outcome = users
        .update_one(&op, doc! { "_id": "1" }, doc! { "$set": { "age": 31 } }, None)
        .await?;
    assert_eq!(outcome.matched(), 1);
    assert_eq!(outcome.modified(), 1);
    assert!(!outcome.is_upsert());

    let alice = users.find_one(&op, doc! { "_id": "1" }, None).await?;
    assert_eq!(alice.age, 31);
    let bob = users.find_one(&op, doc! { "_id": "2" }, None).await?;
    assert_eq!(bob.age, 35);
    Ok(())
}

#[tokio::test]
async fn test_update_one_with_array_filter() {
    run_test(update_one_with_array_filter).await;
}

async fn update_one_with_array_filter(ctx: TestContext) -> RepoResult<()> {
    let orders: Repository<Order, Order> = ctx.repository("orders");
    let op = ctx.op_context();
    orders
        .create(
            &op,
            Order {
                id: "order1".to_string(),
                items: vec![OrderItem::pending("A1", 1), OrderItem::pending("B1", 2)],
            },
        )
        .await?;

    let outcome = orders
        .update_one(
            &op,
            doc! { "_id": "order1" },
            doc! { "$set": { "items.$[item].status": "shipped" } },
            Some(UpdateConfig::new().array_filter(doc! { "item.sku": "A1" })),
        )
        .await?;
    assert_eq!(outcome.modified(), 1);

    let order = orders.find_one(&op, doc! { "_id": "order1" }, None).await?;
    for item in &order.items {
        match item.sku.as_str() {
            "A1" => assert_eq!(item.status, "shipped"),
            "B1" => assert_eq!(item.status, "pending"),
            other => panic!("unexpected item {}", other),
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_update_many_with_array_filter() {
    run_test(update_many_with_array_filter).await;
}

async fn update_many_with_array_filter(ctx: TestContext) -> RepoResult<()> {
    let orders: Repository<Order, Order> = ctx.repository("orders");
    let op = ctx.op_context();
    orders
        .create(
            &op,
            Order {
                id: "order1".to_string(),
                items: vec![OrderItem::pending("A1", 1)],
            },
        )
        .await?;
    orders
        .create(
            &op,
            Order {
                id: "order2".to_string(),
                items: vec![OrderItem::pending("A1", 3)],
            },
        )
        .await?;

    let outcome = orders
        .update_many(
            &op,
            doc! {},
            doc! { "$set": { "items.$[item].status": "processed" } },
            Some(UpdateManyConfig::new().array_filters(vec![doc! { "item.qty": { "$gte": 1 } }])),
        )
        .await?;
    assert_eq!(outcome.matched(), 2);
    assert_eq!(outcome.modified(), 2);

    let all = orders.find_many(&op, doc! {}, None).await?;
    assert_eq!(all.len(), 2);
    for order in all {
        for item in order.items {
            assert_eq!(item.status, "processed");
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_update_many_changes_every_match() {
    run_test(update_many_changes_every_match).await;
}

async fn update_many_changes_every_match(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<User>(&ctx).await?;
    let op = ctx.op_context();

    let outcome = users
        .update_many(
            &op,
            doc! { "position": "QA" },
            doc! { "$set": { "position": "Tester" } },
            None,
        )
        .await?;
    assert_eq!(outcome.matched(), 1);

    assert_eq!(users.count(&op, doc! { "position": "QA" }).await?, 0);
    assert_eq!(users.count(&op, doc! { "position": "Tester" }).await?, 1);
    assert_eq!(users.count(&op, doc! { "position": "Dev" }).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_update_without_match_creates_nothing() {
    run_test(update_without_match_creates_nothing).await;
}

async fn update_without_match_creates_nothing(ctx: TestContext) -> RepoResult<()> {
    let users: Repository<User, User> = ctx.repository("users");
    let op = ctx.op_context();

    let outcome = users
        .update_one(&op, doc! { "_id": "missing" }, doc! { "$set": { "age": 40 } }, None)
        .await?;
    assert_eq!(outcome.matched(), 0);
    assert_eq!(outcome.modified(), 0);
    assert!(outcome.upserted_id().is_none());

    let outcome = users
        .update_many(
            &op,
            doc! { "position": "Nobody" },
            doc! { "$set": { "age": 40 } },
            Some(UpdateManyConfig::new().upsert(false)),
        )
        .await?;
    assert_eq!(outcome.matched(), 0);

    assert_eq!(users.count(&op, doc! {}).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_upsert_creates_document() {
    run_test(upsert_creates_document).await;
}

async fn upsert_creates_document(ctx: TestContext) -> RepoResult<()> {
    let users: Repository<User, User> = ctx.repository("users");
    let op = ctx.op_context();

    let outcome = users
        .update_one(
            &op,
            doc! { "_id": "3" },
            doc! { "$set": {
                "name": "Carol",
                "email": "carol@test.com",
                "age": 28,
                "position": "Ops",
            } },
            Some(upsert()),
        )
        .await?;
    assert_eq!(outcome.matched(), 0);
    assert_eq!(outcome.upserted_id(), Some(&bson::Bson::String("3".to_string())));

    let carol = users.find_one(&op, doc! { "_id": "3" }, None).await?;
    assert_eq!(carol, User::new("3", "Carol", "carol@test.com", 28, "Ops"));
    Ok(())
}
