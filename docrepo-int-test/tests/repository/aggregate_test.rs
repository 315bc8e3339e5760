use crate::repository::{seeded_users, Employee};
use bson::doc;
use docrepo::RepoResult;
use docrepo_int_test::test_util::{run_test, TestContext};
use serde::Deserialize;

#[tokio::test]
async fn test_aggregate_into_read_model() {
    run_test(aggregate_into_read_model).await;
}

async fn aggregate_into_read_model(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<Employee>(&ctx).await?;
    let op = ctx.op_context();

    let employees = users
        .aggregate(
            &op,
            vec![
                doc! { "$sort": { "name": 1 } },
                doc! { "$project": { "_id": 0, "first_name": "$name", "position": 1 } },
            ],
        )
        .await?;

    assert_eq!(
        employees,
        vec![
            Employee {
                first_name: "Alice".to_string(),
                position: "Dev".to_string(),
            },
            Employee {
                first_name: "Bob".to_string(),
                position: "QA".to_string(),
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_aggregate_empty_result() {
    run_test(aggregate_empty_result).await;
}

async fn aggregate_empty_result(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<Employee>(&ctx).await?;
    let employees = users
        .aggregate(&ctx.op_context(), vec![doc! { "$match": { "age": { "$gt": 100 } } }])
        .await?;
    assert!(employees.is_empty());
    Ok(())
}

#[derive(Debug, Deserialize, PartialEq)]
struct PositionCount {
    #[serde(rename = "_id")]
    position: String,
    total: i32,
}

#[tokio::test]
async fn test_aggregate_as_group() {
    run_test(aggregate_as_group).await;
}

async fn aggregate_as_group(ctx: TestContext) -> RepoResult<()> {
    let users = seeded_users::<Employee>(&ctx).await?;

    let counts: Vec<PositionCount> = users
        .aggregate_as(
            &ctx.op_context(),
            vec![
                doc! { "$group": { "_id": "$position", "total": { "$sum": 1 } } },
                doc! { "$sort": { "_id": 1 } },
            ],
        )
        .await?;

    assert_eq!(
        counts,
        vec![
            PositionCount {
                position: "Dev".to_string(),
                total: 1,
            },
            PositionCount {
                position: "QA".to_string(),
                total: 1,
            },
        ]
    );
    Ok(())
}
