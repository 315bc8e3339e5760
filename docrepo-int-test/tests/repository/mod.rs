mod aggregate_test;
mod create_find_test;
mod update_test;

use docrepo::{RepoResult, Repository};
use docrepo_int_test::test_util::TestContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub position: String,
}

impl User {
    pub fn new(id: &str, name: &str, email: &str, age: i32, position: &str) -> Self {
        User {
            id: Some(id.to_string()),
            name: name.to_string(),
            email: email.to_string(),
            age,
            position: position.to_string(),
        }
    }
}

pub fn alice() -> User {
    User::new("1", "Alice", "alice@test.com", 30, "Dev")
}

pub fn bob() -> User {
    User::new("2", "Bob", "bob@test.com", 35, "QA")
}

/// Read model whose shape differs from what is stored in `users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub first_name: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: String,
    pub qty: i32,
    pub status: String,
}

impl OrderItem {
    pub fn pending(sku: &str, qty: i32) -> Self {
        OrderItem {
            sku: sku.to_string(),
            qty,
            status: "pending".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub items: Vec<OrderItem>,
}

/// Creates a `users` repository holding Alice and Bob.
pub async fn seeded_users<R>(ctx: &TestContext) -> RepoResult<Repository<User, R>>
where
    R: serde::de::DeserializeOwned,
{
    let users: Repository<User, R> = ctx.repository("users");
    let op = ctx.op_context();
    users.create(&op, alice()).await?;
    users.create(&op, bob()).await?;
    Ok(users)
}
