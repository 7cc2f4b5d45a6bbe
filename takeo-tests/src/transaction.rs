use crate::users::register_users;
use takeo::{Connection, DynamicRecord, ErrorKind, Manager, TransactionState, record};

pub async fn transaction<C: Connection>(manager: &Manager<C>) {
    register_users(manager, "takeo_transaction_users").await;

    let mut transaction = manager
        .begin_transaction()
        .await
        .expect("Could not begin a transaction");
    for (name, email) in [("A", "a@x.io"), ("B", "b@x.io")] {
        transaction
            .create("User", &record! { "name" => name, "email" => email })
            .await
            .expect("Failed to create inside the transaction");
    }
    transaction
        .commit()
        .await
        .expect("Failed to commit the transaction");
    assert_eq!(transaction.state(), TransactionState::Committed);
    let error = transaction
        .commit()
        .await
        .expect_err("A committed transaction cannot commit again");
    assert_eq!(ErrorKind::of(&error), ErrorKind::TransactionFinished);
    drop(transaction);
    let all: Vec<DynamicRecord> = manager.find_all("User").await.expect("Failed to find all");
    assert_eq!(all.len(), 2);

    let mut transaction = manager
        .begin_transaction()
        .await
        .expect("Could not begin a transaction");
    transaction
        .create("User", &record! { "name" => "C", "email" => "c@x.io" })
        .await
        .expect("Failed to create inside the transaction");
    transaction
        .rollback()
        .await
        .expect("Failed to roll back the transaction");
    let error = transaction
        .create("User", &record! { "name" => "D", "email" => "d@x.io" })
        .await
        .expect_err("A rolled back transaction cannot be used");
    assert_eq!(ErrorKind::of(&error), ErrorKind::TransactionFinished);
    drop(transaction);
    let all: Vec<DynamicRecord> = manager.find_all("User").await.expect("Failed to find all");
    assert_eq!(all.len(), 2);

    // Dropped while open: rolled back
    {
        let mut transaction = manager
            .begin_transaction()
            .await
            .expect("Could not begin a transaction");
        transaction
            .create("User", &record! { "name" => "E", "email" => "e@x.io" })
            .await
            .expect("Failed to create inside the transaction");
    }
    let all: Vec<DynamicRecord> = manager.find_all("User").await.expect("Failed to find all");
    assert_eq!(all.len(), 2);

    manager
        .drop_table("User")
        .await
        .expect("Failed to drop the User table");
}
