use crate::users::register_users;
use takeo::{Connection, DynamicRecord, ErrorKind, Manager, Value, record};

pub async fn batch<C: Connection>(manager: &Manager<C>) {
    register_users(manager, "takeo_batch_users").await;

    let records: Vec<DynamicRecord> = (0..5)
        .map(|i| {
            record! {
                "name" => format!("user {i}"),
                "email" => format!("user{i}@x.io"),
                "age" => 20 + i,
            }
        })
        .collect();
    let ids = manager
        .create_batch("User", &records)
        .await
        .expect("Failed to create the batch");
    assert_eq!(ids.len(), 5);
    for (i, id) in ids.iter().enumerate() {
        let user: DynamicRecord = manager
            .find_by_id("User", id.clone())
            .await
            .expect("Failed to find a user of the batch");
        // Keys follow the input order
        assert_eq!(user.get_as::<String>("name").unwrap(), format!("user {i}"));
    }

    let updates: Vec<(Value, DynamicRecord)> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            (
                id.clone(),
                record! {
                    "name" => format!("renamed {i}"),
                    "email" => format!("renamed{i}@x.io"),
                    "age" => 50,
                },
            )
        })
        .collect();
    manager
        .update_batch("User", &updates)
        .await
        .expect("Failed to update the batch");
    let all: Vec<DynamicRecord> = manager.find_all("User").await.expect("Failed to find all");
    assert_eq!(all.len(), 5);
    assert!(
        all.iter()
            .all(|v| v.get_as::<Option<i32>>("age").unwrap() == Some(50))
    );

    // A nullable column left out of a batch update is refused, never nulled
    let error = manager
        .update_batch(
            "User",
            &[(
                ids[0].clone(),
                record! { "name" => "renamed 0", "email" => "renamed0@x.io" },
            )],
        )
        .await
        .expect_err("The update misses the age");
    assert_eq!(ErrorKind::of(&error), ErrorKind::Mapping);
    let first: DynamicRecord = manager
        .find_by_id("User", ids[0].clone())
        .await
        .expect("Failed to find the first user");
    assert_eq!(first.get_as::<Option<i32>>("age").unwrap(), Some(50));

    manager
        .delete_batch("User", ids[..3].iter().cloned())
        .await
        .expect("Failed to delete the batch");
    let all: Vec<DynamicRecord> = manager.find_all("User").await.expect("Failed to find all");
    assert_eq!(all.len(), 2);

    assert!(
        manager
            .create_batch::<DynamicRecord>("User", &[])
            .await
            .expect("An empty batch should succeed")
            .is_empty()
    );

    manager
        .drop_table("User")
        .await
        .expect("Failed to drop the User table");
}
