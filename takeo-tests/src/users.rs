use takeo::{Connection, DynamicRecord, ErrorKind, Manager, Value, record};

pub(crate) const USER_COLUMNS: [(&str, &str); 4] = [
    ("id", "SERIAL PRIMARY KEY"),
    ("name", "TEXT NOT NULL"),
    ("email", "TEXT NOT NULL UNIQUE"),
    ("age", "INTEGER"),
];

pub(crate) async fn register_users<C: Connection>(manager: &Manager<C>, table: &str) {
    manager
        .register_entity("User", table, USER_COLUMNS, "id", ["id"])
        .expect("Could not register User");
    manager
        .drop_table("User")
        .await
        .expect("Failed to drop the User table");
    manager
        .create_table("User")
        .await
        .expect("Failed to create the User table");
}

pub async fn users<C: Connection>(manager: &Manager<C>) {
    register_users(manager, "takeo_users").await;

    let id = manager
        .create(
            "User",
            &record! { "name" => "Bob", "email" => "bob@x.io", "age" => 31 },
        )
        .await
        .expect("Failed to create Bob");
    assert!(matches!(id, Value::Int32(Some(..))));

    let bob: DynamicRecord = manager
        .find_by_id("User", id.clone())
        .await
        .expect("Failed to find Bob");
    assert_eq!(bob.get("id"), Some(&id));
    assert_eq!(bob.get_as::<String>("name").unwrap(), "Bob");
    assert_eq!(bob.get_as::<String>("email").unwrap(), "bob@x.io");
    assert_eq!(bob.get_as::<Option<i32>>("age").unwrap(), Some(31));

    manager
        .update("User", id.clone(), &record! { "email" => "bob@new.io" })
        .await
        .expect("Failed to update Bob's email");
    let bob: DynamicRecord = manager
        .find_by_id("User", id.clone())
        .await
        .expect("Failed to find Bob after the update");
    assert_eq!(bob.get_as::<String>("email").unwrap(), "bob@new.io");
    assert_eq!(bob.get_as::<String>("name").unwrap(), "Bob");
    assert_eq!(bob.get_as::<Option<i32>>("age").unwrap(), Some(31));

    let error = manager
        .update("User", id.clone(), &record! { "id" => 99, "nickname" => "b" })
        .await
        .expect_err("An update without settable fields must fail");
    assert_eq!(ErrorKind::of(&error), ErrorKind::NoUpdatableFields);

    // A missing row is not an error for update and delete
    manager
        .update("User", 987654, &record! { "age" => 1 })
        .await
        .expect("Updating a missing row should succeed");

    let ann = manager
        .create("User", &record! { "name" => "Ann", "email" => "ann@x.io" })
        .await
        .expect("Failed to create Ann");
    let all: Vec<DynamicRecord> = manager.find_all("User").await.expect("Failed to find all");
    assert_eq!(all.len(), 2);
    let ann: DynamicRecord = manager
        .find_by_id("User", ann)
        .await
        .expect("Failed to find Ann");
    assert_eq!(ann.get_as::<Option<i32>>("age").unwrap(), None);

    manager
        .delete("User", id.clone())
        .await
        .expect("Failed to delete Bob");
    let error = manager
        .find_by_id::<DynamicRecord>("User", id.clone())
        .await
        .expect_err("Bob should be gone");
    assert_eq!(ErrorKind::of(&error), ErrorKind::NotFound);
    manager
        .delete("User", id)
        .await
        .expect("Deleting a missing row should succeed");

    manager
        .drop_table("User")
        .await
        .expect("Failed to drop the User table");
}
