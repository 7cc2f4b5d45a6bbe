use crate::{silent_logs, users::register_users};
use takeo::{Connection, DynamicRecord, ErrorKind, Manager, Value, record};

pub async fn atomicity<C: Connection>(manager: &Manager<C>) {
    register_users(manager, "takeo_atomic_users").await;

    manager
        .create("User", &record! { "name" => "Eve", "email" => "eve@x.io" })
        .await
        .expect("Failed to create Eve");

    // The second record violates the unique email
    let records = [
        record! { "name" => "A", "email" => "a@x.io" },
        record! { "name" => "B", "email" => "eve@x.io" },
        record! { "name" => "C", "email" => "c@x.io" },
    ];
    silent_logs! {
        let error = manager
            .create_batch("User", &records)
            .await
            .expect_err("The batch must fail on the duplicate email");
        assert_eq!(ErrorKind::of(&error), ErrorKind::Store);
    }
    let all: Vec<DynamicRecord> = manager.find_all("User").await.expect("Failed to find all");
    assert_eq!(all.len(), 1, "A failed batch must leave no row behind");

    let eve = all[0].get("id").cloned().unwrap_or(Value::Null);
    silent_logs! {
        let error = manager
            .update_batch(
                "User",
                &[
                    (eve.clone(), record! { "name" => "Eve 2", "email" => "eve2@x.io" }),
                    (eve.clone(), record! { "name" => "Eve 3" }),
                ],
            )
            .await
            .expect_err("The second update misses the email");
        assert_eq!(ErrorKind::of(&error), ErrorKind::Mapping);
    }
    let eve: DynamicRecord = manager
        .find_by_id("User", eve)
        .await
        .expect("Failed to find Eve");
    assert_eq!(eve.get_as::<String>("name").unwrap(), "Eve");

    manager
        .drop_table("User")
        .await
        .expect("Failed to drop the User table");
}
