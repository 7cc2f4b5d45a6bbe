use takeo::{Conditions, Connection, DynamicRecord, ErrorKind, Manager, Value, record};

pub async fn conditions<C: Connection>(manager: &Manager<C>) {
    manager
        .register_entity(
            "Person",
            "takeo_people",
            [
                ("id", "BIGSERIAL PRIMARY KEY"),
                ("name", "TEXT NOT NULL"),
                ("city", "TEXT"),
                ("age", "INTEGER"),
            ],
            "id",
            ["id"],
        )
        .expect("Could not register Person");
    manager
        .drop_table("Person")
        .await
        .expect("Failed to drop the Person table");
    manager
        .create_table("Person")
        .await
        .expect("Failed to create the Person table");

    let ids = manager
        .create_batch(
            "Person",
            &[
                record! { "name" => "Mario", "city" => "Rome", "age" => 30 },
                record! { "name" => "Giulia", "city" => "Rome", "age" => 25 },
                record! { "name" => "Luca", "city" => "Rome", "age" => 30 },
                record! { "name" => "Sara", "age" => 30 },
                record! { "name" => "Paolo", "city" => "Turin" },
            ],
        )
        .await
        .expect("Failed to create the people");
    assert!(ids.iter().all(|v| matches!(v, Value::Int64(Some(..)))));

    let romans: Vec<DynamicRecord> = manager
        .find_where(
            "Person",
            &Conditions::new().with("city", "Rome").with("age", 30),
        )
        .await
        .expect("Failed to find by city and age");
    let mut names: Vec<String> = romans
        .iter()
        .map(|v| v.get_as::<String>("name").unwrap())
        .collect();
    names.sort();
    assert_eq!(names, ["Luca", "Mario"]);

    let homeless: Vec<DynamicRecord> = manager
        .find_where("Person", &Conditions::new().with("city", Value::Varchar(None)))
        .await
        .expect("Failed to find by missing city");
    assert_eq!(homeless.len(), 1);
    assert_eq!(homeless[0].get_as::<String>("name").unwrap(), "Sara");

    let error = manager
        .find_where::<DynamicRecord>("Person", &Conditions::new())
        .await
        .expect_err("An empty condition set must be refused");
    assert_eq!(ErrorKind::of(&error), ErrorKind::EmptyConditionSet);

    let removed = manager
        .delete_where("Person", &Conditions::new().with("city", "Rome"))
        .await
        .expect("Failed to delete by city");
    assert_eq!(removed, 3);
    let left: Vec<DynamicRecord> = manager.find_all("Person").await.expect("Failed to find all");
    assert_eq!(left.len(), 2);

    manager
        .drop_table("Person")
        .await
        .expect("Failed to drop the Person table");
}
