#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use takeo_core::{ColumnDef, EntityMetadata, EntityRegistry, ErrorKind, Value};

    fn users() -> EntityMetadata {
        EntityMetadata::from_declared(
            "users",
            [
                ("id", "SERIAL PRIMARY KEY"),
                ("name", "TEXT NOT NULL"),
                ("email", "TEXT"),
                ("age", "INTEGER"),
            ],
            "id",
            ["id"],
        )
        .expect("users metadata should be valid")
    }

    #[test]
    fn declared_registration() {
        let metadata = users();
        assert_eq!(metadata.table_name(), "users");
        assert_eq!(metadata.primary_key(), "id");
        assert_eq!(metadata.column_order(), ["id", "name", "email", "age"]);
        let id = metadata.primary_key_column();
        assert!(id.is_primary_key && id.is_auto_increment && !id.is_nullable);
        assert!(!metadata.column("name").unwrap().is_nullable);
        assert!(metadata.column("email").unwrap().is_nullable);
        assert_eq!(
            metadata.insert_columns().map(|c| c.name()).collect::<Vec<_>>(),
            ["name", "email", "age"]
        );
        assert_eq!(
            metadata.settable_columns().map(|c| c.name()).collect::<Vec<_>>(),
            ["name", "email", "age"]
        );
    }

    #[test]
    fn column_order_is_kept() {
        let metadata = EntityMetadata::new(
            "events",
            [
                ColumnDef::new("zeta", "TEXT"),
                ColumnDef::new("alpha", "TEXT"),
                ColumnDef::new("code", "TEXT").primary_key(),
                ColumnDef::new("beta", "INTEGER").default_value(7),
            ],
        )
        .unwrap();
        assert_eq!(metadata.column_order(), ["zeta", "alpha", "code", "beta"]);
        assert_eq!(metadata.columns().len(), 4);
        // The primary key is not auto increment: it is part of the insert list
        assert_eq!(
            metadata.insert_columns().map(|c| c.name()).collect::<Vec<_>>(),
            ["zeta", "alpha", "code", "beta"]
        );
        assert_eq!(
            metadata.column("beta").unwrap().default,
            Some(Value::Int32(Some(7)))
        );
    }

    #[test]
    fn invalid_metadata() {
        let kind = |r: takeo_core::Result<EntityMetadata>| ErrorKind::of(&r.unwrap_err());
        assert_eq!(
            kind(EntityMetadata::new("", [ColumnDef::new("id", "INT").primary_key()])),
            ErrorKind::Validation
        );
        assert_eq!(
            kind(EntityMetadata::new("t", Vec::<ColumnDef>::new())),
            ErrorKind::Validation
        );
        assert_eq!(
            kind(EntityMetadata::new("t", [ColumnDef::new("a", "INT")])),
            ErrorKind::Validation
        );
        assert_eq!(
            kind(EntityMetadata::new(
                "t",
                [
                    ColumnDef::new("a", "INT").primary_key(),
                    ColumnDef::new("a", "TEXT"),
                ]
            )),
            ErrorKind::Validation
        );
        assert_eq!(
            kind(EntityMetadata::new(
                "t",
                [
                    ColumnDef::new("a", "INT").primary_key(),
                    ColumnDef::new("b", "INT").primary_key(),
                ]
            )),
            ErrorKind::Validation
        );
        assert_eq!(
            kind(EntityMetadata::from_declared(
                "t",
                [("a", "INT")],
                "missing",
                Vec::<&str>::new()
            )),
            ErrorKind::Validation
        );
        assert_eq!(
            kind(EntityMetadata::from_declared(
                "t",
                [("a", "INT")],
                "a",
                ["b"]
            )),
            ErrorKind::Validation
        );
    }

    #[test]
    fn registry() {
        let registry = EntityRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            ErrorKind::of(&registry.lookup("User").unwrap_err()),
            ErrorKind::NotFound
        );
        registry.register("User", users()).unwrap();
        let first = registry.lookup("User").unwrap();
        assert_eq!(first.table_name(), "users");

        // Registering the same metadata again is idempotent
        registry.register("User", users()).unwrap();
        let second = registry.lookup("User").unwrap();
        assert_eq!(*first, *second);
        assert_eq!(registry.len(), 1);

        // Replacing: old readers keep their snapshot
        let replaced = EntityMetadata::from_declared(
            "people",
            [("id", "BIGSERIAL"), ("nick", "TEXT")],
            "id",
            ["id"],
        )
        .unwrap();
        registry.register("User", replaced).unwrap();
        assert_eq!(first.table_name(), "users");
        assert_eq!(registry.lookup("User").unwrap().table_name(), "people");
        assert!(!Arc::ptr_eq(&first, &registry.lookup("User").unwrap()));

        registry.register("Audit", users()).unwrap();
        assert_eq!(registry.names(), ["Audit", "User"]);
        assert!(registry.contains("Audit"));
        assert_eq!(
            ErrorKind::of(&registry.register("  ", users()).unwrap_err()),
            ErrorKind::Validation
        );
    }
}
