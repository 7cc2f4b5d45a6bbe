#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use takeo_core::{
        ColumnDef, Conditions, EntityMetadata, GenericSqlWriter, SqlWriter, Statements, Value,
    };

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    fn users() -> EntityMetadata {
        EntityMetadata::from_declared(
            "users",
            [
                ("id", "SERIAL PRIMARY KEY"),
                ("name", "TEXT NOT NULL"),
                ("email", "TEXT UNIQUE"),
                ("age", "INTEGER"),
            ],
            "id",
            ["id"],
        )
        .unwrap()
    }

    fn placeholders(sql: &str) -> Vec<usize> {
        sql.split('$')
            .skip(1)
            .map(|v| {
                v.chars()
                    .take_while(char::is_ascii_digit)
                    .collect::<String>()
                    .parse()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn statements() {
        let statements = Statements::new(&WRITER, Arc::new(users()));
        assert_eq!(statements.select, "SELECT id, name, email, age FROM users");
        assert_eq!(
            statements.select_by_id,
            "SELECT id, name, email, age FROM users WHERE id = $1"
        );
        assert_eq!(
            statements.insert,
            "INSERT INTO users (name, email, age) VALUES ($1, $2, $3) RETURNING id"
        );
        assert_eq!(
            statements.update,
            "UPDATE users SET name = $1, email = $2, age = $3 WHERE id = $4"
        );
        assert_eq!(statements.delete, "DELETE FROM users WHERE id = $1");
        assert_eq!(
            statements.create_table,
            "CREATE TABLE IF NOT EXISTS users (id SERIAL PRIMARY KEY, name TEXT NOT NULL, email TEXT UNIQUE, age INTEGER)"
        );
        assert_eq!(statements.drop_table, "DROP TABLE IF EXISTS users CASCADE");
    }

    #[test]
    fn insert_without_returning() {
        let mut out = String::new();
        WRITER.write_insert(&mut out, &users());
        assert_eq!(out, "INSERT INTO users (name, email, age) VALUES ($1, $2, $3)");
    }

    #[test]
    fn insert_with_explicit_key() {
        let metadata = EntityMetadata::new(
            "tokens",
            [
                ColumnDef::new("token", "TEXT").primary_key(),
                ColumnDef::new("owner", "BIGINT"),
                ColumnDef::new("serial", "BIGSERIAL").auto_increment(),
            ],
        )
        .unwrap();
        let statements = Statements::new(&WRITER, Arc::new(metadata));
        assert_eq!(
            statements.insert,
            "INSERT INTO tokens (token, owner) VALUES ($1, $2) RETURNING token"
        );
        assert_eq!(
            statements.update,
            "UPDATE tokens SET owner = $1 WHERE token = $2"
        );
    }

    #[test]
    fn partial_update() {
        let metadata = users();
        let mut out = String::new();
        WRITER.write_update_columns(
            &mut out,
            &metadata,
            [metadata.column("age").unwrap(), metadata.column("name").unwrap()],
        );
        assert_eq!(out, "UPDATE users SET age = $1, name = $2 WHERE id = $3");
    }

    #[test]
    fn partial_insert() {
        let metadata = users();
        let mut out = String::new();
        WRITER.write_insert_columns(&mut out, &metadata, [metadata.column("name").unwrap()]);
        WRITER.write_returning(&mut out, &metadata);
        assert_eq!(out, "INSERT INTO users (name) VALUES ($1) RETURNING id");

        out.clear();
        WRITER.write_insert_columns(&mut out, &metadata, Vec::<&ColumnDef>::new());
        WRITER.write_returning(&mut out, &metadata);
        assert_eq!(out, "INSERT INTO users DEFAULT VALUES RETURNING id");
    }

    #[test]
    fn conditions() {
        let metadata = users();
        let conditions = Conditions::new()
            .with("name", "Bob")
            .with("age", 31)
            .with("email", Value::Varchar(None));
        let mut out = String::new();
        WRITER.write_select_where(&mut out, &metadata, &conditions);
        assert_eq!(
            out,
            "SELECT id, name, email, age FROM users WHERE age = $1 AND email IS NULL AND name = $2"
        );
        out.clear();
        WRITER.write_delete_where(&mut out, &metadata, &conditions);
        assert_eq!(
            out,
            "DELETE FROM users WHERE age = $1 AND email IS NULL AND name = $2"
        );
    }

    #[test]
    fn deterministic_and_contiguous() {
        let metadata = users();
        let a = Statements::new(&WRITER, Arc::new(metadata.clone()));
        let b = Statements::new(&WRITER, Arc::new(metadata));
        for (left, right) in [
            (&a.select_by_id, &b.select_by_id),
            (&a.insert, &b.insert),
            (&a.update, &b.update),
            (&a.delete, &b.delete),
        ] {
            assert_eq!(left, right);
            let indexes = placeholders(left);
            assert_eq!(indexes, (1..=indexes.len()).collect::<Vec<_>>());
        }
        assert_eq!(placeholders(&a.insert).len(), a.metadata.insert_columns().count());
        assert_eq!(
            placeholders(&a.update).len(),
            a.metadata.settable_columns().count() + 1
        );
    }
}
