#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::{str::FromStr, sync::Arc};
    use takeo::{
        ColumnDef, Entity, ErrorKind, FromRow, GenericSqlWriter, Record, RecordKind, Statements,
        Value, record_to_params, ParamLayout,
    };
    use time::macros::date;
    use uuid::Uuid;

    #[derive(Entity, Debug, Clone, PartialEq)]
    #[table_name("users")]
    struct User {
        #[primary_key]
        #[auto_increment]
        id: Option<i32>,
        name: String,
        #[column_type("TEXT UNIQUE")]
        email: Option<String>,
        #[default_value(18)]
        age: Option<i32>,
    }

    #[derive(Entity, Debug, Clone, PartialEq)]
    #[entity_name("Invoice")]
    struct CustomerInvoice {
        #[primary_key]
        code: Uuid,
        #[column_name("AmountDue")]
        amount: Decimal,
        issued: time::Date,
        _paid: bool,
        attachment: Option<Vec<u8>>,
    }

    #[test]
    fn names() {
        assert_eq!(User::entity_name(), "User");
        assert_eq!(CustomerInvoice::entity_name(), "Invoice");
        assert_eq!(
            CustomerInvoice::entity_metadata().unwrap().table_name(),
            "customer_invoice"
        );
    }

    #[test]
    fn metadata() {
        let metadata = User::entity_metadata().unwrap();
        assert_eq!(metadata.table_name(), "users");
        assert_eq!(metadata.primary_key(), "id");
        assert_eq!(metadata.column_order(), ["id", "name", "email", "age"]);
        assert_eq!(
            *metadata.primary_key_column(),
            ColumnDef::new("id", "SERIAL PRIMARY KEY")
                .primary_key()
                .auto_increment()
        );
        assert_eq!(
            *metadata.column("name").unwrap(),
            ColumnDef::new("name", "TEXT NOT NULL")
        );
        assert_eq!(
            *metadata.column("email").unwrap(),
            ColumnDef::new("email", "TEXT UNIQUE").nullable()
        );
        assert_eq!(
            metadata.column("age").unwrap().default,
            Some(Value::Int32(Some(18)))
        );

        let invoice = CustomerInvoice::entity_metadata().unwrap();
        assert_eq!(
            invoice.column_order(),
            ["code", "AmountDue", "issued", "paid", "attachment"]
        );
        let statements = Statements::new(&GenericSqlWriter::new(), Arc::new(invoice));
        assert_eq!(
            statements.create_table,
            "CREATE TABLE IF NOT EXISTS customer_invoice (code UUID PRIMARY KEY, AmountDue NUMERIC NOT NULL, issued DATE NOT NULL, paid BOOLEAN NOT NULL, attachment BYTEA)"
        );
        assert_eq!(
            statements.insert,
            "INSERT INTO customer_invoice (code, AmountDue, issued, paid, attachment) VALUES ($1, $2, $3, $4, $5) RETURNING code"
        );
    }

    #[test]
    fn record() {
        let user = User {
            id: None,
            name: "Bob".into(),
            email: Some("bob@x.io".into()),
            age: None,
        };
        assert_eq!(user.kind(), RecordKind::Structured);
        let metadata = User::entity_metadata().unwrap();
        let params = record_to_params("User", &user, &metadata, ParamLayout::Insert).unwrap();
        assert_eq!(
            params,
            [
                Value::Varchar(Some("Bob".into())),
                Value::Varchar(Some("bob@x.io".into())),
                Value::Int32(None),
            ]
        );

        // Field derived names match case insensitively, renamed ones exactly
        assert_eq!(
            user.value_of(&ColumnDef::new("NAME", "TEXT")),
            Some(Value::Varchar(Some("Bob".into())))
        );
        let invoice = CustomerInvoice {
            code: Uuid::nil(),
            amount: Decimal::from_str("12.50").unwrap(),
            issued: date!(2024 - 02 - 29),
            _paid: false,
            attachment: None,
        };
        assert!(invoice.value_of(&ColumnDef::new("amountdue", "NUMERIC")).is_none());
        assert_eq!(
            invoice.value_of(&ColumnDef::new("AmountDue", "NUMERIC")),
            Some(Value::Decimal(Some(Decimal::from_str("12.50").unwrap())))
        );
        assert_eq!(
            invoice.value_of(&ColumnDef::new("paid", "BOOLEAN")),
            Some(Value::Boolean(Some(false)))
        );
    }

    #[test]
    fn from_row() {
        let user = User::from_columns(
            "User",
            vec![
                ("id".into(), Value::Int32(Some(4))),
                ("name".into(), Value::Varchar(Some("Ann".into()))),
                ("email".into(), Value::Varchar(None)),
                ("age".into(), Value::Int16(Some(27))),
                ("extra".into(), Value::Boolean(Some(true))),
            ],
        )
        .unwrap();
        assert_eq!(
            user,
            User {
                id: Some(4),
                name: "Ann".into(),
                email: None,
                age: Some(27),
            }
        );

        let error = User::from_columns(
            "User",
            vec![
                ("id".into(), Value::Int32(Some(4))),
                ("name".into(), Value::Varchar(Some("Ann".into()))),
                ("email".into(), Value::Varchar(None)),
            ],
        )
        .unwrap_err();
        assert_eq!(ErrorKind::of(&error), ErrorKind::Mapping);

        let error = User::from_columns(
            "User",
            vec![
                ("id".into(), Value::Int32(Some(4))),
                ("name".into(), Value::Int32(Some(1))),
                ("email".into(), Value::Varchar(None)),
                ("age".into(), Value::Int32(None)),
            ],
        )
        .unwrap_err();
        assert_eq!(ErrorKind::of(&error), ErrorKind::Mapping);
    }
}
