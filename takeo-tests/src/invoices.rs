use rust_decimal::Decimal;
use std::str::FromStr;
use takeo::{Conditions, Connection, Entity, ErrorKind, Manager, Value, record};
use time::{Date, macros::date};
use uuid::Uuid;

#[derive(Entity, Debug, Clone, PartialEq)]
#[entity_name("Invoice")]
#[table_name("takeo_invoices")]
struct Invoice {
    #[primary_key]
    code: Uuid,
    customer: String,
    #[column_name("AmountDue")]
    amount: Decimal,
    issued: Date,
    paid: bool,
    note: Option<String>,
    attachment: Option<Vec<u8>>,
}

pub async fn invoices<C: Connection>(manager: &Manager<C>) {
    manager
        .register::<Invoice>()
        .expect("Could not register Invoice");
    manager
        .drop_table(Invoice::entity_name())
        .await
        .expect("Failed to drop the Invoice table");
    manager
        .create_table(Invoice::entity_name())
        .await
        .expect("Failed to create the Invoice table");

    let first = Invoice {
        code: Uuid::new_v4(),
        customer: "ACME".into(),
        amount: Decimal::from_str("1250.75").unwrap(),
        issued: date!(2024 - 02 - 29),
        paid: false,
        note: None,
        attachment: Some(vec![0x25, 0x50, 0x44, 0x46]),
    };
    let second = Invoice {
        code: Uuid::new_v4(),
        customer: "ACME".into(),
        amount: Decimal::from_str("99.90").unwrap(),
        issued: date!(2024 - 03 - 01),
        paid: true,
        note: Some("wire transfer".into()),
        attachment: None,
    };
    let key = manager
        .create("Invoice", &first)
        .await
        .expect("Failed to create the first invoice");
    assert_eq!(key, Value::Uuid(Some(first.code)));
    let keys = manager
        .create_batch("Invoice", std::slice::from_ref(&second))
        .await
        .expect("Failed to create the second invoice");
    assert_eq!(keys, [Value::Uuid(Some(second.code))]);

    let found: Invoice = manager
        .find_by_id("Invoice", first.code)
        .await
        .expect("Failed to find the first invoice");
    assert_eq!(found, first);

    manager
        .update(
            "Invoice",
            first.code,
            &record! { "paid" => true, "note" => "settled", "code" => Uuid::nil() },
        )
        .await
        .expect("Failed to settle the first invoice");
    let found: Invoice = manager
        .find_by_id("Invoice", first.code)
        .await
        .expect("Failed to find the settled invoice");
    assert!(found.paid);
    assert_eq!(found.note.as_deref(), Some("settled"));
    assert_eq!(found.amount, first.amount);

    let unpaid: Vec<Invoice> = manager
        .find_where("Invoice", &Conditions::new().with("paid", false))
        .await
        .expect("Failed to find unpaid invoices");
    assert!(unpaid.is_empty());
    let acme: Vec<Invoice> = manager
        .find_where("Invoice", &Conditions::new().with("customer", "ACME"))
        .await
        .expect("Failed to find ACME invoices");
    assert_eq!(acme.len(), 2);

    let error = manager
        .find_by_id::<Invoice>("Invoice", Uuid::nil())
        .await
        .expect_err("The nil invoice does not exist");
    assert_eq!(ErrorKind::of(&error), ErrorKind::NotFound);

    manager
        .delete_batch("Invoice", [first.code, second.code])
        .await
        .expect("Failed to delete the invoices");
    let all: Vec<Invoice> = manager.find_all("Invoice").await.expect("Failed to find all");
    assert!(all.is_empty());

    manager
        .drop_table("Invoice")
        .await
        .expect("Failed to drop the Invoice table");
}
