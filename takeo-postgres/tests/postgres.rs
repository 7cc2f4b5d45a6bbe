mod init;

#[cfg(test)]
mod tests {
    use super::init::init;
    use std::sync::Arc;
    use takeo_core::{
        ConnectionConfig, DynamicRecord, ErrorKind, Manager, SqlWriter, Value, record,
        future::join_all,
    };
    use takeo_postgres::{PostgresConnection, PostgresManager, PostgresSqlWriter};
    use takeo_tests::{execute_tests, init_logs, silent_logs};
    use tokio::sync::Mutex;

    static MUTEX: Mutex<()> = Mutex::const_new(());

    #[tokio::test]
    async fn postgres() {
        init_logs();
        let _guard = MUTEX.lock().await;
        let Some((url, container)) = init().await else {
            return;
        };
        let connection = PostgresConnection::connect_url(&url)
            .await
            .unwrap_or_else(|e| panic!("Could not connect to `{url}`: {e:#}"));
        execute_tests(connection).await;
        drop(container);
    }

    #[tokio::test]
    async fn concurrent_callers() {
        init_logs();
        let _guard = MUTEX.lock().await;
        let Some((url, _container)) = init().await else {
            return;
        };
        let manager: Arc<PostgresManager> = Arc::new(Manager::new(
            PostgresConnection::connect_url(&url)
                .await
                .expect("Could not connect"),
        ));
        manager
            .register_entity(
                "Counter",
                "takeo_counters",
                [("id", "SERIAL PRIMARY KEY"), ("label", "TEXT NOT NULL")],
                "id",
                ["id"],
            )
            .unwrap();
        manager.drop_table("Counter").await.unwrap();
        manager.create_table("Counter").await.unwrap();
        let results = join_all((0..16).map(|i| {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .create("Counter", &record! { "label" => format!("counter {i}") })
                    .await
            })
        }))
        .await;
        for result in results {
            assert!(matches!(
                result.expect("The task panicked").expect("Failed to create"),
                Value::Int32(Some(..))
            ));
        }
        let all: Vec<DynamicRecord> = manager.find_all("Counter").await.unwrap();
        assert_eq!(all.len(), 16);
        assert_eq!(manager.prepared_cache().len().await, 2);
        manager.drop_table("Counter").await.unwrap();
    }

    #[tokio::test]
    async fn opaque_columns() {
        init_logs();
        let _guard = MUTEX.lock().await;
        let Some((url, _container)) = init().await else {
            return;
        };
        let manager = Manager::new(
            PostgresConnection::connect_url(&url)
                .await
                .expect("Could not connect"),
        );
        manager
            .register_entity(
                "Document",
                "takeo_documents",
                [("id", "SERIAL PRIMARY KEY"), ("payload", "JSONB")],
                "id",
                ["id"],
            )
            .unwrap();
        manager.drop_table("Document").await.unwrap();
        manager.create_table("Document").await.unwrap();
        // Binary JSONB: version byte then the text
        let payload: Vec<u8> = b"\x01{\"a\": 1}".to_vec();
        let id = manager
            .create("Document", &record! { "payload" => payload.clone() })
            .await
            .unwrap();
        let document: DynamicRecord = manager.find_by_id("Document", id).await.unwrap();
        assert_eq!(
            document.get("payload"),
            Some(&Value::Blob(Some(payload.into())))
        );
        manager.drop_table("Document").await.unwrap();
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(PostgresConnection::connect_url("mysql://some_url").await.is_err());
        }
    }

    #[tokio::test]
    async fn unreachable() {
        let mut config = ConnectionConfig::new(
            "127.0.0.1",
            1,
            "nobody",
            "",
            "nothing",
            Default::default(),
        );
        config.connect_timeout = Some(std::time::Duration::from_secs(2));
        silent_logs! {
            let error = match <PostgresConnection as takeo_core::Connection>::connect(&config).await {
                Ok(..) => panic!("Nothing listens on port 1"),
                Err(e) => e,
            };
            assert_eq!(ErrorKind::of(&error), ErrorKind::Store);
        }
    }

    #[test]
    fn quoted_identifiers() {
        let writer = PostgresSqlWriter::new();
        let mut out = String::new();
        writer.write_identifier(&mut out, "amount_due");
        out.push(' ');
        writer.write_identifier(&mut out, "AmountDue");
        out.push(' ');
        writer.write_identifier(&mut out, "weird\"name");
        assert_eq!(out, "amount_due \"AmountDue\" \"weird\"\"name\"");
    }
}
