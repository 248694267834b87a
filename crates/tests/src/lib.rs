//! # Integration Tests
//!
//! End-to-end tests across crates.
//!
//! Covers:
//! - Config text -> ConfigLoader -> Dispatcher -> files on disk
//! - Remote delivery against an in-process HTTP stub (no network)

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContractError, EventLevel, ExportBlueprint, Record, RecordingObserver};
    use dispatcher::test_support::{client, StatusServer};
    use dispatcher::{Dispatcher, DispatcherConfig, DispatcherError, PersistOutcome, SkipReason};
    use tempfile::tempdir;

    fn listings() -> Vec<Record> {
        vec![
            [
                ("title", "Mechanical Keyboard"),
                ("image", "https://img.example/k1.jpg"),
                ("link", "/dp/B001"),
            ]
            .into_iter()
            .collect(),
            [
                ("title", "Clavier, \"AZERTY\""),
                ("image", "https://img.example/k2.jpg"),
                ("link", "/dp/B002"),
            ]
            .into_iter()
            .collect(),
        ]
    }

    fn blueprint_for(output: &str) -> ExportBlueprint {
        let text = format!(
            "[output]\n{output}\n\n[delivery]\nmax_attempts = 3\nretry_delay_secs = 0.01\ntimeout_secs = 5\n"
        );
        ConfigLoader::load_from_str(&text, ConfigFormat::Toml).unwrap()
    }

    fn dispatcher_for(blueprint: &ExportBlueprint, observer: Arc<RecordingObserver>) -> Dispatcher {
        Dispatcher::with_client(DispatcherConfig::from_blueprint(blueprint), client(), observer)
    }

    fn toml_path(path: &Path) -> String {
        format!("path = {:?}", path.display().to_string())
    }

    /// Config -> Dispatcher -> CSV file on disk
    #[tokio::test]
    async fn test_e2e_csv_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyboard.csv");
        let blueprint = blueprint_for(&toml_path(&path));
        let observer = Arc::new(RecordingObserver::new());
        let dispatcher = dispatcher_for(&blueprint, observer.clone());

        let outcome = dispatcher
            .persist(&listings(), blueprint.destination().as_ref())
            .await
            .unwrap();

        assert!(matches!(outcome, PersistOutcome::Written { rows: 2, .. }));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "title,image,link\r\n\
             Mechanical Keyboard,https://img.example/k1.jpg,/dp/B001\r\n\
             \"Clavier, \"\"AZERTY\"\"\",https://img.example/k2.jpg,/dp/B002\r\n"
        );
        assert!(observer.contains(EventLevel::Info, "Data saved as CSV"));
    }

    /// JSON output parses back into the same records
    #[tokio::test]
    async fn test_e2e_json_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Keyboard.JSON");
        let blueprint = blueprint_for(&toml_path(&path));
        let dispatcher = dispatcher_for(&blueprint, Arc::new(RecordingObserver::new()));

        dispatcher
            .persist(&listings(), blueprint.destination().as_ref())
            .await
            .unwrap();

        let back: Vec<Record> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, listings());
    }

    /// Two batches into the same SQLite file append to one table
    #[tokio::test]
    async fn test_e2e_sqlite_appends_across_calls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyboard.sqlite");
        let blueprint = blueprint_for(&format!(
            "{}\ntable_name = \"listings\"",
            toml_path(&path)
        ));
        let dispatcher = dispatcher_for(&blueprint, Arc::new(RecordingObserver::new()));
        let destination = blueprint.destination();

        for _ in 0..2 {
            dispatcher
                .persist(&listings(), destination.as_ref())
                .await
                .unwrap();
        }

        let conn = rusqlite::Connection::open(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM \"listings\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_e2e_xlsx_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyboard.xlsx");
        let blueprint = blueprint_for(&toml_path(&path));
        let dispatcher = dispatcher_for(&blueprint, Arc::new(RecordingObserver::new()));

        dispatcher
            .persist(&listings(), blueprint.destination().as_ref())
            .await
            .unwrap();

        use calamine::{open_workbook, Reader, Xlsx};
        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["title", "image", "link"]);
        assert_eq!(rows[2][0], "Clavier, \"AZERTY\"");
    }

    /// URL wins over path: the file is never created
    #[tokio::test]
    async fn test_e2e_remote_precedence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyboard.json");
        let endpoint = StatusServer::start(vec![503, 201]).await;
        let blueprint = blueprint_for(&format!(
            "{}\nurl = \"{}\"",
            toml_path(&path),
            endpoint.url()
        ));
        let observer = Arc::new(RecordingObserver::new());
        let dispatcher = dispatcher_for(&blueprint, observer.clone());

        let outcome = dispatcher
            .persist(&listings(), blueprint.destination().as_ref())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PersistOutcome::Delivered {
                url: endpoint.url(),
                attempts: 2,
                status: 201
            }
        );
        assert_eq!(endpoint.hits(), 2);
        assert!(!path.exists());
        assert_eq!(observer.count(EventLevel::Warn), 1);
    }

    /// A path that would be unsupported is irrelevant once a URL is set
    #[tokio::test]
    async fn test_e2e_remote_ignores_unsupported_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyboard.txt");
        let endpoint = StatusServer::start(vec![200]).await;
        let blueprint = blueprint_for(&format!(
            "{}\nurl = \"{}\"",
            toml_path(&path),
            endpoint.url()
        ));
        let dispatcher = dispatcher_for(&blueprint, Arc::new(RecordingObserver::new()));

        let outcome = dispatcher
            .persist(&listings(), blueprint.destination().as_ref())
            .await
            .unwrap();

        assert!(matches!(outcome, PersistOutcome::Delivered { attempts: 1, .. }));
        assert_eq!(endpoint.hits(), 1);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_e2e_remote_exhausted() {
        let endpoint = StatusServer::start(vec![500]).await;
        let blueprint = blueprint_for(&format!("url = \"{}\"", endpoint.url()));
        let observer = Arc::new(RecordingObserver::new());
        let dispatcher = dispatcher_for(&blueprint, observer.clone());

        let err = dispatcher
            .persist(&listings(), blueprint.destination().as_ref())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatcherError::Contract(ContractError::DeliveryFailed { attempts: 3, .. })
        ));
        assert_eq!(endpoint.hits(), 3);
        assert!(observer.contains(EventLevel::Error, "All 3 attempt(s)"));
    }

    #[tokio::test]
    async fn test_e2e_empty_batch_touches_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyboard.csv");
        let blueprint = blueprint_for(&toml_path(&path));
        let dispatcher = dispatcher_for(&blueprint, Arc::new(RecordingObserver::new()));

        let outcome = dispatcher
            .persist(&[], blueprint.destination().as_ref())
            .await
            .unwrap();

        assert_eq!(outcome, PersistOutcome::Skipped(SkipReason::EmptyInput));
        assert!(!path.exists());
    }

    #[test]
    fn test_unsupported_suffix_rejected_at_load() {
        let err = ConfigLoader::load_from_str(
            "[output]\npath = \"keyboard.txt\"\n",
            ConfigFormat::Toml,
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_tracing_observer_is_an_observer() {
        let observer: Arc<dyn contracts::Observer> =
            Arc::new(observability::TracingObserver::new());
        observer.warn("no subscriber installed");
    }
}
