//! Tests for database migrations

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::storage::database::Database;

    /// Helper to create a temporary database for testing
    fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db = Database::new(&db_path).expect("Failed to create database");
        (db, temp_dir)
    }

    #[test]
    fn test_database_creation() {
        let (db, _temp) = create_test_db();

        let version = db.get_schema_version();
        assert_eq!(version, 1, "Expected current schema version to be 1");
    }

    #[test]
    fn test_panel_state_table_exists() {
        let (db, _temp) = create_test_db();

        let conn = db.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='panel_state'")
            .expect("Failed to prepare query");

        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .expect("Failed to query tables")
            .filter_map(Result::ok)
            .collect();

        assert!(tables.contains(&"panel_state".to_string()));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        // Opening twice re-runs the migration path against an up-to-date file
        let db = Database::new(&db_path).expect("Failed to create database");
        drop(db);
        let db = Database::new(&db_path).expect("Failed to reopen database");

        assert_eq!(db.get_schema_version(), 1);
    }
}
