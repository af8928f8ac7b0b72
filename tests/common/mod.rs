use quizbank::database::store::Store;
use tempfile::TempDir;

/// A store backed by a database file in a temp directory. Keep the directory
/// alive for as long as the store is used.
pub async fn open_store() -> (TempDir, Store) {
    let dir = TempDir::new().expect("temp dir");
    let store = Store::open(dir.path().join("quiz.db"))
        .await
        .expect("open store");
    (dir, store)
}
