#[cfg(test)]
mod tests {
    use lingo_store::{ExampleStore, batch_file_name};
    use std::io::Write;
    use std::path::Path;

    fn record(n: usize) -> String {
        format!(r#"{{"foreign":"kalimat {n}","native":"sentence {n}"}}"#)
    }

    fn write_batch(dir: &Path, index: u64, records: &[String]) {
        let mut content = records.join("\n");
        content.push('\n');
        std::fs::write(dir.join(batch_file_name(index)), content).unwrap();
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    // ── Directory handling ─────────────────────────────────────

    #[test]
    fn test_open_creates_nested_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("spanish").join("travel");
        let store = ExampleStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn test_open_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("examples");
        ExampleStore::open(&dir).unwrap();
        ExampleStore::open(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_open_fails_on_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            ExampleStore::open(&file),
            Err(lingo_core::LingoError::Store(_))
        ));
    }

    // ── Listing and numbering ──────────────────────────────────

    #[test]
    fn test_batches_sorted_numerically_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(dir.path(), 10, &[record(10)]);
        write_batch(dir.path(), 2, &[record(2)]);
        write_batch(dir.path(), 1, &[record(1)]);
        std::fs::write(dir.path().join("vocab.txt"), "casa\n").unwrap();
        std::fs::write(dir.path().join(".example-4-abc.tmp"), "partial").unwrap();
        std::fs::create_dir(dir.path().join("example-5.jsonl")).unwrap();

        let store = ExampleStore::open(dir.path()).unwrap();
        let indices: Vec<u64> = store.batches().unwrap().iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 2, 10]);
    }

    #[test]
    fn test_next_index_is_count_plus_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = ExampleStore::open(dir.path()).unwrap();
        assert_eq!(store.next_index().unwrap(), 1);
        write_batch(dir.path(), 1, &[record(1)]);
        write_batch(dir.path(), 2, &[record(2)]);
        assert_eq!(store.next_index().unwrap(), 3);
    }

    #[test]
    fn test_next_index_skips_taken_name_after_deletion() {
        let dir = tempfile::tempdir().unwrap();
        // example-2 was deleted by hand: count + 1 == 3 is already taken.
        write_batch(dir.path(), 1, &[record(1)]);
        write_batch(dir.path(), 3, &[record(3)]);
        let store = ExampleStore::open(dir.path()).unwrap();
        assert_eq!(store.next_index().unwrap(), 4);
    }

    // ── Atomic writes ──────────────────────────────────────────

    #[test]
    fn test_commit_creates_exactly_one_batch_with_written_bytes() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(dir.path(), 1, &[record(1)]);
        let store = ExampleStore::open(dir.path()).unwrap();

        let payload = format!("{}\n{}\n", record(7), record(8));
        let mut pending = store.begin_batch().unwrap();
        assert_eq!(pending.index(), 2);
        pending.file().write_all(payload.as_bytes()).unwrap();
        let batch = store.commit(pending).unwrap();

        assert_eq!(batch.index, 2);
        assert_eq!(batch.path, dir.path().join("example-2.jsonl"));
        assert_eq!(std::fs::read_to_string(&batch.path).unwrap(), payload);
        assert_eq!(listing(dir.path()), vec!["example-1.jsonl", "example-2.jsonl"]);
    }

    #[test]
    fn test_abandoned_batch_leaves_listing_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(dir.path(), 1, &[record(1)]);
        let before = listing(dir.path());

        let store = ExampleStore::open(dir.path()).unwrap();
        let mut pending = store.begin_batch().unwrap();
        pending.file().write_all(record(2).as_bytes()).unwrap();
        drop(pending);

        assert_eq!(listing(dir.path()), before);
    }

    #[test]
    fn test_commit_never_overwrites_existing_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = ExampleStore::open(dir.path()).unwrap();
        let pending = store.begin_batch().unwrap();
        // Someone else claims the same name while we generate.
        write_batch(dir.path(), 1, &[record(99)]);

        let err = store.commit(pending).unwrap_err();
        assert!(matches!(err, lingo_core::LingoError::Store(_)));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("example-1.jsonl")).unwrap(),
            format!("{}\n", record(99))
        );
        assert_eq!(listing(dir.path()), vec!["example-1.jsonl"]);
    }

    // ── Reading ────────────────────────────────────────────────

    #[test]
    fn test_records_concatenate_batches_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(dir.path(), 2, &[record(3)]);
        write_batch(dir.path(), 1, &[record(1), record(2)]);
        std::fs::write(dir.path().join("example-3.jsonl"), format!("\n{}\r\n\n", record(4))).unwrap();

        let store = ExampleStore::open(dir.path()).unwrap();
        assert_eq!(
            store.records().unwrap(),
            vec![record(1), record(2), record(3), record(4)]
        );
    }

    #[test]
    fn test_shuffled_records_is_permutation_of_all_batches() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(dir.path(), 1, &[record(1), record(2), record(3)]);
        write_batch(dir.path(), 2, &[record(4), record(5)]);

        let store = ExampleStore::open(dir.path()).unwrap();
        let mut shuffled = store.shuffled_records().unwrap();
        let mut expected = store.records().unwrap();
        assert_eq!(shuffled.len(), 5);
        shuffled.sort();
        expected.sort();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn test_shuffled_records_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ExampleStore::open(dir.path()).unwrap();
        assert!(store.shuffled_records().unwrap().is_empty());
        assert!(listing(dir.path()).is_empty());
    }
}
