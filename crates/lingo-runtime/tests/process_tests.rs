#[cfg(all(test, unix))]
mod tests {
    use lingo_core::LingoError;
    use lingo_runtime::{
        CommandGenerator, CommandPlayer, GenerationRequest, Generator, LlmGenerator, Player,
    };
    use lingo_llm::MockProvider;
    use std::sync::Arc;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into(), "sh".into()]
    }

    fn request(vocabulary: Option<Vec<&str>>) -> GenerationRequest {
        GenerationRequest {
            language: "indonesian".into(),
            count: 3,
            vocabulary: vocabulary.map(|v| v.into_iter().map(String::from).collect()),
        }
    }

    // ── CommandGenerator ───────────────────────────────────────

    #[tokio::test]
    async fn test_command_generator_captures_stdout_verbatim() {
        let generator = CommandGenerator::new(&sh(r#"printf '{"n":1}\n{"n":2}\n'"#)).unwrap();
        let mut sink = Vec::new();
        generator.generate(&request(None), &mut sink).await.unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "{\"n\":1}\n{\"n\":2}\n");
    }

    #[tokio::test]
    async fn test_command_generator_receives_language_and_count() {
        let generator = CommandGenerator::new(&sh(r#"echo "$@""#)).unwrap();
        let mut sink = Vec::new();
        generator.generate(&request(None), &mut sink).await.unwrap();
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "--language indonesian --count 3\n"
        );
    }

    #[tokio::test]
    async fn test_command_generator_vocabulary_on_stdin() {
        let generator = CommandGenerator::new(&sh("cat")).unwrap();
        let mut sink = Vec::new();
        generator
            .generate(&request(Some(vec!["makan", "minum"])), &mut sink)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "makan\nminum\n");
    }

    #[tokio::test]
    async fn test_command_generator_without_vocabulary_gets_empty_stdin() {
        let generator = CommandGenerator::new(&sh("cat; echo done")).unwrap();
        let mut sink = Vec::new();
        generator.generate(&request(None), &mut sink).await.unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "done\n");
    }

    #[tokio::test]
    async fn test_command_generator_failure_forwards_status() {
        let generator = CommandGenerator::new(&sh("echo partial; exit 5")).unwrap();
        let mut sink = Vec::new();
        let err = generator.generate(&request(None), &mut sink).await.unwrap_err();
        assert!(matches!(err, LingoError::Generation { status: Some(5), .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_command_generator_missing_program() {
        let generator = CommandGenerator::new(&["/nonexistent/generator".into()]).unwrap();
        let mut sink = Vec::new();
        let err = generator.generate(&request(None), &mut sink).await.unwrap_err();
        assert!(matches!(err, LingoError::Generation { status: None, .. }));
    }

    // ── CommandPlayer ──────────────────────────────────────────

    #[tokio::test]
    async fn test_command_player_reads_fd3_and_forwards_status() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("stream.jsonl");
        let copy = dir.path().join("copy.jsonl");
        std::fs::write(&records, "{\"foreign\":\"a\",\"native\":\"b\"}\n").unwrap();

        let player = CommandPlayer::new(&sh(r#"cat <&3 > "$1"; exit 4"#)).unwrap();
        let status = player
            .play(&records, &[copy.display().to_string()])
            .await
            .unwrap();

        assert_eq!(status, 4);
        assert_eq!(
            std::fs::read_to_string(&copy).unwrap(),
            "{\"foreign\":\"a\",\"native\":\"b\"}\n"
        );
    }

    #[tokio::test]
    async fn test_command_player_exports_stream_path() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("stream.jsonl");
        std::fs::write(&records, "").unwrap();

        let player = CommandPlayer::new(&sh(r#"test "$LINGO_EXAMPLES_FILE" = "$1""#)).unwrap();
        let status = player
            .play(&records, &[records.display().to_string()])
            .await
            .unwrap();
        assert_eq!(status, 0);
    }

    #[tokio::test]
    async fn test_command_player_missing_stream() {
        let player = CommandPlayer::new(&sh("true")).unwrap();
        let err = player
            .play(std::path::Path::new("/nonexistent/stream.jsonl"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, LingoError::Io(_)));
    }

    // ── LlmGenerator ───────────────────────────────────────────

    #[tokio::test]
    async fn test_llm_generator_writes_one_record_per_example() {
        let mock = MockProvider::new("mock")
            .with_response("Saya lapar.\nI am hungry.")
            .with_response("Di mana pasar?\nWhere is the market?")
            .with_response("Terima kasih.\nThank you.");
        let requests = mock.recorded_requests();
        let generator = LlmGenerator::new(Arc::new(mock), "mock-model");

        let mut sink = Vec::new();
        generator
            .generate(&request(Some(vec!["pasar"])), &mut sink)
            .await
            .unwrap();

        let out = String::from_utf8(sink).unwrap();
        let records: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1]["foreign"], "Di mana pasar?");
        assert_eq!(records[1]["native"], "Where is the market?");
        assert_eq!(records[1]["words"], serde_json::json!(["pasar"]));
        assert_eq!(records[1]["id"].as_str().unwrap().len(), 32);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].messages[0].content.contains("teaching indonesian"));
        assert!(requests[0].messages[0].content.contains("knows: pasar."));
    }

    #[tokio::test]
    async fn test_llm_generator_rejects_reply_cut_at_token_limit() {
        let mock = MockProvider::new("mock")
            .with_response("Satu.\nOne.")
            .with_truncated("Dua ekor kucing.\nTwo c");
        let generator = LlmGenerator::new(Arc::new(mock), "mock-model").with_sampling(8, 0.7);

        let mut sink = Vec::new();
        let err = generator.generate(&request(None), &mut sink).await.unwrap_err();

        assert!(matches!(err, LingoError::Generation { status: None, ref reason }
            if reason.contains("example 2 of 3") && reason.contains("max_tokens (8)")));
        let written = String::from_utf8(sink).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(!written.contains("Two c"));
    }

    #[tokio::test]
    async fn test_llm_generator_provider_error_is_generation_failure() {
        let mock = MockProvider::new("mock")
            .with_response("Satu.\nOne.")
            .with_error("HTTP 500: upstream");
        let generator = LlmGenerator::new(Arc::new(mock), "mock-model");

        let mut sink = Vec::new();
        let err = generator.generate(&request(None), &mut sink).await.unwrap_err();
        assert!(matches!(err, LingoError::Generation { status: None, ref reason } if reason.contains("example 2 of 3")));
    }
}
