use async_trait::async_trait;
use std::io::Write;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

use lingo_core::{ExampleRecord, LingoError, Result};
use lingo_llm::{LlmProvider, LlmRequest, StopReason};

/// Built-in prompt. Placeholders: {language}, {words_prefix}, {words}, {words_suffix}.
pub const DEFAULT_PROMPT: &str = "You are a foreign language tutor teaching {language}. \
Pick a common day to day situation.{words_prefix}{words}{words_suffix} \
Write one short line in {language} on its own, with no text before or after it. \
Then write its English translation on the next line. Output nothing else.";

const WORDS_PREFIX: &str = " Prefer using these words the student knows: ";
const WORDS_SUFFIX: &str = ".";

/// What to generate in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub language: String,
    /// Number of examples requested.
    pub count: usize,
    /// Vocabulary sample; `None` leaves content unconstrained.
    pub vocabulary: Option<Vec<String>>,
}

/// Produces example records as JSON Lines.
#[async_trait]
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;

    /// Write the generated records to `sink`. Anything already written is
    /// discarded by the caller when this returns an error.
    async fn generate(&self, request: &GenerationRequest, sink: &mut (dyn Write + Send))
    -> Result<()>;
}

// ── External command ───────────────────────────────────────────

/// Runs an external generator: `<command...> --language <lang> --count <n>`,
/// vocabulary newline-delimited on stdin, JSON Lines on stdout.
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| LingoError::Config("generator command is empty".into()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Generator for CommandGenerator {
    fn name(&self) -> &str {
        &self.program
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        sink: &mut (dyn Write + Send),
    ) -> Result<()> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--language")
            .arg(&request.language)
            .arg("--count")
            .arg(request.count.to_string())
            .stdin(if request.vocabulary.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        debug!(program = %self.program, language = %request.language, count = request.count, "spawning generator");
        let mut child = cmd.spawn().map_err(|e| LingoError::Generation {
            reason: format!("cannot start {}: {}", self.program, e),
            status: None,
        })?;

        let feeder = match (&request.vocabulary, child.stdin.take()) {
            (Some(words), Some(mut stdin)) => {
                let mut input = words.join("\n");
                input.push('\n');
                Some(tokio::spawn(async move {
                    // Dropping stdin afterwards signals end of vocabulary.
                    stdin.write_all(input.as_bytes()).await
                }))
            }
            _ => None,
        };

        let mut stdout = child.stdout.take().ok_or_else(|| LingoError::Generation {
            reason: "generator stdout was not captured".into(),
            status: None,
        })?;
        let mut buf = vec![0u8; 8192];
        let mut total = 0usize;
        loop {
            let n = stdout.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            sink.write_all(&buf[..n])?;
            total += n;
        }

        let status = child.wait().await?;
        if let Some(feeder) = feeder {
            // A generator may exit without reading all of stdin.
            if let Ok(Err(e)) = feeder.await {
                warn!(error = %e, "generator did not consume the vocabulary");
            }
        }

        if !status.success() {
            return Err(LingoError::Generation {
                reason: format!("{} exited with {}", self.program, status),
                status: status.code(),
            });
        }

        sink.flush()?;
        debug!(bytes = total, "generator finished");
        Ok(())
    }
}

// ── Built-in LLM generator ─────────────────────────────────────

/// Asks an LLM for one example per completion and writes [`ExampleRecord`]s.
pub struct LlmGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    prompt: String,
    system: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            prompt: DEFAULT_PROMPT.to_string(),
            system: None,
            max_tokens: 256,
            temperature: 0.7,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_system(mut self, system: Option<String>) -> Self {
        self.system = system;
        self
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Generate a single example.
    pub async fn example(&self, language: &str, words: &[String]) -> Result<ExampleRecord> {
        let mut request = LlmRequest::oneshot(&self.model, render_prompt(&self.prompt, language, words));
        request.system = self.system.clone();
        request.max_tokens = self.max_tokens;
        request.temperature = self.temperature;

        let response = self.provider.complete(&request).await?;
        if response.stop_reason == StopReason::MaxTokens {
            return Err(LingoError::MalformedExample(format!(
                "reply cut off at max_tokens ({}): {:?}",
                self.max_tokens, response.text
            )));
        }
        parse_example(&response.text, words.to_vec())
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        sink: &mut (dyn Write + Send),
    ) -> Result<()> {
        let words = request.vocabulary.clone().unwrap_or_default();
        for n in 1..=request.count {
            let record = self
                .example(&request.language, &words)
                .await
                .map_err(|e| LingoError::Generation {
                    reason: format!("example {n} of {}: {e}", request.count),
                    status: None,
                })?;
            writeln!(sink, "{}", record.to_line()?)?;
            sink.flush()?;
            info!(n, total = request.count, foreign = %record.foreign, "generated example");
        }
        Ok(())
    }
}

/// Fill the prompt template. The words part disappears without vocabulary.
pub fn render_prompt(template: &str, language: &str, words: &[String]) -> String {
    let (prefix, joined, suffix) = if words.is_empty() {
        ("", String::new(), "")
    } else {
        (WORDS_PREFIX, words.join(" "), WORDS_SUFFIX)
    };
    template
        .replace("{language}", language)
        .replace("{words_prefix}", prefix)
        .replace("{words_suffix}", suffix)
        .replace("{words}", &joined)
}

/// First non-blank line is the foreign sentence, the second its translation.
pub fn parse_example(text: &str, words: Vec<String>) -> Result<ExampleRecord> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    match (lines.next(), lines.next()) {
        (Some(foreign), Some(native)) => Ok(ExampleRecord::new(foreign, native, words)),
        _ => Err(LingoError::MalformedExample(format!(
            "expected a sentence and its translation on two lines, got: {text:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt_without_words() {
        let prompt = render_prompt(DEFAULT_PROMPT, "spanish", &[]);
        assert!(prompt.contains("teaching spanish."));
        assert!(prompt.contains("situation. Write"));
        assert!(!prompt.contains('{'));
        assert!(!prompt.contains("Prefer using"));
    }

    #[test]
    fn test_render_prompt_with_words() {
        let words = vec!["casa".to_string(), "perro".to_string()];
        let prompt = render_prompt(DEFAULT_PROMPT, "spanish", &words);
        assert!(prompt.contains(
            "situation. Prefer using these words the student knows: casa perro. Write"
        ));
    }

    #[test]
    fn test_render_custom_template() {
        let words = vec!["air".to_string()];
        let prompt = render_prompt("[{language}|{words_prefix}|{words}|{words_suffix}]", "indonesian", &words);
        assert_eq!(
            prompt,
            "[indonesian| Prefer using these words the student knows: |air|.]"
        );
    }

    #[test]
    fn test_parse_example() {
        let record = parse_example("  ¿Dónde está la estación?\nWhere is the station?\n", vec![]).unwrap();
        assert_eq!(record.foreign, "¿Dónde está la estación?");
        assert_eq!(record.native, "Where is the station?");
        assert!(record.id.is_some());
    }

    #[test]
    fn test_parse_example_skips_blank_lines() {
        let record = parse_example("\nSaya mau kopi.\n\nI want coffee.", vec!["kopi".into()]).unwrap();
        assert_eq!(record.foreign, "Saya mau kopi.");
        assert_eq!(record.native, "I want coffee.");
        assert_eq!(record.words, vec!["kopi"]);
    }

    #[test]
    fn test_parse_example_single_line_fails() {
        assert!(matches!(
            parse_example("Only one line", vec![]),
            Err(LingoError::MalformedExample(_))
        ));
    }

    #[test]
    fn test_command_generator_needs_program() {
        assert!(CommandGenerator::new(&[]).is_err());
        let generator = CommandGenerator::new(&["gen".into(), "--fast".into()]).unwrap();
        assert_eq!(generator.name(), "gen");
    }
}
