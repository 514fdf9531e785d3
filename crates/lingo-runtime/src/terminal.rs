//! Built-in terminal player: keyboard-driven listening practice with
//! text-to-speech.
//!
//! Controls: `space` play/pause, `r` restart speech, `enter` reveal the
//! sentence and then its translation, `n` next example, `q` quit.

use async_trait::async_trait;
use console::{Term, style};
use std::path::Path;
use std::process::{Child, Command};
use tracing::{debug, warn};

use lingo_core::{ExampleRecord, LingoError, Result};

use crate::player::Player;

/// A key press, as far as the session cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    PlayPause,
    Restart,
    Reveal,
    Next,
    Quit,
    Other,
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        match c {
            ' ' => Key::PlayPause,
            'r' => Key::Restart,
            '\n' | '\r' => Key::Reveal,
            'n' => Key::Next,
            'q' => Key::Quit,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Stopped,
    Playing,
    Paused,
}

/// What the terminal loop has to do in response to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    StartSpeech,
    PauseSpeech,
    ResumeSpeech,
    RestartSpeech,
    Show(String),
    /// Moved to the next example; print its header.
    Advance,
    Quit,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Revealed {
    Nothing,
    Foreign,
    Both,
}

/// Key handling for a listening session, free of any terminal or process I/O.
#[derive(Debug)]
pub struct ListeningSession {
    records: Vec<ExampleRecord>,
    position: usize,
    revealed: Revealed,
}

impl ListeningSession {
    pub fn new(records: Vec<ExampleRecord>) -> Self {
        Self {
            records,
            position: 0,
            revealed: Revealed::Nothing,
        }
    }

    pub fn current(&self) -> Option<&ExampleRecord> {
        self.records.get(self.position)
    }

    /// Id of the current example, falling back to its 1-based position.
    pub fn current_id(&self) -> Option<String> {
        self.current().map(|r| r.display_id(self.position + 1))
    }

    pub fn handle(&mut self, key: Key, speech: SpeechState) -> Action {
        let Some(current) = self.records.get(self.position) else {
            return Action::Quit;
        };
        match key {
            Key::PlayPause => match speech {
                SpeechState::Playing => Action::PauseSpeech,
                SpeechState::Paused => Action::ResumeSpeech,
                SpeechState::Stopped => Action::StartSpeech,
            },
            Key::Restart => Action::RestartSpeech,
            Key::Reveal => match self.revealed {
                Revealed::Nothing => {
                    self.revealed = Revealed::Foreign;
                    Action::Show(current.foreign.clone())
                }
                Revealed::Foreign => {
                    self.revealed = Revealed::Both;
                    Action::Show(current.native.clone())
                }
                Revealed::Both => Action::Ignore,
            },
            Key::Next => {
                self.position += 1;
                self.revealed = Revealed::Nothing;
                if self.position < self.records.len() {
                    Action::Advance
                } else {
                    Action::Quit
                }
            }
            Key::Quit => Action::Quit,
            Key::Other => Action::Ignore,
        }
    }
}

/// Parse a JSON Lines stream, skipping blank and malformed lines.
pub fn parse_records(content: &str) -> Vec<ExampleRecord> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match ExampleRecord::from_line(line) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "skipping malformed example");
                None
            }
        })
        .collect()
}

// ── Speech process ─────────────────────────────────────────────

struct Speech {
    command: Vec<String>,
    child: Option<Child>,
    paused: bool,
}

impl Speech {
    fn new(command: Vec<String>) -> Self {
        Self {
            command,
            child: None,
            paused: false,
        }
    }

    fn state(&mut self) -> SpeechState {
        match self.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(None)) if self.paused => SpeechState::Paused,
            Some(Ok(None)) => SpeechState::Playing,
            _ => SpeechState::Stopped,
        }
    }

    fn start(&mut self, sentence: &str, id: &str, extra_args: &[String]) -> Result<()> {
        self.stop();
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| LingoError::Playback("speech command is empty".into()))?;
        let child = Command::new(program)
            .args(args)
            .args(extra_args)
            .arg(sentence)
            .env("EXAMPLE_ID", id)
            .spawn()
            .map_err(|e| LingoError::Playback(format!("cannot start {program}: {e}")))?;
        debug!(pid = child.id(), "speech started");
        self.child = Some(child);
        self.paused = false;
        Ok(())
    }

    fn signal(&mut self, signal: libc::c_int) {
        if let Some(child) = &self.child {
            // SAFETY: kill(2) on a pid we spawned and have not reaped yet.
            unsafe {
                libc::kill(child.id() as libc::pid_t, signal);
            }
        }
    }

    fn pause(&mut self) {
        self.signal(libc::SIGSTOP);
        self.paused = true;
    }

    fn resume(&mut self) {
        self.signal(libc::SIGCONT);
        self.paused = false;
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.paused = false;
    }
}

impl Drop for Speech {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Player ─────────────────────────────────────────────────────

/// Interactive player on the controlling terminal.
pub struct TerminalPlayer {
    speech_command: Vec<String>,
}

impl TerminalPlayer {
    pub fn new(speech_command: Vec<String>) -> Self {
        Self { speech_command }
    }
}

#[async_trait]
impl Player for TerminalPlayer {
    fn name(&self) -> &str {
        "terminal"
    }

    async fn play(&self, records: &Path, args: &[String]) -> Result<i32> {
        let content = tokio::fs::read_to_string(records).await?;
        let records = parse_records(&content);
        let speech = Speech::new(self.speech_command.clone());
        let extra_args = args.to_vec();

        tokio::task::spawn_blocking(move || run_session(ListeningSession::new(records), speech, &extra_args))
            .await
            .map_err(|e| LingoError::Playback(e.to_string()))?
    }
}

fn print_header(term: &Term, id: &str) -> Result<()> {
    term.write_line(&format!("Example {id}"))?;
    term.write_line(
        &style("Controls: space=play/pause, r=restart speech, enter=print example")
            .dim()
            .to_string(),
    )?;
    term.write_line(&style("          n=next example, q=quit").dim().to_string())?;
    Ok(())
}

fn run_session(mut session: ListeningSession, mut speech: Speech, extra_args: &[String]) -> Result<i32> {
    let term = Term::stdout();
    let Some(first_id) = session.current_id() else {
        term.write_line("No examples to play.")?;
        return Ok(0);
    };
    print_header(&term, &first_id)?;

    loop {
        let key = Key::from(term.read_char()?);
        let state = speech.state();
        let action = session.handle(key, state);

        let (sentence, id) = match (session.current(), session.current_id()) {
            (Some(record), Some(id)) => (record.foreign.clone(), id),
            _ => (String::new(), String::new()),
        };

        match action {
            Action::StartSpeech | Action::RestartSpeech => speech.start(&sentence, &id, extra_args)?,
            Action::PauseSpeech => speech.pause(),
            Action::ResumeSpeech => speech.resume(),
            Action::Show(text) => term.write_line(&text)?,
            Action::Advance => {
                speech.stop();
                print_header(&term, &id)?;
            }
            Action::Quit => break,
            Action::Ignore => {}
        }
    }

    speech.stop();
    Ok(0)
}
