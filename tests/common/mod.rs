//! Shared test helpers: a scripted command runner and a log capture.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gke_ship::{CommandExecutionError, CommandOutput, CommandRunner, CommandSpec};

/// Records every command and fails the first one whose line starts with
/// a configured prefix. `-m venv <dir>` creates the directory so the
/// environment check behaves like the real tool.
#[derive(Default)]
pub struct ScriptedRunner {
    failures: Vec<(String, i32, String)>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail commands starting with `prefix` with the given exit code and stderr
    pub fn fail_on(mut self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.failures
            .push((prefix.to_string(), code, stderr.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::command_line).collect()
    }

    /// True if any recorded command line starts with `prefix`
    pub fn invoked(&self, prefix: &str) -> bool {
        self.lines().iter().any(|l| l.starts_with(prefix))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandExecutionError> {
        self.calls.lock().unwrap().push(command.clone());
        let line = command.command_line();

        if let Some((_, code, stderr)) = self
            .failures
            .iter()
            .find(|(prefix, _, _)| line.starts_with(prefix.as_str()))
        {
            return Err(CommandExecutionError::NonZeroExit {
                command: line,
                code: Some(*code),
                stderr: stderr.clone(),
            });
        }

        if command.args.len() == 3 && command.args[0] == "-m" && command.args[1] == "venv" {
            let cwd = command.cwd.clone().unwrap_or_default();
            std::fs::create_dir_all(cwd.join(&command.args[2])).unwrap();
        }

        Ok(CommandOutput::success(format!("ok: {}", line)))
    }
}

/// In-memory log sink for a scoped tracing subscriber
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Run `f` with a debug-level subscriber writing into this capture
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
