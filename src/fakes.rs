//! In-memory stand-ins for the system stores, used by the unit tests.

use crate::platform::macos::{ScriptError, ScriptRunner};
use crate::process::{CommandError, CommandOutput, CommandRunner};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

const REG_NOT_FOUND: &str =
    "ERROR: The system was unable to find the specified registry key or value.\r\n";

#[derive(Default)]
struct RunnerState {
    values: HashMap<(String, String), String>,
    calls: Vec<(String, Vec<String>)>,
    unavailable: bool,
    stderr: Option<String>,
    stdout: Option<String>,
    exit_code: Option<i32>,
}

/// Command runner for tests. `reg` behaves like `reg.exe` for
/// QUERY/ADD/DELETE against an in-memory key; any other program just
/// succeeds with the configured stdout.
#[derive(Default)]
pub struct FakeCommandRunner {
    state: Mutex<RunnerState>,
}

impl FakeCommandRunner {
    /// A runner whose programs can never be spawned
    pub fn unavailable() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().unavailable = true;
        fake
    }

    /// Make every call write `output` to stderr and exit 0
    pub fn set_stderr(&self, output: &str) {
        self.state.lock().unwrap().stderr = Some(output.to_string());
    }

    /// Make every call exit with `code` and write nothing to stderr
    pub fn set_exit_code(&self, code: i32) {
        self.state.lock().unwrap().exit_code = Some(code);
    }

    pub fn set_stdout(&self, output: &str) {
        self.state.lock().unwrap().stdout = Some(output.to_string());
    }

    pub fn value(&self, key: &str, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.values.get(&(key.to_string(), name.to_string())).cloned()
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.state.lock().unwrap().calls.clone()
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).map(String::as_str)
}

fn not_found() -> CommandError {
    CommandError::ChildProcessFailed {
        output: REG_NOT_FOUND.to_string(),
        exit_code: Some(1),
    }
}

fn completed(stdout: &str) -> CommandOutput {
    CommandOutput {
        exit_code: 0,
        stdout: stdout.to_string(),
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((program.to_string(), args.to_vec()));

        if state.unavailable {
            return Err(CommandError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "program not found"),
            });
        }
        if let Some(output) = &state.stderr {
            return Err(CommandError::ChildProcessFailed {
                output: output.clone(),
                exit_code: Some(0),
            });
        }
        if let Some(exit_code) = state.exit_code {
            return Ok(CommandOutput {
                exit_code,
                stdout: String::new(),
            });
        }
        if program != "reg" {
            return Ok(completed(state.stdout.as_deref().unwrap_or_default()));
        }

        let verb = args.first().map(String::as_str).unwrap_or_default();
        let key = args.get(1).cloned().unwrap_or_default();
        let name = flag_value(args, "/v").unwrap_or_default().to_string();
        let entry = (key, name);

        match verb {
            "QUERY" => match state.values.get(&entry) {
                Some(data) => Ok(completed(&format!(
                    "\r\n{}\r\n    {}    REG_SZ    {}\r\n",
                    entry.0, entry.1, data
                ))),
                None => Err(not_found()),
            },
            "ADD" => {
                let data = flag_value(args, "/d").unwrap_or_default().to_string();
                state.values.insert(entry, data);
                Ok(completed("The operation completed successfully.\r\n"))
            }
            "DELETE" => match state.values.remove(&entry) {
                Some(_) => Ok(completed("The operation completed successfully.\r\n")),
                None => Err(not_found()),
            },
            _ => Err(CommandError::ChildProcessFailed {
                output: "ERROR: Invalid syntax.\r\n".to_string(),
                exit_code: Some(1),
            }),
        }
    }
}

#[derive(Default)]
struct LoginItemsState {
    paths: Vec<String>,
    calls: usize,
    failure: Option<String>,
    output: Option<String>,
}

/// Simulates the System Events login-item list for the scripts the macOS
/// backend generates.
#[derive(Default)]
pub struct FakeLoginItems {
    state: Mutex<LoginItemsState>,
}

impl FakeLoginItems {
    pub fn with_paths(paths: &[&str]) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().paths = paths.iter().map(|p| p.to_string()).collect();
        fake
    }

    /// Every script fails as if osascript reported `message`
    pub fn failing(message: &str) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().failure = Some(message.to_string());
        fake
    }

    /// Every script returns `output` verbatim
    pub fn override_output(&self, output: &str) {
        self.state.lock().unwrap().output = Some(output.to_string());
    }

    pub fn paths(&self) -> Vec<String> {
        self.state.lock().unwrap().paths.clone()
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }
}

/// Read the AppleScript string literal that follows `marker`
fn read_literal(script: &str, marker: &str) -> Option<String> {
    let start = script.find(marker)? + marker.len();
    let mut chars = script[start..].chars();
    if chars.next()? != '"' {
        return None;
    }

    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?),
            '"' => return Some(value),
            _ => value.push(c),
        }
    }
    None
}

#[async_trait]
impl ScriptRunner for FakeLoginItems {
    async fn exec(&self, script: &str) -> Result<String, ScriptError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;

        if let Some(message) = &state.failure {
            return Err(ScriptError::Command(CommandError::ChildProcessFailed {
                output: message.clone(),
                exit_code: Some(1),
            }));
        }
        if let Some(output) = &state.output {
            return Ok(output.clone());
        }

        if script.contains("make login item") {
            let path = read_literal(script, "path:")
                .ok_or_else(|| ScriptError::UnexpectedOutput(script.to_string()))?;
            let name = path.rsplit('/').next().unwrap_or_default().to_string();
            state.paths.push(path);
            return Ok(format!("login item {} of application \"System Events\"", name));
        }

        let path = read_literal(script, "is equal to ")
            .ok_or_else(|| ScriptError::UnexpectedOutput(script.to_string()))?;
        let position = state.paths.iter().position(|p| *p == path);

        if script.contains("delete login item") {
            if let Some(index) = position {
                state.paths.remove(index);
                return Ok("1".to_string());
            }
            return Ok("0".to_string());
        }

        Ok(if position.is_some() { "1" } else { "0" }.to_string())
    }
}
