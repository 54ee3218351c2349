#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use curl_h1::cancel::CancelToken;
use curl_h1::{ProcessRunner, Result, SystemRunner};

/// Replays canned output and records every invocation.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    output: Vec<u8>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockRunner {
    pub fn new(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for MockRunner {
    async fn run(&self, _cancel: &CancelToken, program: &str, args: &[String]) -> Result<Vec<u8>> {
        let mut call = vec![program.to_owned()];
        call.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(call);
        Ok(self.output.clone())
    }
}

/// Never finishes on its own; resolves only through cancellation.
#[derive(Debug, Clone, Default)]
pub struct HangingRunner;

impl ProcessRunner for HangingRunner {
    async fn run(&self, cancel: &CancelToken, _program: &str, _args: &[String]) -> Result<Vec<u8>> {
        cancel.cancelled().await;
        Err(curl_h1::Error::Cancelled)
    }
}

/// Ignores the generated command and runs a shell script instead.
#[derive(Debug, Clone)]
pub struct ScriptRunner(pub &'static str);

impl ProcessRunner for ScriptRunner {
    async fn run(&self, cancel: &CancelToken, _program: &str, _args: &[String]) -> Result<Vec<u8>> {
        let args = ["-c".to_owned(), self.0.to_owned()];
        SystemRunner.run(cancel, "sh", &args).await
    }
}

pub fn response_lines(lines: &[&str]) -> String {
    lines.join("\r\n")
}

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TestBody {
    pub user: String,
    pub flag: bool,
    pub count: u32,
}
