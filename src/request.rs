//! A request that is carried out by the curl program.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use http_types::headers::{HeaderName, HeaderValue, HeaderValues, Headers};
use http_types::Request;

use crate::cancel::CancelToken;
use crate::decode::{self, Response};
use crate::encode::{self, CommandPlan};
use crate::future::timeout;
use crate::process::{self, ProcessRunner, SystemRunner};
use crate::tls::{Certificate, FileType, PrivateKey, TlsOptions};
use crate::{Error, Result};

/// Configure how commands are built and run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Program to invoke. Defaults to `curl`.
    program: String,
    /// Directory for request body files. Defaults to the working directory.
    scratch_dir: PathBuf,
    /// Upper bound on a single run. Defaults to none.
    timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            program: "curl".into(),
            scratch_dir: PathBuf::from("."),
            timeout: None,
        }
    }
}

impl Options {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// The program to invoke.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Invoke `program` instead of `curl`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Directory body files are written to.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Set the directory body files are written to.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// The timeout for a single run, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Give up on a run after `dur`.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }
}

#[derive(Debug)]
enum State {
    Fresh,
    Generated(CommandPlan),
    Executed(CommandPlan),
}

/// An HTTP request carried out by shelling out to curl.
///
/// The command is generated on demand and cached. Adding a header to a
/// generated request regenerates the command with the same `-k` setting.
/// Running the command always removes the body file afterwards, and dropping
/// the request removes it too.
pub struct CurlRequest<R = SystemRunner> {
    request: Request,
    body: Option<Vec<u8>>,
    tls: TlsOptions,
    opts: Options,
    cancel: CancelToken,
    runner: R,
    state: State,
}

impl<R> fmt::Debug for CurlRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlRequest")
            .field("method", &self.request.method())
            .field("url", &self.request.url().as_str())
            .field("tls", &self.tls)
            .field("opts", &self.opts)
            .field("state", &self.state)
            .finish()
    }
}

impl CurlRequest<SystemRunner> {
    /// Wrap `req`, running it through the local curl.
    pub fn new(req: Request) -> Result<Self> {
        Self::with_runner(req, Options::default(), SystemRunner)
    }

    /// Wrap `req` with custom options.
    pub fn with_options(req: Request, opts: Options) -> Result<Self> {
        Self::with_runner(req, opts, SystemRunner)
    }
}

impl<R: ProcessRunner> CurlRequest<R> {
    /// Wrap `req`, running commands through `runner`.
    pub fn with_runner(req: Request, opts: Options, runner: R) -> Result<Self> {
        if req.url().cannot_be_a_base() {
            return Err(Error::Validation(format!(
                "url {} is not a location curl can fetch",
                req.url()
            )));
        }
        Ok(Self {
            request: req,
            body: None,
            tls: TlsOptions::default(),
            opts,
            cancel: CancelToken::never(),
            runner,
            state: State::Fresh,
        })
    }

    /// Stop running commands once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Generate the curl command, replacing any previous one. With `insecure`
    /// set, https certificates are not verified.
    pub async fn generate_command(&mut self, insecure: bool) -> Result<()> {
        if self.body.is_none() {
            let body = self.request.take_body().into_bytes().await.map_err(|e| {
                Error::io(
                    "unable to read the request body",
                    std::io::Error::other(e.to_string()),
                )
            })?;
            self.body = Some(body);
        }
        self.regenerate(insecure)
    }

    fn regenerate(&mut self, insecure: bool) -> Result<()> {
        self.release()?;
        let body = self.body.as_deref().unwrap_or_default();
        let plan = encode::encode(&self.request, body, insecure, &self.tls, &self.opts)?;
        log::trace!("> {}", plan);
        self.state = State::Generated(plan);
        Ok(())
    }

    // Removes the body file of the cached plan, if any.
    fn release(&mut self) -> Result<()> {
        match &mut self.state {
            State::Fresh => Ok(()),
            State::Generated(plan) | State::Executed(plan) => plan.release(),
        }
    }

    /// The cached plan, if a command was generated.
    pub fn plan(&self) -> Option<&CommandPlan> {
        match &self.state {
            State::Fresh => None,
            State::Generated(plan) | State::Executed(plan) => Some(plan),
        }
    }

    /// The generated command tokens; empty before generation.
    pub fn commands(&self) -> &[String] {
        self.plan().map(CommandPlan::args).unwrap_or_default()
    }

    /// The file holding the request body, while it exists.
    pub fn filename(&self) -> Option<&Path> {
        self.plan().and_then(CommandPlan::body_path)
    }

    /// Run the generated command and return its combined output.
    ///
    /// The body file is removed afterwards whether or not the run succeeded.
    pub async fn execute(&mut self) -> Result<Vec<u8>> {
        let mut plan = match std::mem::replace(&mut self.state, State::Fresh) {
            State::Generated(plan) => plan,
            State::Fresh => {
                return Err(Error::State(
                    "unable to run this command, command: []".into(),
                ))
            }
            State::Executed(plan) => {
                let err = Error::State(format!(
                    "unable to run this command, command: {:?} was already executed",
                    plan.args()
                ));
                self.state = State::Executed(plan);
                return Err(err);
            }
        };
        // Dropping the plan mid-run removes the body file as well.
        let run = process::run_command(&self.runner, &self.cancel, plan.args());
        let output = match self.opts.timeout() {
            Some(dur) => timeout(dur, run)
                .await
                .unwrap_or_else(|e| Err(Error::TimedOut(e.dur))),
            None => run.await,
        };

        if let Err(e) = plan.release() {
            log::warn!("{}", e);
        }
        self.state = State::Executed(plan);
        output
    }

    /// Run the generated command and parse its output.
    pub async fn send(&mut self) -> Result<Response> {
        let output = self.execute().await?;
        decode::parse(&output)
    }

    /// Add a header value. A generated command is regenerated right away.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_str(name)
            .map_err(|_| Error::Validation(format!("invalid header name {:?}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::Validation(format!("invalid value for header {}", name)))?;
        self.request.append_header(name, value);

        let insecure = match &self.state {
            State::Generated(plan) => plan.is_insecure(),
            _ => return Ok(()),
        };
        self.regenerate(insecure)
    }

    /// All request headers.
    pub fn headers(&self) -> &Headers {
        self.request.as_ref()
    }

    /// Values of one request header.
    pub fn header(&self, name: &str) -> Option<&HeaderValues> {
        let name = HeaderName::from_str(name).ok()?;
        self.request.header(name)
    }

    /// Present a client private key.
    pub fn set_private_key(&mut self, file_type: FileType, path: impl Into<PathBuf>) {
        self.tls.private_key = Some(PrivateKey::new(file_type, path));
    }

    /// Present a client certificate. An empty or missing password sends none.
    pub fn set_certificate(
        &mut self,
        file_type: FileType,
        path: impl Into<PathBuf>,
        password: Option<&str>,
    ) {
        self.tls.certificate = Some(Certificate::new(file_type, path, password));
    }

    /// Verify the server against this CA bundle.
    pub fn set_ca(&mut self, path: impl Into<PathBuf>) {
        self.tls.ca_bundle = Some(path.into());
    }

    /// Replace all TLS options at once.
    pub fn set_tls(&mut self, tls: TlsOptions) {
        self.tls = tls;
    }
}
