use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Duration;

/// The broad category an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request handed to us was unusable.
    Validation,
    /// Creating, writing or removing the body file failed.
    Io,
    /// The handle was used out of order.
    State,
    /// The captured output could not be turned into a response.
    Parse,
    /// The subprocess could not be started or did not succeed.
    Process,
    /// Execution was cancelled or ran out of time.
    Cancelled,
}

/// Errors produced while building, running or decoding a curl invocation.
#[derive(Debug)]
pub enum Error {
    /// The request is missing something curl needs.
    Validation(String),
    /// A filesystem operation on the body file failed.
    Io {
        /// What we were doing when it failed.
        context: &'static str,
        /// The underlying error.
        source: io::Error,
    },
    /// The handle is not in a state that allows the operation.
    State(String),
    /// The output of the subprocess is not a response we understand.
    Parse(String),
    /// The program could not be spawned.
    Spawn {
        /// Name of the program.
        program: String,
        /// The underlying error.
        source: io::Error,
    },
    /// The program exited unsuccessfully.
    Exit {
        /// Exit code, `None` when terminated by a signal.
        status: Option<i32>,
        /// Combined output captured before it exited.
        output: Vec<u8>,
    },
    /// The cancellation token fired.
    Cancelled,
    /// The configured timeout elapsed.
    TimedOut(Duration),
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Io { .. } => ErrorKind::Io,
            Error::State(_) => ErrorKind::State,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Spawn { .. } | Error::Exit { .. } => ErrorKind::Process,
            Error::Cancelled | Error::TimedOut(_) => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn io(context: &'static str, source: io::Error) -> Self {
        Error::Io { context, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "invalid request: {}", msg),
            Error::Io { context, source } => write!(f, "{}, error: {}", context, source),
            Error::State(msg) => write!(f, "{}", msg),
            Error::Parse(msg) => write!(f, "unable to parse the response: {}", msg),
            Error::Spawn { program, source } => {
                write!(f, "unable to start {}, error: {}", program, source)
            }
            Error::Exit { status: Some(code), .. } => write!(f, "command exited with status {}", code),
            Error::Exit { status: None, .. } => write!(f, "command terminated by signal"),
            Error::Cancelled => write!(f, "command was cancelled"),
            Error::TimedOut(dur) => write!(f, "command timed out after {:?}", dur),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io { source, .. } | Error::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}
