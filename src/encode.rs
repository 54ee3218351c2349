//! Encode a request as a curl invocation.

use std::fmt;
use std::io::Write;
use std::path::Path;

use http_types::Request;
use tempfile::TempPath;

use crate::request::Options;
use crate::tls::TlsOptions;
use crate::{Error, Result};

/// Flag that turns off certificate verification.
pub const INSECURE_FLAG: &str = "-k";

/// The argument list for one curl run, plus the file holding its body.
///
/// Dropping the plan removes the body file.
#[derive(Debug)]
pub struct CommandPlan {
    args: Vec<String>,
    body_file: Option<TempPath>,
}

impl CommandPlan {
    /// All tokens, starting with the program name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The program to run.
    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// Path of the file the body was written to, if any.
    pub fn body_path(&self) -> Option<&Path> {
        self.body_file.as_deref()
    }

    /// Whether certificate verification was turned off.
    pub fn is_insecure(&self) -> bool {
        self.args.iter().any(|arg| arg == INSECURE_FLAG)
    }

    /// Remove the body file. Calling this more than once, or on a plan
    /// without a body, does nothing.
    pub fn release(&mut self) -> Result<()> {
        match self.body_file.take() {
            Some(path) => {
                log::debug!("removing body file {}", path.display());
                path.close()
                    .map_err(|e| Error::io("unable to remove the file of request body", e))
            }
            None => Ok(()),
        }
    }
}

impl fmt::Display for CommandPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write_quoted(f, arg)?;
        }
        Ok(())
    }
}

/// Build the curl command for `req`.
///
/// `body` is the already drained request body. A non-empty body is written to
/// a fresh file under the scratch directory and passed as `-d @file`, which
/// keeps large payloads off the argument list.
pub fn encode(
    req: &Request,
    body: &[u8],
    insecure: bool,
    tls: &TlsOptions,
    opts: &Options,
) -> Result<CommandPlan> {
    let mut args: Vec<String> = vec![opts.program().to_owned(), "-s".into(), "-i".into()];

    if insecure && req.url().scheme() == "https" {
        args.push(INSECURE_FLAG.into());
    }

    for (name, values) in req.iter() {
        let joined = values
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        args.push("-H".into());
        args.push(format!("{}: {}", canonical_name(name.as_str()), joined));
    }

    args.push("-X".into());
    args.push(req.method().to_string());

    let body_file = if body.is_empty() {
        None
    } else {
        let path = write_body(body, opts.scratch_dir())?;
        args.push("-d".into());
        args.push(format!("@{}", path.display()));
        Some(path)
    };

    tls.push_args(&mut args);

    args.push(req.url().as_str().to_owned());

    Ok(CommandPlan { args, body_file })
}

fn write_body(body: &[u8], dir: &Path) -> Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix(".curl-body-")
        .rand_bytes(16)
        .tempfile_in(dir)
        .map_err(|e| Error::io("unable to create the file of request body", e))?;
    file.write_all(body)
        .and_then(|_| file.flush())
        .map_err(|e| Error::io("unable to write the file of request body", e))?;
    let path = file.into_temp_path();
    log::debug!("wrote {} body bytes to {}", body.len(), path.display());
    Ok(path)
}

/// `content-type` -> `Content-Type`.
fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_./:=@,+%~^".contains(c)
}

fn write_quoted(f: &mut fmt::Formatter<'_>, arg: &str) -> fmt::Result {
    if !arg.is_empty() && arg.chars().all(is_shell_safe) {
        return f.write_str(arg);
    }
    // `!` expands inside double quotes, and a line break splits a pasted line.
    if arg.contains(['!', '\n', '\r']) {
        f.write_str("'")?;
        for c in arg.chars() {
            match c {
                '\'' => f.write_str("'\\''")?,
                c => write!(f, "{}", c)?,
            }
        }
        return f.write_str("'");
    }
    f.write_str("\"")?;
    for c in arg.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests {
    use super::canonical_name;

    #[test]
    fn canonicalizes_header_names() {
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("X-FRAME-OPTIONS"), "X-Frame-Options");
        assert_eq!(canonical_name("accept"), "Accept");
    }
}
