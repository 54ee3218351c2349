//! Decode the captured output of `curl -s -i` into a response.

use std::fmt;
use std::str::FromStr;

use http_types::headers::{HeaderName, HeaderValue};
use http_types::StatusCode;

use crate::{Error, Result};

const CRLF: &str = "\r\n";
/// Some runners hand back the separator escaped rather than as control bytes.
const ESCAPED_CRLF: &str = "\\r\\n";

/// A response recovered from curl's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Option<u16>,
    headers: Vec<(String, Vec<String>)>,
    body: Vec<u8>,
}

impl Response {
    /// The status code, `None` when the output carried no status line.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The canonical reason phrase for the status code, or `""` when the code
    /// is missing or not a registered one.
    pub fn status_text(&self) -> &'static str {
        self.status
            .and_then(|code| StatusCode::try_from(code).ok())
            .map(|status| status.canonical_reason())
            .unwrap_or("")
    }

    /// All values for a header. Names are matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate over the headers in the order they first appeared. Names are
    /// lower-cased; values are kept as curl printed them.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// The body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text.
    pub fn body_string(&self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    fn append(&mut self, name: String, value: String) {
        match self.headers.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.headers.push((name, vec![value])),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.status {
            write!(f, "{} {}", code, self.status_text())?;
        }
        for (name, values) in &self.headers {
            for value in values {
                write!(f, "\n{}: {}", name, value)?;
            }
        }
        write!(f, "\n({} body bytes)", self.body.len())
    }
}

impl TryFrom<Response> for http_types::Response {
    type Error = Error;

    fn try_from(res: Response) -> Result<Self> {
        let code = res
            .status
            .ok_or_else(|| Error::Parse("no status line found".into()))?;
        let status = StatusCode::try_from(code)
            .map_err(|_| Error::Parse(format!("unsupported status code {}", code)))?;
        let mut out = http_types::Response::new(status);
        for (name, values) in res.headers {
            let name = HeaderName::from_str(&name)
                .map_err(|_| Error::Parse(format!("invalid header name {:?}", name)))?;
            for value in values {
                let value = HeaderValue::from_str(&value)
                    .map_err(|_| Error::Parse(format!("invalid value for header {}", name)))?;
                out.append_header(name.clone(), value);
            }
        }
        out.set_body(res.body);
        Ok(out)
    }
}

/// Parse the combined output of a `curl -s -i` run.
///
/// The first line is taken as the status line if it mentions `HTTP`. Header
/// lines follow until the first line without a colon; the line after that is
/// the body. Only that single line is kept, so a body spanning several lines
/// comes back truncated to its first line.
///
/// A header value is everything after the first colon with leading spaces
/// trimmed. Values containing `;` are kept whole, and non-ASCII text is kept
/// as is.
pub fn parse(raw: &[u8]) -> Result<Response> {
    if raw.is_empty() {
        return Err(Error::Parse("empty output".into()));
    }

    let text = String::from_utf8_lossy(raw);
    let sep = if text.contains(CRLF) {
        CRLF
    } else if text.contains(ESCAPED_CRLF) {
        ESCAPED_CRLF
    } else {
        CRLF
    };
    let all: Vec<&str> = text.split(sep).collect();
    let mut lines = &all[..];

    let mut res = Response {
        status: None,
        headers: Vec::new(),
        body: Vec::new(),
    };

    if let Some(first) = lines.first() {
        if first.contains("HTTP") {
            res.status = Some(status_code(first)?);
            lines = &lines[1..];
        }
    }

    let separator = lines
        .iter()
        .position(|line| line.is_empty() || !line.contains(':'));

    let header_lines = match separator {
        Some(idx) => &lines[..idx],
        None => lines,
    };
    for line in header_lines {
        let (name, value) = line.split_once(':').unwrap_or((line, ""));
        res.append(
            name.to_ascii_lowercase(),
            value.trim_start_matches(' ').to_owned(),
        );
    }

    if let Some(body) = separator.and_then(|idx| lines.get(idx + 1)) {
        res.body = body.as_bytes().to_vec();
    }

    log::trace!("< {}", res);
    Ok(res)
}

fn status_code(line: &str) -> Result<u16> {
    let code = line
        .split(' ')
        .nth(1)
        .ok_or_else(|| Error::Parse(format!("malformed status line {:?}", line)))?;
    code.parse::<u16>()
        .map_err(|_| Error::Parse(format!("invalid status code {:?}", code)))
}
