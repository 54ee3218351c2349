//! Client identity and trust options passed through to curl.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::Error;

/// Encoding of a key or certificate file, as curl's `--key-type` and
/// `--cert-type` understand it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// PEM encoded.
    Pem,
    /// DER encoded.
    Der,
    /// Loaded through an OpenSSL engine.
    Eng,
}

impl FileType {
    /// The token curl expects for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pem => "PEM",
            FileType::Der => "DER",
            FileType::Eng => "ENG",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PEM" => Ok(FileType::Pem),
            "DER" => Ok(FileType::Der),
            "ENG" => Ok(FileType::Eng),
            _ => Err(Error::Validation(format!("unknown file type {:?}", s))),
        }
    }
}

/// A client private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub(crate) file_type: FileType,
    pub(crate) path: PathBuf,
}

impl PrivateKey {
    /// Create a new instance.
    pub fn new(file_type: FileType, path: impl Into<PathBuf>) -> Self {
        Self {
            file_type,
            path: path.into(),
        }
    }
}

/// A client certificate, optionally protected by a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub(crate) file_type: FileType,
    pub(crate) path: PathBuf,
    pub(crate) password: Option<String>,
}

impl Certificate {
    /// Create a new instance. An empty password counts as no password.
    pub fn new(file_type: FileType, path: impl Into<PathBuf>, password: Option<&str>) -> Self {
        Self {
            file_type,
            path: path.into(),
            password: password.filter(|p| !p.is_empty()).map(str::to_owned),
        }
    }

    // curl takes the password glued to the path: `cert.pem:secret`.
    pub(crate) fn cert_arg(&self) -> String {
        let path = self.path.to_string_lossy();
        match &self.password {
            Some(password) => format!("{}:{}", path, password),
            None => path.into_owned(),
        }
    }
}

/// Everything TLS related that ends up on the command line besides `-k`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsOptions {
    pub(crate) private_key: Option<PrivateKey>,
    pub(crate) certificate: Option<Certificate>,
    pub(crate) ca_bundle: Option<PathBuf>,
}

impl TlsOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a client private key.
    pub fn private_key(mut self, key: PrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    /// Use a client certificate.
    pub fn certificate(mut self, cert: Certificate) -> Self {
        self.certificate = Some(cert);
        self
    }

    /// Verify the peer against this CA bundle.
    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    pub(crate) fn push_args(&self, args: &mut Vec<String>) {
        if let Some(key) = &self.private_key {
            args.push("--key-type".into());
            args.push(key.file_type.to_string());
            args.push("--key".into());
            args.push(key.path.to_string_lossy().into_owned());
        }
        if let Some(cert) = &self.certificate {
            args.push("--cert-type".into());
            args.push(cert.file_type.to_string());
            args.push("--cert".into());
            args.push(cert.cert_arg());
        }
        if let Some(ca) = &self.ca_bundle {
            args.push("--cacert".into());
            args.push(ca.to_string_lossy().into_owned());
        }
    }
}
