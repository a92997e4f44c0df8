use crate::cipher::ASCII_MAX;
use crate::error::{PamanError, PamanResult};
use rand::Rng;
use std::fmt;
use zeroize::Zeroizing;

pub const PASSWORD_LEN: usize = 16;

/// The `<site>:<username>` pair given to an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub domain: String,
    pub username: String,
}

impl Credential {
    /// Prefix every stored line of this credential starts with. Uniqueness is
    /// checked by substring search for this key.
    pub fn search_key(&self) -> String {
        format!("{} {}", self.domain, self.username)
    }

    pub fn serialize(&self, password: &Password) -> String {
        serialize_record(&self.domain, &self.username, password.as_str())
    }
}

/// Freshly generated password, wiped from memory on drop.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// A decoded database line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub domain: String,
    pub username: String,
    pub password: String,
}

impl Record {
    /// Splits `<domain> <username> <password>` back into its fields. The
    /// domain is the first token and the password the last, so a username
    /// holding spaces survives; a domain holding spaces does not.
    pub fn from_line(line: &str) -> PamanResult<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        let (domain, rest) = line
            .split_once(' ')
            .ok_or_else(|| PamanError::malformed("record line has no fields"))?;
        let (username, password) = rest
            .rsplit_once(' ')
            .ok_or_else(|| PamanError::malformed("record line has no password"))?;
        if domain.is_empty() || username.is_empty() || password.is_empty() {
            return Err(PamanError::malformed("record line has an empty field"));
        }
        Ok(Self {
            domain: domain.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Draws `PASSWORD_LEN` bytes from `0..128`, retrying every byte that is not
/// printable non-space ASCII.
pub fn generate_password<R: Rng + ?Sized>(rng: &mut R) -> Password {
    let mut pswd = Zeroizing::new(String::with_capacity(PASSWORD_LEN));
    while pswd.len() < PASSWORD_LEN {
        let c: u8 = rng.gen_range(0..ASCII_MAX);
        if c.is_ascii_graphic() {
            pswd.push(char::from(c));
        }
    }
    Password(pswd)
}

/// Parses an insert argument of the form `<site>:<username>`. Only the first
/// `:` separates; later ones belong to the username.
pub fn parse_record(arg: &str) -> PamanResult<Credential> {
    let (domain, username) = arg
        .split_once(':')
        .ok_or_else(|| PamanError::malformed("username not set"))?;
    if username.is_empty() {
        return Err(PamanError::malformed("username not set"));
    }
    if domain.is_empty() {
        return Err(PamanError::malformed("site not set"));
    }
    if domain.contains('\n') || username.contains('\n') {
        return Err(PamanError::malformed("credential spans several lines"));
    }
    Ok(Credential {
        domain: domain.to_string(),
        username: username.to_string(),
    })
}

pub fn serialize_record(domain: &str, username: &str, password: &str) -> String {
    format!("{domain} {username} {password}\n")
}
