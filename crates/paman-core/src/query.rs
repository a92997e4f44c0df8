use crate::error::{PamanError, PamanResult};
use crate::record::{generate_password, Credential, Password};
use crate::store::Store;
use rand::Rng;
use std::io::Write;
use tracing::{info, warn};

/// Lines of a search, in file order. Consumed once.
#[derive(Debug)]
pub struct Matches {
    lines: std::vec::IntoIter<String>,
}

impl Iterator for Matches {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.lines.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

impl ExactSizeIterator for Matches {}

/// Every non-empty plaintext line containing `query`, case-sensitive.
pub fn search(store: &Store, query: &str) -> PamanResult<Matches> {
    let plain = store.reveal()?;
    let text = String::from_utf8_lossy(&plain);
    let lines: Vec<String> = text
        .split('\n')
        .filter(|line| !line.is_empty() && line.contains(query))
        .map(str::to_owned)
        .collect();
    Ok(Matches {
        lines: lines.into_iter(),
    })
}

/// True when no stored line contains `"<domain> <username>"`. This is a
/// substring test, so `a.com x` also collides with `za.com x`.
pub fn is_unique(store: &Store, credential: &Credential) -> PamanResult<bool> {
    Ok(search(store, &credential.search_key())?.next().is_none())
}

/// Generates a password for `credential` and appends the record, holding the
/// store lock from the uniqueness check to the append. A refused insert
/// carries the colliding lines in `DuplicateCredential::matches`.
pub fn insert<R: Rng + ?Sized>(
    store: &Store,
    credential: &Credential,
    rng: &mut R,
) -> PamanResult<Password> {
    let _guard = store.lock()?;
    let existing: Vec<String> = search(store, &credential.search_key())?.collect();
    if !existing.is_empty() {
        warn!(domain = %credential.domain, username = %credential.username, "duplicate credential refused");
        return Err(PamanError::DuplicateCredential {
            domain: credential.domain.clone(),
            username: credential.username.clone(),
            matches: existing,
        });
    }
    let password = generate_password(rng);
    store.append(&credential.serialize(&password))?;
    info!(domain = %credential.domain, "credential stored");
    Ok(password)
}

/// Writes every record in plaintext to `out`.
pub fn list_all<W: Write>(store: &Store, out: &mut W) -> PamanResult<usize> {
    store.export_plain(out)
}
