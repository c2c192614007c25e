//! Credential-to-principal resolution.
//!
//! Resolution runs once per request, before the guard. The guard only ever
//! sees its result through [`RequestContext::principal`](crate::RequestContext::principal).

use std::collections::BTreeMap;
use std::fmt;

use crate::request::Principal;
use crate::session::SessionSigner;
use crate::Verified;

/// Failure of the resolver itself, as opposed to "nobody matched".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The backing user store could not be consulted.
    Unavailable(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Unavailable(reason) => write!(f, "principal resolver unavailable: {}", reason),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Maps a verified credential to the principal it identifies.
///
/// `Ok(None)` means the credential is well-formed but identifies nobody
/// (bad signature, unknown or removed user). `Err` is reserved for the
/// resolver being unable to answer at all.
pub trait PrincipalResolver {
    /// Resolves `credential` into a principal.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` when the lookup itself fails.
    fn resolve(&self, credential: &Verified<String>) -> Result<Option<Principal>, ResolveError>;
}

/// Identifier of a [`User`].
pub type UserId = u64;

/// A person who can own assets and sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Directory-assigned identifier
    pub id: UserId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact address
    pub email: String,
}

impl User {
    /// Returns the titleized "First Last" form.
    pub fn full_name(&self) -> String {
        titleize(&format!("{} {}", self.first_name, self.last_name))
    }

    /// Returns the principal this user acts as.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id.to_string(),
            name: self.full_name(),
        }
    }
}

/// Capitalizes each whitespace-separated word and lowercases the rest.
pub(crate) fn titleize(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// In-memory user records keyed by id.
///
/// # Examples
///
/// ```
/// use asset_guard::UserDirectory;
///
/// let mut users = UserDirectory::new();
/// let id = users.add("dude", "mctalis", "dude@example.com");
///
/// assert_eq!(users.get(id).unwrap().full_name(), "Dude Mctalis");
/// assert_eq!(users.find_by_full_name("DUDE MCTALIS").unwrap().id, id);
/// ```
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: BTreeMap<UserId, User>,
    next_id: UserId,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user and returns its id.
    pub fn add(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> UserId {
        self.next_id += 1;
        let id = self.next_id;
        self.users.insert(
            id,
            User {
                id,
                first_name: first_name.into(),
                last_name: last_name.into(),
                email: email.into(),
            },
        );
        id
    }

    /// Removes a user. Outstanding remember tokens stop resolving.
    pub fn remove(&mut self, id: UserId) -> Option<User> {
        self.users.remove(&id)
    }

    /// Looks a user up by id.
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Looks a user up by full name, ignoring case and extra whitespace.
    pub fn find_by_full_name(&self, full_name: &str) -> Option<&User> {
        let wanted = titleize(full_name);
        if wanted.is_empty() {
            return None;
        }
        self.users.values().find(|u| u.full_name() == wanted)
    }

    /// Looks a user up by email, ignoring ASCII case.
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Returns the number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if the directory has no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Resolves signed remember tokens against a [`UserDirectory`].
#[derive(Debug)]
pub struct RememberTokenResolver<'a> {
    signer: &'a SessionSigner,
    directory: &'a UserDirectory,
}

impl<'a> RememberTokenResolver<'a> {
    /// Creates a resolver that checks signatures with `signer` and looks
    /// users up in `directory`.
    pub fn new(signer: &'a SessionSigner, directory: &'a UserDirectory) -> Self {
        Self { signer, directory }
    }
}

impl PrincipalResolver for RememberTokenResolver<'_> {
    fn resolve(&self, credential: &Verified<String>) -> Result<Option<Principal>, ResolveError> {
        let Some(user_id) = self.signer.verify(credential.as_ref()) else {
            tracing::debug!("remember token failed signature check");
            return Ok(None);
        };
        Ok(self.directory.get(user_id).map(User::principal))
    }
}
