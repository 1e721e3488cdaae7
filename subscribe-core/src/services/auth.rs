//! Auth service - local signup and credential checks
//!
//! Passwords are never stored. Each login keeps a random salt and the
//! Argon2id output derived from it.

use std::sync::{Arc, OnceLock};

use base64::Engine;
use rand::Rng;
use regex::Regex;

use crate::domain::result::{Error, Result};
use crate::domain::{Argon2Params, Login, PasswordCredential, SignupForm, SALT_LEN};
use crate::ports::Repository;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$")
            .expect("email pattern is a valid regex")
    })
}

/// Identifier must contain at least one letter
pub fn has_letter(s: &str) -> bool {
    s.chars().any(char::is_alphabetic)
}

/// Standard address shape, and the local part is not only digits/symbols
pub fn is_valid_email(email: &str) -> bool {
    if !email_regex().is_match(email) {
        return false;
    }
    email
        .split_once('@')
        .map(|(local, _)| has_letter(local))
        .unwrap_or(false)
}

/// Auth service for signup and login
pub struct AuthService {
    repository: Arc<dyn Repository>,
    params: Argon2Params,
}

impl AuthService {
    pub fn new(repository: Arc<dyn Repository>, params: Argon2Params) -> Self {
        Self { repository, params }
    }

    /// Validate a signup form and store the new login.
    ///
    /// Checks run in order and stop at the first failure:
    /// required fields, letter in ID, email format, password confirmation,
    /// then ID and email uniqueness.
    pub fn signup(&self, form: &SignupForm) -> Result<Login> {
        let id = form.id.trim();
        let email = form.email.trim().to_lowercase();

        if id.is_empty() || email.is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
            return Err(Error::validation("Please fill in every field"));
        }
        if !has_letter(id) {
            return Err(Error::validation("ID must contain at least one letter"));
        }
        if !is_valid_email(&email) {
            return Err(Error::validation("Please enter a valid email address"));
        }
        if form.password != form.confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }
        if self.repository.get_login(id)?.is_some() {
            return Err(Error::validation("That ID is already taken"));
        }
        if self.repository.get_login_by_email(&email)?.is_some() {
            return Err(Error::validation("That email is already registered"));
        }

        let credential = hash_password(&form.password, &self.params)?;
        let login = Login::new(id, email, credential);
        self.repository.insert_login(&login)?;
        Ok(login)
    }

    /// Exact, case-sensitive ID lookup followed by a hash comparison.
    /// Unknown IDs and wrong passwords both return `false`.
    pub fn authenticate(&self, id: &str, password: &str) -> Result<bool> {
        match self.repository.get_login(id)? {
            Some(login) => verify_password(password, &login.credential),
            None => Ok(false),
        }
    }
}

/// Derive a fresh salted credential for `password`
pub fn hash_password(password: &str, params: &Argon2Params) -> Result<PasswordCredential> {
    let salt: [u8; SALT_LEN] = rand::thread_rng().gen();
    let hash = derive_key(password, &salt, params)?;

    Ok(PasswordCredential {
        salt: base64::engine::general_purpose::STANDARD.encode(salt),
        hash: hex::encode(hash),
        params: params.clone(),
    })
}

/// Check `password` against a stored credential
pub fn verify_password(password: &str, credential: &PasswordCredential) -> Result<bool> {
    let salt = base64::engine::general_purpose::STANDARD
        .decode(&credential.salt)
        .map_err(|e| Error::persistence(format!("Invalid stored salt: {}", e)))?;
    let expected = hex::decode(&credential.hash)
        .map_err(|e| Error::persistence(format!("Invalid stored hash: {}", e)))?;

    let actual = derive_key(password, &salt, &credential.params)?;
    Ok(constant_time_eq(&actual, &expected))
}

/// Argon2id key derivation
fn derive_key(password: &str, salt: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    let argon2_params = argon2::Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(params.hash_len as usize),
    )
    .map_err(|e| Error::Config(format!("Invalid argon2 parameters: {}", e)))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut key = vec![0u8; params.hash_len as usize];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| Error::Config(format!("Failed to hash password: {}", e)))?;

    Ok(key)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::DuckDbRepository;

    /// Cheap parameters so tests stay fast
    fn test_params() -> Argon2Params {
        Argon2Params {
            time_cost: 1,
            memory_cost: 8,
            parallelism: 1,
            hash_len: 32,
        }
    }

    fn service() -> AuthService {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        AuthService::new(Arc::new(repo), test_params())
    }

    fn form(id: &str, email: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            id: id.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn message(err: Error) -> String {
        assert!(err.is_validation(), "expected validation error, got {:?}", err);
        err.to_string()
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("moon@example.com"));
        assert!(is_valid_email("first.last+tag@mail.co.kr"));
        assert!(!is_valid_email("moon@example"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("12345@example.com"));
    }

    #[test]
    fn test_signup_checks_in_order() {
        let service = service();

        let empty = message(service.signup(&form("", "", "", "")).unwrap_err());
        let digits = message(service.signup(&form("12345", "bad", "pw", "other")).unwrap_err());
        let email = message(service.signup(&form("abc123", "bad", "pw", "other")).unwrap_err());
        let mismatch = message(service.signup(&form("abc123", "abc@example.com", "pw", "other")).unwrap_err());

        assert_eq!(empty, "Please fill in every field");
        assert_eq!(digits, "ID must contain at least one letter");
        assert_eq!(email, "Please enter a valid email address");
        assert_eq!(mismatch, "Passwords do not match");
    }

    #[test]
    fn test_signup_accepts_alphanumeric_id() {
        let service = service();
        let login = service
            .signup(&form("abc123", "Abc@Example.com", "hunter2", "hunter2"))
            .unwrap();

        assert_eq!(login.id, "abc123");
        assert_eq!(login.email, "abc@example.com");
        assert_ne!(login.credential.hash, "hunter2");
    }

    #[test]
    fn test_signup_rejects_duplicates() {
        let service = service();
        service.signup(&form("abc123", "abc@example.com", "pw", "pw")).unwrap();

        let dup_id = message(service.signup(&form("abc123", "other@example.com", "pw", "pw")).unwrap_err());
        let dup_email = message(service.signup(&form("other", "ABC@example.com", "pw", "pw")).unwrap_err());

        assert_eq!(dup_id, "That ID is already taken");
        assert_eq!(dup_email, "That email is already registered");
    }

    #[test]
    fn test_authenticate() {
        let service = service();
        service.signup(&form("abc123", "abc@example.com", "s3cret", "s3cret")).unwrap();

        assert!(service.authenticate("abc123", "s3cret").unwrap());
        assert!(!service.authenticate("abc123", "S3cret").unwrap());
        assert!(!service.authenticate("ABC123", "s3cret").unwrap());
        assert!(!service.authenticate("nobody", "s3cret").unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("pw", &test_params()).unwrap();
        let b = hash_password("pw", &test_params()).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
        assert!(verify_password("pw", &a).unwrap());
    }
}
