//! Argon2id password hashing and verification.
//!
//! Records are PHC strings, `$argon2id$v=19$m=65536,t=3,p=1$<salt>$<digest>`,
//! so the verification parameters always travel with the hash and the cost
//! settings below can change without invalidating stored records.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::error;

use crate::wgsltoy::error::Error;

const MEMORY_COST_KIB: u32 = 64 * 1024;
const TIME_COST: u32 = 3;
const PARALLELISM: u32 = 1;
const DIGEST_LENGTH: usize = 32;

fn hasher() -> Result<Argon2<'static>, Error> {
    let params =
        Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(DIGEST_LENGTH)).map_err(
            |err| {
                error!("Invalid Argon2 parameters: {err}");
                Error::Hashing
            },
        )?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into a self-describing PHC record.
///
/// A fresh random salt is drawn per call, hashing the same password twice
/// never yields the same record.
pub fn hash(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    let record = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| {
            error!("Failed hashing password: {err}");
            Error::Hashing
        })?;

    Ok(record.to_string())
}

/// Verify a password candidate against a stored PHC record.
///
/// The digest is re-derived with the record's own salt and cost parameters,
/// never the current defaults, and compared in constant time. A well-formed
/// record with a non-matching password is `Ok(false)`, not an error.
pub fn verify(password: &str, record: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(record).map_err(|err| {
        error!("Failed parsing stored password record: {err}");
        Error::MalformedHashRecord
    })?;

    if parsed.algorithm != Algorithm::Argon2id.ident() {
        error!("Stored password record uses algorithm {}", parsed.algorithm);
        return Err(Error::MalformedHashRecord);
    }

    if parsed.version != Some(Version::V0x13.into()) {
        error!("Stored password record has incompatible version");
        return Err(Error::MalformedHashRecord);
    }

    match hasher()?.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => {
            error!("Failed verifying password record: {err}");
            Err(Error::MalformedHashRecord)
        }
    }
}
