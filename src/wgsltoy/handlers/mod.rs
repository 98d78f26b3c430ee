pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

pub mod user_me;
pub use self::user_me::me;

pub mod shader_create;
pub use self::shader_create::shader_create;

pub mod shader_get;
pub use self::shader_get::shader_get;

pub mod shader_update;
pub use self::shader_update::shader_update;

pub mod shader_list;
pub use self::shader_list::shader_list_own;

// common helpers for the handlers
use tokio::task;

use crate::wgsltoy::error::Error;

/// Run an Argon2 derivation on the blocking pool.
///
/// Once started, the derivation runs to completion even if the request
/// future is dropped.
pub(crate) async fn run_derivation<T, F>(work: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, Error> + Send + 'static,
{
    task::spawn_blocking(work)
        .await
        .map_err(|err| Error::Internal(err.into()))?
}
