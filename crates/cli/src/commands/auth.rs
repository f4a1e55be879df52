//! Account commands.
//!
//! Passwords come from `--password`/`FRANCINE_PASSWORD` or, failing that,
//! one line of stdin. They are wrapped in a [`SecretString`] immediately.

use std::io::BufRead;

use secrecy::SecretString;

use francine_storefront::storage::Storage;
use francine_storefront::{AppError, Storefront};

use crate::output;

fn read_password(given: Option<String>) -> Result<SecretString, AppError> {
    if let Some(password) = given {
        return Ok(SecretString::from(password));
    }

    output::prompt("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| AppError::BadRequest(format!("Could not read password: {e}")))?;
    Ok(SecretString::from(
        line.trim_end_matches(['\r', '\n']).to_owned(),
    ))
}

/// Log in and cache the session.
pub async fn login<S: Storage + Clone>(
    storefront: &mut Storefront<S>,
    email: &str,
    password: Option<String>,
) -> Result<(), AppError> {
    let password = read_password(password)?;
    let notice = storefront.login(email, &password).await?;
    output::notice(&notice);
    Ok(())
}

/// Register a customer account and cache the session.
pub async fn register<S: Storage + Clone>(
    storefront: &mut Storefront<S>,
    name: &str,
    email: &str,
    password: Option<String>,
) -> Result<(), AppError> {
    let password = read_password(password)?;
    let notice = storefront.register(name, email, &password).await?;
    output::notice(&notice);
    Ok(())
}

/// Forget the cached session.
pub fn logout<S: Storage + Clone>(storefront: &mut Storefront<S>) -> Result<(), AppError> {
    let notice = storefront.logout()?;
    output::notice(&notice);
    Ok(())
}

/// Print who is logged in.
pub fn whoami<S: Storage + Clone>(storefront: &Storefront<S>) {
    output::session(storefront.auth().user(), storefront.mode());
}
