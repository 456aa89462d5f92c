//! Session commands: login, signup, logout, whoami.

use super::{CliError, bootstrap};

/// Sign in with an existing account.
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let app = bootstrap()?;

    let session = app.session.login(email, password).await?;
    if let Some(user) = session.user {
        println!("signed in as {} <{}>", user.name, user.email);
    }

    Ok(())
}

/// Create a new account and sign in.
pub async fn signup(name: &str, email: &str, password: &str) -> Result<(), CliError> {
    let app = bootstrap()?;

    let session = app.session.signup(name, email, password).await?;
    if let Some(user) = session.user {
        println!("account created; signed in as {} <{}>", user.name, user.email);
    }

    Ok(())
}

/// Sign out and clear the persisted session.
pub async fn logout() -> Result<(), CliError> {
    let app = bootstrap()?;

    // Defined to never fail: remote notification is best-effort, the local
    // clear always runs.
    app.session.logout().await;
    println!("signed out");

    Ok(())
}

/// Show the current session.
pub fn whoami() -> Result<(), CliError> {
    let app = bootstrap()?;

    let session = app.session.current();
    match session.user {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            if !user.roles.is_empty() {
                let roles: Vec<&str> = user.roles.iter().map(String::as_str).collect();
                println!("roles: {}", roles.join(", "));
            }
        }
        None => println!("not signed in"),
    }

    Ok(())
}
