use quizgate::prelude::*;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn describe(session: &Session) -> String {
    match (session.mode(), session.user()) {
        (SessionMode::Authenticated, Some(user)) => format!(
            "signed in as {} <{}> ({}, id {})",
            user.full_name(),
            user.email,
            user.role_level,
            user.id
        ),
        (SessionMode::Failed, _) => format!("not signed in: {}", session.error().unwrap_or("")),
        (mode, _) => format!("{mode}"),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

/// Restores the saved session, or signs in with `QUIZGATE_EMAIL` and
/// `QUIZGATE_PASSWORD` when there is none. `--logout` signs out instead.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    quizgate::init_tracing();

    let config = ClientConfig::from_env()?;
    eprintln!(
        "using {} (session file {})",
        config.api.base_url,
        config.session_file.display()
    );
    let client = QuizgateClientBuilder::from_config(config).build()?;

    if std::env::args().any(|arg| arg == "--logout") {
        client.logout();
        println!("{}", describe(&client.session()));
        return Ok(());
    }

    if !client.is_authenticated() {
        let email = std::env::var("QUIZGATE_EMAIL").ok();
        let password = std::env::var("QUIZGATE_PASSWORD").ok();
        match (email, password) {
            (Some(email), Some(password)) => {
                if let Err(e) = client.login(&email, &password).await {
                    tracing::warn!(error = %e, "login failed");
                }
            }
            _ => eprintln!("no saved session; set QUIZGATE_EMAIL and QUIZGATE_PASSWORD to sign in"),
        }
    }

    println!("{}", describe(&client.session()));
    Ok(())
}
