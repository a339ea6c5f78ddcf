use cloudy_rs::Cloudy;

use crate::CliError;
use crate::input::{confirm, std_in};

#[derive(clap::Subcommand, Debug)]
pub enum AccountCmd {
    /// create a new cloudy account
    New {
        /// your desired username (will prompt if not provided)
        username: Option<String>,
        /// your email address (will prompt if not provided)
        email: Option<String>,
    },
    /// sign in with email and password
    Login {
        /// your email address (will prompt if not provided)
        email: Option<String>,
        /// keep the session on this machine across restarts
        #[arg(long)]
        remember: bool,
    },
    /// sign in by pasting a google id token obtained in your browser
    LoginGoogle {
        /// keep the session on this machine across restarts
        #[arg(long)]
        remember: bool,
    },
    /// sign out on this machine
    Logout,
    /// show who is signed in here
    Whoami,
    /// show your account status
    Status,
    /// resend the verification email
    SendVerification,
    /// redeem an email verification token
    Verify { token: String },
    /// permanently delete your account and every file in it
    Delete,
}

pub async fn account(cloudy: &Cloudy, cmd: AccountCmd) -> Result<(), CliError> {
    match cmd {
        AccountCmd::New { username, email } => new_acct(cloudy, username, email).await,
        AccountCmd::Login { email, remember } => login(cloudy, email, remember).await,
        AccountCmd::LoginGoogle { remember } => login_google(cloudy, remember).await,
        AccountCmd::Logout => logout(cloudy).await,
        AccountCmd::Whoami => whoami(cloudy).await,
        AccountCmd::Status => status(cloudy).await,
        AccountCmd::SendVerification => send_verification(cloudy).await,
        AccountCmd::Verify { token } => verify(cloudy, &token).await,
        AccountCmd::Delete => delete(cloudy).await,
    }
}

async fn new_acct(
    cloudy: &Cloudy, maybe_username: Option<String>, maybe_email: Option<String>,
) -> Result<(), CliError> {
    let username = match maybe_username {
        Some(uname) => uname,
        None => std_in("please enter a username: ")?,
    };
    let email = match maybe_email {
        Some(email) => email,
        None => std_in("please enter your email: ")?,
    };
    let password: String = std_in("choose a password: ")?;

    println!("creating your account...");
    let user = cloudy.register(&username, &email, &password).await?;

    println!("account created! a verification email is on its way to {}", user.email);
    println!("next, sign in: cloudy account login {}", user.email);
    Ok(())
}

async fn login(
    cloudy: &Cloudy, maybe_email: Option<String>, remember: bool,
) -> Result<(), CliError> {
    let email = match maybe_email {
        Some(email) => email,
        None => std_in("email: ")?,
    };
    let password: String = std_in("password: ")?;

    let user = cloudy.login(&email, &password, remember).await?;
    println!("signed in as {}", user.display_name());
    if !user.is_verified {
        println!("your email is not verified yet, run: cloudy account send-verification");
    }
    Ok(())
}

async fn login_google(cloudy: &Cloudy, remember: bool) -> Result<(), CliError> {
    let id_token: String = std_in("paste your google id token: ")?;

    // decode locally first so a typo fails before the network does
    let claims = cloudy_rs::model::account::GoogleClaims::from_id_token(&id_token)?;
    println!("signing in as {}...", claims.email);

    let user = cloudy.google_login(&id_token, remember).await?;
    println!("signed in as {}", user.display_name());
    Ok(())
}

async fn logout(cloudy: &Cloudy) -> Result<(), CliError> {
    cloudy.logout().await;
    println!("signed out.");
    Ok(())
}

async fn whoami(cloudy: &Cloudy) -> Result<(), CliError> {
    let user = cloudy.get_user().await?;
    println!("{} ({})", user.display_name(), user.email);
    Ok(())
}

async fn status(cloudy: &Cloudy) -> Result<(), CliError> {
    let user = cloudy.profile().await?;
    let usage = cloudy.get_usage(false).await?;

    println!("email: {}", user.email);
    println!("provider: {:?}", user.auth_provider);
    println!("verified: {}", if user.is_verified { "yes" } else { "no" });
    let pct = (usage.server_usage.exact * 100).checked_div(usage.data_cap.exact).unwrap_or(0);
    println!("data cap: {}, {}% utilized", usage.data_cap.readable, pct);
    Ok(())
}

async fn send_verification(cloudy: &Cloudy) -> Result<(), CliError> {
    cloudy.send_verification().await?;
    println!("verification email sent, check your inbox.");
    Ok(())
}

async fn verify(cloudy: &Cloudy, token: &str) -> Result<(), CliError> {
    cloudy.verify_email(token).await?;
    println!("email verified!");
    Ok(())
}

async fn delete(cloudy: &Cloudy) -> Result<(), CliError> {
    println!("this deletes your account and every file in it. there is no undo.");
    if confirm("are you sure?")? {
        cloudy.delete_account().await?;
        println!("account deleted.");
    }
    Ok(())
}
