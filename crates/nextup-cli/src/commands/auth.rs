use super::prompts;
use crate::app::App;
use crate::output::{Output, OutputFormat};
use crate::AuthCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchlist_config::{CredentialStore, PathManager, SupabaseConfig};
use watchlist_remote::supabase::AuthSession;
use watchlist_remote::{SessionProvider, SupabaseClient};

pub async fn run_auth(cmd: AuthCommands, output: &Output) -> Result<()> {
    match cmd {
        AuthCommands::Login { email } => login(email, output).await,
        AuthCommands::Signup { email } => signup(email, output).await,
        AuthCommands::Logout => logout(output),
        AuthCommands::Status => status(output),
    }
}

async fn login(email: Option<String>, output: &Output) -> Result<()> {
    let app = App::load()?;
    let supabase = require_backend(&app)?;

    let email = match email {
        Some(email) => email,
        None => prompts::prompt_string("Email", None)?,
    };
    let password = prompts::prompt_password("Password")?;

    let spinner = super::network_spinner(output, "Signing in...");
    let mut client = SupabaseClient::new(supabase.url.clone(), supabase.anon_key.clone());
    let session = client.sign_in(&email, &password).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let session = session.map_err(|e| eyre!("Sign-in failed: {}", e))?;

    save_session(&app.paths, &session)?;
    output.success(format!(
        "Signed in as {}",
        session.email.as_deref().unwrap_or(&email)
    ));

    reconcile_after_sign_in(output).await
}

async fn signup(email: Option<String>, output: &Output) -> Result<()> {
    let app = App::load()?;
    let supabase = require_backend(&app)?;

    let email = match email {
        Some(email) => email,
        None => prompts::prompt_string("Email", None)?,
    };
    let password = prompts::prompt_new_password("Password")?;

    let spinner = super::network_spinner(output, "Creating account...");
    let mut client = SupabaseClient::new(supabase.url.clone(), supabase.anon_key.clone());
    let session = client.sign_up(&email, &password).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match session.map_err(|e| eyre!("Signup failed: {}", e))? {
        Some(session) => {
            save_session(&app.paths, &session)?;
            output.success(format!(
                "Account created, signed in as {}",
                session.email.as_deref().unwrap_or(&email)
            ));
            reconcile_after_sign_in(output).await
        }
        None => {
            output.info(
                "Account created. Check your email to confirm it, then run 'nextup auth login'.",
            );
            Ok(())
        }
    }
}

fn logout(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let mut store = CredentialStore::new(paths.credentials_file());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

    if !store.has_session() {
        output.info("Not signed in.");
        return Ok(());
    }

    store.clear_session();
    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;
    output.success("Signed out. Your watchlist stays on this machine.");
    Ok(())
}

fn status(output: &Output) -> Result<()> {
    let app = App::load()?;
    let mut store = CredentialStore::new(app.paths.credentials_file());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

    let signed_in = app.session.is_authenticated();

    match output.format() {
        OutputFormat::Human => {
            if !store.has_session() {
                output.info("Not signed in. The watchlist is local-only.");
                return Ok(());
            }
            let email = store
                .get_email()
                .cloned()
                .unwrap_or_else(|| "<unknown>".to_string());
            if signed_in {
                output.success(format!("Signed in as {}", email));
            } else {
                output.warn(format!(
                    "Session for {} has expired. Run 'nextup auth login' again.",
                    email
                ));
            }
            if let Some(expires) = store.get_token_expires() {
                output.info(format!(
                    "Token expires {}",
                    expires.format("%Y-%m-%d %H:%M UTC")
                ));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "signed_in": signed_in,
                "email": store.get_email(),
                "token_expires": store.get_token_expires().map(|t| t.to_rfc3339()),
                "backend_configured": app.config.is_supabase_configured(),
            }));
        }
    }
    Ok(())
}

fn require_backend(app: &App) -> Result<SupabaseConfig> {
    match &app.config.supabase {
        Some(supabase) if app.config.is_supabase_configured() => Ok(supabase.clone()),
        _ => Err(eyre!(
            "Supabase backend is not configured. Run 'nextup config init' and fill in the [supabase] section."
        )),
    }
}

fn save_session(paths: &PathManager, session: &AuthSession) -> Result<()> {
    let mut store = CredentialStore::new(paths.credentials_file());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
    store.set_access_token(session.access_token.clone());
    store.set_refresh_token(session.refresh_token.clone());
    store.set_owner_id(session.user_id);
    store.set_token_expires(session.expires_at);
    if let Some(email) = &session.email {
        store.set_email(email.clone());
    }
    store
        .save()
        .map_err(|e| eyre!("Failed to save session: {}", e))
}

/// Reload so the coordinator sees the fresh session, then run the
/// sign-in reconciliation.
async fn reconcile_after_sign_in(output: &Output) -> Result<()> {
    let app = App::load()?;
    let Some(sync) = &app.sync else {
        return Ok(());
    };

    let spinner = super::network_spinner(output, "Fetching your watchlist...");
    let report = sync.handle_auth_change().await;
    sync.flush().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    for error in &report.errors {
        output.warn(error);
    }
    output.info(format!(
        "Watchlist reconciled: {} remote item(s), {} pushed up",
        report.fetched, report.pushed_inserts
    ));
    Ok(())
}
