use std::io::{self, Write};

use hanas_client::api::client::HaNasClient;
use hanas_client::config::settings::{Config, ConfigError};

pub async fn run(
    server: Option<String>,
    username: Option<String>,
    register: bool,
) -> anyhow::Result<()> {
    let previous = Config::from_file().ok();

    let server_url = match server {
        Some(url) => url,
        None => {
            let default = previous
                .as_ref()
                .map(|c| c.server_url.clone())
                .unwrap_or_else(|| Config::default().server_url);
            prompt("Server URL", &default)
        }
    };

    let username = match username {
        Some(name) => name,
        None => {
            let default = previous
                .as_ref()
                .and_then(|c| c.username.clone())
                .unwrap_or_default();
            prompt("Username", &default)
        }
    };
    if username.is_empty() {
        anyhow::bail!("username cannot be empty");
    }

    let password = rpassword::prompt_password("Password: ")?;

    let config = Config {
        server_url,
        timeout_secs: previous
            .as_ref()
            .map(|c| c.timeout_secs)
            .unwrap_or_else(|| Config::default().timeout_secs),
        username: Some(username.clone()),
        password: Some(password.clone()),
    };
    config.validate()?;

    let client = HaNasClient::new(&config)?;
    let auth = if register {
        client.register(&username, &password).await?
    } else {
        client.login(&username, &password).await?
    };
    if !auth.success {
        anyhow::bail!("server rejected credentials for '{}'", username);
    }

    config.save_to_file()?;

    let path = Config::default_path()?;
    println!("Logged in to {} as '{}'", config.server_url, username);
    println!("Settings saved to {}", path.display());
    Ok(())
}

/// Permanently delete the account server-side, then drop the local
/// session.
pub async fn run_delete_account() -> anyhow::Result<()> {
    let config = Config::from_file()?;
    let client = HaNasClient::new(&config)?;

    let username = config
        .username
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no stored username; run `hanas login` first"))?;

    let confirm = prompt(
        &format!("Type '{}' to delete this account and all its files", username),
        "",
    );
    if confirm != username {
        anyhow::bail!("confirmation did not match; account untouched");
    }

    let password = rpassword::prompt_password("Password: ")?;
    let auth = client.login(&username, &password).await?;
    if !auth.success {
        anyhow::bail!("server rejected credentials for '{}'", username);
    }

    client.delete_account(&password).await?;
    Config::delete()?;

    println!("Account '{}' deleted", username);
    Ok(())
}

pub async fn run_logout() -> anyhow::Result<()> {
    match Config::from_file() {
        Ok(config) => {
            // Best-effort server-side logout; the local session ends
            // either way.
            if let Ok(client) = HaNasClient::new(&config) {
                let _ = client.logout().await;
            }
            Config::delete()?;
            println!("Logged out");
            Ok(())
        }
        Err(ConfigError::Missing) => {
            println!("Not logged in");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn prompt(field: &str, default: &str) -> String {
    if default.is_empty() {
        print!("{}: ", field);
    } else {
        print!("{} [{}]: ", field, default);
    }
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return default.to_string();
    }
    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
