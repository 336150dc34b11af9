use anyhow::Context;

use hanas_client::api::client::HaNasClient;
use hanas_client::config::settings::Config;

pub mod info;
pub mod login;
pub mod ls;
pub mod manage;
pub mod share;
pub mod transfer;

/// Build a client from the stored config and open a server session with
/// the stored credentials. Every command except `login` starts here.
pub(crate) async fn open_session() -> anyhow::Result<HaNasClient> {
    let config = Config::from_file()?;
    let client = HaNasClient::new(&config)?;

    let username = config
        .username
        .as_deref()
        .context("no stored username; run `hanas login` first")?;
    let password = config
        .password
        .as_deref()
        .context("no stored password; run `hanas login` first")?;

    let auth = client.login(username, password).await?;
    if !auth.success {
        anyhow::bail!("login rejected for user '{}'", username);
    }

    Ok(client)
}
