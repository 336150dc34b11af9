use hanas_client::api::models::NodeId;

use super::open_session;

pub async fn run_share(id: NodeId) -> anyhow::Result<()> {
    let client = open_session().await?;
    let token = client.create_share(id).await?;

    println!("Share link for node {}:", id);
    println!("  {}", client.share_url(&token));
    Ok(())
}

pub async fn run_unshare(id: NodeId) -> anyhow::Result<()> {
    let client = open_session().await?;
    client.delete_share(id).await?;
    println!("Share link for node {} revoked", id);
    Ok(())
}
