use hanas_client::api::models::NodeId;
use hanas_client::util::format::{format_size, format_timestamp};

use super::open_session;

/// Detail view for one node, the CLI counterpart of the apps' node
/// info sheet.
pub async fn run_info(id: NodeId) -> anyhow::Result<()> {
    let client = open_session().await?;
    let node = client.get_node(Some(id)).await?;

    println!("{}", node.name);
    println!("  id:       {}", node.id);
    println!("  kind:     {}", if node.is_dir { "folder" } else { "file" });
    if let Some(parent_id) = node.parent_id {
        println!("  parent:   {}", parent_id);
    }
    if let Some(path) = &node.path {
        println!("  path:     {}", path);
    }
    if let Some(size) = node.size {
        println!("  size:     {}", format_size(size));
    }
    if let Some(updated) = &node.updated_at {
        println!("  updated:  {}", format_timestamp(updated));
    }
    if let Some(children) = &node.children {
        println!("  entries:  {}", children.len());
    }

    if node.is_dir {
        return Ok(());
    }

    println!("  download: {}", client.download_url(node.id));
    println!("  view:     {}", client.view_url(node.id));
    println!("  preview:  {}", client.thumbnail_url(node.id));
    if let Some(token) = &node.share_token {
        println!("  shared:   {}", client.share_url(token));
    }

    Ok(())
}

pub async fn run_whoami() -> anyhow::Result<()> {
    let client = open_session().await?;
    let info = client.me().await?;

    println!("{} (user id {}) at {}", info.username, info.user_id, client.base_url());
    Ok(())
}
