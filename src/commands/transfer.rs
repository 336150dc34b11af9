use anyhow::Context;
use std::path::{Path, PathBuf};

use hanas_client::api::models::NodeId;
use hanas_client::util::format::format_size;

use super::open_session;

pub async fn run_upload(path: &Path, parent: Option<NodeId>) -> anyhow::Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("upload path has no usable file name")?
        .to_string();

    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let size = data.len() as i64;

    let client = open_session().await?;
    let uploaded = client.upload_file(&filename, data, parent).await?;

    println!(
        "Uploaded '{}' ({}) as node {}",
        uploaded.name,
        format_size(size),
        uploaded.node_id
    );
    Ok(())
}

pub async fn run_download(id: NodeId, output: Option<PathBuf>) -> anyhow::Result<()> {
    let client = open_session().await?;

    // Without an explicit destination, name the file after the node.
    let dest = match output {
        Some(path) => path,
        None => {
            let node = client.get_node(Some(id)).await?;
            if node.is_dir {
                anyhow::bail!("node {} is a folder; downloads are per file", id);
            }
            PathBuf::from(node.name)
        }
    };

    let written = client.download_to_file(id, &dest).await?;
    println!(
        "Downloaded node {} to {} ({})",
        id,
        dest.display(),
        format_size(written as i64)
    );
    Ok(())
}
