use hanas_client::api::client::ClientError;
use hanas_client::api::models::NodeId;

use super::open_session;

pub async fn run_mkdir(name: &str, parent: Option<NodeId>) -> anyhow::Result<()> {
    let client = open_session().await?;

    match client.create_folder(name, parent).await {
        Ok(created) => {
            println!("Created folder '{}' (id {})", created.name, created.node_id);
            Ok(())
        }
        Err(ClientError::Conflict(_)) => {
            anyhow::bail!("a node named '{}' already exists in that folder", name)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_rm(id: NodeId) -> anyhow::Result<()> {
    let client = open_session().await?;
    client.delete_node(id).await?;
    println!("Deleted node {}", id);
    Ok(())
}

pub async fn run_rename(id: NodeId, new_name: &str) -> anyhow::Result<()> {
    let client = open_session().await?;

    match client.rename_node(id, new_name).await {
        Ok(()) => {
            println!("Renamed node {} to '{}'", id, new_name);
            Ok(())
        }
        Err(ClientError::Conflict(_)) => {
            anyhow::bail!("a node named '{}' already exists in that folder", new_name)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_move(id: NodeId, dest: NodeId, overwrite: bool) -> anyhow::Result<()> {
    let client = open_session().await?;

    match client.move_node(id, dest, overwrite).await {
        Ok(()) => {
            println!("Moved node {} into folder {}", id, dest);
            Ok(())
        }
        Err(ClientError::Conflict(_)) => {
            anyhow::bail!("name collision in folder {}; pass --overwrite to replace", dest)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_copy(id: NodeId, dest: NodeId, overwrite: bool) -> anyhow::Result<()> {
    let client = open_session().await?;

    match client.copy_node(id, dest, overwrite).await {
        Ok(()) => {
            println!("Copied node {} into folder {}", id, dest);
            Ok(())
        }
        Err(ClientError::Conflict(_)) => {
            anyhow::bail!("name collision in folder {}; pass --overwrite to replace", dest)
        }
        Err(e) => Err(e.into()),
    }
}
