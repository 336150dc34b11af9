use hanas_client::api::models::{Node, NodeId, ROOT_ID};
use hanas_client::cache::tree::FolderTreeCache;
use hanas_client::util::format::{format_size, format_timestamp};

use super::open_session;

pub async fn run(id: Option<NodeId>, refresh: bool, tree: bool) -> anyhow::Result<()> {
    let client = open_session().await?;
    let cache = FolderTreeCache::new(client);

    let folder = cache.load_folder(id.unwrap_or(ROOT_ID), refresh).await?;

    let header = folder.path.as_deref().unwrap_or(folder.name.as_str());
    println!("{} (id {})", header, folder.id);

    if tree {
        print_tree(&folder, 0);
        return Ok(());
    }

    match &folder.children {
        Some(children) if children.is_empty() => println!("  (empty)"),
        Some(children) => {
            for child in children {
                print_entry(child);
            }
        }
        None => println!("  (not a folder)"),
    }

    Ok(())
}

fn print_entry(node: &Node) {
    let size = match node.size {
        Some(bytes) => format_size(bytes),
        None if node.is_dir => "-".to_string(),
        None => "?".to_string(),
    };
    let updated = node
        .updated_at
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_default();
    let marker = if node.is_dir { "d" } else { "-" };
    let shared = if node.share_token.is_some() { "s" } else { " " };

    println!(
        "{}{} {:>10}  {:16}  {:>6}  {}",
        marker, shared, size, updated, node.id, node.name
    );
}

// Indented view of whatever depth has been loaded; unfetched folders
// show as a bare name.
fn print_tree(node: &Node, level: usize) {
    let indent = "  ".repeat(level);
    let suffix = if node.is_dir { "/" } else { "" };
    println!("{}{}{} ({})", indent, node.name, suffix, node.id);

    if let Some(children) = &node.children {
        for child in children {
            print_tree(child, level + 1);
        }
    }
}
