use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;

#[cfg(test)]
use mockall::automock;

use crate::api::client::ClientError;
use crate::api::models::{Node, NodeId, ROOT_ID};

/// Backend collaborator the cache fetches folder snapshots through.
/// `None` requests the virtual root. Implemented by `HaNasClient` for
/// the real server and mocked in tests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NodeFetcher: Send + Sync {
    async fn fetch_node(&self, id: Option<NodeId>) -> Result<Node, ClientError>;
}

/// Single source of truth for the locally known state of the remote
/// tree.
///
/// Holds an id -> Node mapping of every folder fetched so far plus the
/// rooted tree reachable from the cached root. Each successful fetch is
/// grafted into the tree at the position matching its id; branches the
/// snapshot does not mention are left alone, since a snapshot is
/// authoritative only for the node it describes.
///
/// Reads never suspend and never block on in-flight fetches: readers
/// see the last committed value until a refresh lands. All state sits
/// behind one mutex that is never held across an await, so mutations
/// from concurrent tasks serialize at the commit point and a failed
/// fetch commits nothing. Two racing forced refreshes for the same id
/// resolve last-to-complete-wins; callers needing stricter ordering
/// must serialize their own calls.
pub struct FolderTreeCache<F> {
    fetcher: F,
    state: Mutex<CacheState>,
    changes: watch::Sender<Option<Node>>,
}

#[derive(Default)]
struct CacheState {
    root: Option<Node>,
    loaded: HashMap<NodeId, Node>,
}

impl<F: NodeFetcher> FolderTreeCache<F> {
    pub fn new(fetcher: F) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            fetcher,
            state: Mutex::new(CacheState::default()),
            changes,
        }
    }

    /// The cached root with whatever depth has been loaded, or `None`
    /// if the root was never fetched.
    pub fn get_root(&self) -> Option<Node> {
        self.lock_state().root.clone()
    }

    /// Cached entry for `id`: the id -> Node mapping first, then a
    /// depth-first walk from the root for nodes only ever seen inside a
    /// parent's child list.
    pub fn get_node(&self, id: NodeId) -> Option<Node> {
        let state = self.lock_state();
        if let Some(node) = state.loaded.get(&id) {
            return Some(node.clone());
        }
        state
            .root
            .as_ref()
            .and_then(|root| find_node(root, id))
            .cloned()
    }

    /// Observe root changes. The receiver always holds the latest
    /// committed root; every successful `load_folder` / `refresh_tree`
    /// publishes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Node>> {
        self.changes.subscribe()
    }

    /// Return the cached folder, fetching it first if it is unknown or
    /// `force_refresh` is set. On fetch failure the cache is untouched
    /// and the error propagates; retry policy belongs to the caller.
    pub async fn load_folder(
        &self,
        id: NodeId,
        force_refresh: bool,
    ) -> Result<Node, ClientError> {
        if !force_refresh {
            let hit = {
                let state = self.lock_state();
                if id == ROOT_ID {
                    state.root.clone()
                } else {
                    state.loaded.get(&id).cloned()
                }
            };
            if let Some(node) = hit {
                debug!("folder {} served from cache", id);
                return Ok(node);
            }
        }

        let request = if id == ROOT_ID { None } else { Some(id) };
        let fetched = self.fetcher.fetch_node(request).await?;
        debug!(
            "fetched folder {} ({} children)",
            fetched.id,
            fetched.children.as_ref().map_or(0, Vec::len)
        );

        let root = {
            let mut state = self.lock_state();
            state.loaded.insert(fetched.id, fetched.clone());
            state.merge(&fetched, request.is_none());
            state.root.clone()
        };
        self.changes.send_replace(root);

        Ok(fetched)
    }

    /// Drop everything and rebuild from a fresh root fetch. The swap
    /// happens only after the fetch succeeds, so readers keep the prior
    /// tree while the refresh is in flight and on failure.
    pub async fn refresh_tree(&self) -> Result<Node, ClientError> {
        let fetched = self.fetcher.fetch_node(None).await?;
        debug!("tree refreshed, new root {}", fetched.id);

        {
            let mut state = self.lock_state();
            state.loaded.clear();
            state.loaded.insert(fetched.id, fetched.clone());
            state.root = Some(fetched.clone());
        }
        self.changes.send_replace(Some(fetched.clone()));

        Ok(fetched)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().expect("cache state lock poisoned")
    }
}

impl CacheState {
    /// Graft a fresh snapshot into the rooted tree. A snapshot whose id
    /// is absent from the tree stays reachable through the mapping only,
    /// until an ancestor fetch links it in.
    fn merge(&mut self, fetched: &Node, was_root_request: bool) {
        match &self.root {
            Some(root) if root.id == fetched.id => {
                self.root = Some(fetched.clone());
            }
            Some(root) => {
                if let Some(updated) = replace_node(root, fetched) {
                    self.root = Some(updated);
                }
            }
            None if was_root_request || fetched.parent_id.is_none() => {
                self.root = Some(fetched.clone());
            }
            None => {}
        }
    }
}

/// Depth-first search by id through `children` links.
fn find_node(node: &Node, id: NodeId) -> Option<&Node> {
    if node.id == id {
        return Some(node);
    }
    node.children
        .as_ref()?
        .iter()
        .find_map(|child| find_node(child, id))
}

/// First-match wholesale replacement of the node with `fresh.id`,
/// rebuilding only the ancestor path of the match. Ids are unique, so
/// the walk stops at the first hit. Returns `None` when the id is not
/// in this subtree, leaving the caller's value untouched.
fn replace_node(node: &Node, fresh: &Node) -> Option<Node> {
    if node.id == fresh.id {
        return Some(fresh.clone());
    }

    let children = node.children.as_ref()?;
    let (index, updated) = children
        .iter()
        .enumerate()
        .find_map(|(i, child)| replace_node(child, fresh).map(|u| (i, u)))?;

    let mut rebuilt = node.clone();
    if let Some(children) = rebuilt.children.as_mut() {
        children[index] = updated;
    }
    Some(rebuilt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: NodeId, name: &str, children: Vec<Node>) -> Node {
        let mut node = Node::new(id, name, true);
        node.children = Some(children);
        node
    }

    #[test]
    fn find_node_walks_nested_children() {
        let root = folder(
            1,
            "/",
            vec![folder(2, "a", vec![Node::new(3, "a.txt", false)])],
        );

        assert_eq!(find_node(&root, 3).map(|n| n.name.as_str()), Some("a.txt"));
        assert!(find_node(&root, 99).is_none());
    }

    #[test]
    fn find_node_stops_at_unfetched_folders() {
        // id 2 has no children loaded; nothing below it is reachable.
        let root = folder(1, "/", vec![Node::new(2, "a", true)]);
        assert!(find_node(&root, 3).is_none());
    }

    #[test]
    fn replace_node_rebuilds_only_matching_branch() {
        let untouched = folder(2, "a", vec![Node::new(21, "a1", false)]);
        let root = folder(1, "/", vec![untouched.clone(), folder(3, "b", vec![])]);

        let fresh = folder(3, "b", vec![Node::new(31, "b1", false)]);
        let updated = replace_node(&root, &fresh).expect("id 3 is in the tree");

        let children = updated.children.as_ref().unwrap();
        assert_eq!(children[0], untouched);
        assert_eq!(children[1], fresh);
    }

    #[test]
    fn replace_node_misses_return_none() {
        let root = folder(1, "/", vec![folder(2, "a", vec![])]);
        let fresh = folder(99, "ghost", vec![]);
        assert!(replace_node(&root, &fresh).is_none());
    }

    #[test]
    fn replace_node_replaces_wholesale_not_union() {
        let root = folder(
            1,
            "/",
            vec![folder(2, "a", vec![Node::new(21, "old.txt", false)])],
        );

        let fresh = folder(2, "a", vec![Node::new(22, "new.txt", false)]);
        let updated = replace_node(&root, &fresh).unwrap();

        assert!(find_node(&updated, 22).is_some());
        assert!(find_node(&updated, 21).is_none());
    }
}
