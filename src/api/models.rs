use serde::{Deserialize, Serialize};

/// Server-assigned node identifier.
pub type NodeId = i64;

/// Client-side alias for the virtual root folder. The server gives the
/// root a real database id; `-1` only means "ask for the root" in a
/// request and is never stored in the cache.
pub const ROOT_ID: NodeId = -1;

/// One entry of the remote tree, as returned by `GET /node/{id}`.
///
/// `children` is `None` until the node's child list has been fetched at
/// least once; an empty folder comes back as `Some(vec![])`. The two are
/// deliberately distinct so callers can render "not loaded yet" and
/// "empty" differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    pub name: String,

    pub is_dir: bool,

    /// Parent folder id; `None` for the root.
    #[serde(rename = "oya_id", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,

    /// Display breadcrumb supplied by the server for directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// File size in bytes; absent for directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    /// ISO-8601 timestamp, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Present when a public share link is active for this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<String>,

    /// Child nodes, wire key `ko`. Exhaustive when present.
    #[serde(rename = "ko", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

impl Node {
    /// Minimal constructor for nodes built client-side (tests, optimistic UI).
    pub fn new(id: NodeId, name: impl Into<String>, is_dir: bool) -> Self {
        Node {
            id,
            user_id: None,
            name: name.into(),
            is_dir,
            parent_id: None,
            path: None,
            size: None,
            updated_at: None,
            share_token: None,
            children: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub username: String,
}

/// `POST /upload` body for folder creation. File uploads go through
/// multipart instead.
#[derive(Debug, Clone, Serialize)]
pub struct CreateFolderRequest {
    pub filename: String,
    pub is_dir: bool,
    #[serde(rename = "oya_id")]
    pub parent_id: Option<NodeId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub node_id: NodeId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest {
    pub src_id: NodeId,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameRequest {
    pub src_id: NodeId,
    pub new_name: String,
}

/// Body for both `POST /move` and `POST /copy`.
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub src_id: NodeId,
    pub dst_id: NodeId,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareRequest {
    pub node_id: NodeId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

/// Generic `{"success":true}` acknowledgement; rename/move/copy also
/// echo the resulting node name.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub name: Option<String>,
}
