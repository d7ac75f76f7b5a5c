//! Network classes: classes hosted by another peer in the federation.

use serde::{Deserialize, Serialize};

/// A class on a remote peer, referenced from a local property type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkClass {
    pub peer_name: String,
    pub class_name: String,
}

impl NetworkClass {
    pub fn new(peer_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self { peer_name: peer_name.into(), class_name: class_name.into() }
    }

    /// Parse a `<PeerName>/<ClassName>` type token.
    ///
    /// Total: returns `None` for anything that is not exactly two non-empty
    /// parts around a single `/`. Primitive and local-class tokens land here.
    pub fn parse(token: &str) -> Option<NetworkClass> {
        let (peer, class) = token.split_once('/')?;
        if peer.is_empty() || class.is_empty() || class.contains('/') {
            return None;
        }
        Some(NetworkClass::new(peer, class))
    }
}

impl std::fmt::Display for NetworkClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.peer_name, self.class_name)
    }
}
