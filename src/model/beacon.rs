//! Beacons: `weaviate://<peer>/<kind>/<id>` entity references.

use serde::{Deserialize, Serialize};
use super::Kind;

const SCHEME: &str = "weaviate://";

/// A reference to a single entity, possibly on another peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Beacon {
    pub peer: String,
    pub kind: Kind,
    pub id: String,
}

impl Beacon {
    pub fn new(peer: impl Into<String>, kind: Kind, id: impl Into<String>) -> Self {
        Self { peer: peer.into(), kind, id: id.into() }
    }

    /// Parse a beacon string. Returns `None` on any deviation from the format.
    pub fn parse(s: &str) -> Option<Beacon> {
        let rest = s.strip_prefix(SCHEME)?;
        let mut parts = rest.split('/');
        let peer = parts.next().filter(|p| !p.is_empty())?;
        let kind = parts.next().and_then(Kind::from_beacon_segment)?;
        let id = parts.next().filter(|p| !p.is_empty())?;
        if parts.next().is_some() {
            return None;
        }
        Some(Beacon::new(peer, kind, id))
    }
}

impl std::fmt::Display for Beacon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME}{}/{}/{}", self.peer, self.kind.beacon_segment(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let b = Beacon::new("peerName", Kind::Thing, "uuid1");
        assert_eq!(b.to_string(), "weaviate://peerName/things/uuid1");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            Beacon::parse("weaviate://peerName/actions/uuid2"),
            Some(Beacon::new("peerName", Kind::Action, "uuid2"))
        );
        assert_eq!(Beacon::parse("weaviate://peerName/places/uuid2"), None);
        assert_eq!(Beacon::parse("http://peerName/things/uuid2"), None);
        assert_eq!(Beacon::parse("weaviate://peerName/things"), None);
        assert_eq!(Beacon::parse("weaviate://peerName/things/a/b"), None);
    }
}
