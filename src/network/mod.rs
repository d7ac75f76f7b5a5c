//! Network cross-reference extraction.
//!
//! Federated fetches must know which remote classes the local schema points
//! at before any beacon can be dereferenced. This module walks a schema and
//! collects those `<Peer>/<Class>` references.

use hashbrown::HashSet;
use crate::model::{Kind, NetworkClass, Schema};

/// Collect every network class referenced by a property type in `schema`.
///
/// Never fails. Every declared type token of every property is checked on
/// its own; tokens that are not `<Peer>/<Class>` are skipped. Duplicates are
/// dropped and the output keeps first-discovery order, walking `Actions`
/// before `Things`.
pub fn extract_network_classes(schema: Option<&Schema>) -> Vec<NetworkClass> {
    let mut found = Vec::new();
    let Some(schema) = schema else { return found };

    let mut seen: HashSet<(String, String)> = HashSet::new();

    for kind in [Kind::Action, Kind::Thing] {
        let Some(collection) = schema.collection(kind) else { continue };
        for class in &collection.classes {
            for property in &class.properties {
                for token in &property.data_type {
                    let Some(nc) = NetworkClass::parse(token) else { continue };
                    if seen.insert((nc.peer_name.clone(), nc.class_name.clone())) {
                        tracing::trace!(
                            kind = %kind,
                            class = %class.class,
                            property = %property.name,
                            network_class = %nc,
                            "found network class"
                        );
                        found.push(nc);
                    }
                }
            }
        }
    }

    found
}
