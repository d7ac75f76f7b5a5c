//! # Schema and Filter Model
//!
//! Plain data shared by every stage of a Fetch resolution: the local
//! schema, network classes, beacons and the typed filter values.
//!
//! Design rule: no I/O, no state, no async in this module.

pub mod schema;
pub mod network_class;
pub mod beacon;
pub mod value;

pub use schema::{Schema, SemanticSchema, Class, Property, Kind};
pub use network_class::NetworkClass;
pub use beacon::Beacon;
pub use value::{FilterValue, Operator};
