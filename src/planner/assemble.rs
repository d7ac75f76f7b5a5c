//! Plan assembly: zip gateway answers back onto the filters they came from.

use crate::contextionary::SearchResults;
use crate::model::Kind;
use crate::{Error, Result};
use super::{PendingMatch, Plan, PlanProperty};

/// Build the connector plan from the gateway answers.
///
/// `property_results[i]` must answer the request built for `matches[i]`.
/// Result sets are carried over untouched, empty ones included. A length
/// mismatch means the resolver and builder disagree about call order and is
/// reported as `Error::Coordination`.
pub fn assemble(
    kind: Kind,
    class_results: SearchResults,
    property_results: Vec<SearchResults>,
    matches: Vec<PendingMatch>,
) -> Result<Plan> {
    if property_results.len() != matches.len() {
        return Err(Error::Coordination {
            expected: matches.len(),
            got: property_results.len(),
        });
    }

    let properties = property_results
        .into_iter()
        .zip(matches)
        .map(|(possible_names, m)| PlanProperty {
            possible_names,
            operator: m.operator,
            value: m.value,
        })
        .collect();

    Ok(Plan { kind, possible_class_names: class_results, properties })
}
