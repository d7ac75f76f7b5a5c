//! End-to-end tests against the in-memory gateway and connector.
//!
//! The schema feeds the gateway's candidate names; the connector holds the
//! objects. Exercises fuzzy class/property names through to projected rows.

use pretty_assertions::assert_eq;
use serde_json::json;

use fetch_resolver::{
    Class, Error, FetchConfig, Kind, MemoryConnector, MemoryGateway, Property, RequestContext,
    Resolver, Schema, SemanticSchema, StoredObject,
};

fn schema() -> Schema {
    Schema::new()
        .with_things(SemanticSchema::new([
            Class::new("City")
                .with_property(Property::new("population", ["int"]))
                .with_property(Property::new("name", ["string"])),
            Class::new("Airport").with_property(Property::new("code", ["string"])),
        ]))
        .with_actions(SemanticSchema::new([
            Class::new("Flight").with_property(Property::new("from", ["Airport"])),
        ]))
}

fn setup() -> Resolver<MemoryGateway, MemoryConnector> {
    let config = FetchConfig::from_json(r#"{"peer_name": "peerName"}"#).unwrap();
    let gateway = MemoryGateway::from_schema(&schema(), config.gateway.clone()).unwrap();
    let connector = MemoryConnector::from_config(&config).unwrap();

    connector.insert(
        StoredObject::new(Kind::Thing, "City", "amsterdam")
            .with_property("name", "Amsterdam")
            .with_property("population", 800_000),
    );
    connector.insert(
        StoredObject::new(Kind::Thing, "City", "utrecht")
            .with_property("name", "Utrecht")
            .with_property("population", 350_000),
    );
    connector.insert(StoredObject::new(Kind::Thing, "Airport", "ams").with_property("code", "AMS"));
    connector.insert(StoredObject::new(Kind::Action, "Flight", "kl1001"));

    Resolver::new(gateway, connector)
}

#[tokio::test]
async fn test_fuzzy_class_and_property() {
    let resolver = setup();

    let result = resolver.resolve(&RequestContext::new(), r#"{
        Fetch {
            Things(where: {
                class: { name: "cities", certainty: 0.3, keywords: [{value: "city", weight: 0.9}] }
                properties: { name: "population", certainty: 0.9, operator: GreaterThan, valueInt: 500000 }
            }) { beacon certainty }
        }
    }"#).await.unwrap();

    assert_eq!(
        result.get(&["Fetch", "Things"]),
        Some(&json!([{"beacon": "weaviate://peerName/things/amsterdam", "certainty": 0.9}]))
    );
    assert_eq!(result.row_count, 1);
}

#[tokio::test]
async fn test_aliases_shape_the_response() {
    let resolver = setup();

    let result = resolver.resolve(&RequestContext::new(), r#"{
        f: Fetch {
            t: Things(where: { class: { name: "Airport", certainty: 0.9 } }) {
                ref: beacon score: certainty beacon
            }
        }
    }"#).await.unwrap();

    assert_eq!(
        result.data,
        json!({"f": {"t": [{
            "ref": "weaviate://peerName/things/ams",
            "score": 1.0,
            "beacon": "weaviate://peerName/things/ams"
        }]}})
    );
}

#[tokio::test]
async fn test_actions_kind() {
    let resolver = setup();

    let result = resolver.resolve(&RequestContext::new(), r#"{
        Fetch { Actions(where: { class: { name: "Flight", certainty: 0.9 } }) { beacon } }
    }"#).await.unwrap();

    assert_eq!(
        result.get(&["Fetch", "Actions"]),
        Some(&json!([{"beacon": "weaviate://peerName/actions/kl1001"}]))
    );
}

#[tokio::test]
async fn test_no_matching_class_yields_empty_list() {
    let resolver = setup();

    let result = resolver.resolve(&RequestContext::new(), r#"{
        Fetch { Things(where: { class: { name: "Volcano", certainty: 0.9 } }) { beacon } }
    }"#).await.unwrap();

    assert_eq!(result.get(&["Fetch", "Things"]), Some(&json!([])));
}

#[tokio::test]
async fn test_unreachable_gateway() {
    let resolver = setup();
    resolver.gateway().set_reachable(false);

    let err = resolver.resolve(&RequestContext::new(), r#"{
        Fetch { Things(where: { class: { name: "City", certainty: 0.9 } }) { beacon } }
    }"#).await.unwrap_err();

    assert!(matches!(err, Error::Gateway(_)));
}
