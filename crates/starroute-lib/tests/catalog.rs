mod common;

use common::CatalogBuilder;
use starroute_lib::catalog::{
    load_catalog, Catalog, CatalogDocument, JumpPointKind, SystemSize,
};

use std::io::Write;

#[test]
fn resolution_drops_invalid_edges() {
    let catalog = CatalogBuilder::new()
        .system(1, "Alba", [0.0, 0.0, 0.0])
        .system(2, "Bree", [1.0, 0.0, 0.0])
        .link(1, 2)
        .link(1, 1) // self-loop
        .link(2, 77) // unknown destination
        .build();

    assert_eq!(catalog.system(1).unwrap().jump_points.len(), 1);
    assert!(catalog.system(2).unwrap().jump_points.is_empty());
}

#[test]
fn resolution_synthesises_missing_jump_point_names() {
    let catalog = CatalogBuilder::new()
        .system(1, "Alba", [0.0, 0.0, 0.0])
        .system(2, "Bree", [1.0, 0.0, 0.0])
        .link(1, 2)
        .build();

    let jump = catalog.system(1).unwrap().jump_point_to(2).expect("edge exists");
    assert_eq!(jump.name, "[Alba to Bree]");
}

#[test]
fn factions_claim_their_systems() {
    let catalog = CatalogBuilder::new()
        .faction(10, "Union", false)
        .owned_system(1, "Alba", [0.0, 0.0, 0.0], 10)
        .system(2, "Bree", [1.0, 0.0, 0.0])
        .build();

    let union = catalog.faction(10).expect("faction exists");
    assert!(union.claims(1));
    assert!(!union.claims(2));
    assert_eq!(catalog.system(1).unwrap().faction, Some(10));
}

#[test]
fn unknown_faction_reference_leaves_system_unclaimed() {
    let catalog = CatalogBuilder::new()
        .owned_system(1, "Alba", [0.0, 0.0, 0.0], 99)
        .build();

    assert_eq!(catalog.system(1).unwrap().faction, None);
}

#[test]
fn reverse_edges_are_separate_objects() {
    let catalog = CatalogBuilder::new()
        .system(1, "Alba", [0.0, 0.0, 0.0])
        .system(2, "Bree", [1.0, 0.0, 0.0])
        .system(3, "Cato", [2.0, 0.0, 0.0])
        .link_both(1, 2)
        .link(2, 3) // one-way
        .build();

    let forward = catalog.system(1).unwrap().jump_point_to(2).expect("edge exists");
    let reverse = catalog.reverse_of(forward).expect("reverse exists");
    assert_eq!(reverse.source, 2);
    assert_eq!(reverse.destination, 1);

    let one_way = catalog.system(2).unwrap().jump_point_to(3).expect("edge exists");
    assert!(
        catalog.reverse_of(one_way).is_none(),
        "one-way connections have no reverse edge"
    );
}

#[test]
fn lookups_by_uuid_and_name() {
    let catalog = CatalogBuilder::new()
        .system(1, "Port Vale", [0.0, 0.0, 0.0])
        .build();

    let by_name = catalog.system_by_name("Port Vale").expect("name resolves");
    assert_eq!(by_name.id, 1);
    // Without an explicit uuid the slugged name is used.
    assert_eq!(by_name.uuid, "port-vale");
    assert_eq!(catalog.system_by_uuid("port-vale").map(|s| s.id), Some(1));
}

#[test]
fn fuzzy_matches_suggest_similar_names() {
    let catalog = CatalogBuilder::new()
        .system(1, "Terra", [0.0, 0.0, 0.0])
        .system(2, "Terra Nova", [1.0, 0.0, 0.0])
        .system(3, "Goss", [2.0, 0.0, 0.0])
        .build();

    let matches = catalog.fuzzy_system_matches("Tera", 3);
    assert!(matches.contains(&"Terra".to_string()));
    assert!(!matches.contains(&"Goss".to_string()));

    assert!(catalog.fuzzy_system_matches("Tera", 1).len() <= 1);
    assert!(catalog.fuzzy_system_matches("Zzzqqqxxx", 3).is_empty());
}

#[test]
fn binary_flag_is_derived_from_the_size_class() {
    let document: CatalogDocument = serde_json::from_value(serde_json::json!({
        "systems": [
            { "id": 1, "name": "Twins", "coordinates": [0.0, 0.0, 0.0], "size": "binary" },
            { "id": 2, "name": "Lone", "coordinates": [1.0, 0.0, 0.0], "size": "medium" }
        ]
    }))
    .expect("document decodes");
    let catalog = Catalog::from_document(document).expect("catalog resolves");

    let twins = catalog.system(1).unwrap();
    assert!(twins.binary);
    assert_eq!(twins.size, SystemSize::Binary);
    assert_eq!(twins.scale(), 1.4);
    assert!(!catalog.system(2).unwrap().binary);
}

#[test]
fn load_catalog_reads_a_json_document() {
    let document = serde_json::json!({
        "factions": [
            { "id": 10, "name": "Union", "color": "#4060a0" },
            { "id": 66, "name": "Marauders", "outlaw": true }
        ],
        "systems": [
            {
                "id": 1,
                "name": "Alba",
                "coordinates": [0.0, 0.0, 0.0],
                "faction": 10,
                "jumpPoints": [
                    { "destination": 2, "kind": "confirmed" },
                    { "destination": 3, "kind": "undiscovered" }
                ]
            },
            { "id": 2, "name": "Bree", "coordinates": [3.0, 4.0, 0.0], "faction": 66 },
            { "id": 3, "name": "Cato", "coordinates": [6.0, 0.0, 0.0], "isOffLimits": true }
        ]
    });

    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    write!(file, "{document}").expect("write document");

    let catalog = load_catalog(file.path()).expect("catalog loads");
    assert_eq!(catalog.len(), 3);

    let alba = catalog.system_by_name("Alba").expect("Alba resolves");
    assert_eq!(alba.jump_points.len(), 2);
    assert_eq!(
        alba.jump_point_to(2).map(|jump| jump.kind),
        Some(JumpPointKind::Confirmed)
    );
    assert!(alba.jump_point_to(3).unwrap().is_unconfirmed());
    assert!((alba.jump_point_to(2).unwrap().length(&catalog) - 5.0).abs() < 1e-9);

    assert!(catalog.system_by_name("Cato").unwrap().off_limits);
    assert!(catalog.faction_by_name("Marauders").unwrap().outlaw);
    assert!(catalog.hostile_between(10, 66));
    assert!(!catalog.hostile_between(10, 10));
}
