// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use campaigndesk::audience::{
    AudiencePatch, create_audience, delete_audience, edit_audience, group_by_brand,
    load_audience_groups, split_list,
};
use campaigndesk::error::{Error, ValidationError};
use campaigndesk::models::{Audience, Brand, Gender, NewAudience, ProductModel};
use campaigndesk::store::{DataStore, SqliteStore};
use campaigndesk::{cli, commands, db};

fn draft(model_id: i64, profile: &str) -> NewAudience {
    NewAudience {
        model_id,
        profile_name: profile.to_string(),
        description: None,
        age_range: "25-45".into(),
        gender: Gender::All,
        location: Some("Sao Paulo".into()),
        interests: split_list("cars, technology"),
        behaviors: Vec::new(),
    }
}

struct Seed {
    store: SqliteStore,
    roadster: i64,
    scooter: i64,
}

fn seed() -> Seed {
    let store = SqliteStore::new(db::open_in_memory().unwrap());
    let acme = store.insert_brand("Acme").unwrap().id;
    let bolt = store.insert_brand("Bolt").unwrap().id;
    let roadster = store.insert_product_model("Roadster", Some(acme)).unwrap().id;
    let scooter = store.insert_product_model("Scooter", Some(bolt)).unwrap().id;
    Seed {
        store,
        roadster,
        scooter,
    }
}

#[test]
fn split_list_trims_and_drops_blanks() {
    assert_eq!(split_list(" cars , ,tech,"), vec!["cars", "tech"]);
    assert!(split_list("").is_empty());
    assert!(split_list(" , ").is_empty());
}

#[test]
fn gender_parses_short_forms() {
    assert_eq!("M".parse::<Gender>(), Ok(Gender::Male));
    assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
    assert_eq!("any".parse::<Gender>(), Ok(Gender::All));
    assert!("other".parse::<Gender>().is_err());
}

#[test]
fn audiences_round_trip_through_sqlite() {
    let s = seed();
    let mut new = draft(s.roadster, "Young urban");
    new.behaviors = vec!["researches online".into()];
    let a = create_audience(&s.store, new).unwrap();
    assert_eq!(a.interests, vec!["cars", "technology"]);

    let stored = s.store.audiences().unwrap();
    assert_eq!(stored, vec![a]);
}

#[test]
fn comma_text_in_list_columns_is_read_as_a_list() {
    let s = seed();
    s.store
        .conn()
        .execute(
            "INSERT INTO audiences(model_id, profile_name, age_range, gender, interests, behaviors)
             VALUES (?1, 'Imported', '30+', 'Masculino', 'golf, travel', '')",
            [s.roadster],
        )
        .unwrap();
    let a = &s.store.audiences().unwrap()[0];
    assert_eq!(a.interests, vec!["golf", "travel"]);
    assert!(a.behaviors.is_empty());
    // unknown stored genders fall back to everyone
    assert_eq!(a.gender, Gender::All);
}

#[test]
fn grouping_follows_the_model_brand_and_skips_orphans() {
    let brands = vec![
        Brand {
            id: 1,
            name: "Acme".into(),
        },
        Brand {
            id: 2,
            name: "Bolt".into(),
        },
    ];
    let models = vec![
        ProductModel {
            id: 10,
            name: "Roadster".into(),
            brand_id: Some(1),
        },
        ProductModel {
            id: 11,
            name: "Loose".into(),
            brand_id: None,
        },
    ];
    let audience = |id: i64, model_id: i64| Audience {
        id,
        model_id,
        profile_name: format!("profile {}", id),
        description: None,
        age_range: "18-35".into(),
        gender: Gender::Female,
        location: None,
        interests: Vec::new(),
        behaviors: Vec::new(),
    };
    let audiences = vec![audience(1, 10), audience(2, 11), audience(3, 99), audience(4, 10)];

    let groups = group_by_brand(&audiences, &models, &brands);
    assert_eq!(groups.skipped, 2);
    assert_eq!(groups.brands.len(), 1);
    assert_eq!(groups.brands[0].brand.name, "Acme");
    let ids: Vec<i64> = groups.brands[0].entries.iter().map(|e| e.audience.id).collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(groups.brands[0].entries[0].model.name, "Roadster");
}

#[test]
fn brand_filter_narrows_the_groups() {
    let s = seed();
    create_audience(&s.store, draft(s.roadster, "Drivers")).unwrap();
    create_audience(&s.store, draft(s.scooter, "Commuters")).unwrap();

    let all = load_audience_groups(&s.store, None);
    assert_eq!(all.brands.len(), 2);
    assert!(all.warnings.is_empty());

    let bolt = s.store.brands().unwrap()[1].id;
    let only_bolt = load_audience_groups(&s.store, Some(bolt));
    assert_eq!(only_bolt.brands.len(), 1);
    assert_eq!(only_bolt.brands[0].entries[0].audience.profile_name, "Commuters");
    assert_eq!(only_bolt.skipped, 0);
}

#[test]
fn required_fields_and_known_models_are_checked() {
    let s = seed();
    let err = create_audience(&s.store, draft(s.roadster, "  ")).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::MissingField("profile name"))
    ));
    let mut no_age = draft(s.roadster, "Drivers");
    no_age.age_range = String::new();
    assert!(create_audience(&s.store, no_age).is_err());
    let err = create_audience(&s.store, draft(404, "Drivers")).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::Unknown { kind: "model", .. })
    ));
    assert!(s.store.audiences().unwrap().is_empty());
}

#[test]
fn edits_patch_only_given_fields() {
    let s = seed();
    let a = create_audience(&s.store, draft(s.roadster, "Drivers")).unwrap();

    let err = edit_audience(&s.store, a.id, AudiencePatch::default()).unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::EmptyUpdate)));

    let edited = edit_audience(
        &s.store,
        a.id,
        AudiencePatch {
            gender: Some(Gender::Male),
            location: Some(String::new()),
            behaviors: Some(vec!["weekend trips".into()]),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(edited.gender, Gender::Male);
    assert_eq!(edited.location, None);
    assert_eq!(edited.interests, a.interests);
    assert_eq!(s.store.audiences().unwrap(), vec![edited]);

    let patch = AudiencePatch {
        profile_name: Some("Other".into()),
        ..Default::default()
    };
    assert!(edit_audience(&s.store, 999, patch).is_err());

    delete_audience(&s.store, a.id).unwrap();
    assert!(delete_audience(&s.store, a.id).is_err());
}

fn run(store: &SqliteStore, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["campaigndesk"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    commands::dispatch(store, "BRL", &matches)
}

#[test]
fn audience_commands_flow() {
    let s = seed();
    run(
        &s.store,
        &[
            "audience", "add", "--model", "roadster", "--profile", "Young urban", "--age", "18-35",
            "--gender", "female", "--interests", "cars, music ,", "--behaviors", "buys online",
        ],
    )
    .unwrap();
    let stored = s.store.audiences().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].gender, Gender::Female);
    assert_eq!(stored[0].interests, vec!["cars", "music"]);
    assert_eq!(stored[0].behaviors, vec!["buys online"]);

    assert!(run(&s.store, &["audience", "add", "--model", "Nope", "--profile", "X", "--age", "20"]).is_err());
    assert!(
        run(
            &s.store,
            &["audience", "add", "--model", "Roadster", "--profile", "X", "--age", "20", "--gender", "other"],
        )
        .is_err()
    );

    let id = stored[0].id.to_string();
    run(&s.store, &["audience", "set", &id, "--model", "Scooter", "--interests", "city"]).unwrap();
    let updated = &s.store.audiences().unwrap()[0];
    assert_eq!(updated.model_id, s.scooter);
    assert_eq!(updated.interests, vec!["city"]);
    assert!(run(&s.store, &["audience", "set", &id]).is_err());

    run(&s.store, &["audience", "list", "--brand", "Bolt", "--json"]).unwrap();
    run(&s.store, &["audience", "list"]).unwrap();
    run(&s.store, &["audience", "rm", &id]).unwrap();
    assert!(s.store.audiences().unwrap().is_empty());
}
