//! Protocol claim mapping scenarios.

use kc_authz::AuthzError;
use kc_core::{AuthzConfig, UnknownIdPolicy};
use uuid::Uuid;

use crate::common::TestRealm;

/// Unknown claim mapping ids are skipped by default.
#[test]
fn test_unknown_ids_skipped() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let email = realm.claim_mapping("email");
    let groups = realm.claim_mapping("groups");
    let mut model = realm.load(realm.client("portal"))?;

    model.add_protocol_claim_mappings(&[
        email.id.to_string(),
        Uuid::now_v7().to_string(),
        groups.id.to_string(),
    ])?;

    let attached: Vec<Uuid> = model.protocol_claim_mappings().iter().map(|m| m.id).collect();
    assert_eq!(attached, vec![email.id, groups.id]);

    Ok(())
}

/// Under the reject policy an unknown id attaches nothing.
#[test]
fn test_reject_policy() -> anyhow::Result<()> {
    let realm = TestRealm::with_config(AuthzConfig {
        claim_mapping_unknown_ids: UnknownIdPolicy::Reject,
        ..AuthzConfig::default()
    });
    let email = realm.claim_mapping("email");
    let mut model = realm.load(realm.client("portal"))?;
    let ghost = Uuid::now_v7().to_string();

    let result = model.add_protocol_claim_mappings(&[email.id.to_string(), ghost]);

    assert!(matches!(result, Err(AuthzError::UnknownClaimMapping(_))));
    assert!(model.protocol_claim_mappings().is_empty());
    assert!(model.take_events().is_empty());

    Ok(())
}

/// Ids that are not UUIDs follow the unknown-id policy instead of failing
/// the caller.
#[test]
fn test_malformed_ids_follow_policy() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let email = realm.claim_mapping("email");
    let mut model = realm.load(realm.client("portal"))?;

    model.add_protocol_claim_mappings(&[email.id.to_string(), "email-mapper".to_string()])?;

    assert_eq!(model.protocol_claim_mappings(), vec![email.clone()]);
    let events = model.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].detail("skipped"), Some("email-mapper"));

    let strict = TestRealm::with_config(AuthzConfig {
        claim_mapping_unknown_ids: UnknownIdPolicy::Reject,
        ..AuthzConfig::default()
    });
    let mut model = strict.load(strict.client("portal"))?;
    let result = model.add_protocol_claim_mappings(&["email-mapper"]);
    assert!(matches!(result, Err(AuthzError::UnknownClaimMapping(ref id)) if id == "email-mapper"));

    Ok(())
}

/// Adding is idempotent and removal ignores ids that are not attached.
#[test]
fn test_add_and_remove() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let email = realm.claim_mapping("email");
    let groups = realm.claim_mapping("groups");
    let mut model = realm.load(realm.client("portal"))?;

    model.add_protocol_claim_mappings(&[email.id.to_string(), groups.id.to_string()])?;
    model.add_protocol_claim_mappings(&[email.id.to_string()])?;
    assert_eq!(model.claim_mapping_catalog().len(), 2);
    assert_eq!(model.take_events().len(), 1);

    model.remove_protocol_claim_mappings(&[email.id.to_string(), Uuid::now_v7().to_string()]);
    assert_eq!(model.protocol_claim_mappings(), vec![groups]);

    model.remove_protocol_claim_mappings(&[email.id.to_string()]);
    assert_eq!(model.take_events().len(), 1);

    Ok(())
}

/// Claim mappings survive a save and reload through the entity.
#[test]
fn test_claim_mappings_persist_through_entity() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let email = realm.claim_mapping("email");
    let mut model = realm.load(realm.client("portal"))?;
    model.add_protocol_claim_mappings(&[email.id.to_string()])?;

    let reloaded = realm.load(model.to_entity())?;

    assert!(reloaded.claim_mapping_catalog().contains(email.id));
    assert_eq!(reloaded.protocol_claim_mappings(), vec![email]);

    Ok(())
}
