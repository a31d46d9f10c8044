//! Client model scenarios: copy-out isolation, identity, secrets and audit.

use std::collections::HashSet;

use kc_core::event::EventType;
use kc_model::Client;

use crate::common::TestRealm;

/// Mutating a returned collection never changes the model.
#[test]
fn test_getters_return_snapshots() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let viewer = realm.role("viewer", &[]);
    let email = realm.claim_mapping("email");
    realm.identity_provider("github");
    let client = realm
        .client("portal")
        .with_redirect_uri("https://portal.example.com/callback");
    let mut model = realm.load(client)?;
    model.add_scope_mapping(&viewer)?;
    model.add_protocol_claim_mappings(&[email.id.to_string()])?;
    model.update_allowed_identity_providers(&["github".to_string()])?;

    let mut roles = model.scope_mappings();
    roles.clear();
    let mut mappings = model.protocol_claim_mappings();
    mappings[0].protocol_claim = "tampered".to_string();
    let mut providers = model.allowed_identity_providers();
    providers.push("google".to_string());
    let mut uris = model.redirect_uris();
    uris.insert("https://attacker.example.com".to_string());

    assert_eq!(model.scope_mappings(), HashSet::from([viewer]));
    assert_eq!(model.protocol_claim_mappings()[0].protocol_claim, "email");
    assert!(!model.has_identity_provider("google"));
    assert!(!model.has_redirect_uri("https://attacker.example.com"));

    Ok(())
}

/// Two models of the same client are equal even when their state differs.
#[test]
fn test_equality_by_id() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let client = realm.client("portal");
    let other = realm.client("portal");

    let first = realm.load(client.clone())?;
    let mut second = realm.load(client)?;
    second.set_enabled(false);
    second.set_attribute("owner", "platform-team");
    let third = realm.load(other)?;

    assert_eq!(first, second);
    assert_ne!(first, third);

    let set: HashSet<_> = [first, second, third].into_iter().collect();
    assert_eq!(set.len(), 2);

    Ok(())
}

/// Secret checks accept only the exact stored value.
#[test]
fn test_secret_rotation() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let client = Client::new_confidential(realm.realm_id, "backend", "first-secret");
    let mut model = realm.load(client)?;

    assert!(model.validate_secret("first-secret"));
    assert!(!model.validate_secret("first"));

    model.set_secret("second-secret");

    assert!(!model.validate_secret("first-secret"));
    assert!(model.validate_secret("second-secret"));
    assert_eq!(model.to_entity().secret.as_deref(), Some("second-secret"));

    Ok(())
}

/// Audit events carry the realm and client and are only produced by
/// effective changes.
#[test]
fn test_audit_trail() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let viewer = realm.role("viewer", &[]);
    let mut model = realm.load(realm.client("portal"))?;

    model.add_scope_mapping(&viewer)?;
    model.add_scope_mapping(&viewer)?;
    model.remove_scope_mapping(&viewer)?;
    model.remove_protocol_claim_mappings(&[viewer.id.to_string()]);

    let events = model.take_events();
    let kinds: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        kinds,
        vec![EventType::ScopeMappingAdded, EventType::ScopeMappingRemoved]
    );
    for event in &events {
        assert_eq!(event.realm_id, Some(realm.realm_id));
        assert_eq!(event.client_id.as_deref(), Some("portal"));
        assert_eq!(event.detail("role_name"), Some("viewer"));
    }

    Ok(())
}
