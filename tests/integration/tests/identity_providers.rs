//! Identity provider allow-list scenarios.

use kc_authz::AuthzError;
use kc_core::event::{EventOutcome, EventType};

use crate::common::TestRealm;

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// An empty allow-list permits every provider; a populated one restricts.
#[test]
fn test_empty_allow_list_means_all() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    realm.identity_provider("github");
    realm.identity_provider("google");
    let mut model = realm.load(realm.client("portal"))?;

    assert!(model.has_identity_provider("github"));
    assert!(model.has_identity_provider("never-registered"));

    model.update_allowed_identity_providers(&ids(&["github"]))?;
    assert!(model.has_identity_provider("github"));
    assert!(!model.has_identity_provider("google"));

    model.update_allowed_identity_providers(&[])?;
    assert!(model.has_identity_provider("google"));

    Ok(())
}

/// One unknown id fails the whole update and leaves the list untouched.
#[test]
fn test_unknown_provider_rejected() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    realm.identity_provider("github");
    realm.identity_provider("google");
    let mut model = realm.load(realm.client("portal"))?;
    model.update_allowed_identity_providers(&ids(&["github"]))?;
    model.take_events();

    let result = model.update_allowed_identity_providers(&ids(&["google", "ghost"]));

    assert!(matches!(result, Err(AuthzError::UnknownIdentityProvider(ref id)) if id == "ghost"));
    assert_eq!(model.allowed_identity_providers(), ids(&["github"]));

    let events = model.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::IdentityProvidersUpdated);
    assert_eq!(events[0].outcome, EventOutcome::Failure);

    Ok(())
}

/// The allow-list survives a save and reload through the entity.
#[test]
fn test_allow_list_persists_through_entity() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    realm.identity_provider("github");
    realm.identity_provider("corp-saml");
    let mut model = realm.load(realm.client("portal"))?;

    model.update_allowed_identity_providers(&ids(&["corp-saml", "github"]))?;
    let events = model.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].detail("added"), Some("corp-saml,github"));

    let reloaded = realm.load(model.to_entity())?;
    assert_eq!(reloaded.allowed_identity_providers(), ids(&["corp-saml", "github"]));

    // Same list again is not a change.
    let mut reloaded = reloaded;
    reloaded.update_allowed_identity_providers(&ids(&["github", "corp-saml"]))?;
    assert!(reloaded.take_events().is_empty());

    Ok(())
}
