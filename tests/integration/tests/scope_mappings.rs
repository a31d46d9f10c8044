//! Scope mapping and role containment scenarios.

use std::collections::HashSet;

use kc_core::AuthzConfig;
use kc_core::event::EventType;
use kc_model::Role;
use uuid::Uuid;

use crate::common::TestRealm;

/// admin contains editor contains viewer.
fn hierarchy(realm: &TestRealm) -> (Role, Role, Role) {
    let viewer = realm.role("viewer", &[]);
    let editor = realm.role("editor", &[&viewer]);
    let admin = realm.role("admin", &[&editor]);
    (admin, editor, viewer)
}

/// Granting the top of a hierarchy puts every contained role in scope.
#[test]
fn test_admin_grant_covers_hierarchy() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let (admin, editor, viewer) = hierarchy(&realm);
    let outsider = realm.role("auditor", &[]);
    let mut model = realm.load(realm.client("dashboard"))?;

    assert!(model.add_scope_mapping(&admin)?);

    assert!(model.has_scope(&admin));
    assert!(model.has_scope(&editor));
    assert!(model.has_scope(&viewer));
    assert!(!model.has_scope(&outsider));

    // Already covered through containment: no second edge.
    assert!(!model.add_scope_mapping(&viewer)?);
    assert_eq!(model.scope_mappings(), HashSet::from([admin.clone()]));
    assert_eq!(
        model.effective_scope(),
        HashSet::from([admin, editor, viewer])
    );

    Ok(())
}

/// Revoking the only grant removes the whole hierarchy from scope.
#[test]
fn test_revoke_removes_contained_roles() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let (admin, editor, viewer) = hierarchy(&realm);
    let client = realm.client("dashboard");

    let mut model = realm.load(client.clone())?;
    model.add_scope_mapping(&admin)?;

    let mut model = realm.load(client)?;
    assert!(model.remove_scope_mapping(&admin)?);

    assert!(!model.has_scope(&admin));
    assert!(!model.has_scope(&editor));
    assert!(!model.has_scope(&viewer));
    assert!(model.scope_mappings().is_empty());

    Ok(())
}

/// Full scope short-circuits every check and records no edges.
#[test]
fn test_full_scope_allowed() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let (admin, _, viewer) = hierarchy(&realm);
    let client = realm.client("trusted").with_full_scope();
    let mut model = realm.load(client.clone())?;

    assert!(model.has_scope(&admin));
    assert!(model.has_scope(&viewer));
    assert!(!model.add_scope_mapping(&admin)?);
    assert_eq!(realm.scope_mappings.edge_count(client.id), 0);

    model.set_full_scope_allowed(false);
    assert!(!model.has_scope(&admin));

    Ok(())
}

/// Containment edges added after the grant are honoured on the next check.
#[test]
fn test_containment_follows_registry_changes() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let viewer = realm.role("viewer", &[]);
    let admin = realm.role("admin", &[]);
    let mut model = realm.load(realm.client("dashboard"))?;
    model.add_scope_mapping(&admin)?;

    assert!(!model.has_scope(&viewer));
    realm.roles.add_composite(realm.realm_id, admin.id, viewer.id)?;
    assert!(model.has_scope(&viewer));

    Ok(())
}

/// A containment cycle does not hang the check and still yields every role
/// on the cycle.
#[test]
fn test_cycle_terminates() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let a = realm.role("a", &[]);
    let b = realm.role("b", &[&a]);
    realm.roles.add_composite(realm.realm_id, a.id, b.id)?;
    let unrelated = realm.role("unrelated", &[]);
    let mut model = realm.load(realm.client("loop"))?;

    model.add_scope_mapping(&a)?;

    assert!(model.has_scope(&b));
    assert!(!model.has_scope(&unrelated));
    assert_eq!(model.effective_scope().len(), 2);

    Ok(())
}

/// Chains longer than the configured depth are cut.
#[test]
fn test_depth_limit_bounds_traversal() -> anyhow::Result<()> {
    let realm = TestRealm::with_config(AuthzConfig {
        max_role_depth: 2,
        ..AuthzConfig::default()
    });
    let r3 = realm.role("r3", &[]);
    let r2 = realm.role("r2", &[&r3]);
    let r1 = realm.role("r1", &[&r2]);
    let r0 = realm.role("r0", &[&r1]);
    let mut model = realm.load(realm.client("deep"))?;

    model.add_scope_mapping(&r0)?;

    assert!(model.has_scope(&r1));
    assert!(model.has_scope(&r2));
    assert!(!model.has_scope(&r3));

    Ok(())
}

/// A granted role deleted from the registry silently drops out of scope.
#[test]
fn test_deleted_role_drops_out() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let (admin, editor, _) = hierarchy(&realm);
    let mut model = realm.load(realm.client("dashboard"))?;
    model.add_scope_mapping(&admin)?;

    realm.roles.remove(realm.realm_id, admin.id);

    assert!(model.scope_mappings().is_empty());
    assert!(!model.has_scope(&editor));

    Ok(())
}

/// A role the realm cannot resolve is stored once, however often it is
/// granted.
#[test]
fn test_unresolvable_role_granted_once() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let foreign = Role::new_realm_role(Uuid::now_v7(), "foreign");
    let client = realm.client("dashboard");
    let mut model = realm.load(client.clone())?;

    assert!(model.add_scope_mapping(&foreign)?);
    assert!(!model.add_scope_mapping(&foreign)?);
    assert!(!model.add_scope_mapping(&foreign)?);

    assert_eq!(realm.scope_mappings.edge_count(client.id), 1);
    let added = model
        .take_events()
        .iter()
        .filter(|e| e.event_type == EventType::ScopeMappingAdded)
        .count();
    assert_eq!(added, 1);

    // A fresh model sees the stored edge and does not add another.
    let mut reloaded = realm.load(client.clone())?;
    assert!(!reloaded.add_scope_mapping(&foreign)?);
    assert_eq!(realm.scope_mappings.edge_count(client.id), 1);

    Ok(())
}

/// Duplicate edges written by concurrent admins are all removed.
#[test]
fn test_duplicate_edges_removed_together() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let viewer = realm.role("viewer", &[]);
    let client = realm.client("racy");

    let mut first = realm.load(client.clone())?;
    let mut second = realm.load(client.clone())?;
    first.add_scope_mapping(&viewer)?;
    second.add_scope_mapping(&viewer)?;
    assert_eq!(realm.scope_mappings.edge_count(client.id), 2);

    let mut model = realm.load(client.clone())?;
    assert!(model.remove_scope_mapping(&viewer)?);
    assert_eq!(realm.scope_mappings.edge_count(client.id), 0);
    assert!(!model.has_scope(&viewer));

    Ok(())
}

/// Realm scope mappings exclude roles owned by clients.
#[test]
fn test_realm_scope_mappings() -> anyhow::Result<()> {
    let realm = TestRealm::new();
    let viewer = realm.role("viewer", &[]);
    let owner = realm.client("api");
    let manage = Role::new_client_role(realm.realm_id, owner.id, "manage");
    realm.roles.insert(manage.clone());
    let mut model = realm.load(realm.client("frontend"))?;

    model.add_scope_mapping(&viewer)?;
    model.add_scope_mapping(&manage)?;

    assert_eq!(model.realm_scope_mappings(), HashSet::from([viewer]));
    assert_eq!(model.scope_mappings().len(), 2);

    Ok(())
}
