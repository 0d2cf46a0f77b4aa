use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use qprofile_core::application::{ChangeEventPublisher, WorkspaceLoader, load_builtin_profiles};
use qprofile_core::domain::profile::{
    ActiveRule, ActiveRuleChange, ActiveRuleInheritance, ActiveRuleKey, ActiveRuleParam, ChangeType,
    Project, QualityProfile, RulesProfile,
};
use qprofile_core::domain::rule::{RuleId, RuleKey};
use qprofile_core::infrastructure::adapters::{BroadcastChannel, InMemoryStore, StoreDescendants};

fn demo_dir() -> Result<PathBuf> {
    Ok(PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .context("Workspace root not found")?
        .join("demos/acme"))
}

#[tokio::test]
async fn test_built_in_profile_cascades_and_publishes() -> Result<()> {
    // 1. Startup: merge the contributed built-in profiles
    let loaded = load_builtin_profiles(&demo_dir()?)?;
    let sonar_way = loaded
        .registry
        .default_for("java")?
        .context("java has a default profile")?
        .clone();
    assert_eq!(sonar_way.name, "Sonar way");

    // 2. Realize it in storage, with a tenant profile inheriting from it
    let built_in_rp = RulesProfile::new("rp-java-sonar", "Sonar way", "java").built_in();
    let org_rp = RulesProfile::new("rp-org", "Org way", "java");
    let built_in_qp = QualityProfile::on("qp-sonar", &built_in_rp);
    let org_qp = QualityProfile::on("qp-org", &org_rp).with_parent("qp-sonar");

    let mut store = InMemoryStore::with_rule_set(loaded.rule_set.clone());
    store.add_profile(built_in_qp.clone());
    store.add_profile(org_qp.clone());
    for (index, activation) in sonar_way.activations().iter().enumerate() {
        let rule = store
            .rules()
            .find(|r| r.id == activation.rule_id)
            .context("activated rule is in the catalog")?
            .clone();
        for (uuid, rp) in [(format!("b{}", index), &built_in_rp), (format!("o{}", index), &org_rp)] {
            let mut active = ActiveRule::new(
                uuid.clone(),
                ActiveRuleKey::of(rp.key.as_str(), rule.key.clone()),
                rule.id,
                activation.severity.unwrap_or(rule.severity),
            );
            if rp.key == org_rp.key {
                active = active.with_inheritance(ActiveRuleInheritance::Inherited);
            }
            store.add_active_rule(active);
            if let Some(max) = activation.param("max") {
                store.add_active_rule_param(ActiveRuleParam::new(uuid, "max", max));
            }
        }
    }
    store.associate_project(
        Project {
            key: "billing".into(),
            name: "Billing".into(),
        },
        "qp-org",
    );
    let store = Arc::new(store);

    // 3. Walk the inheritance tree for one rule
    let s1067 = RuleId(2);
    let loader = WorkspaceLoader::new(store.clone(), store.clone());
    let mut workspace = loader
        .for_built_in_profile(&built_in_rp, &[s1067], StoreDescendants(store.clone()))
        .await?;

    workspace.reset(s1067)?;
    assert_eq!(workspace.current_profiles()?.len(), 1);
    let base = workspace.current_active_rule()?.context("active on the built-in")?;
    assert_eq!(base.param_value("max"), Some("5"));

    let children = workspace.child_profiles()?;
    assert_eq!(children, vec![org_qp.clone()]);
    workspace.select_child(&children[0])?;
    assert!(workspace.is_cascading());
    let inherited = workspace.current_active_rule()?.context("active on the child")?;
    assert!(!inherited.active_rule.does_override());
    assert!(workspace.current_parent_active_rule()?.is_some());

    // 4. Publish the resulting delta
    let channel = Arc::new(BroadcastChannel::new(8));
    let mut subscriber = channel.subscribe();
    let publisher = ChangeEventPublisher::new(
        store.clone(),
        store.clone(),
        store.clone(),
        channel,
        loaded.config.publisher,
    );

    let change = ActiveRuleChange::new(
        ChangeType::Updated,
        ActiveRuleKey::of("rp-org", RuleKey::of("java", "S1067")),
        s1067,
    )
    .with_parameter("max", Some("2"));
    publisher
        .distribute(&[org_qp.clone()], &[change.clone(), change], "java")
        .await?;

    let event = subscriber.recv().await?;
    assert_eq!(event.project_keys, vec!["billing"]);
    assert_eq!(event.activated_rules.len(), 1);
    assert!(event.deactivated_rules.is_empty());

    // 5. Switching the project back to the built-in profile
    let billing = Project {
        key: "billing".into(),
        name: "Billing".into(),
    };
    publisher
        .publish_for_profile_swap(&billing, Some(&built_in_qp), Some(&org_qp))
        .await?;
    let swap = subscriber.recv().await?;
    assert_eq!(swap.activated_rules.len(), sonar_way.active_rules.len());
    assert_eq!(swap.deactivated_rules.len(), sonar_way.active_rules.len());
    Ok(())
}

#[tokio::test]
async fn test_language_mismatch_is_reported_to_the_caller() -> Result<()> {
    let loaded = load_builtin_profiles(&demo_dir()?)?;
    let store = Arc::new(InMemoryStore::with_rule_set(loaded.rule_set));
    let loader = WorkspaceLoader::new(store.clone(), store.clone());

    let java_rp = RulesProfile::new("rp-java", "Sonar way", "java").built_in();
    let js_rule = RuleId(101);
    let mut workspace = loader
        .for_built_in_profile(&java_rp, &[js_rule], StoreDescendants(store.clone()))
        .await?;

    let err = workspace.reset(js_rule).unwrap_err();
    assert!(err.is_request_error());
    assert_eq!(
        err.to_string(),
        "js rule javascript:S1481 cannot be activated on java profile Sonar way"
    );
    Ok(())
}
