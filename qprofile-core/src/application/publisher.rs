// qprofile-core/src/application/publisher.rs

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::profile::{
    ActiveRule, ActiveRuleChange, ChangeType, ParamChange, Project, QualityProfile, RuleChange,
    RuleSetChangedEvent,
};
use crate::domain::rule::{RuleDefinition, RuleId};
use crate::error::QProfileError;
use crate::infrastructure::config::PublisherConfig;
use crate::ports::{EventChannel, ProfileStore, RuleCatalog, RuleSearchIndex};

/// Turns completed activation batches into [`RuleSetChangedEvent`]s.
///
/// Holds no mutable state: concurrent calls from independent batches are fine.
pub struct ChangeEventPublisher {
    catalog: Arc<dyn RuleCatalog>,
    store: Arc<dyn ProfileStore>,
    search: Arc<dyn RuleSearchIndex>,
    channel: Arc<dyn EventChannel>,
    config: PublisherConfig,
}

impl ChangeEventPublisher {
    pub fn new(
        catalog: Arc<dyn RuleCatalog>,
        store: Arc<dyn ProfileStore>,
        search: Arc<dyn RuleSearchIndex>,
        channel: Arc<dyn EventChannel>,
        config: PublisherConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            search,
            channel,
            config,
        }
    }

    /// A project switched from `deactivated` to `activated`. Emits one event
    /// scoped to the project with the full rule set of each side, even when
    /// both sides are empty.
    #[instrument(skip_all, fields(project = %project.key))]
    pub async fn publish_for_profile_swap(
        &self,
        project: &Project,
        activated: Option<&QualityProfile>,
        deactivated: Option<&QualityProfile>,
    ) -> Result<(), QProfileError> {
        let (activated_rules, deactivated_rules) = futures::try_join!(
            self.rule_set_of(activated),
            self.rule_set_of(deactivated)
        )?;

        self.emit(RuleSetChangedEvent {
            project_keys: vec![project.key.clone()],
            activated_rules,
            deactivated_rules,
        });
        Ok(())
    }

    /// Emits one event for the deltas of a batch, scoped to every project
    /// using one of `profiles`. Nothing is emitted for an empty batch.
    #[instrument(skip_all, fields(language = %language, deltas = changes.len()))]
    pub async fn distribute(
        &self,
        profiles: &[QualityProfile],
        changes: &[ActiveRuleChange],
        language: &str,
    ) -> Result<(), QProfileError> {
        if changes.is_empty() {
            return Ok(());
        }

        let rule_ids: Vec<RuleId> = unique(changes.iter().map(|c| c.rule_id));
        let rules = self.rules_by_ids(&rule_ids).await?;
        let templates = self.templates_of(rules.values()).await?;

        let mut activated_rules = BTreeSet::new();
        let mut deactivated_rules = BTreeSet::new();
        for change in changes {
            let rule = rules
                .get(&change.rule_id)
                .ok_or(DomainError::MissingRuleDefinition(change.rule_id))?;
            let template_key = template_key(rule, &templates)?;
            let params = change
                .parameters
                .iter()
                .map(|(key, value)| ParamChange {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect();
            let rule_change = RuleChange {
                key: change.key.rule_key.to_string(),
                language: language.to_string(),
                severity: change.severity,
                params,
                template_key,
            };
            match change.change_type {
                ChangeType::Activated | ChangeType::Updated => {
                    activated_rules.insert(rule_change);
                }
                ChangeType::Deactivated => {
                    deactivated_rules.insert(rule_change);
                }
            }
        }

        let mut project_keys = BTreeSet::new();
        for profile in profiles {
            let projects = self.store.selected_projects_of(profile).await?;
            project_keys.extend(projects.into_iter().map(|p| p.key));
        }

        self.emit(RuleSetChangedEvent {
            project_keys: project_keys.into_iter().collect(),
            activated_rules,
            deactivated_rules,
        });
        Ok(())
    }

    fn emit(&self, event: RuleSetChangedEvent) {
        debug!(
            projects = event.project_keys.len(),
            activated = event.activated_rules.len(),
            deactivated = event.deactivated_rules.len(),
            "Emitting rule set change"
        );
        self.channel.push(event);
    }

    /// Every rule activated on the profile, with its effective configuration.
    async fn rule_set_of(
        &self,
        profile: Option<&QualityProfile>,
    ) -> Result<BTreeSet<RuleChange>, QProfileError> {
        let Some(profile) = profile else {
            return Ok(BTreeSet::new());
        };

        let rule_ids = self.search.search_activated_rule_ids(profile, true).await?;
        let rules_profile_keys = [profile.rules_profile_key.clone()];

        let mut changes = BTreeSet::new();
        for chunk in rule_ids.chunks(self.config.batch_size.max(1)) {
            let rules = self.rules_by_ids(chunk).await?;
            let templates = self.templates_of(rules.values()).await?;

            let active_rules = self.store.active_rules(chunk, &rules_profile_keys).await?;
            let uuids: Vec<String> = active_rules.iter().map(|ar| ar.uuid.clone()).collect();
            let mut params_by_uuid: HashMap<String, BTreeMap<String, String>> = HashMap::new();
            for param in self.store.active_rule_params(&uuids).await? {
                params_by_uuid
                    .entry(param.active_rule_uuid)
                    .or_default()
                    .insert(param.name, param.value);
            }

            for active_rule in &active_rules {
                let rule = rules
                    .get(&active_rule.rule_id)
                    .ok_or(DomainError::MissingRuleDefinition(active_rule.rule_id))?;
                let params = params_by_uuid.remove(&active_rule.uuid).unwrap_or_default();
                changes.insert(rule_change(rule, active_rule, params, &templates)?);
            }
        }

        info!(profile = %profile.key, rules = changes.len(), "Collected activated rules");
        Ok(changes)
    }

    async fn rules_by_ids(
        &self,
        ids: &[RuleId],
    ) -> Result<HashMap<RuleId, RuleDefinition>, QProfileError> {
        let mut rules = HashMap::new();
        for chunk in ids.chunks(self.config.batch_size.max(1)) {
            for rule in self.catalog.rules_by_ids(chunk).await? {
                rules.insert(rule.id, rule);
            }
        }
        Ok(rules)
    }

    /// Template rules pointed to by `rules`, by id.
    async fn templates_of<'a>(
        &self,
        rules: impl Iterator<Item = &'a RuleDefinition>,
    ) -> Result<HashMap<RuleId, RuleDefinition>, QProfileError> {
        let template_ids: Vec<RuleId> = unique(rules.filter_map(|r| r.template_id));
        if template_ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.rules_by_ids(&template_ids).await
    }
}

fn unique<T: Copy + Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

/// Follows the template pointer one level.
fn template_key(
    rule: &RuleDefinition,
    templates: &HashMap<RuleId, RuleDefinition>,
) -> Result<Option<String>, DomainError> {
    match rule.template_id {
        None => Ok(None),
        Some(template_id) => templates
            .get(&template_id)
            .map(|template| Some(template.key.to_string()))
            .ok_or_else(|| DomainError::UnresolvedTemplate {
                rule_key: rule.key.clone(),
                template_id,
            }),
    }
}

fn rule_change(
    rule: &RuleDefinition,
    active_rule: &ActiveRule,
    params: BTreeMap<String, String>,
    templates: &HashMap<RuleId, RuleDefinition>,
) -> Result<RuleChange, DomainError> {
    Ok(RuleChange {
        key: rule.key.to_string(),
        language: rule.language.clone(),
        severity: Some(active_rule.severity),
        params: params
            .into_iter()
            .map(|(key, value)| ParamChange {
                key,
                value: Some(value),
            })
            .collect(),
        template_key: template_key(rule, templates)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::domain::profile::{ActiveRuleKey, ActiveRuleParam, RulesProfile};
    use crate::domain::rule::{RuleKey, Severity};
    use crate::infrastructure::adapters::InMemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChannel {
        events: Mutex<Vec<RuleSetChangedEvent>>,
    }

    impl EventChannel for RecordingChannel {
        fn push(&self, event: RuleSetChangedEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl RecordingChannel {
        fn events(&self) -> Vec<RuleSetChangedEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    fn java_profile(key: &str) -> QualityProfile {
        QualityProfile::on(key, &RulesProfile::new(format!("rp-{}", key), key, "java"))
    }

    fn project(key: &str) -> Project {
        Project {
            key: key.to_string(),
            name: key.to_uppercase(),
        }
    }

    fn fixture() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        let mut template = RuleDefinition::new(RuleId(10), RuleKey::of("java", "XPath"), "java", Severity::Major);
        template.is_template = true;
        let mut custom = RuleDefinition::new(RuleId(11), RuleKey::of("java", "NoFoo"), "java", Severity::Minor);
        custom.template_id = Some(RuleId(10));
        let mut external = RuleDefinition::new(RuleId(12), RuleKey::of("external_pmd", "X"), "java", Severity::Info);
        external.is_external = true;

        store.add_rule(RuleDefinition::new(RuleId(1), RuleKey::of("java", "S1"), "java", Severity::Major));
        store.add_rule(RuleDefinition::new(RuleId(2), RuleKey::of("java", "S2"), "java", Severity::Minor));
        store.add_rule(template);
        store.add_rule(custom);
        store.add_rule(external);

        store.add_profile(java_profile("new"));
        store.add_profile(java_profile("old"));

        store.add_active_rule(
            ActiveRule::new("n1", ActiveRuleKey::of("rp-new", RuleKey::of("java", "S1")), RuleId(1), Severity::Critical),
        );
        store.add_active_rule(
            ActiveRule::new("n2", ActiveRuleKey::of("rp-new", RuleKey::of("java", "NoFoo")), RuleId(11), Severity::Minor),
        );
        store.add_active_rule(
            ActiveRule::new("n3", ActiveRuleKey::of("rp-new", RuleKey::of("external_pmd", "X")), RuleId(12), Severity::Info),
        );
        store.add_active_rule(
            ActiveRule::new("o1", ActiveRuleKey::of("rp-old", RuleKey::of("java", "S2")), RuleId(2), Severity::Minor),
        );
        store.add_active_rule_param(ActiveRuleParam::new("n1", "max", "7"));

        store.associate_project(project("p2"), "new");
        store.associate_project(project("p1"), "new");
        store.associate_project(project("p1"), "old");
        store
    }

    fn publisher(store: InMemoryStore, batch_size: usize) -> (ChangeEventPublisher, Arc<RecordingChannel>) {
        let store = Arc::new(store);
        let channel = Arc::new(RecordingChannel::default());
        let publisher = ChangeEventPublisher::new(
            store.clone(),
            store.clone(),
            store,
            channel.clone(),
            PublisherConfig { batch_size },
        );
        (publisher, channel)
    }

    fn change(change_type: ChangeType, rule: &str, id: u64) -> ActiveRuleChange {
        ActiveRuleChange::new(change_type, ActiveRuleKey::of("rp-new", RuleKey::of("java", rule)), RuleId(id))
    }

    #[tokio::test]
    async fn test_profile_swap_emits_both_sides() {
        let (publisher, channel) = publisher(fixture(), 2);

        publisher
            .publish_for_profile_swap(&project("p1"), Some(&java_profile("new")), Some(&java_profile("old")))
            .await
            .unwrap();

        let events = channel.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.project_keys, vec!["p1"]);

        let activated: Vec<&RuleChange> = event.activated_rules.iter().collect();
        assert_eq!(activated.len(), 3);
        let s1 = activated.iter().find(|c| c.key == "java:S1").unwrap();
        assert_eq!(s1.severity, Some(Severity::Critical));
        assert_eq!(s1.params, vec![ParamChange { key: "max".into(), value: Some("7".into()) }]);
        let custom = activated.iter().find(|c| c.key == "java:NoFoo").unwrap();
        assert_eq!(custom.template_key.as_deref(), Some("java:XPath"));
        assert!(activated.iter().any(|c| c.key == "external_pmd:X"));

        let deactivated: Vec<&str> = event.deactivated_rules.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(deactivated, vec!["java:S2"]);
    }

    #[tokio::test]
    async fn test_profile_swap_with_missing_sides_still_emits() {
        let (publisher, channel) = publisher(fixture(), 1000);

        publisher
            .publish_for_profile_swap(&project("p1"), None, None)
            .await
            .unwrap();

        let events = channel.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_template_fails_the_publish_call() {
        let mut store = fixture();
        let mut orphan = RuleDefinition::new(RuleId(20), RuleKey::of("java", "Orphan"), "java", Severity::Major);
        orphan.template_id = Some(RuleId(99));
        store.add_rule(orphan);
        store.add_active_rule(
            ActiveRule::new("n9", ActiveRuleKey::of("rp-new", RuleKey::of("java", "Orphan")), RuleId(20), Severity::Major),
        );
        let (publisher, channel) = publisher(store, 1000);

        let err = publisher
            .publish_for_profile_swap(&project("p1"), Some(&java_profile("new")), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InternalConsistency);
        assert!(channel.events().is_empty());
    }

    #[tokio::test]
    async fn test_distribute_without_changes_never_emits() {
        let (publisher, channel) = publisher(fixture(), 1000);

        publisher
            .distribute(&[java_profile("new")], &[], "java")
            .await
            .unwrap();

        assert!(channel.events().is_empty());
    }

    #[tokio::test]
    async fn test_distribute_fails_on_rule_missing_from_catalog() {
        let (publisher, channel) = publisher(fixture(), 1000);
        let changes = vec![change(ChangeType::Activated, "Ghost", 777)];

        let err = publisher
            .distribute(&[java_profile("new")], &changes, "java")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InternalConsistency);
        assert!(matches!(
            err,
            QProfileError::Domain(DomainError::MissingRuleDefinition(RuleId(777)))
        ));
        assert!(channel.events().is_empty());
    }

    #[tokio::test]
    async fn test_distribute_collapses_duplicate_changes() {
        let (publisher, channel) = publisher(fixture(), 1000);
        let changes = vec![
            change(ChangeType::Activated, "S1", 1).with_severity(Severity::Major),
            change(ChangeType::Activated, "S1", 1).with_severity(Severity::Major),
            change(ChangeType::Deactivated, "S2", 2),
        ];

        publisher
            .distribute(&[java_profile("new")], &changes, "java")
            .await
            .unwrap();

        let events = channel.events();
        assert_eq!(events.len(), 1);
        let s1: Vec<&RuleChange> = events[0]
            .activated_rules
            .iter()
            .filter(|c| c.key == "java:S1")
            .collect();
        assert_eq!(s1.len(), 1);
        assert_eq!(events[0].deactivated_rules.len(), 1);
    }

    #[tokio::test]
    async fn test_distribute_scopes_event_to_selected_projects() {
        let (publisher, channel) = publisher(fixture(), 1000);
        let changes = vec![
            change(ChangeType::Updated, "NoFoo", 11)
                .with_severity(Severity::Blocker)
                .with_parameter("regex", Some("foo")),
        ];

        publisher
            .distribute(&[java_profile("new"), java_profile("old")], &changes, "java")
            .await
            .unwrap();

        let event = &channel.events()[0];
        assert_eq!(event.project_keys, vec!["p1", "p2"]);

        let updated = event.activated_rules.iter().next().unwrap();
        assert_eq!(updated.language, "java");
        assert_eq!(updated.severity, Some(Severity::Blocker));
        assert_eq!(updated.template_key.as_deref(), Some("java:XPath"));
        assert_eq!(updated.params[0].value.as_deref(), Some("foo"));
    }
}
