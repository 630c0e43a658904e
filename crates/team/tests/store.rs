//! Persistence: sentinel masking, round-trips, listing, deletion.

use quorum_agent::{AgentConfig, ProviderDefaults};
use quorum_llm::ProviderKind;
use quorum_sandbox::{Sandbox, SandboxPolicy};
use quorum_team::{CONFIG_KEY_SENTINEL, TeamManager, TeamStore, safe_name};
use std::sync::Arc;

fn manager(project: &tempfile::TempDir, store: &tempfile::TempDir) -> TeamManager {
    let mut defaults = ProviderDefaults::default();
    defaults
        .api_keys
        .insert(ProviderKind::Grok, "config-secret-key".into());
    let sandbox = Arc::new(Sandbox::new(SandboxPolicy::new(project.path()).unwrap()));
    TeamManager::new(
        TeamStore::new(store.path()),
        defaults,
        reqwest::Client::new(),
        sandbox,
    )
}

fn squad_configs() -> [AgentConfig; 2] {
    [
        AgentConfig::new("lead", "Lead", "Planner", ProviderKind::Grok, "grok-3")
            .with_api_key("explicit-key"),
        // No key: inherits the config default.
        AgentConfig::new("dev", "Dev", "Builder", ProviderKind::Grok, "grok-3"),
    ]
}

#[test]
fn save_masks_config_sourced_keys() {
    let project = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();
    let mut manager = manager(&project, &store_dir);

    manager.create("Squad").unwrap();
    for config in squad_configs() {
        manager.add_agent(config).unwrap();
    }
    let path = manager.save(None).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    // The default key never lands on disk; the sentinel stands in for it.
    assert!(!json.contains("config-secret-key"));
    assert!(json.contains(CONFIG_KEY_SENTINEL));
    // Explicit keys are the agent's own and are persisted as-is.
    assert!(json.contains("explicit-key"));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["agents"][1]["apiKey"], "__config__");
    assert_eq!(value["agents"][0]["apiKey"], "explicit-key");
}

#[test]
fn load_round_trips_identity_and_resolves_keys() {
    let project = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();

    {
        let mut m = manager(&project, &store_dir);
        m.create("Squad").unwrap();
        for config in squad_configs() {
            m.add_agent(config).unwrap();
        }
        m.save(None).unwrap();
    }

    // A fresh manager over the same store.
    let mut m = manager(&project, &store_dir);
    m.load("Squad").unwrap();
    let team = m.current().unwrap();

    assert_eq!(team.name, "Squad");
    let ids: Vec<&str> = team.agents.iter().map(|a| a.config.id.as_str()).collect();
    assert_eq!(ids, ["lead", "dev"]);
    assert_eq!(team.agents[0].config.model, "grok-3");
    assert_eq!(team.agents[0].config.api_key.as_deref(), Some("explicit-key"));
    // The sentinel came back as None and resolves through config.
    assert_eq!(team.agents[1].config.api_key, None);
    let defaults = {
        let mut d = ProviderDefaults::default();
        d.api_keys
            .insert(ProviderKind::Grok, "config-secret-key".into());
        d
    };
    assert_eq!(
        team.agents[1].config.resolve_key(&defaults).as_deref(),
        Some("config-secret-key")
    );
}

#[test]
fn list_and_delete() {
    let project = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();
    let mut m = manager(&project, &store_dir);

    m.create("alpha").unwrap();
    m.add_agent(AgentConfig::new("a", "A", "Role", ProviderKind::Ollama, "llama3.2"))
        .unwrap();
    m.save(None).unwrap();
    m.create("beta").unwrap();
    m.save(None).unwrap();

    let listed = m.list().unwrap();
    let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["alpha", "beta"]);
    assert_eq!(listed[0].agent_count, 1);
    assert_eq!(listed[1].agent_count, 0);

    // Deleting the selected team deselects it.
    assert!(m.delete("beta").unwrap());
    assert!(m.current().is_none());
    assert!(!m.delete("beta").unwrap());
    assert_eq!(m.list().unwrap().len(), 1);
}

#[test]
fn duplicate_agent_ids_are_rejected() {
    let project = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();
    let mut m = manager(&project, &store_dir);

    m.create("team").unwrap();
    m.add_agent(AgentConfig::new("x", "X", "Role", ProviderKind::Ollama, "m"))
        .unwrap();
    let err = m
        .add_agent(AgentConfig::new("x", "Y", "Role", ProviderKind::Ollama, "m"))
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn explicit_keys_survive_reload() {
    let project = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();

    {
        let mut m = manager(&project, &store_dir);
        m.create("solo").unwrap();
        m.add_agent(
            AgentConfig::new("c", "C", "Role", ProviderKind::Claude, "claude-sonnet-4")
                .with_api_key("sk-ant-explicit"),
        )
        .unwrap();
        m.save(None).unwrap();
    }

    // Manager without a Claude config key: the agent carried its own, so
    // the load still succeeds.
    let mut m = manager(&project, &store_dir);
    m.load("solo").unwrap();
    assert_eq!(m.current().unwrap().len(), 1);
}

#[test]
fn safe_names_key_the_files() {
    let project = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();
    let mut m = manager(&project, &store_dir);

    m.create("My Team!").unwrap();
    let path = m.save(None).unwrap();
    assert!(path.ends_with(format!("{}.json", safe_name("My Team!"))));
    assert!(path.ends_with("My_Team_.json"));

    // Loading goes through the same fold.
    let mut fresh = manager(&project, &store_dir);
    fresh.load("My Team!").unwrap();
    assert_eq!(fresh.current().unwrap().name, "My Team!");
}
