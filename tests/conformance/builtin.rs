use super::common::step_ids;
use connect_wizard::builtin::*;
use connect_wizard::catalog::{resolve_library_key, resolve_selection};
use connect_wizard::primitives::render_content_path;
use connect_wizard::types::*;
use connect_wizard::{OptionSource, Session, get_default_state, validate};

fn contents(steps: &[ResolvedStep]) -> Vec<&str> {
    steps.iter().map(|s| s.content.as_str()).collect()
}

fn key(session: &Session<'_>, field: &str) -> Option<String> {
    session.state().key_of(field)
}

fn active_ids(session: &Session<'_>) -> Vec<String> {
    session.active_fields().iter().map(|f| f.id().to_string()).collect()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[test]
fn connect_schema_is_valid() {
    let result = validate(connect_schema());
    assert!(result.is_valid(), "errors: {:?}", result.errors);
    let modes: Vec<&str> = connect_schema().modes.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(modes, vec!["framework", "direct", "orm", "mcp"]);
}

#[test]
fn default_state_matches_declared_defaults() {
    let s = get_default_state(connect_schema());
    assert_eq!(s.mode(), Some("framework"));
    assert_eq!(s.key_of("framework").as_deref(), Some("nextjs"));
    assert_eq!(s.key_of("library").as_deref(), Some("supabasejs"));
    assert_eq!(s.get("frameworkUi"), Some(&StateValue::Bool(false)));
    assert_eq!(s.key_of("connectionMethod").as_deref(), Some("direct"));
    assert_eq!(s.key_of("orm").as_deref(), Some("prisma"));
    assert_eq!(s.key_of("mcpClient").as_deref(), Some("cursor"));
    assert!(!s.contains("frameworkVariant"));
    assert!(!s.contains("useSharedPooler"));
}

// ─── Framework mode ──────────────────────────────────────────────────────────

#[test]
fn session_selects_first_variant_and_library() {
    let session = Session::new(connect_schema());
    assert_eq!(key(&session, "frameworkVariant").as_deref(), Some("app"));
    assert_eq!(key(&session, "library").as_deref(), Some("supabasejs"));
}

#[test]
fn framework_mode_steps() {
    let session = Session::new(connect_schema());
    let steps = session.resolved_steps();
    assert_eq!(step_ids(&steps), vec!["install", "configure", "install-skills"]);
    assert_eq!(
        contents(&steps),
        vec!["steps/install", "steps/nextjs/app-router", "steps/skills-install"]
    );
}

#[test]
fn ui_toggle_appends_component_steps() {
    let mut session = Session::new(connect_schema());
    session.update_field("frameworkUi", true);
    let steps = session.resolved_steps();
    assert_eq!(
        step_ids(&steps),
        vec!["install", "configure", "install-skills", "shadcn-add", "shadcn-explore"]
    );
    assert_eq!(steps[3].content, "steps/shadcn/command");
}

#[test]
fn react_selects_create_react_app() {
    let mut session = Session::new(connect_schema());
    session.update_field("framework", "react");
    assert_eq!(key(&session, "frameworkVariant").as_deref(), Some("create-react-app"));
    assert_eq!(session.resolved_steps()[1].content, "steps/react/create-react-app");

    session.update_field("frameworkVariant", "vite");
    assert_eq!(session.resolved_steps()[1].content, "steps/react/vite");
}

#[test]
fn frameworks_without_variants_clear_it() {
    let mut session = Session::new(connect_schema());
    session.update_field("frameworkUi", true);
    session.update_field("framework", "nuxt");
    assert!(!session.state().contains("frameworkVariant"));
    assert!(!session.state().contains("frameworkUi"));

    let steps = session.resolved_steps();
    assert_eq!(step_ids(&steps), vec!["install", "configure", "install-skills"]);
    let (path, warnings) = render_content_path(&steps[1].content, session.state());
    assert_eq!(path, "steps/frameworks/nuxt");
    assert!(warnings.is_empty());
}

#[test]
fn nextjs_to_remix_drops_variant() {
    let mut session = Session::new(connect_schema());
    session.update_field("framework", "remix");
    assert!(!session.state().contains("frameworkVariant"));
}

#[test]
fn library_follows_framework() {
    let mut session = Session::new(connect_schema());
    session.update_field("framework", "flutter");
    assert_eq!(key(&session, "library").as_deref(), Some("supabaseflutter"));
    assert_eq!(install_command_for(session.state()), Some("flutter pub add supabase_flutter"));

    session.update_field("framework", "nextjs");
    assert_eq!(key(&session, "library").as_deref(), Some("supabasejs"));
}

#[test]
fn returning_to_framework_mode_keeps_selection() {
    let mut session = Session::new(connect_schema());
    session.update_field("framework", "react");
    session.set_mode("direct");
    session.set_mode("framework");
    assert_eq!(key(&session, "framework").as_deref(), Some("react"));
    assert_eq!(key(&session, "frameworkVariant").as_deref(), Some("create-react-app"));
}

// ─── Other modes ─────────────────────────────────────────────────────────────

#[test]
fn direct_mode_steps() {
    let mut session = Session::new(connect_schema());
    session.set_mode("direct");
    assert_eq!(
        step_ids(&session.resolved_steps()),
        vec!["connection", "install-skills"]
    );

    session.update_field("connectionType", "nodejs");
    let steps = session.resolved_steps();
    assert_eq!(
        step_ids(&steps),
        vec!["connection", "direct-install", "direct-files", "install-skills"]
    );
    assert_eq!(steps[1].content, "steps/direct/nodejs/install");
}

#[test]
fn shared_pooler_only_for_transaction() {
    let mut session = Session::new(connect_schema());
    session.set_mode("direct");
    assert!(!active_ids(&session).contains(&"useSharedPooler".to_string()));
    session.update_field("connectionMethod", "transaction");
    assert!(active_ids(&session).contains(&"useSharedPooler".to_string()));
    session.update_field("useSharedPooler", true);
    session.update_field("connectionMethod", "session");
    assert!(!session.state().contains("useSharedPooler"));
}

#[test]
fn orm_mode_steps() {
    for orm in ["prisma", "drizzle"] {
        let mut session = Session::new(connect_schema());
        session.set_mode("orm");
        session.update_field("orm", orm);
        let steps = session.resolved_steps();
        assert_eq!(step_ids(&steps), vec!["install", "configure", "install-skills"]);
        assert_eq!(steps[1].content, "{{orm}}");
        assert_eq!(render_content_path(&steps[1].content, session.state()).0, orm);
    }
}

#[test]
fn mcp_client_specific_steps() {
    let mut session = Session::new(connect_schema());
    session.set_mode("mcp");
    let steps = session.resolved_steps();
    assert_eq!(step_ids(&steps), vec!["configure-mcp", "install-skills"]);
    assert_eq!(steps[0].content, "steps/mcp/cursor");

    session.update_field("mcpClient", "codex");
    let steps = session.resolved_steps();
    assert_eq!(
        step_ids(&steps),
        vec![
            "codex-add-server",
            "codex-enable-remote",
            "codex-authenticate",
            "codex-verify",
            "install-skills"
        ]
    );
    assert!(steps[..4].iter().all(|s| s.content.starts_with("steps/mcp/codex/")));

    session.update_field("mcpClient", "claude-code");
    let steps = session.resolved_steps();
    assert_eq!(
        step_ids(&steps),
        vec!["claude-add-server", "claude-authenticate", "install-skills"]
    );
    assert!(steps[0].content.starts_with("steps/mcp/claude-code/"));

    session.update_field("mcpClient", "zed");
    assert_eq!(session.resolved_steps()[0].content, "steps/mcp/generic");
}

#[test]
fn every_mode_offers_skills_install() {
    for mode in &connect_schema().modes {
        let mut session = Session::new(connect_schema());
        session.set_mode(&mode.id);
        let steps = session.resolved_steps();
        assert!(
            steps.iter().any(|s| s.id == "install-skills"),
            "mode {} has no install-skills step",
            mode.id
        );
        assert!(steps.iter().all(|s| !s.content.is_empty()));
    }
}

// ─── Catalog, install commands, option sources ──────────────────────────────

#[test]
fn install_commands() {
    assert_eq!(install_command("supabasejs"), Some("npm install @supabase/supabase-js"));
    assert_eq!(install_command("supabasepy"), Some("pip install supabase"));
    assert_eq!(install_command("supabaseflutter"), Some("flutter pub add supabase_flutter"));
    assert!(install_command("supabaseswift").unwrap().contains("swift package add-dependency"));
    assert!(install_command("supabasekt").unwrap().contains("io.github.jan-tennert.supabase"));
    assert_eq!(install_command("supabasecobol"), None);
}

#[test]
fn catalog_falls_back_to_first_child() {
    let s = State::new().with("framework", "nextjs");
    let selection = resolve_selection(FRAMEWORKS, &s).unwrap();
    assert_eq!(selection.parent, "nextjs");
    assert_eq!(selection.variant, Some("app"));
    assert_eq!(selection.library, Some("supabasejs"));

    let s = State::new().with("framework", "react").with("frameworkVariant", "vite");
    assert_eq!(resolve_selection(FRAMEWORKS, &s).unwrap().variant, Some("vite"));

    let s = State::new().with("framework", "unknown");
    assert_eq!(resolve_selection(FRAMEWORKS, &s).unwrap().parent, "nextjs");

    let s = State::new().with("framework", "flask");
    let selection = resolve_selection(FRAMEWORKS, &s).unwrap();
    assert_eq!(selection.variant, None);
    assert_eq!(resolve_library_key(FRAMEWORKS, &s), Some("supabasepy"));

    assert!(resolve_selection(&[], &State::new()).is_none());
}

#[test]
fn builtin_option_sources() {
    let s = State::new();
    let frameworks = BuiltinOptions.options("frameworks", &s).unwrap();
    assert_eq!(frameworks.len(), FRAMEWORKS.len());
    assert_eq!(frameworks[0].value, "nextjs");

    let methods = BuiltinOptions.options("connectionMethods", &s).unwrap();
    let values: Vec<&str> = methods.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["direct", "transaction", "session"]);
    assert!(methods.iter().all(|o| o.description.is_some()));

    assert!(BuiltinOptions.options("mcpFeatures", &s).is_some());
    assert!(BuiltinOptions.options("nope", &s).is_none());
}

#[test]
fn session_field_options_use_builtin_sources() {
    let mut session = Session::new(connect_schema());
    assert!(!session.field_options("framework", &BuiltinOptions).is_empty());
    assert!(session.field_options("orm", &BuiltinOptions).is_empty());
    session.set_mode("orm");
    let orms = session.field_options("orm", &BuiltinOptions);
    assert_eq!(orms.len(), 2);
}
