//! The connect sheet shipped with the crate.
//!
//! Enabled by the `builtin` feature. The schema document lives in
//! `schemas/connect.yaml` and is parsed once on first use; the option lists
//! that the document references by `source` are served by [`BuiltinOptions`].

use crate::catalog::{CatalogNode, resolve_library_key};
use crate::fields::OptionSource;
use crate::types::{FieldOption, Schema, State};
use std::sync::LazyLock;

/// Source text of the built-in connect schema.
pub const CONNECT_SCHEMA_YAML: &str = include_str!("../schemas/connect.yaml");

static CONNECT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    crate::parse::parse(CONNECT_SCHEMA_YAML).expect("built-in connect schema is well-formed")
});

/// The parsed built-in connect schema.
pub fn connect_schema() -> &'static Schema {
    &CONNECT_SCHEMA
}

// ─── Framework catalog ──────────────────────────────────────────────────────

const SUPABASE_JS: &[CatalogNode] = &[CatalogNode::leaf("supabasejs", "supabase-js")];
const SUPABASE_FLUTTER: &[CatalogNode] = &[CatalogNode::leaf("supabaseflutter", "supabase-flutter")];
const SUPABASE_SWIFT: &[CatalogNode] = &[CatalogNode::leaf("supabaseswift", "supabase-swift")];
const SUPABASE_KT: &[CatalogNode] = &[CatalogNode::leaf("supabasekt", "supabase-kt")];
const SUPABASE_PY: &[CatalogNode] = &[CatalogNode::leaf("supabasepy", "supabase-py")];

const NEXTJS_VARIANTS: &[CatalogNode] = &[
    CatalogNode::with_children("app", "App Router", SUPABASE_JS),
    CatalogNode::with_children("pages", "Pages Router", SUPABASE_JS),
];

const REACT_VARIANTS: &[CatalogNode] = &[
    CatalogNode::with_children("create-react-app", "Create React App", SUPABASE_JS),
    CatalogNode::with_children("vite", "Vite", SUPABASE_JS),
];

/// Framework → variant → library. Frameworks without variants list their
/// libraries directly.
pub static FRAMEWORKS: &[CatalogNode] = &[
    CatalogNode::with_children("nextjs", "Next.js", NEXTJS_VARIANTS),
    CatalogNode::with_children("react", "React", REACT_VARIANTS),
    CatalogNode::with_children("remix", "Remix", SUPABASE_JS),
    CatalogNode::with_children("nuxt", "Nuxt", SUPABASE_JS),
    CatalogNode::with_children("vuejs", "Vue.js", SUPABASE_JS),
    CatalogNode::with_children("sveltekit", "SvelteKit", SUPABASE_JS),
    CatalogNode::with_children("flutter", "Flutter", SUPABASE_FLUTTER),
    CatalogNode::with_children("swift", "Swift", SUPABASE_SWIFT),
    CatalogNode::with_children("androidkotlin", "Android Kotlin", SUPABASE_KT),
    CatalogNode::with_children("flask", "Flask", SUPABASE_PY),
];

// ─── Install commands ───────────────────────────────────────────────────────

/// Package manager command that installs each client library.
pub const INSTALL_COMMANDS: &[(&str, &str)] = &[
    ("supabasejs", "npm install @supabase/supabase-js"),
    ("supabasepy", "pip install supabase"),
    ("supabaseflutter", "flutter pub add supabase_flutter"),
    (
        "supabaseswift",
        "swift package add-dependency https://github.com/supabase/supabase-swift.git",
    ),
    (
        "supabasekt",
        "implementation(platform(\"io.github.jan-tennert.supabase:bom:VERSION\"))",
    ),
];

pub fn install_command(library: &str) -> Option<&'static str> {
    INSTALL_COMMANDS
        .iter()
        .find(|(key, _)| *key == library)
        .map(|(_, command)| *command)
}

/// Install command for the library the framework selection in `state` lands on.
pub fn install_command_for(state: &State) -> Option<&'static str> {
    resolve_library_key(FRAMEWORKS, state).and_then(install_command)
}

// ─── Option sources ─────────────────────────────────────────────────────────

const CONNECTION_METHODS: &[(&str, &str, &str)] = &[
    ("direct", "Direct connection", "Ideal for applications with persistent connections"),
    ("transaction", "Transaction pooler", "Ideal for stateless applications such as serverless functions"),
    ("session", "Session pooler", "Only recommended as an alternative to direct connection over IPv4"),
];

const ORMS: &[(&str, &str)] = &[("prisma", "Prisma"), ("drizzle", "Drizzle")];

const MCP_CLIENTS: &[(&str, &str)] = &[
    ("cursor", "Cursor"),
    ("vscode", "VS Code"),
    ("windsurf", "Windsurf"),
    ("claude-code", "Claude Code"),
    ("codex", "Codex"),
];

const MCP_FEATURES: &[(&str, &str)] = &[
    ("docs", "Documentation"),
    ("account", "Account"),
    ("database", "Database"),
    ("debugging", "Debugging"),
    ("development", "Development"),
    ("functions", "Edge Functions"),
    ("branching", "Branching"),
    ("storage", "Storage"),
];

/// Serves the `frameworks`, `connectionMethods`, `orms`, `mcpClients`, and
/// `mcpFeatures` sources referenced by the built-in schema.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinOptions;

impl OptionSource for BuiltinOptions {
    fn options(&self, source: &str, _state: &State) -> Option<Vec<FieldOption>> {
        let options = match source {
            "frameworks" => FRAMEWORKS.iter().map(CatalogNode::to_option).collect(),
            "connectionMethods" => CONNECTION_METHODS
                .iter()
                .map(|(value, label, description)| FieldOption {
                    description: Some((*description).to_string()),
                    ..FieldOption::new(*value, *label)
                })
                .collect(),
            "orms" => pairs(ORMS),
            "mcpClients" => pairs(MCP_CLIENTS),
            "mcpFeatures" => pairs(MCP_FEATURES),
            _ => return None,
        };
        Some(options)
    }
}

fn pairs(entries: &[(&str, &str)]) -> Vec<FieldOption> {
    entries
        .iter()
        .map(|(value, label)| FieldOption::new(*value, *label))
        .collect()
}
