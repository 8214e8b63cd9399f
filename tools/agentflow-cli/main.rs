use agentflow::config::EditorConfig;
use agentflow::editor::{EditorSession, NotificationLevel};
use agentflow::error::EditorError;
use agentflow::flow::{NodePatch, NodeType, Position};
use agentflow::registry;
use agentflow::store::{FileStore, FlowStore};
use agentflow::template;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

/// Edit and manage agent flows from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage directory (overrides the config file)
    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new working flow
    New {
        /// Display name of the new flow
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Add a node below the last one (or at --x/--y)
    Add {
        node_type: NodeType,
        #[arg(long, requires = "y", allow_hyphen_values = true)]
        x: Option<f64>,
        #[arg(long, requires = "x", allow_hyphen_values = true)]
        y: Option<f64>,
    },
    /// Set a node field, e.g. `set node_1 content "Hello"`
    Set {
        node_id: String,
        key: String,
        value: String,
    },
    /// Move a node to canvas coordinates
    Move {
        node_id: String,
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },
    /// Connect two nodes
    Connect { source: String, target: String },
    /// Remove a connection between two nodes
    Disconnect { source: String, target: String },
    /// Delete a node and every connection to it
    Delete { node_id: String },
    /// Rename the working flow
    Rename { name: String },
    /// Print the working flow as JSON
    Show,
    /// List the editable fields of a node type
    Fields { node_type: String },
    /// Save the working flow to the catalog
    Save,
    /// Save the working flow and mark it active
    Deploy,
    /// List saved flows
    List,
    /// Open a saved flow as the working flow
    Open { flow_id: String },
    /// Delete a saved flow
    DeleteFlow { flow_id: String },
    /// Write the working flow to a JSON file named after it
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Replace the working flow with a JSON document
    Import { path: PathBuf },
    /// List the built-in templates
    Templates,
    /// Start a new working flow from a template
    UseTemplate { template_id: String },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EditorConfig::default(),
    };

    let store_dir = cli
        .store
        .clone()
        .or_else(|| config.storage_path())
        .or_else(|| dirs::data_dir().map(|d| d.join("agentflow")))
        .unwrap_or_else(|| exit_with_error("Could not determine a storage directory; pass --store"));

    let backend = FileStore::open(&store_dir)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to open store: {}", e)));
    let mut session = EditorSession::open(FlowStore::new(backend), config);

    let result = run_command(&mut session, cli.command);
    for note in session.take_notifications() {
        let tag = match note.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        eprintln!("[{}] {}: {}", tag, note.title, note.description);
    }
    if let Err(e) = result {
        exit_with_error(&e.to_string());
    }
}

/// Applies one command. Commands that edit the graph write the working record afterwards.
fn run_command(
    session: &mut EditorSession<FileStore>,
    command: Command,
) -> Result<(), EditorError> {
    let edited = match command {
        Command::New { name } => {
            session.new_flow();
            if let Some(name) = name {
                session.rename(name);
            }
            true
        }
        Command::Add { node_type, x, y } => {
            let id = match (x, y) {
                (Some(x), Some(y)) => session.add_node_at(node_type, Position::new(x, y)),
                _ => session.add_node(node_type),
            };
            println!("{}", id);
            true
        }
        Command::Set {
            node_id,
            key,
            value,
        } => {
            let patch = NodePatch::from_pair(&key, &value)
                .unwrap_or_else(|e| exit_with_error(&e));
            if !session.update_node(&node_id, &patch) {
                exit_with_error(&format!("No node with id '{}'", node_id));
            }
            true
        }
        Command::Move { node_id, x, y } => {
            if !session.move_node(&node_id, Position::new(x, y)) {
                exit_with_error(&format!("No node with id '{}'", node_id));
            }
            true
        }
        Command::Connect { source, target } => {
            session.connect(&source, &target)?;
            true
        }
        Command::Disconnect { source, target } => {
            session.disconnect(&source, &target)?;
            true
        }
        Command::Delete { node_id } => {
            if !session.delete_node(&node_id) {
                exit_with_error(&format!("No node with id '{}'", node_id));
            }
            true
        }
        Command::Rename { name } => {
            session.rename(name);
            true
        }
        Command::Show => {
            println!("{}", session.code_view());
            false
        }
        Command::Fields { node_type } => {
            let fields = registry::fields_for_name(&node_type);
            if fields.is_empty() {
                println!("No editable fields for '{}'", node_type);
            }
            for field in fields {
                let default = field.default.map_or(String::new(), |d| format!(" [default: {}]", d));
                println!("{:<12} {:<18} {}{}", field.key, field.label, field.placeholder, default);
            }
            false
        }
        Command::Save => {
            let summary = session.save()?;
            println!("{}", summary.id);
            false
        }
        Command::Deploy => {
            let summary = session.deploy()?;
            println!("{} ({})", summary.id, summary.status);
            false
        }
        Command::List => {
            for summary in session.list_flows()? {
                println!(
                    "{:<40} {:<9} {}  {}",
                    summary.id,
                    summary.status,
                    summary.modified_at().format("%Y-%m-%d %H:%M"),
                    summary.name
                );
            }
            false
        }
        Command::Open { flow_id } => {
            session.open_flow(&flow_id)?;
            true
        }
        Command::DeleteFlow { flow_id } => {
            if !session.delete_flow(&flow_id)? {
                println!("Nothing stored for '{}'", flow_id);
            }
            true
        }
        Command::Export { out } => {
            let exported = session.export();
            let path = out.join(&exported.file_name);
            fs::write(&path, exported.contents).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
            });
            println!("{}", path.display());
            false
        }
        Command::Import { path } => {
            let text = fs::read_to_string(&path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read '{}': {}", path.display(), e))
            });
            session.import(&text)?;
            true
        }
        Command::Templates => {
            for t in template::builtin_templates() {
                println!("{:<12} {:<30} {:<10} {}", t.id, t.title, t.category, t.difficulty);
            }
            false
        }
        Command::UseTemplate { template_id } => {
            session.new_from_template(&template_id)?;
            true
        }
    };

    if edited {
        session.autosave()?;
    }
    Ok(())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
