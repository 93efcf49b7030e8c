//! Salient CLI: header, constant and build-plan generation for the salient bindings.

mod commands;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use manifest::SalientManifest;

#[derive(Parser)]
#[command(name = "salient", version, about = "Binding toolkit for the salient C library")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List headers in include order
    Headers {
        /// Also list each header's dependencies
        #[arg(long)]
        deps: bool,
    },
    /// Emit the FFI definition text
    Cdef {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate the constants module
    Constants {
        /// Output format
        #[arg(long, value_enum, default_value_t = ConstantsFormat::Module)]
        format: ConstantsFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate enum classes from constant prefixes
    Enums {
        /// `ClassName=PREFIX_` pairs (defaults to [constants.enum_prefixes])
        #[arg(value_name = "NAME=PREFIX")]
        groups: Vec<String>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rewrite the generated constant names in a package __init__.py
    UpdateAll {
        /// The file holding the `# --- From constants.py ---` markers
        #[arg(default_value = "salient/__init__.py")]
        file: PathBuf,
    },
    /// Assemble the native build plan as JSON
    Plan {
        /// Use GCC-style flags on Windows
        #[arg(long)]
        mingw: bool,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Tag a release: update the changelog and version markers, commit and tag
    Release {
        /// Semantic version to tag
        tag: String,
        /// Open an editor for the commit and tag messages
        #[arg(short, long)]
        edit: bool,
        /// Print the changes without writing files or running git
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ConstantsFormat {
    Module,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let (manifest, project_dir) = SalientManifest::load_or_default(&cwd)?;

    match cli.command {
        Commands::Headers { deps } => commands::headers::run(&project_dir, &manifest, deps),
        Commands::Cdef { output } => commands::cdef::run(&project_dir, &manifest, output.as_deref()),
        Commands::Constants { format, output } => commands::constants::run(
            &project_dir,
            &manifest,
            matches!(format, ConstantsFormat::Json),
            output.as_deref(),
        ),
        Commands::Enums { groups, output } => {
            commands::enums::run(&project_dir, &manifest, &groups, output.as_deref())
        }
        Commands::UpdateAll { file } => commands::update_all::run(&project_dir, &manifest, &cwd.join(file)),
        Commands::Plan { mingw, output } => commands::plan::run(&project_dir, &manifest, mingw, output.as_deref()),
        Commands::Release { tag, edit, dry_run } => commands::release::run(&project_dir, &manifest, &tag, edit, dry_run),
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::path::Path;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    /// A checkout with two headers, one including the other, a manifest and a
    /// package init file.
    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "salient.toml",
            "[headers]\npaths = [\"include\"]\n\n[constants.enum_prefixes]\nKey = \"SALIENT_KEY_\"\n\n\
             [build]\nsource_dirs = [\"src\"]\nsources = []\nsource_globs = []\n",
        );
        write(
            root,
            "include/salient.h",
            "#ifndef SALIENT_H\n#define SALIENT_H\n#include \"keys.h\"\n\
             SALIENTLIB_API salient_key_t salient_wait(int flags);\n#endif\n",
        );
        write(
            root,
            "include/keys.h",
            "/* key codes */\n#define SALIENT_KEY_UP 72\n#define SALIENT_KEY_DOWN 80\n\
             typedef int salient_key_t;\n",
        );
        write(root, "src/salient.c", "");
        write(
            root,
            "salient/__init__.py",
            "__all__ = [\n    # --- From constants.py ---\n    # --- End constants.py ---\n]\n",
        );
        dir
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["salient", "-vv", "constants", "--format", "json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Constants { format: ConstantsFormat::Json, output: None }));

        let cli = Cli::try_parse_from(["salient", "release", "1.2.0", "-n"]).unwrap();
        assert!(matches!(cli.command, Commands::Release { dry_run: true, edit: false, .. }));

        assert!(Cli::try_parse_from(["salient", "constants", "--format", "yaml"]).is_err());
    }

    /// Full workflow: cdef -> constants -> enums -> update-all -> plan.
    #[test]
    fn generate_everything_from_a_checkout() {
        let dir = project();
        let nested = dir.path().join("src");
        let (manifest, project_dir) = SalientManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(project_dir, dir.path());

        let cdef_out = dir.path().join("out.cdef");
        commands::cdef::run(&project_dir, &manifest, Some(&cdef_out)).unwrap();
        let cdef = std::fs::read_to_string(&cdef_out).unwrap();
        let keys = cdef.find("typedef int salient_key_t;").unwrap();
        let wait = cdef.find("salient_key_t salient_wait(int flags);").unwrap();
        assert!(keys < wait, "included header must come first");
        assert!(!cdef.contains("SALIENTLIB_API"));
        assert!(!cdef.contains("#ifndef"));

        let constants_out = dir.path().join("constants.py");
        commands::constants::run(&project_dir, &manifest, false, Some(&constants_out)).unwrap();
        assert!(std::fs::read_to_string(&constants_out)
            .unwrap()
            .contains("SALIENT_KEY_UP = 72\nSALIENT_KEY_DOWN = 80\n"));

        let enums_out = dir.path().join("enums.py");
        commands::enums::run(&project_dir, &manifest, &[], Some(&enums_out)).unwrap();
        assert!(std::fs::read_to_string(&enums_out).unwrap().contains("    KEY_UP = 72\n"));

        let init = dir.path().join("salient/__init__.py");
        commands::update_all::run(&project_dir, &manifest, &init).unwrap();
        assert!(std::fs::read_to_string(&init).unwrap().contains("    \"SALIENT_KEY_DOWN\",\n"));

        let plan_out = dir.path().join("plan.json");
        commands::plan::run(&project_dir, &manifest, false, Some(&plan_out)).unwrap();
        let plan: salient_build::BuildPlan =
            serde_json::from_str(&std::fs::read_to_string(&plan_out).unwrap()).unwrap();
        assert_eq!(plan.sources, vec![PathBuf::from("src/salient.c")]);
        assert_eq!(plan.cdef_digest.len(), 64);
    }

    #[test]
    fn mutual_includes_fail() {
        let dir = project();
        write(dir.path(), "include/keys.h", "#include \"salient.h\"\n#define SALIENT_KEY_UP 72\n");
        let (manifest, project_dir) = SalientManifest::find_and_load(dir.path()).unwrap().unwrap();
        let err = commands::cdef::run(&project_dir, &manifest, None).unwrap_err();
        assert!(format!("{err:#}").contains("possible cyclic dependency"));
    }
}
