use std::path::PathBuf;
use std::process::ExitCode;

use ultra_editor_lib::command::{execute_json_batch, CommandResponse};
use ultra_editor_lib::harness::TestHarness;
use ultra_editor_lib::state::{EditorSettings, Scene};

/// Command line arguments
#[derive(Debug, Default)]
struct Args {
    /// Scene file to open before running commands
    scene: Option<PathBuf>,
    /// JSON array of commands to execute
    commands: Option<PathBuf>,
    /// Where to save the scene afterwards
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ultra_editor=info,ultra_editor_lib=info".into()),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: ultra-editor [--scene <file>] [--commands <file>] [--out <file>]");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut iter: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    while let Some(arg) = iter.next() {
        let slot = match arg.as_str() {
            "--scene" => &mut args.scene,
            "--commands" => &mut args.commands,
            "--out" => &mut args.out,
            other => return Err(format!("unknown argument '{other}'")),
        };
        let value = iter
            .next()
            .ok_or_else(|| format!("{arg} needs a path"))?;
        *slot = Some(PathBuf::from(value));
    }
    Ok(args)
}

/// Returns `Ok(false)` when any command failed.
fn run(args: &Args) -> Result<bool, String> {
    let settings = EditorSettings::load();
    let autosave = settings.autosave;
    let mut harness = TestHarness::with_settings(settings);

    if let Some(path) = &args.scene {
        harness
            .state
            .load_from(path)
            .map_err(|e| format!("Failed to load scene {}: {e}", path.display()))?;
    } else if let Some(scene) = autosave.then(Scene::load_autosave).flatten() {
        tracing::info!("restored autosave ({} actors)", scene.actor_count());
        harness.state.replace_scene(scene);
    }

    let mut all_ok = true;
    if let Some(path) = &args.commands {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read commands {}: {e}", path.display()))?;
        let responses = execute_json_batch(&mut harness, &json)?;
        all_ok = responses.iter().all(|r| r.success);
        print_responses(&responses)?;
    }

    if let Some(path) = &args.out {
        harness
            .state
            .save_to(path)
            .map_err(|e| format!("Failed to save scene {}: {e}", path.display()))?;
    } else if autosave {
        harness.state.scene.autosave();
    }

    tracing::info!("{}", harness.state.stats());
    Ok(all_ok)
}

fn print_responses(responses: &[CommandResponse]) -> Result<(), String> {
    let json = serde_json::to_string_pretty(responses).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
