//! Command dispatch and handlers

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::{ExampleOrigin, RenderOptions};
use crate::application::{ApplicationError, JsonResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands, ExamplesCommands, PayloadCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::domain::{parse_condition, DecisionTree, DomainError, InputAssignment};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e).into());
    };

    // commands that need neither settings nor services
    match command {
        Commands::Parse { condition } => return cmd_parse(condition),
        Commands::Completion { shell } => return cmd_completion(*shell),
        Commands::Config {
            command: ConfigCommands::Template,
        } => {
            output::info(&Settings::template());
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings)?;

    match command {
        Commands::Defaults { tree } => cmd_defaults(&container, tree),
        Commands::Variations { tree, inputs } => cmd_variations(&container, tree, inputs.as_deref()),
        Commands::Samples { tree, inputs } => cmd_samples(&container, tree, inputs.as_deref()),
        Commands::Render {
            tree,
            result,
            unreachable,
            json,
        } => cmd_render(&container, tree, result.as_deref(), unreachable.as_deref(), *json),
        Commands::Validate { tree } => cmd_validate(&container, tree),
        Commands::Payload { command } => cmd_payload(&container, command),
        Commands::Export { result, output } => cmd_export(&container, result, output.as_deref()),
        Commands::Examples { command } => cmd_examples(&container, command),
        Commands::Config { command } => cmd_config(&container, command, cli.config.as_deref()),
        Commands::Parse { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, kind: &str) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).as_document(kind, "output")?;
    output::info(&json);
    Ok(())
}

fn load_tree(c: &ServiceContainer, source: &str) -> CliResult<DecisionTree> {
    Ok(c.documents.load_tree(source, &c.catalog)?)
}

/// Assignment from `inputs`, or the defaults derived from `tree`.
fn base_inputs(c: &ServiceContainer, tree: &DecisionTree, inputs: Option<&Path>) -> CliResult<InputAssignment> {
    match inputs {
        Some(path) => Ok(c.documents.load_inputs(path)?),
        None => Ok(c.coverage.default_inputs(tree)),
    }
}

// ============================================================
// Analysis commands
// ============================================================

#[instrument]
fn cmd_parse(condition: &str) -> CliResult<()> {
    let triples = parse_condition(Some(condition));
    if triples.is_empty() {
        output::warning("no literal comparisons against input.<name> found");
        return Ok(());
    }
    for triple in triples {
        output::detail(&format!(
            "{} {} {}  ({:?})",
            triple.variable,
            triple.operator,
            triple.literal,
            triple.operator.bound()
        ));
    }
    Ok(())
}

#[instrument(skip(c))]
fn cmd_defaults(c: &ServiceContainer, source: &str) -> CliResult<()> {
    let tree = load_tree(c, source)?;
    print_json(&c.coverage.default_inputs(&tree), "input")
}

#[instrument(skip(c))]
fn cmd_variations(c: &ServiceContainer, source: &str, inputs: Option<&Path>) -> CliResult<()> {
    let tree = load_tree(c, source)?;
    let base = base_inputs(c, &tree, inputs)?;
    print_json(&c.coverage.variations(&base), "variations")
}

#[instrument(skip(c))]
fn cmd_samples(c: &ServiceContainer, source: &str, inputs: Option<&Path>) -> CliResult<()> {
    let tree = load_tree(c, source)?;
    let base = base_inputs(c, &tree, inputs)?;
    print_json(&c.coverage.samples(&tree, Some(base)), "samples")
}

#[instrument(skip(c))]
fn cmd_render(
    c: &ServiceContainer,
    source: &str,
    result: Option<&Path>,
    unreachable: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let tree = load_tree(c, source)?;
    let result = result.map(|p| c.documents.load_simulation(p)).transpose()?;
    let unreachable: HashSet<String> = match unreachable {
        Some(p) => c.documents.load_unreachable(p)?.unreachable_nodes.into_iter().collect(),
        None => HashSet::new(),
    };

    let model = c
        .render
        .model(&tree, result.as_ref())
        .ok_or_else(|| CliError::from(ApplicationError::from(DomainError::MissingRoot)))?;

    if json {
        output::info(&c.render.to_json(&model)?);
        return Ok(());
    }

    let options = RenderOptions {
        color: c.settings.render.color,
        unreachable,
    };
    output::info(&c.render.to_tree(&model, &options));

    if !model.active_links.is_empty() {
        output::header("Active links");
        for link in &model.active_links {
            output::detail(&format!("{} -> {}", link.source, link.target));
        }
    }
    if c.settings.render.show_layout {
        output::header("Layout");
        output::detail(&c.render.layout_summary(&model.layout));
    }
    Ok(())
}

#[instrument(skip(c))]
fn cmd_validate(c: &ServiceContainer, source: &str) -> CliResult<()> {
    let tree = load_tree(c, source)?;
    tree.validate(c.settings.max_depth)
        .map_err(ApplicationError::from)?;
    let nodes = tree.root.as_ref().map_or(0, |r| r.node_count());
    output::success(&format!("{source}: {nodes} nodes, ids unique"));
    Ok(())
}

#[instrument(skip(c))]
fn cmd_payload(c: &ServiceContainer, command: &PayloadCommands) -> CliResult<()> {
    match command {
        PayloadCommands::Simulate { tree, inputs } => {
            let tree = load_tree(c, tree)?;
            let inputs = base_inputs(c, &tree, inputs.as_deref())?;
            output::info(&c.coverage.simulation_payload(&tree, &inputs)?);
        }
        PayloadCommands::Unreachable { tree, inputs } => {
            let tree = load_tree(c, tree)?;
            let base = base_inputs(c, &tree, inputs.as_deref())?;
            let samples = c.coverage.samples(&tree, Some(base));
            output::info(&c.coverage.unreachable_payload(&tree, &samples)?);
        }
    }
    Ok(())
}

#[instrument(skip(c))]
fn cmd_export(c: &ServiceContainer, result: &Path, target: Option<&Path>) -> CliResult<()> {
    let simulation = c.documents.load_simulation(result)?;
    let target = target.unwrap_or(&c.settings.export_file);
    c.documents.export_simulation(&simulation, target)?;
    output::action("Exported", &target.display());
    Ok(())
}

// ============================================================
// Examples / config commands
// ============================================================

fn cmd_examples(c: &ServiceContainer, command: &ExamplesCommands) -> CliResult<()> {
    match command {
        ExamplesCommands::List => {
            for (name, example) in c.catalog.examples() {
                let origin = match &example.origin {
                    ExampleOrigin::Bundled => "bundled".to_string(),
                    ExampleOrigin::User(path) => path.display().to_string(),
                };
                output::detail(&format!("{name} ({origin})"));
            }
        }
        ExamplesCommands::Show { name } => print_json(c.catalog.tree(name)?, "tree")?,
        ExamplesCommands::Samples { name } => {
            let samples = c.catalog.sample_inputs(name)?;
            if samples.is_empty() {
                output::warning(&format!("{name} has no sample inputs"));
            }
            for (i, sample) in samples.iter().enumerate() {
                output::header(&sample.display_name(i));
                let values = sample
                    .input_values
                    .iter()
                    .map(|(k, v)| format!("{k} = {v}"))
                    .join(", ");
                output::detail(&values);
            }
        }
    }
    Ok(())
}

fn cmd_config(c: &ServiceContainer, command: &ConfigCommands, local: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&c.settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let describe = |path: &Path| {
                let state = if c.fs.exists(path) { "exists" } else { "not found" };
                format!("{} ({state})", path.display())
            };
            match global_config_path() {
                Some(path) => output::action("Global", &describe(&path)),
                None => output::action("Global", &"no config directory on this platform"),
            }
            let local = local.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
            output::action("Local", &describe(&local));
        }
    }
    Ok(())
}

fn cmd_completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
