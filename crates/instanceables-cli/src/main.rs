mod demo;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use instanceables::{ConverterRegistry, FieldKind, InstanceForm, Properties};
use tracing_subscriber::EnvFilter;

/// Build rate limiters from text values, remembering the last ones used.
#[derive(Parser)]
#[command(name = "instanceables", version)]
struct Cli {
    /// TOML file holding last-used values and the last selection.
    #[arg(long, global = true, default_value = "instanceables.toml")]
    props: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every choice with its parameters and current values.
    List,
    /// Build a choice from positional values. Without values, the remembered
    /// (or default) ones are used.
    Build {
        /// Choice to build; the remembered one when omitted.
        #[arg(long)]
        choice: Option<String>,
        values: Vec<String>,
    },
    /// Print the concrete and ancestor types the catalog references.
    Types,
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    ConverterRegistry::install(demo::registry())?;
    let catalog = demo::catalog(ConverterRegistry::global()).context("demo catalog is invalid")?;
    let props = Properties::load_or_default(&cli.props)?;
    let mut form = InstanceForm::new(&catalog, props);

    match cli.command {
        Command::List => {
            for entry in catalog.entries() {
                form.select(&entry.name)?;
                let lineage: Vec<&str> = std::iter::once(entry.descriptor.class_name())
                    .chain(entry.descriptor.ancestors().iter().map(String::as_str))
                    .collect();
                println!("{}  ({})", entry.name, lineage.join(" < "));
                let types = entry.descriptor.all_params().map(|p| p.ty.to_string());
                for (field, ty) in form.fields().iter().zip(types) {
                    let hint = match &field.kind {
                        FieldKind::Choice(options) => format!("  [{}]", options.join("|")),
                        FieldKind::Toggle => "  [true|false]".to_string(),
                        FieldKind::Text => String::new(),
                    };
                    println!("    {:<20} {:<14} = {}{hint}", field.label, ty, field.value);
                }
            }
        }
        Command::Build { choice, values } => {
            if let Some(choice) = choice {
                form.select(&choice)?;
            }
            if !values.is_empty() {
                let expected = form.fields().len();
                if values.len() != expected {
                    bail!("expected {expected} value(s), got {}", values.len());
                }
                for (i, v) in values.into_iter().enumerate() {
                    form.set_value(i, v);
                }
            }
            let limiter = form.create_instance()?;
            println!("{limiter:#?}");
            form.store().save(&cli.props)?;
            tracing::info!(path = %cli.props.display(), "remembered values saved");
        }
        Command::Types => {
            for ty in catalog.referenced_types().iter() {
                println!("{ty}");
            }
        }
    }
    Ok(())
}
