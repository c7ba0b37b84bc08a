use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use pina_codama_js::RenderConfig;
use pina_codama_js::RenderError;
use pina_codama_js::read_config;
use pina_codama_js::read_root_node;
use pina_codama_js::render_instruction_defaults;
use pina_codama_js::render_manifests;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
	name = "pina_codama_js",
	about = "Render Umi JavaScript client fragments from Codama IDLs"
)]
struct Args {
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Print the type manifest of every declaration as JSON.
	Manifests {
		/// The Codama IDL file.
		#[arg(long)]
		idl: PathBuf,

		/// A JSON render configuration.
		#[arg(long)]
		config: Option<PathBuf>,
	},
	/// Print the default value code of one instruction.
	Defaults {
		/// The Codama IDL file.
		#[arg(long)]
		idl: PathBuf,

		/// The instruction name as written in the IDL.
		#[arg(long)]
		instruction: String,

		/// A JSON render configuration.
		#[arg(long)]
		config: Option<PathBuf>,
	},
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();

	if let Err(error) = run() {
		eprintln!("{error}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), RenderError> {
	match Args::parse().command {
		Command::Manifests { idl, config } => {
			let root = read_root_node(&idl)?;
			let config = load_config(config.as_deref())?;
			let manifests = render_manifests(&root, &config)?;
			let json = serde_json::to_string_pretty(&manifests)
				.map_err(|source| RenderError::SerializeOutput { source })?;
			println!("{json}");
		}
		Command::Defaults {
			idl,
			instruction,
			config,
		} => {
			let root = read_root_node(&idl)?;
			let config = load_config(config.as_deref())?;
			let defaults = render_instruction_defaults(&root, &instruction, &config)?;
			print!("{defaults}");
		}
	}

	Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig, RenderError> {
	path.map_or_else(|| Ok(RenderConfig::default()), read_config)
}
