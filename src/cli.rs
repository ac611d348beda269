// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edgesite")]
#[command(about = "Deploy a static site to S3 behind CloudFront with a Route 53 alias")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new edgesite.yml configuration file
    Init {
        /// Site name (first label of the hostname)
        #[arg(long)]
        site: Option<String>,

        /// Parent domain with an existing hosted zone
        #[arg(long)]
        domain: Option<String>,

        /// Directory holding the built site
        #[arg(long)]
        content: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy the site: origin, content, distribution and DNS alias
    Deploy {
        /// Site name (first label of the hostname)
        #[arg(long)]
        site: Option<String>,

        /// Parent domain with an existing hosted zone
        #[arg(long)]
        domain: Option<String>,

        /// Directory holding the built site
        #[arg(long)]
        content: Option<PathBuf>,

        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Fail instead of prompting for missing values
        #[arg(long)]
        no_input: bool,
    },
}
