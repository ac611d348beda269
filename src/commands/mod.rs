// ABOUTME: Command module aggregator for the edgesite CLI.
// ABOUTME: Re-exports the deploy command handler.

mod deploy;

pub use deploy::{DeployArgs, deploy};
