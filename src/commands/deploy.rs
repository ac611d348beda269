// ABOUTME: Deploy command implementation.
// ABOUTME: Resolves inputs from config, flags and prompts, then runs the orchestrator.

use dialoguer::Input;
use edgesite::config::Config;
use edgesite::deploy::{DeploymentRequest, Orchestrator, Phase};
use edgesite::diagnostics::{Diagnostics, Warning};
use edgesite::error::{Error, Result};
use edgesite::output::Output;
use edgesite::provider;
use edgesite::types::{DomainName, SiteName};
use std::path::PathBuf;

/// Values given on the command line. They take precedence over the config.
pub struct DeployArgs {
    pub site: Option<String>,
    pub domain: Option<String>,
    pub content: Option<PathBuf>,
    pub interactive: bool,
}

pub async fn deploy(config: Config, args: DeployArgs, mut output: Output) -> Result<()> {
    let request = build_request(&config, args)?;
    let region = request.region().to_string();

    output.start_timer();
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying {} from {} ({})",
        request.site(),
        request.content_root().display(),
        region
    ));

    let aws = provider::connect(&region).await?;

    let orchestrator = Orchestrator::new(&aws, config.settings())
        .with_observer(|phase| {
            if let Some(message) = progress_message(phase) {
                output.progress(message);
            }
        });

    match orchestrator.run(request).await {
        Ok(outcome) => {
            if outcome.files_published == 0 {
                diag.warn(Warning::empty_content(
                    "content directory had no files; the site will serve errors",
                ));
            }
            for warning in diag.warnings() {
                output.warning(&warning.message);
            }
            output.progress(&format!("  distribution: {}", outcome.distribution_id));
            output.progress(&format!("  edge domain:  {}", outcome.distribution_domain));
            output.result(&format!("Deployed {}", outcome.url), &outcome);
            Ok(())
        }
        Err(failure) => {
            diag.record_rollback(&failure.rollback);
            for warning in diag.warnings() {
                output.warning(&warning.message);
            }
            if !failure.rollback.is_empty() && failure.rollback.all_succeeded() {
                output.progress("  rollback complete; nothing was left behind");
            }
            Err(Error::Deploy(failure))
        }
    }
}

fn progress_message(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Init => Some("  → Preflight checks passed"),
        Phase::OriginReady => Some("  → Origin bucket ready"),
        Phase::ContentPublished => Some("  → Content uploaded"),
        Phase::EdgeReady => Some("  → Distribution created"),
        Phase::NameReady => Some("  → DNS alias in place"),
        Phase::RollingBack => Some("  ✗ Rolling back..."),
        Phase::Failed => None,
    }
}

/// Merge flags over config, prompting for whatever is still missing.
fn build_request(config: &Config, args: DeployArgs) -> Result<DeploymentRequest> {
    let site = match args.site {
        Some(s) => parse_site(&s)?,
        None => match config.site.clone() {
            Some(s) => s,
            None if args.interactive => parse_site(&prompt("Site name")?)?,
            None => return Err(Error::MissingInput("site")),
        },
    };

    let domain = match args.domain {
        Some(d) => parse_domain(&d)?,
        None => match config.domain.clone() {
            Some(d) => d,
            None if args.interactive => parse_domain(&prompt("Domain")?)?,
            None => return Err(Error::MissingInput("domain")),
        },
    };

    let content = match args.content.or_else(|| config.content.clone()) {
        Some(c) => c,
        None if args.interactive => PathBuf::from(prompt("Content directory")?),
        None => return Err(Error::MissingInput("content")),
    };

    let certificate = config.certificate.resolve()?;
    let region = config.region.resolve()?;

    Ok(DeploymentRequest::new(
        site,
        domain,
        content,
        certificate,
        region,
    ))
}

fn prompt(label: &str) -> Result<String> {
    let value: String = Input::new().with_prompt(label).interact_text()?;
    Ok(value.trim().to_string())
}

fn parse_site(value: &str) -> Result<SiteName> {
    SiteName::new(value).map_err(|e| Error::InvalidConfig(e.to_string()))
}

fn parse_domain(value: &str) -> Result<DomainName> {
    DomainName::new(value).map_err(|e| Error::InvalidConfig(e.to_string()))
}
