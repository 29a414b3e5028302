use clap::{ArgMatches, CommandFactory, FromArgMatches};
use reqwest::Url;

use crate::args::SmokeArgs;
use crate::config;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{self, Credentials};
use crate::logger;
use crate::report::Reporter;
use crate::run::{self, RunPlan};

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    if let Some(config) = config::load_config(args.config.as_deref())? {
        config::apply_config(&mut args, &matches, &config);
    }
    logger::init_logging(args.verbose, args.no_color);

    let (plan, credentials) = build_plan(&args)?;
    let client = http::build_client(&credentials)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    plan.reporter
        .note(&format!("Running smoke scenario against {}", plan.base_url));
    let outcome = runtime.block_on(run::execute(&client, &plan));
    plan.reporter.summary(outcome.reports());
    Ok(())
}

fn parse_args() -> AppResult<(SmokeArgs, ArgMatches)> {
    let matches = SmokeArgs::command().get_matches();
    let args = SmokeArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

/// Validates the merged arguments into an executable plan. Requests build
/// URLs by appending the endpoint path, so the base URL keeps its path
/// segment and loses any trailing slash.
fn build_plan(args: &SmokeArgs) -> AppResult<(RunPlan, Credentials)> {
    let base_url = args.base_url.trim_end_matches('/').to_owned();
    let parsed = Url::parse(&base_url).map_err(|err| {
        AppError::validation(ValidationError::InvalidBaseUrl {
            url: base_url.clone(),
            source: err,
        })
    })?;
    if parsed.host_str().is_none() {
        return Err(AppError::validation(ValidationError::BaseUrlMissingHost {
            url: base_url,
        }));
    }

    let client_id = args
        .client_id
        .clone()
        .ok_or_else(|| AppError::validation(ValidationError::MissingClientId))?;
    let secret = args
        .secret
        .clone()
        .ok_or_else(|| AppError::validation(ValidationError::MissingSecret))?;
    let owner_id = args
        .owner_id
        .clone()
        .ok_or_else(|| AppError::validation(ValidationError::MissingOwnerId))?;
    let tenant_id = args
        .tenant_id
        .clone()
        .ok_or_else(|| AppError::validation(ValidationError::MissingTenantId))?;

    let plan = RunPlan {
        base_url,
        owner_id,
        tenant_id,
        reporter: Reporter::new(args.no_color),
    };
    let credentials = Credentials { client_id, secret };
    Ok((plan, credentials))
}
