use sshm::args::{self, CliCommand, HostArgs};
use sshm::config::{self, Config};
use sshm::mirror::{MirrorAction, MirrorKind, MirrorSync, MirrorTarget, SyncReport, SyncRequest, discover_targets};
use sshm::ssh_config::{
    self, ConfigTree, HostRecord, HostScope, SshConfigError, ValidationError, ensure_gateway, ensure_name_available, find_duplicate_names,
    find_host, read_hosts, validate_identity_file, validate_project_name,
};
use sshm::worker::Worker;
use sshm::{Result, log, log_debug, log_error, log_info, probe};

use std::io;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let args = args::main_args();

    let config = match config::load(args.profile.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ Failed to load configuration: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    // Initialize logging
    if args.debug || config.settings.debug_mode {
        log::LOGGER.enable_debug();
        if let Err(err) = log::LOGGER.log_debug("Debug mode enabled") {
            eprintln!("❌ Failed to initialize debug logging: {}", err);
            return Ok(ExitCode::FAILURE);
        }
        log_debug!("Using configuration {:?}", config.metadata.config_path);
    }

    let result = run(args.command, &config);
    let _ = log::LOGGER.flush();

    match result {
        Ok(code) => Ok(code),
        Err(err) => {
            log_error!("{}", err);
            eprintln!("❌ {}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(command: CliCommand, config: &Config) -> Result<ExitCode> {
    let tree = config.ssh.tree()?;

    match command {
        CliCommand::List { json } => list(&tree, json),
        CliCommand::Show { host } => {
            let record = require_host(&tree, &host)?;
            println!("{}", record.details());
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Add(host_args) => add(&tree, config, &host_args),
        CliCommand::Edit(host_args) => edit(&tree, config, &host_args),
        CliCommand::Rename { old, new } => rename(&tree, config, &old, &new),
        CliCommand::Duplicate { host } => {
            let copy = ssh_config::duplicate(&tree, &host)?;
            println!("✅ Copied '{}' to '{}'", host, copy.name);
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Remove { host, keep_mirrors } => {
            let record = require_host(&tree, &host)?;
            ssh_config::remove_host(&tree, &record)?;
            println!("✅ Removed host '{}'", host);
            if keep_mirrors {
                return Ok(ExitCode::SUCCESS);
            }
            let report = unsync(config, &host, &MirrorKind::ALL)?;
            Ok(print_report(&report))
        }
        CliCommand::Gateway { identity_file } => {
            if let Some(path) = &identity_file {
                validate_identity_file(path, &home_dir()?)?;
            }
            let outcome = ensure_gateway(&tree, &config.gateway, identity_file.as_deref())?;
            if outcome.created {
                println!("✅ Created gateway '{}' using {}", config.gateway.name, outcome.identity_file);
            } else {
                println!("Gateway '{}' already exists", config.gateway.name);
            }
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Sync { host, display_name, kinds } => {
            let record = require_host(&tree, &host)?;
            let report = sync(config, record, display_name.unwrap_or_default(), kinds)?;
            Ok(print_report(&report))
        }
        CliCommand::Unsync { host, kinds } => {
            let report = unsync(config, &host, &kinds)?;
            Ok(print_report(&report))
        }
        CliCommand::Test { host } => test_connection(&tree, config, &host),
        CliCommand::Projects => {
            let targets = targets(config)?;
            if targets.is_empty() {
                println!("No projects under {}", config.mirror.projects_root_path().display());
            }
            for target in targets {
                let marker = if config.projects.iter().any(|known| known.eq_ignore_ascii_case(&target.name)) { "*" } else { " " };
                println!("{} {:<24} {}", marker, target.name, target.root.display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn list(tree: &ConfigTree, json: bool) -> Result<ExitCode> {
    let hosts = read_hosts(tree)?;

    if json {
        let rendered = serde_json::to_string_pretty(&hosts).map_err(io::Error::other)?;
        println!("{}", rendered);
        return Ok(ExitCode::SUCCESS);
    }

    for host in &hosts {
        println!("{}", host_line(host));
    }
    for name in find_duplicate_names(&hosts) {
        eprintln!("⚠️  Host '{}' is defined more than once", name);
    }
    Ok(ExitCode::SUCCESS)
}

fn add(tree: &ConfigTree, config: &Config, host_args: &HostArgs) -> Result<ExitCode> {
    let hosts = read_hosts(tree)?;
    ensure_name_available(&hosts, &host_args.name, None)?;
    validate_host_args(host_args)?;

    let (record, scope) = new_record(host_args, &config.gateway.name);
    if let HostScope::Project(_) = scope {
        ensure_gateway(tree, &config.gateway, None)?;
    }

    let written = ssh_config::upsert(tree, &record, &scope)?;
    println!("✅ Added host '{}'", written.name);

    if host_args.mirror {
        let report = sync(config, written, host_args.display_name.clone().unwrap_or_default(), MirrorKind::ALL.to_vec())?;
        return Ok(print_report(&report));
    }
    Ok(ExitCode::SUCCESS)
}

fn edit(tree: &ConfigTree, config: &Config, host_args: &HostArgs) -> Result<ExitCode> {
    let existing = require_host(tree, &host_args.name)?;
    validate_host_args(host_args)?;

    let (record, scope) = apply_edit(&existing, host_args, &config.gateway.name);
    if let HostScope::Project(_) = scope {
        ensure_gateway(tree, &config.gateway, None)?;
    }

    let written = ssh_config::upsert(tree, &record, &scope)?;
    println!("✅ Updated host '{}'", written.name);

    if host_args.mirror {
        let report = sync(config, written, host_args.display_name.clone().unwrap_or_default(), MirrorKind::ALL.to_vec())?;
        return Ok(print_report(&report));
    }
    Ok(ExitCode::SUCCESS)
}

/// Rename the block and move mirror entries of the old name over to the new one.
fn rename(tree: &ConfigTree, config: &Config, old: &str, new: &str) -> Result<ExitCode> {
    let existing = require_host(tree, old)?;
    let written = ssh_config::rename(tree, old, &existing.renamed(new), &existing.scope())?;
    println!("✅ Renamed '{}' to '{}'", old, written.name);

    let removed = unsync(config, old, &MirrorKind::ALL)?;
    if !removed.is_success() {
        return Ok(print_report(&removed));
    }
    if removed.count(MirrorAction::Removed) + removed.count(MirrorAction::Deleted) == 0 {
        log_debug!("Host '{}' had no mirror entries", old);
        return Ok(ExitCode::SUCCESS);
    }

    let report = sync(config, written, String::new(), MirrorKind::ALL.to_vec())?;
    Ok(print_report(&report))
}

fn test_connection(tree: &ConfigTree, config: &Config, host: &str) -> Result<ExitCode> {
    require_host(tree, host)?;
    let timeout = config.connection_test.timeout();
    let host_name = host.to_string();

    println!("Testing connection to '{}'...", host);
    let outcome = Worker::default()
        .submit("probe", move || probe::test_connection(&host_name, timeout))?
        .wait()?;
    log_info!("Connection test for '{}': {:?}", host, outcome);

    match outcome {
        probe::ProbeOutcome::Success => {
            println!("✅ Connection to '{}' succeeded", host);
            Ok(ExitCode::SUCCESS)
        }
        probe::ProbeOutcome::Failed(Some(code)) => {
            eprintln!("❌ ssh exited with status {}", code);
            Ok(ExitCode::FAILURE)
        }
        probe::ProbeOutcome::Failed(None) => {
            eprintln!("❌ ssh was terminated by a signal");
            Ok(ExitCode::FAILURE)
        }
        probe::ProbeOutcome::TimedOut => {
            eprintln!("❌ No answer within {} seconds", timeout.as_secs());
            Ok(ExitCode::FAILURE)
        }
        probe::ProbeOutcome::SpawnFailed(err) => {
            eprintln!("❌ Could not run ssh: {}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn sync(config: &Config, host: HostRecord, display_base: String, kinds: Vec<MirrorKind>) -> Result<SyncReport> {
    let request = SyncRequest {
        display_base,
        targets: targets(config)?,
        kinds,
    };
    let engine = MirrorSync::new(config.mirror.clone());

    let report = Worker::default()
        .submit("mirror-sync", move || engine.sync_create(&host, &request))?
        .wait()?;
    Ok(report)
}

fn unsync(config: &Config, host_name: &str, kinds: &[MirrorKind]) -> Result<SyncReport> {
    let targets = targets(config)?;
    let kinds = kinds.to_vec();
    let host_name = host_name.to_string();
    let engine = MirrorSync::new(config.mirror.clone());

    let report = Worker::default()
        .submit("mirror-remove", move || engine.sync_remove(&host_name, &targets, &kinds))?
        .wait()?;
    Ok(report)
}

fn targets(config: &Config) -> Result<Vec<MirrorTarget>> {
    Ok(discover_targets(&config.mirror.projects_root_path())?)
}

fn require_host(tree: &ConfigTree, name: &str) -> Result<HostRecord> {
    find_host(tree, name)?.ok_or_else(|| ValidationError::UnknownHost(name.to_string()).into())
}

fn home_dir() -> Result<std::path::PathBuf> {
    Ok(dirs::home_dir().ok_or(SshConfigError::HomeDirUnavailable)?)
}

/// Field checks the writer does not repeat.
fn validate_host_args(host_args: &HostArgs) -> Result<()> {
    if let Some(path) = &host_args.identity_file {
        validate_identity_file(path, &home_dir()?)?;
    }
    if let Some(project) = &host_args.project {
        validate_project_name(project)?;
    }
    Ok(())
}

/// Record for `add`. Project-scoped hosts connect through the gateway.
fn new_record(host_args: &HostArgs, gateway_name: &str) -> (HostRecord, HostScope) {
    let mut record = HostRecord::new(&host_args.name);
    record.hostname = host_args.hostname.clone();
    record.user = host_args.user.clone();
    record.port = host_args.port;
    record.identity_file = host_args.identity_file.clone();

    match &host_args.project {
        Some(project) => (record.with_proxy_via(gateway_name), HostScope::Project(project.clone())),
        None => (record, HostScope::TreeWide),
    }
}

/// `existing` with the given fields replaced. Moving into a project routes the
/// host through the gateway, moving out of one drops that hop.
fn apply_edit(existing: &HostRecord, host_args: &HostArgs, gateway_name: &str) -> (HostRecord, HostScope) {
    let mut record = existing.clone();
    if let Some(hostname) = &host_args.hostname {
        record.hostname = Some(hostname.clone());
    }
    if let Some(user) = &host_args.user {
        record.user = Some(user.clone());
    }
    if let Some(port) = host_args.port {
        record.port = Some(port);
    }
    if let Some(identity_file) = &host_args.identity_file {
        record.identity_file = Some(identity_file.clone());
    }

    let scope = if let Some(project) = &host_args.project {
        record.proxy_via = Some(gateway_name.to_string());
        HostScope::Project(project.clone())
    } else if host_args.tree_wide {
        if record.proxy_via.as_deref() == Some(gateway_name) {
            record.proxy_via = None;
        }
        HostScope::TreeWide
    } else {
        existing.scope()
    };

    (record, scope)
}

fn host_line(host: &HostRecord) -> String {
    let mut target = host.hostname.clone().unwrap_or_else(|| "-".to_string());
    if let Some(user) = &host.user {
        target = format!("{}@{}", user, target);
    }
    if let Some(port) = host.port {
        target = format!("{}:{}", target, port);
    }
    let location = host.source.project().unwrap_or("main");
    format!("{:<24} {:<40} {}", host.name, target, location)
}

/// Print failures and a summary line. Failure exit code when any document failed.
fn print_report(report: &SyncReport) -> ExitCode {
    for failure in report.failures() {
        if let Err(err) = &failure.result {
            eprintln!("❌ {} [{}]: {}", failure.project, failure.kind, err);
        }
    }

    let mut summary = format!(
        "{} written, {} removed, {} deleted, {} recovered",
        report.count(MirrorAction::Written),
        report.count(MirrorAction::Removed),
        report.count(MirrorAction::Deleted),
        report.count(MirrorAction::Recovered)
    );
    if let Some(name) = &report.display_name {
        summary = format!("'{}': {}", name, summary);
    }

    if report.is_success() {
        println!("✅ Mirrors {}", summary);
        ExitCode::SUCCESS
    } else {
        eprintln!("⚠️  Mirrors {}", summary);
        ExitCode::FAILURE
    }
}

#[cfg(test)]
#[path = "test/main.rs"]
mod tests;
