use crate::mirror::MirrorKind;
use crate::ssh_config::validate_port;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainArgs {
    pub debug: bool,
    pub profile: Option<String>,
    pub command: CliCommand,
}

/// Field values given to `add` and `edit`. Unset fields keep their current value on edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostArgs {
    pub name: String,
    pub hostname: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub identity_file: Option<String>,
    pub project: Option<String>,
    /// Move the host back into the main config file (edit only)
    pub tree_wide: bool,
    pub mirror: bool,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    List { json: bool },
    Show { host: String },
    Add(HostArgs),
    Edit(HostArgs),
    Rename { old: String, new: String },
    Duplicate { host: String },
    Remove { host: String, keep_mirrors: bool },
    Gateway { identity_file: Option<String> },
    Sync { host: String, display_name: Option<String>, kinds: Vec<MirrorKind> },
    Unsync { host: String, kinds: Vec<MirrorKind> },
    Test { host: String },
    Projects,
}

pub fn build_cli_command() -> Command {
    Command::new("sshm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage SSH host entries and mirror them into per-project IDE metadata.")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .propagate_version(true)
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug mode")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("profile")
                .short('P')
                .long("profile")
                .help("Use <profile>.sshm-config.yaml instead of sshm-config.yaml")
                .global(true)
                .num_args(1),
        )
        .subcommand(
            Command::new("list").about("List every host of the SSH config tree").arg(
                Arg::new("json")
                    .long("json")
                    .help("Print the hosts as JSON")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(Command::new("show").about("Show one host").arg(host_arg()))
        .subcommand(host_args(Command::new("add").about("Add a host"), true))
        .subcommand(
            host_args(Command::new("edit").about("Change fields of an existing host"), false).arg(
                Arg::new("tree_wide")
                    .long("tree-wide")
                    .help("Move the host into the main config file")
                    .conflicts_with("project")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a host, keeping its fields and location")
                .arg(Arg::new("old").help("Current host name").required(true).index(1))
                .arg(Arg::new("new").help("New host name").required(true).index(2)),
        )
        .subcommand(Command::new("duplicate").about("Copy a host under a free `_copy` name").arg(host_arg()))
        .subcommand(
            Command::new("remove").about("Remove a host and its mirror entries").arg(host_arg()).arg(
                Arg::new("keep_mirrors")
                    .long("keep-mirrors")
                    .help("Leave the IDE metadata documents untouched")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            Command::new("gateway")
                .about("Create the jump host block if it is missing")
                .arg(identity_file_arg()),
        )
        .subcommand(
            Command::new("sync")
                .about("Write a host into the IDE metadata of every project")
                .arg(host_arg())
                .arg(display_name_arg())
                .arg(kinds_arg()),
        )
        .subcommand(
            Command::new("unsync")
                .about("Remove a host from the IDE metadata of every project")
                .arg(host_arg())
                .arg(kinds_arg()),
        )
        .subcommand(Command::new("test").about("Check that ssh can reach a host").arg(host_arg()))
        .subcommand(Command::new("projects").about("List the projects mirrors are written into"))
}

fn host_arg() -> Arg {
    Arg::new("host").help("Host name").required(true).index(1)
}

fn identity_file_arg() -> Arg {
    Arg::new("identity_file")
        .short('i')
        .long("identity-file")
        .help("Private key file")
        .num_args(1)
}

fn display_name_arg() -> Arg {
    Arg::new("display_name")
        .long("display-name")
        .help("Name shown by the IDE (defaults to the host name)")
        .num_args(1)
}

fn kinds_arg() -> Arg {
    Arg::new("kinds")
        .short('k')
        .long("kinds")
        .help("Documents to touch: ssh, web, deployment (default: all)")
        .value_delimiter(',')
        .value_parser(MirrorKind::from_str)
        .num_args(1..)
}

fn host_args(command: Command, required: bool) -> Command {
    command
        .arg(host_arg())
        .arg(
            Arg::new("hostname")
                .short('H')
                .long("hostname")
                .help("Address ssh connects to")
                .required(required)
                .num_args(1),
        )
        .arg(
            Arg::new("user")
                .short('u')
                .long("user")
                .help("Login user")
                .required(required)
                .num_args(1),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port (1-65535)")
                .value_parser(validate_port)
                .num_args(1),
        )
        .arg(identity_file_arg())
        .arg(
            Arg::new("project")
                .long("project")
                .help("Write the host into the project's include directory, behind the gateway")
                .num_args(1),
        )
        .arg(
            Arg::new("mirror")
                .short('m')
                .long("mirror")
                .help("Also write the host into the IDE metadata of every project")
                .action(ArgAction::SetTrue),
        )
        .arg(display_name_arg())
}

fn string_arg(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn required_string(matches: &ArgMatches, id: &str) -> String {
    string_arg(matches, id).unwrap_or_default()
}

fn kinds(matches: &ArgMatches) -> Vec<MirrorKind> {
    matches
        .get_many::<MirrorKind>("kinds")
        .map(|vals| vals.copied().collect())
        .unwrap_or_else(|| MirrorKind::ALL.to_vec())
}

fn host_fields(matches: &ArgMatches) -> HostArgs {
    HostArgs {
        name: required_string(matches, "host"),
        hostname: string_arg(matches, "hostname"),
        user: string_arg(matches, "user"),
        port: matches.get_one::<u16>("port").copied(),
        identity_file: string_arg(matches, "identity_file"),
        project: string_arg(matches, "project"),
        tree_wide: matches.try_get_one::<bool>("tree_wide").ok().flatten().copied().unwrap_or(false),
        mirror: matches.get_flag("mirror"),
        display_name: string_arg(matches, "display_name"),
    }
}

fn command_from(matches: &ArgMatches) -> CliCommand {
    match matches.subcommand() {
        Some(("list", sub)) => CliCommand::List { json: sub.get_flag("json") },
        Some(("show", sub)) => CliCommand::Show {
            host: required_string(sub, "host"),
        },
        Some(("add", sub)) => CliCommand::Add(host_fields(sub)),
        Some(("edit", sub)) => CliCommand::Edit(host_fields(sub)),
        Some(("rename", sub)) => CliCommand::Rename {
            old: required_string(sub, "old"),
            new: required_string(sub, "new"),
        },
        Some(("duplicate", sub)) => CliCommand::Duplicate {
            host: required_string(sub, "host"),
        },
        Some(("remove", sub)) => CliCommand::Remove {
            host: required_string(sub, "host"),
            keep_mirrors: sub.get_flag("keep_mirrors"),
        },
        Some(("gateway", sub)) => CliCommand::Gateway {
            identity_file: string_arg(sub, "identity_file"),
        },
        Some(("sync", sub)) => CliCommand::Sync {
            host: required_string(sub, "host"),
            display_name: string_arg(sub, "display_name"),
            kinds: kinds(sub),
        },
        Some(("unsync", sub)) => CliCommand::Unsync {
            host: required_string(sub, "host"),
            kinds: kinds(sub),
        },
        Some(("test", sub)) => CliCommand::Test {
            host: required_string(sub, "host"),
        },
        // `subcommand_required` leaves `projects` as the only remaining case
        _ => CliCommand::Projects,
    }
}

pub fn parse_main_args_from<I, T>(command: &Command, args: I) -> Result<MainArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command.clone().try_get_matches_from(args)?;

    Ok(MainArgs {
        debug: matches.get_flag("debug"),
        profile: string_arg(&matches, "profile"),
        command: command_from(&matches),
    })
}

/// Parses command-line arguments using clap, exiting with usage on error.
pub fn main_args() -> MainArgs {
    let command = build_cli_command();
    parse_main_args_from(&command, std::env::args_os()).unwrap_or_else(|err| err.exit())
}

#[cfg(test)]
#[path = "test/args.rs"]
mod tests;
