use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use fjnet::modules::command::MatchMode;
use fjnet::modules::config::SaveWhen;
use fjnet::platform::Platform;
use fjnet::transport::HostKeyVerification;

#[derive(Parser, Debug)]
#[command(name = "fjnet", version, about = "Run commands, load configuration and gather facts on Fujitsu devices")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Report what would change without changing the device
    #[arg(long, global = true)]
    pub check: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Device family: fujitsu_sir, fujitsu_srs or fujitsu_ipcom
    #[arg(long, env = "ANSIBLE_NETWORK_OS")]
    pub platform: Platform,

    /// Device hostname or IP
    #[arg(long)]
    pub host: String,

    #[arg(long, default_value_t = 22)]
    pub port: u16,

    #[arg(short, long, env = "ANSIBLE_NET_USERNAME")]
    pub username: String,

    #[arg(short, long, env = "ANSIBLE_NET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Private key used instead of a password
    #[arg(long, env = "ANSIBLE_NET_SSH_KEYFILE")]
    pub ssh_keyfile: Option<std::path::PathBuf>,

    /// Enter privileged mode with `admin` after login
    #[arg(
        long,
        env = "ANSIBLE_NET_AUTHORIZE",
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub authorize: bool,

    /// Password answered to the `admin` prompt
    #[arg(long, env = "ANSIBLE_NET_AUTH_PASS", hide_env_values = true)]
    pub auth_pass: Option<String>,

    /// Connection and per-command timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Host key checking: strict, accept-new or disabled
    #[arg(long, default_value = "accept-new")]
    pub host_key_checking: HostKeyVerification,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run commands and print their output
    Command(CommandArgs),
    /// Load configuration lines
    Config(ConfigArgs),
    /// Gather device facts
    Facts(FactsArgs),
}

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Commands to run; a JSON object adds `prompt` and `answer`
    #[arg(required = true)]
    pub commands: Vec<String>,

    /// Conditionals such as `result[0] contains Si-R220C`
    #[arg(long = "wait-for")]
    pub wait_for: Vec<String>,

    /// Whether all or any conditionals must hold
    #[arg(long = "match", default_value = "all")]
    pub match_mode: MatchMode,

    #[arg(long, default_value_t = 10)]
    pub retries: u32,

    /// Seconds between retries
    #[arg(long, default_value_t = 1)]
    pub interval: u64,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration lines, sent in order
    #[arg(required = true)]
    pub lines: Vec<String>,

    /// always, never, modified or changed
    #[arg(long, default_value = "never")]
    pub save_when: SaveWhen,

    /// Regexes of lines ignored when comparing running and startup
    #[arg(long = "diff-ignore-lines")]
    pub diff_ignore_lines: Vec<String>,
}

#[derive(Args, Debug)]
pub struct FactsArgs {
    /// Subsets to gather; prefix with `!` to exclude
    #[arg(long, value_delimiter = ',', default_value = "!config")]
    pub gather_subset: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let base = ["fjnet", "--platform", "sir", "--host", "192.0.2.1", "-u", "admin"];
        Cli::try_parse_from(base.iter().chain(args))
    }

    #[test]
    fn test_authorize_accepts_boolish_values() {
        assert!(!parse(&["facts"]).unwrap().connection.authorize);
        assert!(parse(&["--authorize", "facts"]).unwrap().connection.authorize);
        for value in ["yes", "1", "on", "true"] {
            let flag = format!("--authorize={value}");
            assert!(parse(&[flag.as_str(), "facts"]).unwrap().connection.authorize, "{value}");
        }
        assert!(!parse(&["--authorize=no", "facts"]).unwrap().connection.authorize);
    }

    #[test]
    fn test_config_requires_lines() {
        assert!(parse(&["config"]).is_err());

        let cli = parse(&["config", "lan 0 vlan 10", "--save-when", "modified"]).unwrap();
        match cli.command {
            Command::Config(args) => {
                assert_eq!(args.lines, ["lan 0 vlan 10"]);
                assert_eq!(args.save_when, SaveWhen::Modified);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
