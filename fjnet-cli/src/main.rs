use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{debug, warn};
use serde::Serialize;

use fjnet::cliconf::ConfigCache;
use fjnet::modules::{self, Failure};
use fjnet::transport::SshTransport;
use fjnet::{Cliconf, SessionBuilder};

mod cli;

use cli::{Cli, Command, ConnectionArgs};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(document) => {
            println!("{document}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let failure = Failure::from(&e);
            match serde_json::to_string_pretty(&failure) {
                Ok(document) => println!("{document}"),
                Err(_) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> fjnet::Result<String> {
    let mut session = connect(&cli.connection).await?;

    let outcome = match &cli.command {
        Command::Command(args) => {
            let commands = args
                .commands
                .iter()
                .map(|spec| modules::parse_command_spec(spec))
                .collect::<fjnet::Result<Vec<_>>>()?;
            let args = modules::command::CommandArgs {
                commands,
                wait_for: args.wait_for.clone(),
                match_mode: args.match_mode,
                retries: args.retries,
                interval: Duration::from_secs(args.interval),
            };
            modules::command::run(&mut session, &args, cli.check)
                .await
                .and_then(render)
        }
        Command::Config(args) => {
            let args = modules::config::ConfigArgs {
                lines: args.lines.clone(),
                save_when: args.save_when,
                diff_ignore_lines: args.diff_ignore_lines.clone(),
            };
            let mut cache = ConfigCache::new();
            modules::config::run(&mut session, &mut cache, &args, cli.check)
                .await
                .and_then(render)
        }
        Command::Facts(args) => {
            let args = modules::facts::FactsArgs {
                gather_subset: args.gather_subset.clone(),
            };
            modules::facts::run(&mut session, &args)
                .await
                .and_then(render)
        }
    };

    if let Err(e) = session.close().await {
        warn!("closing session failed: {}", e);
    }
    outcome
}

async fn connect(args: &ConnectionArgs) -> fjnet::Result<Cliconf<SshTransport>> {
    let mut builder = SessionBuilder::new(&args.host)
        .port(args.port)
        .username(&args.username)
        .platform(args.platform)
        .timeout(Duration::from_secs(args.timeout))
        .host_key_verification(args.host_key_checking)
        .authorize(args.authorize);

    if let Some(keyfile) = &args.ssh_keyfile {
        builder = builder.private_key(keyfile);
    } else if let Some(password) = &args.password {
        builder = builder.password(password);
    }
    if let Some(auth_pass) = &args.auth_pass {
        builder = builder.auth_pass(auth_pass);
    }

    debug!("connecting to {}:{} as {}", args.host, args.port, args.platform);
    builder.connect().await
}

fn render<T: Serialize>(result: T) -> fjnet::Result<String> {
    Ok(serde_json::to_string_pretty(&result).map_err(fjnet::error::ModuleError::Json)?)
}
