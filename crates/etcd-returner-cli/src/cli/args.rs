use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "etcd-returner",
    version,
    about = "Inspect and replay job returns stored in etcd"
)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Host configuration file (YAML)
    #[arg(
        long,
        short = 'c',
        global = true,
        env = "ETCD_RETURNER_CONFIG",
        default_value = "/etc/salt/master"
    )]
    pub config: PathBuf,

    /// Profile for every operation; replaces `etcd.returner` and the
    /// read/write profiles from the config
    #[arg(long, global = true)]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a job return (JSON object with `id` and `jid`)
    Return(ReturnArgs),
    /// Store the load for a job
    SaveLoad(SaveLoadArgs),
    /// Print the load saved for a job
    GetLoad(JidArgs),
    /// Print each minion's return for a job
    GetJid(JidArgs),
    /// Print minions whose latest job ran a function
    GetFun(GetFunArgs),
    /// List job ids
    Jids(JidsArgs),
    /// List minions
    Minions,
    /// Print a job id (the given one, or a new one)
    PrepJid(PrepJidArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReturnArgs {
    /// JSON file to read, `-` for stdin
    #[arg(default_value = "-")]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SaveLoadArgs {
    pub jid: String,

    /// JSON file with the load, `-` for stdin
    #[arg(default_value = "-")]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct JidArgs {
    pub jid: String,
}

#[derive(Args, Debug, Clone)]
pub struct GetFunArgs {
    /// Function name, e.g. `state.highstate`
    pub fun: String,
}

#[derive(Args, Debug, Clone)]
pub struct JidsArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// One job id per line (machine-friendly)
    Plain,
    /// JSON array
    Json,
    /// Job ids with their start time
    Table,
}

#[derive(Args, Debug, Clone)]
pub struct PrepJidArgs {
    /// Use this job id instead of generating one
    #[arg(long)]
    pub jid: Option<String>,

    /// Accepted for compatibility; nothing is cached
    #[arg(long)]
    pub nocache: bool,
}
