use super::super::args::*;
use super::Session;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let session = Session::open(&cli.common)?;
    match cli.cmd {
        Command::Return(args) => super::write::cmd_return(&session, args).await,
        Command::SaveLoad(args) => super::write::cmd_save_load(&session, args).await,
        Command::GetLoad(args) => super::jobs::cmd_get_load(&session, args).await,
        Command::GetJid(args) => super::jobs::cmd_get_jid(&session, args).await,
        Command::GetFun(args) => super::jobs::cmd_get_fun(&session, args).await,
        Command::Jids(args) => super::jobs::cmd_jids(&session, args).await,
        Command::Minions => super::jobs::cmd_minions(&session).await,
        Command::PrepJid(args) => Ok(super::jobs::cmd_prep_jid(&session, args)),
    }
}
