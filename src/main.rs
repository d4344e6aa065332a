use crate::config::Config;
use crate::game::Game;
use crate::shell::Shell;
use tokio::io::BufReader;
use tracing::info;

mod client;
mod config;
mod game;
mod input;
mod shell;
mod ws;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::default();

    // stdout belongs to the prompt, logs go to a file
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "client.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(
        player_id = config.player_id,
        game_id = config.game_id,
        addr = %config.addr,
        "starting client"
    );

    let (game, dispatcher, snapshots) = Game::new(config.queue_capacity);
    tokio::task::spawn(game.run());

    let mut shell = Shell::new(config, dispatcher, snapshots);
    shell.run(BufReader::new(tokio::io::stdin())).await?;
    info!("client stopped");
    Ok(())
}
