use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ADDR: &str = "localhost:8100";
pub const DEFAULT_GAME_ID: i64 = 111;
pub const ACTION_QUEUE_CAPACITY: usize = 32;
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);
const MAX_PLAYER_ID: i64 = 1_000_000;

#[derive(Clone, Debug)]
pub struct Config {
    // host:port of the game server, without scheme
    pub addr: String,
    pub game_id: i64,
    pub player_id: i64,
    pub queue_capacity: usize,
    pub log_dir: PathBuf,
    pub close_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: DEFAULT_ADDR.to_string(),
            game_id: DEFAULT_GAME_ID,
            player_id: generate_player_id(&mut rand::thread_rng()),
            queue_capacity: ACTION_QUEUE_CAPACITY,
            log_dir: PathBuf::from("./logs"),
            close_timeout: CLOSE_TIMEOUT,
        }
    }
}

pub fn generate_player_id<R: Rng>(rng: &mut R) -> i64 {
    rng.gen_range(0..MAX_PLAYER_ID)
}
