use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// `time=… component=… msg=…` lines on stderr. `RUST_LOG` still wins.
pub fn init(verbose: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let result = Builder::new()
        .filter_level(default)
        .parse_env(Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "time={}\tcomponent={}\tmsg={}",
                buf.timestamp(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
