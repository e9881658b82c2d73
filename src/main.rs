use anyhow::Result;
use pant::cli::{App, Args, Config};

fn main() -> Result<()> {
    let args = Args::parse_args();
    let config = Config::load(args.config.clone())?;
    let mut app = App::new(config);

    app.run(args)?;

    Ok(())
}
