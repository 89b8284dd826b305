mod commands;
mod logging;
mod render;

use commands::{assign, orders, products, register, CommandLine, Commands};

fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();
    logging::init(cli.verbose);

    match &cli.command {
        Commands::Orders => orders::run(&cli),
        Commands::Products => products::run(&cli),
        Commands::Register { payload } => register::run(&cli, payload),
        Commands::Assign { order, restaurant } => assign::run(&cli, *order, *restaurant),
    }
}
