use crate::command::Command;
use clap::Parser;

mod command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Resolve bus addresses, and encode or decode register values of the Wishbone SoC"
)]
struct CommandLineInterface {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    env_logger::init();
    let cli = CommandLineInterface::parse();

    let mut output = String::new();
    let result = cli.command.run(&mut output);
    print!("{output}");
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
