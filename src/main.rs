use clap::Parser;
use homefm::flags::Flags;
use homefm::shell::Shell;

fn main() -> Result<(), homefm::error::ShellError> {
    let flags = Flags::parse();
    homefm::logging::init(&flags);

    let mut shell = Shell::new(flags)?;
    shell.run()
}
