use clap::Parser;
use miette::Result;
use obra::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => obra::cli::commands::init::run(args),
        Commands::Company(cmd) => obra::cli::commands::company::run(cmd, &global),
        Commands::Person(cmd) => obra::cli::commands::person::run(cmd, &global),
        Commands::Project(cmd) => obra::cli::commands::project::run(cmd, &global),
        Commands::Activity(cmd) => obra::cli::commands::activity::run(cmd, &global),
        Commands::Noc(cmd) => obra::cli::commands::noc::run(cmd, &global),
        Commands::Import(args) => obra::cli::commands::import::run(args, &global),
        Commands::Recompute(args) => obra::cli::commands::recompute::run(args, &global),
        Commands::Status(args) => obra::cli::commands::status::run(args, &global),
        Commands::Report(cmd) => obra::cli::commands::report::run(cmd, &global),
        Commands::Completions(args) => obra::cli::commands::completions::run(args),
    }
}
