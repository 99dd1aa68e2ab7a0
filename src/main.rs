use std::io::{self, Stdout};

use ariadne_maze::config::{self, Cli};
use ariadne_maze::input::{command_for, Command};
use ariadne_maze::render::{self, Renderer};
use ariadne_maze::{Result, Session};
use clap::Parser;
use crossterm::event::{self, Event};
use log::{error, info};
use rand::Rng;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;
    config::setup_logging(&cli)?;

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("session seed {seed}, thread {}", cli.max_thread);
    let mut session = Session::seeded(cli.max_thread, seed)?;

    let mut stdout = io::stdout();
    let result = match render::enter_terminal(&mut stdout) {
        Ok(()) => run(&mut stdout, &mut session),
        Err(err) => Err(err.into()),
    };
    let restored = render::restore_terminal(&mut stdout);

    let result = result.and(restored.map_err(Into::into));
    if let Err(err) = &result {
        error!("{err}");
    }
    result
}

fn run(stdout: &mut Stdout, session: &mut Session) -> Result<()> {
    let mut renderer = Renderer::new();
    renderer.render(stdout, &session.snapshot(), session.message().as_ref())?;

    loop {
        let event = event::read()?;
        if let Event::Resize(..) = event {
            renderer.invalidate();
        }
        match command_for(&event) {
            Some(Command::Quit) => return Ok(()),
            Some(Command::Move(dir)) => {
                session.attempt_move(dir);
            }
            Some(Command::Restart) => session.restart_level()?,
            None => {}
        }
        renderer.render(stdout, &session.snapshot(), session.message().as_ref())?;
    }
}
