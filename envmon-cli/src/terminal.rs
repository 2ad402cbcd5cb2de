//! Line-driven terminal loop around a [`Dashboard`].

use envmon_core::{Command, Dashboard, WeatherProvider, dashboard::HELP};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Clears the screen and homes the cursor.
const CLEAR: &str = "\x1b[2J\x1b[H";

const KEYS: &str = "[r]efresh  [a]uto-refresh  [g]rid  [t]ree  [x <id>] toggle  [h]elp  [q]uit";

pub async fn run<P: WeatherProvider>(mut dashboard: Dashboard<P>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    draw(&dashboard, None);
    dashboard.mount().await;
    draw(&dashboard, None);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                // EOF on stdin ends the session like `quit`.
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    draw(&dashboard, None);
                    continue;
                }

                let command = match Command::try_from(line.as_str()) {
                    Ok(command) => command,
                    Err(err) => {
                        draw(&dashboard, Some(&err.to_string()));
                        continue;
                    }
                };

                let show_help = command == Command::Help;
                if !dashboard.handle(command).await {
                    break;
                }
                draw(&dashboard, show_help.then_some(HELP));
            }
            _ = dashboard.next_tick() => {
                debug!("auto-refresh tick");
                dashboard.load().await;
                draw(&dashboard, None);
            }
        }
    }

    Ok(())
}

fn draw<P: WeatherProvider>(dashboard: &Dashboard<P>, note: Option<&str>) {
    print!("{CLEAR}");
    println!("{}", dashboard.render());
    println!();
    match note {
        Some(note) => println!("{note}"),
        None => println!("{KEYS}"),
    }
}
