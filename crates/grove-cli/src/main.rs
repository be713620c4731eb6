mod cli;
mod commands;

use cli::{BuildParams, HeaderParams, ListParams, PlanParams, build_cli, verbosity};

fn main() {
    let matches = build_cli().get_matches();
    commands::logging::init(verbosity(&matches));

    match matches.subcommand() {
        Some(("list", m)) => {
            let params = ListParams::from_matches(m);
            commands::list::run(params.into());
        }
        Some(("plan", m)) => {
            let params = PlanParams::from_matches(m);
            commands::plan::run(params.into());
        }
        Some(("build", m)) => {
            let params = BuildParams::from_matches(m);
            commands::build::run(params.into());
        }
        Some(("header", m)) => {
            let params = HeaderParams::from_matches(m);
            commands::header::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
