use std::fmt::Write as _;

use grove_core::{ModuleSpec, Registry};

pub struct ListArgs {
    pub json: bool,
}

pub fn run(args: ListArgs) {
    let registry = Registry::builtin();
    if args.json {
        match render_json(&registry) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render_table(&registry));
    }
}

pub fn render_table(registry: &Registry) -> String {
    let width = registry
        .names()
        .map(str::len)
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!("Registered modules ({}):\n", registry.len());
    writeln!(out, "  {:width$}  {:26}  {:7}  GENERATE", "NAME", "SOURCE ROOT", "SCANNER").unwrap();
    for spec in registry.all() {
        writeln!(
            out,
            "  {:width$}  {:26}  {:7}  {}",
            spec.name,
            spec.source_root,
            yes_no(spec.has_scanner),
            yes_no(spec.needs_generation),
        )
        .unwrap();
    }
    out
}

pub fn render_json(registry: &Registry) -> serde_json::Result<String> {
    let modules: Vec<&ModuleSpec> = registry.all().iter().collect();
    serde_json::to_string_pretty(&modules)
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
