use grove_core::{ALL_OPTION, Registry};
use grove_core::utils::suggest;

/// Print `err` with a hint, when one applies, and exit with status 1.
pub fn exit_with(registry: &Registry, err: &grove_build::Error) -> ! {
    eprintln!("error: {err}");
    if let Some(hint) = hint(registry, err) {
        eprintln!();
        eprintln!("{hint}");
    }
    std::process::exit(1);
}

pub fn hint(registry: &Registry, err: &grove_build::Error) -> Option<String> {
    let grove_build::Error::Config(err) = err else {
        return None;
    };

    let candidates = match err {
        grove_core::Error::UnknownModule { token } => suggest(token, registry.names()),
        grove_core::Error::UnknownOption { name } => {
            suggest(name, registry.names().chain([ALL_OPTION]))
        }
        _ => return None,
    };

    let mut hint = String::new();
    if let Some(suggestion) = candidates {
        hint.push_str(&format!("Did you mean '{suggestion}'?\n\n"));
    }
    hint.push_str("Run 'grove list' for the full list.");
    Some(hint)
}
