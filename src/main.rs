use demangler::{Language, Options};

/// Schemes the command line accepts by name but that aren't implemented.
const UNSUPPORTED: &[&str] = &["rust", "java", "objc", "pascal", "swift"];

fn main() {
    let args = &*args::ARGS;

    match args.verbosity {
        0 => {}
        1 => log::set_level(log::Level::Info),
        _ => log::set_level(log::Level::Trace),
    }

    let lang = match args.language.parse::<Language>() {
        Ok(lang) => lang,
        Err(err) => {
            if UNSUPPORTED.contains(&args.language.as_str()) {
                log::error!("Demangling '{}' symbols is not supported.", args.language);
            } else {
                log::error!("{err}, expected one of: {}.", Language::ALL.join(", "));
            }
            std::process::exit(1);
        }
    };

    // parameter lists are always shown on the command line
    let mut opts = Options::PARAMS;
    if args.simplify {
        opts |= Options::SIMPLIFY;
    }

    log::notify!("Demangling '{}' as {lang} with {opts:?}.", args.symbol);

    match demangler::demangle(lang, &args.symbol, opts) {
        Some(demangled) => println!("{demangled}"),
        None => {
            log::error!("Failed to demangle '{}'.", args.symbol);
            std::process::exit(1);
        }
    }
}
