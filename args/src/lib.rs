use once_cell::sync::Lazy;

macro_rules! exit {
    ($code:expr => $($arg:tt)*) => {{
        if $code == 0 {
            println!($($arg)*);
        } else {
            eprintln!($($arg)*);
        }
        std::process::exit($code);
    }};
}

pub const HELP: &str = "OVERVIEW: Symbol demangler

USAGE: demangle [options] <LANGUAGE> <SYMBOL>

LANGUAGES:
  c++                 Itanium (v3), GNU v2 and legacy GNU v2 schemes
  msvc                Microsoft Visual C++ scheme

OPTIONS:
  -h, --help          Print usage information
  -s, --simplify      Replace common types with shortened names
  -v, --verbose       Print diagnostics, repeat (-vv) for parser traces";

const ABBRV: &[&str] = &["-h", "-s", "-v", "-vv"];
const NAMES: &[&str] = &["--help", "--simplify", "--verbose"];

pub static ARGS: Lazy<Cli> = Lazy::new(Cli::parse);

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    /// Replace common types with shortened names.
    pub simplify: bool,

    /// Number of times `-v` was given.
    pub verbosity: u8,

    /// Name of the scheme the symbol is demangled with.
    pub language: String,

    /// Mangled symbol.
    pub symbol: String,
}

/// Reason argument parsing stopped early, along with the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub code: i32,
    pub message: String,
}

impl Exit {
    fn usage(message: impl Into<String>) -> Self {
        Self {
            code: 1,
            message: message.into(),
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        match Self::try_parse_from(std::env::args().skip(1)) {
            Ok(cli) => cli,
            Err(Exit { code, message }) => exit!(code => "{message}"),
        }
    }

    pub fn try_parse_from<I>(args: I) -> Result<Self, Exit>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = Cli::default();
        let mut positional = Vec::new();

        for arg in args {
            match arg.as_str() {
                "-h" | "--help" => {
                    return Err(Exit {
                        code: 0,
                        message: HELP.to_string(),
                    })
                }
                "-s" | "--simplify" => {
                    if cli.simplify {
                        return Err(Exit::usage("Simplify flag already set."));
                    }
                    cli.simplify = true;
                }
                "-v" | "--verbose" => cli.verbosity = cli.verbosity.saturating_add(1),
                "-vv" => cli.verbosity = cli.verbosity.saturating_add(2),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    let mut distance = u32::MAX;
                    let mut best_guess = "";
                    for name in NAMES.iter().chain(ABBRV) {
                        let d = triple_accel::levenshtein_exp(flag.as_bytes(), name.as_bytes());
                        if d < distance {
                            distance = d;
                            best_guess = name;
                        }
                    }

                    // A guess that's less than 3 `steps` away from a correct arg.
                    if distance < 4 {
                        return Err(Exit::usage(format!(
                            "Unknown cmd arg '{flag}' did you mean '{best_guess}'?"
                        )));
                    }

                    return Err(Exit::usage(format!("Unknown cmd arg '{flag}' was entered.")));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        match (positional.next(), positional.next(), positional.next()) {
            (Some(language), Some(symbol), None) => {
                cli.language = language;
                cli.symbol = symbol;
            }
            (_, _, Some(extra)) => {
                return Err(Exit::usage(format!("Unexpected argument '{extra}'.\n\n{HELP}")))
            }
            (Some(_), None, None) => {
                return Err(Exit::usage(format!("Missing symbol to demangle.\n\n{HELP}")))
            }
            (None, ..) => return Err(Exit::usage(format!("Missing language.\n\n{HELP}"))),
        }

        Ok(cli)
    }
}
