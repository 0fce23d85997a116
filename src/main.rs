//! Where the magic happens for `comdesc` binary!
use clap::error::ErrorKind as ClapErrorKind;
use clap::{ArgGroup, CommandFactory, Parser};
use std::env;
use std::ffi::OsString;

use comdesc::collector::{read_json_dump, DeviceDump, SystemCollector};
use comdesc::config::Config;
use comdesc::display::{self, PrintSettings};
use comdesc::error::Result;
use comdesc::query::Query;

/// Long options that are also accepted with a single dash
const SINGLE_DASH_LONGS: [&str; 4] = ["-ascii", "-list", "-name", "-desc"];
/// Options whose next argument is a value and must not be rewritten
const VALUE_OPTIONS: [&str; 4] = ["-name", "-desc", "--name", "--desc"];

const USAGE_EXAMPLES: &str = "\
Examples:
  comdesc -list
      list all COM ports and their descriptors
  comdesc -name COM8
      show the descriptor of COM8
  comdesc -desc \"FTDI usb bridge\"
      show the COM ports with this exact descriptor
  comdesc -ascii -list
      same as -list with accented letters folded to ASCII";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, after_help = USAGE_EXAMPLES)]
#[command(group(ArgGroup::new("mode").args(["list", "name", "desc"])))]
struct Args {
    /// List all COM ports as "COMx<TAB>descriptor"
    #[arg(short, long, default_value_t = false)]
    list: bool,

    /// Show the descriptor of the COM port with this name, e.g. COM8
    #[arg(short, long, allow_hyphen_values = true)]
    name: Option<String>,

    /// Show the names of COM ports with exactly this descriptor
    #[arg(short, long, allow_hyphen_values = true)]
    desc: Option<String>,

    /// Fold accented Latin and Greek letters and ligatures to ASCII, dropping other characters above U+00FF
    #[arg(short, long, default_value_t = false)]
    ascii: bool,

    /// Output the matched ports as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Read devices from a JSON dump made with --dump rather than enumerating the system
    #[arg(long)]
    from_json: Option<String>,

    /// Dump the raw USB and COM port device records as JSON
    #[arg(long, default_value_t = false)]
    dump: bool,

    /// Disable coloured output, can also use NO_COLOR environment variable
    #[arg(long, default_value_t = false)]
    no_colour: bool,

    /// Path to user config file to use for defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Turn debugging information on. Alternatively can use RUST_LOG env: INFO, DEBUG, TRACE
    #[arg(short = 'z', long, action = clap::ArgAction::Count)]
    debug: u8,
}

impl Args {
    /// Query selected by the mode flags, `None` if no mode was given
    fn query(&self) -> Option<Query> {
        if self.list {
            Some(Query::List)
        } else if let Some(name) = &self.name {
            Some(Query::ByName(name.to_owned()))
        } else {
            self.desc
                .as_ref()
                .map(|desc| Query::ByDescriptor(desc.to_owned()))
        }
    }
}

/// Rewrite `-list` style long options to `--list` so clap does not read them as bundled shorts
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut ret: Vec<OsString> = Vec::new();

    for arg in args {
        let is_value = ret
            .last()
            .and_then(|prev| prev.to_str())
            .is_some_and(|prev| VALUE_OPTIONS.contains(&prev));

        match arg.to_str() {
            Some(s) if !is_value && SINGLE_DASH_LONGS.contains(&s) => {
                ret.push(OsString::from(format!("-{}", s)))
            }
            _ => ret.push(arg),
        }
    }

    ret
}

fn print_usage() -> Result<()> {
    Args::command().print_help()?;
    Ok(())
}

fn run(args: Args) -> Result<()> {
    comdesc::set_log_level(args.debug)?;

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::sys()?,
    };
    log::debug!("Config {:?}", config);

    let settings = PrintSettings {
        ascii: args.ascii || config.ascii,
        json: args.json || config.json,
        colour: !(args.no_colour || config.no_colour),
    };

    // just set the env for this process
    if !settings.colour {
        env::set_var("NO_COLOR", "1");
    }

    let dump = match &args.from_json {
        Some(path) => read_json_dump(path)?,
        None => DeviceDump::from_collector(&SystemCollector),
    };

    if args.dump {
        println!("{}", display::to_json(&dump)?);
        return Ok(());
    }

    match args.query() {
        Some(query) => {
            let ports = comdesc::get_ports_from(&dump);
            display::print(&query, &ports, &settings)
        }
        None => print_usage(),
    }
}

fn main() {
    let args = match Args::try_parse_from(normalize_args(env::args_os())) {
        Ok(args) => args,
        Err(e) => {
            // help and version are printed as asked, anything else gets the usage
            let printed = match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                    e.print().map_err(comdesc::error::Error::from)
                }
                _ => print_usage(),
            };
            if let Err(e) = printed {
                eprintln!("{}", e);
            }
            std::process::exit(0);
        }
    };

    if args.query().is_none() && !args.dump {
        if let Err(e) = print_usage() {
            eprintln!("{}", e);
        }
        std::process::exit(0);
    }

    if let Err(e) = run(args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
