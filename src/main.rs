use std::env;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use log::warn;

use statement_consolidator::config::{Config, DEFAULT_CURRENCY_SYMBOL, DEFAULT_DELIMITER};
use statement_consolidator::consolidation::aggregator::Aggregator;
use statement_consolidator::consolidation::formulas::FormulaSpec;
use statement_consolidator::data;

const USAGE: &str = "Usage: statement-consolidator [--delimiter <char>] [--currency <symbol>] <input_dir> [output_csv]\n       statement-consolidator --formulas";

struct Options {
    input_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    delimiter: u8,
    currency_symbol: String,
    list_formulas: bool,
}

fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" => Ok(b'\t'),
        _ if value.len() == 1 && value.is_ascii() => Ok(value.as_bytes()[0]),
        _ => bail!("delimiter must be a single ASCII character, got '{}'", value),
    }
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options {
        input_dir: None,
        output: None,
        delimiter: DEFAULT_DELIMITER,
        currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        list_formulas: false,
    };
    let mut positional = Vec::new();

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--formulas" => options.list_formulas = true,
            "--delimiter" => {
                let value = args.next().ok_or(anyhow!("--delimiter requires a value"))?;
                options.delimiter = parse_delimiter(value)?;
            },
            "--currency" => {
                let value = args.next().ok_or(anyhow!("--currency requires a value"))?;
                options.currency_symbol = value.clone();
            },
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() > 2 {
        bail!("too many arguments");
    }

    let mut positional = positional.into_iter();
    options.input_dir = positional.next();
    options.output = positional.next().map(|path| data::output_path(&path));

    if options.input_dir.is_none() && !options.list_formulas {
        bail!("missing input directory");
    }

    Ok(options)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        },
    };

    let config = Config::new(FormulaSpec::financial_statements()?)
        .with_delimiter(options.delimiter)
        .with_currency_symbol(options.currency_symbol);

    if options.list_formulas {
        data::export_formulas(config.formulas(), std::io::stdout())?;
        return Ok(());
    }

    let input_dir = options.input_dir.ok_or(anyhow!("missing input directory"))?;
    let paths = data::discover_inputs(&input_dir, options.output.as_deref())?;

    let mut aggregator = Aggregator::new(&config);
    for source in data::read_sources(&paths) {
        match source {
            Ok(file) => aggregator.add_file(&file),
            Err(warning) => aggregator.skip_file(warning),
        }
    }
    let consolidation = aggregator.finish();

    for warning in consolidation.warnings() {
        warn!("{}", warning);
    }

    if consolidation.table().rows().is_empty() {
        bail!("no csv files found or processed in '{}'", input_dir.display());
    }

    match &options.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create '{}'", path.display()))?;
            data::export_csv(consolidation.table(), file)?;
        },
        None => data::export_csv(consolidation.table(), std::io::stdout())?,
    }

    Ok(())
}
