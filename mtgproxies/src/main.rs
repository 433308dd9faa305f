use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mtgproxies::dimensions::{Units, mtg_card_size, parse_card_size, parse_paper_size};
use mtgproxies::layout::{LayoutSettings, PageLayoutGrid};
use mtgproxies::render::{CardAssembler, PdfRenderer, RasterRenderer, RenderOptions, parse_color};
use mtgproxies::scans::{FaceSelection, fetch_scans};
use mtgproxies::source::DecklistSpec;
use mtgproxies::tokens::get_tokens;
use mtgproxies::value::{DEFAULT_LUMP_THRESHOLD, deck_value};
use mtgproxies::{
    CardData, Currency, Decklist, DecklistFormat, Error, FileCache, MergeKey, Result, ScryfallClient,
    Severity, Warning, merge_duplicates,
};

/// Turn Magic: The Gathering decklists into printable proxy sheets,
/// card data and scans come from https://scryfall.com.
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// where the card database and the scans are cached
    #[arg(long, env = "MTGPROXIES_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,
    /// more output, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a decklist and write it in another format
    Convert {
        /// file, manastack:<id> or archidekt:<id>
        decklist: String,
        outfile: PathBuf,
        #[arg(long, value_enum, default_value_t = DecklistFormat::Arena)]
        format: DecklistFormat,
        /// drop comments
        #[arg(long)]
        clean: bool,
        /// merge duplicate cards
        #[arg(long, value_enum)]
        merge: Option<MergeKey>,
    },
    /// Create printable proxy sheets
    #[command(subcommand)]
    Print(PrintCommand),
    /// Append the tokens created by the cards of a decklist
    Tokens {
        decklist: String,
        #[arg(long, value_enum, default_value_t = DecklistFormat::Arena)]
        format: DecklistFormat,
    },
    /// Show the value of a decklist, using the cheapest print of every card
    Value {
        decklist: String,
        #[arg(long, value_enum, default_value_t = Currency::Eur)]
        currency: Currency,
        /// cards worth less than this share of the total are summed up
        #[arg(long, default_value_t = DEFAULT_LUMP_THRESHOLD)]
        lump_threshold: f64,
    },
}

#[derive(Subcommand, Debug)]
enum PrintCommand {
    /// a single PDF with one page per sheet
    Pdf(PrintArgs),
    /// one image file per sheet
    Image {
        #[command(flatten)]
        args: PrintArgs,
        #[arg(long, default_value_t = 300)]
        dpi: u32,
    },
}

#[derive(Args, Debug)]
struct PrintArgs {
    /// files, manastack:<id> or archidekt:<id>
    #[arg(required = true, num_args = 1..)]
    deck_list: Vec<String>,
    output_file: PathBuf,
    /// keyword A0-A10 or WIDTHxHEIGHT
    #[arg(long, default_value = "a4")]
    paper_size: String,
    /// WIDTHxHEIGHT, defaults to the size of a Magic card
    #[arg(long)]
    card_size: Option<String>,
    /// cut from every edge of the scans
    #[arg(long, default_value_t = 0.0)]
    crop_border: f64,
    /// space between cards
    #[arg(long, default_value_t = 0.0)]
    cut_spacing_thickness: f64,
    /// 0 disables crop marks
    #[arg(long, default_value_t = 0.0)]
    crop_mark_thickness: f64,
    /// unprintable margin at the paper edges
    #[arg(long, default_value_t = 0.0)]
    page_safe_margin: f64,
    /// color name or hex code
    #[arg(long)]
    background_color: Option<String>,
    /// fill the rounded corners of the scans
    #[arg(long)]
    filled_corners: bool,
    #[arg(long, value_enum, default_value_t = FaceSelection::All)]
    faces: FaceSelection,
    #[arg(long, value_enum, default_value_t = Units::Mm)]
    units: Units,
    #[arg(long, value_enum)]
    merge: Option<MergeKey>,
}

const CHECKED: [Severity; 2] = [Severity::Error, Severity::Warning];
const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Cosmetic];

fn print_warnings(warnings: &[Warning], levels: &[Severity]) {
    for warning in warnings.iter().filter(|w| levels.contains(&w.severity)) {
        println!("{}", warning);
    }
}

/// Loads a decklist and reports its problems, a decklist with invalid names is an error.
fn load_decklist<'a>(
    spec: &DecklistSpec,
    client: &ScryfallClient,
    card_data: &'a CardData,
    levels: &[Severity],
) -> Result<Decklist<'a>> {
    let parsed = spec.load(client, card_data)?;
    print_warnings(&parsed.warnings, levels);
    if !parsed.ok {
        println!("Decklist contains invalid card names. Fix errors above before reattempting.");
        return Err(Error::InvalidDecklist);
    }
    println!(
        "Found {} cards in total with {} unique cards.",
        parsed.decklist.total_count(),
        parsed.decklist.total_count_unique()
    );
    Ok(parsed.decklist)
}

fn convert(
    client: &ScryfallClient,
    cache: &FileCache,
    spec: &str,
    outfile: &Path,
    format: DecklistFormat,
    clean: bool,
    merge: Option<MergeKey>,
) -> Result<()> {
    let spec = DecklistSpec::parse(spec)?;
    let card_data = CardData::load(client, cache)?;
    let mut decklist = load_decklist(&spec, client, &card_data, &CHECKED)?;
    if clean {
        decklist = decklist.without_comments();
    }
    if let Some(key) = merge {
        decklist = merge_duplicates(&decklist, key);
    }
    decklist.save(outfile, format)?;
    info!("saved {} to {}", spec, outfile.display());
    Ok(())
}

fn print(client: &ScryfallClient, cache: &FileCache, command: PrintCommand) -> Result<()> {
    let (args, dpi) = match command {
        PrintCommand::Pdf(args) => (args, None),
        PrintCommand::Image { args, dpi } => (args, Some(dpi)),
    };
    let units = args.units;
    let paper_size = parse_paper_size(&args.paper_size, units)?;
    let card_size = match &args.card_size {
        Some(spec) => parse_card_size(spec)?,
        None => mtg_card_size(units),
    };
    let background_color = args.background_color.as_deref().map(parse_color).transpose()?;
    let grid = PageLayoutGrid::new(LayoutSettings {
        paper_size,
        card_size,
        border_crop: args.crop_border,
        cut_spacing: args.cut_spacing_thickness,
        safe_margin: args.page_safe_margin,
    })?;

    let specs = args
        .deck_list
        .iter()
        .map(|spec| DecklistSpec::parse(spec))
        .collect::<Result<Vec<_>>>()?;
    let card_data = CardData::load(client, cache)?;
    let mut decklist = Decklist::new();
    for spec in &specs {
        decklist.extend(load_decklist(spec, client, &card_data, &ALL)?);
    }
    if let Some(key) = args.merge {
        decklist = merge_duplicates(&decklist, key);
    }

    let (scans, warnings) = fetch_scans(&decklist, client, cache, args.faces);
    print_warnings(&warnings, &ALL);

    let assembler = CardAssembler::new(
        grid,
        RenderOptions {
            crop_mark_thickness: args.crop_mark_thickness,
            background_color,
            filled_corners: args.filled_corners,
        },
    );
    let written = match dpi {
        None => {
            let renderer = PdfRenderer::new(args.output_file, paper_size, units, background_color);
            assembler.assemble(&scans, renderer)?
        }
        Some(dpi) => {
            let renderer = RasterRenderer::new(args.output_file, paper_size, units, dpi, background_color);
            assembler.assemble(&scans, renderer)?
        }
    };
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn tokens(client: &ScryfallClient, cache: &FileCache, spec: &str, format: DecklistFormat) -> Result<()> {
    let spec = DecklistSpec::parse(spec)?;
    let card_data = CardData::load(client, cache)?;
    let mut decklist = load_decklist(&spec, client, &card_data, &CHECKED)?;
    let tokens = get_tokens(&card_data.database, &decklist);
    println!("Found {} created tokens.", tokens.len());

    decklist.append_comment("");
    decklist.append_comment("Tokens");
    for token in tokens {
        decklist.append_card(1, token);
    }
    let path = spec.file_name();
    decklist.save(&path, format)?;
    println!("Successfully appended to {}.", path.display());
    Ok(())
}

fn value(
    client: &ScryfallClient,
    cache: &FileCache,
    spec: &str,
    currency: Currency,
    lump_threshold: f64,
) -> Result<()> {
    let spec = DecklistSpec::parse(spec)?;
    let card_data = CardData::load(client, cache)?;
    let decklist = load_decklist(&spec, client, &card_data, &CHECKED)?;
    let value = deck_value(&card_data.database, &decklist, currency, lump_threshold);
    print_warnings(&value.warnings, &CHECKED);

    let unit = currency.as_str().to_uppercase();
    let width = value.entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, price) in &value.entries {
        println!("{:<width$}  {:>8.2} {}", name, price, unit, width = width);
    }
    println!("{:<width$}  {:>8.2} {}", "total", value.total, unit, width = width);
    Ok(())
}

fn run(opts: Opts) -> Result<()> {
    let cache = FileCache::new(opts.cache_dir.unwrap_or_else(FileCache::default_dir))?;
    let client = ScryfallClient::new()?;
    match opts.command {
        Command::Convert {
            decklist,
            outfile,
            format,
            clean,
            merge,
        } => convert(&client, &cache, &decklist, &outfile, format, clean, merge),
        Command::Print(command) => print(&client, &cache, command),
        Command::Tokens { decklist, format } => tokens(&client, &cache, &decklist, format),
        Command::Value {
            decklist,
            currency,
            lump_threshold,
        } => value(&client, &cache, &decklist, currency, lump_threshold),
    }
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    let level = match opts.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = mtgproxies::setup_logger(level) {
        eprintln!("couldn't set up logging: {}", e);
    }

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::InvalidDecklist) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
