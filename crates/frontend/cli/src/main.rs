use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pal_core::logging::{LogCategory, LogConfig, LogLevel};
use pal_core::{
    PaletteLoader, PaletteResource, RecordingTransfer, RegisterBank, RegisterTransfer, Rgb444,
    PALETTE_BANK_BYTES,
};
use pal_resources::{compile_project, parse_jasc, CompiledPalette, ResourcePack};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "palc", about = "Palette resource compiler and register loader")]
struct Args {
    /// Core log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Per-category level, e.g. `--log transfer=trace` (repeatable)
    #[arg(long = "log", value_name = "CATEGORY=LEVEL")]
    log_overrides: Vec<String>,

    /// Append core log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Maximum core log messages per second per category
    #[arg(long, default_value_t = 60)]
    log_rate: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile the palettes listed in <PROJECT>/resources/config.json
    Compile {
        project: PathBuf,
    },
    /// Load a palette into an in-memory register bank and print the result as JSON
    Load(LoadArgs),
}

#[derive(clap::Args)]
struct LoadArgs {
    /// A JASC-PAL text file, or a compiled .bin pack (with --id)
    source: PathBuf,

    /// Palette id inside a pack
    #[arg(long)]
    id: Option<String>,

    /// Palette register byte offset (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0", value_parser = parse_offset)]
    offset: u8,

    /// Load only entries START..START+SIZE
    #[arg(long, value_name = "START:SIZE", value_parser = parse_region)]
    region: Option<(usize, usize)>,

    /// Reject loads that would run past the resource or the register bank
    #[arg(long, default_value_t = false)]
    checked: bool,

    /// Print the register write requests instead of applying them
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Palette register bank size in bytes
    #[arg(long, default_value_t = PALETTE_BANK_BYTES)]
    bank_size: usize,

    /// Write the JSON output to this file instead of stdout
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn parse_offset(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid register offset {s:?}: {e}"))
}

fn parse_region(s: &str) -> Result<(usize, usize), String> {
    let (start, size) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:SIZE, got {s:?}"))?;
    let start = start
        .parse()
        .map_err(|e| format!("invalid region start {start:?}: {e}"))?;
    let size = size
        .parse()
        .map_err(|e| format!("invalid region size {size:?}: {e}"))?;
    Ok((start, size))
}

fn parse_log_override(s: &str) -> Result<(LogCategory, LogLevel)> {
    let (category, level) = s
        .split_once('=')
        .with_context(|| format!("expected CATEGORY=LEVEL, got {s:?}"))?;
    let category = LogCategory::from_str(category)
        .with_context(|| format!("unknown log category {category:?}"))?;
    let level =
        LogLevel::from_str(level).with_context(|| format!("unknown log level {level:?}"))?;
    Ok((category, level))
}

fn configure_logging(args: &Args) -> Result<()> {
    let config = LogConfig::global();
    let level = LogLevel::from_str(&args.log_level)
        .with_context(|| format!("unknown log level {:?}", args.log_level))?;
    config.set_global_level(level);
    for entry in &args.log_overrides {
        let (category, level) = parse_log_override(entry)?;
        config.set_level(category, level);
    }
    config.set_rate_limit(args.log_rate);
    if let Some(path) = &args.log_file {
        config
            .set_log_file(path.clone())
            .with_context(|| format!("opening log file {}", path.display()))?;
    }
    Ok(())
}

/// Read a palette from a text file or a pack.
fn read_palette(source: &Path, id: Option<&str>) -> Result<CompiledPalette> {
    let is_pack = source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));

    if is_pack {
        let id = id.context("--id is required when loading from a palette pack")?;
        let pack = ResourcePack::read_from(source)?;
        return pack
            .get(id)
            .cloned()
            .with_context(|| format!("no palette {id:?} in {}", source.display()));
    }

    let text = fs::read_to_string(source)
        .with_context(|| format!("reading {}", source.display()))?;
    let colors = parse_jasc(&text).with_context(|| format!("parsing {}", source.display()))?;
    let id = match id {
        Some(id) => id.to_string(),
        None => source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    Ok(CompiledPalette::from_colors(id, &colors))
}

fn issue<T: RegisterTransfer>(
    loader: &mut PaletteLoader<T>,
    resource: &PaletteResource<'_>,
    args: &LoadArgs,
) -> Result<()> {
    match (args.region, args.checked) {
        (None, true) => loader.try_load_palette(resource, args.offset)?,
        (None, false) => loader.load_palette(resource, args.offset),
        (Some((start, size)), true) => {
            loader.try_load_palette_region(resource, args.offset, start, size)?
        }
        (Some((start, size)), false) => {
            // The destination side stays unchecked, but a bad region from the
            // command line must not turn into a slice panic.
            if start.checked_add(size).map_or(true, |end| end > resource.size()) {
                bail!(
                    "region {}+{} is outside a palette of {} entries",
                    start,
                    size,
                    resource.size()
                );
            }
            loader.load_palette_region(resource, args.offset, start, size)
        }
    }
    Ok(())
}

fn run_load(args: &LoadArgs) -> Result<Value> {
    let palette = read_palette(&args.source, args.id.as_deref())?;
    let resource = palette.as_resource();
    log::info!(
        "loading palette {} ({} entries) at offset {:#04X}",
        palette.id,
        resource.size(),
        args.offset
    );

    if args.dry_run {
        let mut loader =
            PaletteLoader::new(RecordingTransfer::with_palette_capacity(args.bank_size));
        issue(&mut loader, &resource, args)?;
        let requests = loader.into_inner().take_requests();
        return Ok(json!({
            "palette_id": palette.id,
            "requests": requests,
        }));
    }

    let mut loader = PaletteLoader::new(RegisterBank::with_palette_size(args.bank_size));
    issue(&mut loader, &resource, args)?;
    let bank = loader.into_inner();

    let argb: Vec<String> = (0..bank.palette().len() / 2)
        .filter_map(|i| bank.palette_entry(i))
        .map(|raw| format!("{:08X}", Rgb444::from_raw(raw).to_argb8888()))
        .collect();
    let mut out = bank.snapshot();
    out["palette_id"] = json!(palette.id);
    out["argb"] = json!(argb);
    Ok(out)
}

fn run_compile(project: &Path) -> Result<()> {
    let pack = compile_project(project)
        .with_context(|| format!("compiling resources in {}", project.display()))?;
    for palette in pack.palettes() {
        println!("{}: {} entries", palette.id, palette.entries());
    }
    log::info!(
        "wrote {} palette(s) to {}",
        pack.len(),
        project.join("build").display()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    configure_logging(&args)?;

    match &args.command {
        Command::Compile { project } => run_compile(project)?,
        Command::Load(load) => {
            let out = serde_json::to_string_pretty(&run_load(load)?)?;
            match &load.dump {
                Some(path) => fs::write(path, out)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", out),
            }
        }
    }

    Ok(())
}
