//! pileup-inspect CLI entry point
//!
//! Quick look at the reads behind a candidate SNV, indel or SV breakpoint
//! through `samtools tview`.

use clap::{Args, Parser, Subcommand};
use pileup_inspect::tview::{Locus, TviewConfig, DEFAULT_COLUMNS, DEFAULT_FLANK};
use pileup_inspect::views;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[cfg(feature = "bam")]
use pileup_inspect::tview::staging::ReadSelection;

#[derive(Parser)]
#[command(name = "pileup-inspect")]
#[command(about = "Inspect the reads behind a variant call through samtools tview")]
#[command(version)]
#[command(author = "pileup-inspect Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every view
#[derive(Args)]
struct ViewArgs {
    /// Indexed BAM file
    bam: PathBuf,
    /// Locus, 1-based (e.g. chr1:10000)
    locus: Locus,
    /// Reference FASTA (default: $hg19)
    #[arg(short = 'g', long)]
    genome: Option<PathBuf>,
    /// samtools binary (default: samtools on PATH)
    #[arg(short = 's', long)]
    samtools: Option<PathBuf>,
    /// Output file (optional, stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Terminal width given to tview
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,
    /// Bases shown left of the locus
    #[arg(long, default_value_t = DEFAULT_FLANK)]
    flank: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-strand base counts at a single position
    Snv {
        #[command(flatten)]
        view: ViewArgs,
        /// Also show reads matching the reference
        #[arg(short = 'a', long)]
        all: bool,
    },
    /// Reads carrying an insertion or deletion near the locus
    #[cfg(feature = "bam")]
    Indel {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Soft-clipped reads near the locus
    #[cfg(feature = "bam")]
    Sv {
        #[command(flatten)]
        view: ViewArgs,
    },
}

fn resolve_config(view: &ViewArgs) -> anyhow::Result<TviewConfig> {
    let config = TviewConfig::resolve(view.samtools.clone(), view.genome.clone())?
        .with_columns(view.columns)
        .with_flank(view.flank);

    log::info!("bam:      {}", view.bam.display());
    log::info!("locus:    {}", view.locus);
    log::info!("samtools: {}", config.samtools.display());
    log::info!("genome:   {}", config.genome.display());
    Ok(config)
}

fn open_output(output: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            anyhow::anyhow!("Failed to create output file {:?}: {}", path, e)
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Snv { view, all } => {
            let config = resolve_config(&view)?;
            let mut out = open_output(&view.output)?;
            let pileup = views::snv_view(&config, &view.bam, &view.locus, all, &mut out)?;
            out.flush()?;
            log::info!(
                "{} reads cover {}, {} shown",
                pileup.tally.total(),
                view.locus,
                pileup.fragments.len()
            );
        }

        #[cfg(feature = "bam")]
        Commands::Indel { view } => {
            let config = resolve_config(&view)?;
            let mut out = open_output(&view.output)?;
            views::cigar_view(&config, &view.bam, &view.locus, ReadSelection::Indel, &mut out)?;
            out.flush()?;
        }

        #[cfg(feature = "bam")]
        Commands::Sv { view } => {
            let config = resolve_config(&view)?;
            let mut out = open_output(&view.output)?;
            views::cigar_view(&config, &view.bam, &view.locus, ReadSelection::SoftClip, &mut out)?;
            out.flush()?;
        }
    }

    log::info!("done in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
