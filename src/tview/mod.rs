//! samtools tview plumbing
//!
//! Resolves the samtools binary and reference genome once, parses the
//! `chrom:pos` locus and captures `samtools tview -d T` screens.

#[cfg(feature = "bam")]
pub mod staging;

use crate::core::{ToolError, ToolResult};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

/// Terminal width handed to tview through `COLUMNS`
pub const DEFAULT_COLUMNS: usize = 181;

/// Bases shown left of the queried position
pub const DEFAULT_FLANK: u64 = 90;

/// Environment variable holding the default reference FASTA
pub const GENOME_ENV: &str = "hg19";

/// Name of the samtools executable searched on PATH
pub const SAMTOOLS_BIN: &str = "samtools";

/// A 1-based genomic position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub chrom: String,
    pub pos: u64,
}

impl Locus {
    pub fn new(chrom: impl Into<String>, pos: u64) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
        }
    }

    /// First position of a view placing this locus `flank` bases from the left edge
    pub fn view_start(&self, flank: u64) -> u64 {
        self.pos.saturating_sub(flank).max(1)
    }

    /// tview `-p` argument
    pub fn view_region(&self, flank: u64) -> String {
        format!("{}:{}", self.chrom, self.view_start(flank))
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chrom, self.pos)
    }
}

impl FromStr for Locus {
    type Err = ToolError;

    /// Parse `chrom:pos`; contig names may themselves contain `:`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ToolError::InvalidLocus {
            locus: s.to_string(),
            message: message.to_string(),
        };

        let (chrom, pos) = s.rsplit_once(':').ok_or_else(|| invalid("expected chrom:pos"))?;
        if chrom.is_empty() {
            return Err(invalid("empty chromosome name"));
        }
        let pos: u64 = pos
            .replace(',', "")
            .parse()
            .map_err(|_| invalid("position is not a number"))?;
        if pos == 0 {
            return Err(invalid("positions are 1-based"));
        }

        Ok(Self::new(chrom, pos))
    }
}

/// External tool settings, resolved once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TviewConfig {
    pub samtools: PathBuf,
    pub genome: PathBuf,
    pub columns: usize,
    pub flank: u64,
}

impl TviewConfig {
    pub fn new(samtools: impl Into<PathBuf>, genome: impl Into<PathBuf>) -> Self {
        Self {
            samtools: samtools.into(),
            genome: genome.into(),
            columns: DEFAULT_COLUMNS,
            flank: DEFAULT_FLANK,
        }
    }

    /// Fill unset paths from PATH (samtools) and `$hg19` (genome)
    pub fn resolve(samtools: Option<PathBuf>, genome: Option<PathBuf>) -> ToolResult<Self> {
        let samtools = match samtools {
            Some(path) => path,
            None => find_in_path(SAMTOOLS_BIN).ok_or(ToolError::SamtoolsNotFound)?,
        };
        let genome = match genome {
            Some(path) => path,
            None => std::env::var_os(GENOME_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .ok_or(ToolError::GenomeNotConfigured { var: GENOME_ENV })?,
        };
        Ok(Self::new(samtools, genome))
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_flank(mut self, flank: u64) -> Self {
        self.flank = flank;
        self
    }
}

/// First executable named `program` on PATH
pub fn find_in_path(program: impl AsRef<OsStr>) -> Option<PathBuf> {
    let program = program.as_ref();
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Arguments of `samtools tview` for a text screen around `locus`
pub fn tview_args(config: &TviewConfig, bam: &Path, locus: &Locus) -> Vec<OsString> {
    vec![
        "tview".into(),
        "-d".into(),
        "T".into(),
        "-p".into(),
        locus.view_region(config.flank).into(),
        bam.as_os_str().to_owned(),
        config.genome.as_os_str().to_owned(),
    ]
}

/// Capture the tview screen around `locus`
pub fn run_tview(config: &TviewConfig, bam: &Path, locus: &Locus) -> ToolResult<Vec<u8>> {
    let args = tview_args(config, bam, locus);
    log::info!(
        "COLUMNS={} {} {}",
        config.columns,
        config.samtools.display(),
        args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ")
    );

    let output = Command::new(&config.samtools)
        .env("COLUMNS", config.columns.to_string())
        .args(&args)
        .output()
        .map_err(|source| ToolError::Spawn {
            program: config.samtools.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            program: config.samtools.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    log::debug!("tview returned {} bytes", output.stdout.len());
    Ok(output.stdout)
}
