//! CIGAR-filtered region staging
//!
//! Indel and structural-variant views show only the reads whose CIGAR
//! carries the relevant operation. The reads overlapping a small window
//! around the locus are copied into a private, indexed temporary BAM that
//! tview can then display; the files disappear when the handle is dropped.

use super::Locus;
use crate::core::StagingResult;
use rust_htslib::bam::{self, Read, Record};
use rust_htslib::bam::record::Cigar;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Half-width of the fetched window around the locus
pub const STAGING_PAD: u64 = 10;

/// Which reads a staged BAM keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSelection {
    /// Reads with an insertion or deletion
    Indel,
    /// Soft-clipped reads, typical around breakpoints
    SoftClip,
}

impl ReadSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadSelection::Indel => "id",
            ReadSelection::SoftClip => "sc",
        }
    }

    /// Whether a CIGAR operation qualifies a read
    pub fn keeps_op(&self, op: &Cigar) -> bool {
        match self {
            ReadSelection::Indel => matches!(op, Cigar::Ins(_) | Cigar::Del(_)),
            ReadSelection::SoftClip => matches!(op, Cigar::SoftClip(_)),
        }
    }

    pub fn keeps(&self, record: &Record) -> bool {
        record.cigar().iter().any(|op| self.keeps_op(op))
    }
}

/// Counts from one staging run
#[derive(Debug, Clone, Default)]
pub struct StagingStats {
    pub seen: usize,
    pub kept: usize,
}

/// An indexed temporary BAM, removed on drop
#[derive(Debug)]
pub struct StagedBam {
    _dir: TempDir,
    path: PathBuf,
    pub stats: StagingStats,
}

impl StagedBam {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 0-based half-open fetch window for `locus` padded by `pad` bases each side
pub fn fetch_window(locus: &Locus, pad: u64) -> (i64, i64) {
    // chrom:pos-pad..pos+pad, 1-based inclusive
    let start = locus.pos.saturating_sub(pad).max(1) - 1;
    let end = locus.pos.saturating_add(pad);
    (clamp_i64(start), clamp_i64(end))
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Copy the reads around `locus` matching `selection` into an indexed temporary BAM
pub fn stage_region(
    bam: &Path,
    locus: &Locus,
    pad: u64,
    selection: ReadSelection,
) -> StagingResult<StagedBam> {
    let mut reader = bam::IndexedReader::from_path(bam)?;
    let header = bam::Header::from_template(reader.header());

    let dir = tempfile::Builder::new().prefix("pileup-inspect.").tempdir()?;
    let stem = bam.file_name().map_or_else(
        || "reads.bam".to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    let path = dir.path().join(format!(
        "{}.{}.{}_{}.bam",
        stem,
        selection.as_str(),
        locus.chrom,
        locus.pos
    ));

    let (start, end) = fetch_window(locus, pad);
    reader.fetch((locus.chrom.as_str(), start, end))?;

    let mut stats = StagingStats::default();
    {
        let mut writer = bam::Writer::from_path(&path, &header, bam::Format::Bam)?;
        let mut record = Record::new();
        while let Some(result) = reader.read(&mut record) {
            result?;
            stats.seen += 1;
            if selection.keeps(&record) {
                writer.write(&record)?;
                stats.kept += 1;
            }
        }
    }

    bam::index::build(&path, None, bam::index::Type::Bai, 1)?;
    log::info!(
        "staged {} of {} reads around {} into {}",
        stats.kept,
        stats.seen,
        locus,
        path.display()
    );

    Ok(StagedBam {
        _dir: dir,
        path,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bam::header::HeaderRecord;
    use rust_htslib::bam::record::CigarString;

    #[test]
    fn test_selection_ops() {
        assert!(ReadSelection::Indel.keeps_op(&Cigar::Ins(2)));
        assert!(ReadSelection::Indel.keeps_op(&Cigar::Del(1)));
        assert!(!ReadSelection::Indel.keeps_op(&Cigar::SoftClip(5)));
        assert!(!ReadSelection::Indel.keeps_op(&Cigar::Match(100)));
        assert!(ReadSelection::SoftClip.keeps_op(&Cigar::SoftClip(5)));
        assert!(!ReadSelection::SoftClip.keeps_op(&Cigar::HardClip(5)));
        assert!(!ReadSelection::SoftClip.keeps_op(&Cigar::Del(1)));
    }

    #[test]
    fn test_fetch_window() {
        assert_eq!(fetch_window(&Locus::new("chr1", 1000), 10), (989, 1010));
        assert_eq!(fetch_window(&Locus::new("chr1", 5), 10), (0, 15));
    }

    #[test]
    fn test_fetch_window_saturates() {
        assert_eq!(fetch_window(&Locus::new("chr1", u64::MAX), 10), (i64::MAX, i64::MAX));
        let edge = i64::MAX as u64;
        assert_eq!(fetch_window(&Locus::new("chr1", edge), 10), (i64::MAX - 11, i64::MAX));
    }

    /// Coordinate-sorted, indexed BAM with one plain, one inserted and one clipped read
    fn write_sample_bam(dir: &Path) -> PathBuf {
        let mut header = bam::Header::new();
        let mut hd_record = HeaderRecord::new(b"HD");
        hd_record.push_tag(b"VN", "1.6");
        hd_record.push_tag(b"SO", "coordinate");
        header.push_record(&hd_record);
        let mut sq_record = HeaderRecord::new(b"SQ");
        sq_record.push_tag(b"SN", "chr1");
        sq_record.push_tag(b"LN", "1000");
        header.push_record(&sq_record);

        let path = dir.join("sample.bam");
        {
            let mut writer = bam::Writer::from_path(&path, &header, bam::Format::Bam).unwrap();
            let reads: [(&[u8], Vec<Cigar>, i64); 3] = [
                (b"plain", vec![Cigar::Match(10)], 95),
                (b"ins", vec![Cigar::Match(4), Cigar::Ins(1), Cigar::Match(5)], 96),
                (b"clip", vec![Cigar::SoftClip(3), Cigar::Match(7)], 97),
            ];
            for (qname, ops, pos) in reads {
                let mut record = Record::new();
                record.set(qname, Some(&CigarString(ops)), b"ACGTACGTAC", &[30u8; 10]);
                record.set_tid(0);
                record.set_pos(pos);
                record.set_mapq(60);
                record.set_mtid(-1);
                record.set_mpos(-1);
                record.set_flags(0);
                writer.write(&record).unwrap();
            }
        }
        bam::index::build(&path, None, bam::index::Type::Bai, 1).unwrap();
        path
    }

    fn staged_names(path: &Path) -> Vec<String> {
        let mut reader = bam::IndexedReader::from_path(path).unwrap();
        reader.fetch(("chr1", 0, 1000)).unwrap();
        reader
            .records()
            .map(|r| String::from_utf8(r.unwrap().qname().to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn test_stage_region_filters_by_cigar() {
        let dir = tempfile::tempdir().unwrap();
        let bam = write_sample_bam(dir.path());
        let locus = Locus::new("chr1", 100);

        for (selection, expected) in [(ReadSelection::Indel, "ins"), (ReadSelection::SoftClip, "clip")] {
            let staged = stage_region(&bam, &locus, STAGING_PAD, selection).unwrap();
            assert_eq!(staged.stats.seen, 3);
            assert_eq!(staged.stats.kept, 1);

            let path = staged.path().to_path_buf();
            let index = PathBuf::from(format!("{}.bai", path.display()));
            assert!(path.exists());
            assert!(index.exists());
            assert!(path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with(&format!(".{}.chr1_100.bam", selection.as_str())));
            assert_eq!(staged_names(&path), vec![expected.to_string()]);

            drop(staged);
            assert!(!path.exists());
            assert!(!index.exists());
        }
    }

    #[test]
    fn test_missing_bam_is_error() {
        let err = stage_region(
            Path::new("/nonexistent/reads.bam"),
            &Locus::new("chr1", 100),
            STAGING_PAD,
            ReadSelection::Indel,
        );
        assert!(err.is_err());
    }
}
