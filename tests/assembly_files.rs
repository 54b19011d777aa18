//! End-to-end tests for BOM and placement processing.

use std::path::Path;

use pcbzip::assembly::placement::TARGET_HEADER;
use pcbzip::assembly::{AssemblyError, AssemblyJob, BoardSide, BomDocument};
use pcbzip::prompt::ScriptedPrompt;
use tempfile::TempDir;

/// Creates a temporary directory inside `.tmp/` for test isolation.
fn test_temp_dir() -> TempDir {
    let tmp_root = Path::new(".tmp");
    std::fs::create_dir_all(tmp_root).expect("Failed to create .tmp directory");
    let tmp_root = tmp_root
        .canonicalize()
        .expect("Failed to canonicalize .tmp path");
    tempfile::tempdir_in(&tmp_root).expect("Failed to create temp dir")
}

const FRESH_BOM: &str = r#""Comment","Designator","Footprint","LCSC Part #"
"10k","R1,R2","R_0402_1005Metric",""
"100nF","C1","C_0402_1005Metric",""
"#;

const TOP_POS: &str = "Ref,Val,Package,PosX,PosY,Rot,Side
R1,10k,R_0402_1005Metric,10.0,12.5,90,top
R2,10k,R_0402_1005Metric,11.0,12.5,90,top
";

const BOTTOM_POS: &str = "Ref,Val,Package,PosX,PosY,Rot,Side
C1,100nF,C_0402_1005Metric,5.0,3.0,0,bottom
";

fn write_exports(dir: &Path) {
    std::fs::write(dir.join("amp.csv"), FRESH_BOM).unwrap();
    std::fs::write(dir.join("amp-top-pos.csv"), TOP_POS).unwrap();
    std::fs::write(dir.join("amp-bottom-pos.csv"), BOTTOM_POS).unwrap();
}

// =============================================================================
// Batch processing
// =============================================================================

#[test]
fn process_writes_bom_and_placements() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    let job = AssemblyJob::new("amp", "1", temp_dir.path());

    let report = job.process().unwrap();

    assert_eq!(report.bom, temp_dir.path().join("amp_1_pcb_files/amp_1_bom.csv"));
    assert_eq!(report.bom_lines, 2);
    assert_eq!(report.annotated_lines, 0);
    assert!(report.backup.is_none());

    let top = std::fs::read_to_string(job.placement_output(BoardSide::Top)).unwrap();
    let mut lines = top.lines();
    assert_eq!(lines.next(), Some(TARGET_HEADER));
    assert_eq!(lines.next(), Some("R1,10k,R_0402_1005Metric,10.0,12.5,90,top"));
    assert_eq!(
        report.placements,
        vec![
            job.placement_output(BoardSide::Top),
            job.placement_output(BoardSide::Bottom)
        ]
    );
}

#[test]
fn rerun_keeps_annotations_and_backs_up() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    let job = AssemblyJob::new("amp", "1", temp_dir.path());
    job.process().unwrap();

    // Hand annotation of the first row.
    let mut bom = BomDocument::read(&job.bom_output()).unwrap();
    bom.lines[0].part_number = "C25744".to_string();
    bom.write(&job.bom_output()).unwrap();

    // A new export adds a part; the annotated row must survive.
    std::fs::write(
        temp_dir.path().join("amp.csv"),
        format!("{FRESH_BOM}\"1uF\",\"C2\",\"C_0603_1608Metric\",\"\"\n"),
    )
    .unwrap();
    let report = job.process().unwrap();

    let merged = BomDocument::read(&report.bom).unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.lines[0].part_number, "C25744");
    assert_eq!(merged.lines[2].part_number, "");
    assert_eq!(report.annotated_lines, 1);

    let backup = report.backup.expect("previous BOM backed up");
    let saved = BomDocument::read(&backup).unwrap();
    assert_eq!(saved.lines[0].part_number, "C25744");
    assert_eq!(saved.len(), 2);
}

#[test]
fn missing_position_file_is_reported_before_writing() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    std::fs::remove_file(temp_dir.path().join("amp-bottom-pos.csv")).unwrap();
    let job = AssemblyJob::new("amp", "1", temp_dir.path());

    let err = job.process().unwrap_err();

    assert!(matches!(err, AssemblyError::FileNotFound { ref path } if path.ends_with("amp-bottom-pos.csv")));
    assert!(!job.output_dir().exists());
}

#[test]
fn wrong_position_header_fails() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    std::fs::write(
        temp_dir.path().join("amp-top-pos.csv"),
        "Designator,Val,Package,Mid X,Mid Y,Rotation,Layer\nR1,10k,R_0402,1,2,0,top\n",
    )
    .unwrap();
    let job = AssemblyJob::new("amp", "1", temp_dir.path());

    assert!(matches!(
        job.process(),
        Err(AssemblyError::HeaderNotFound { .. })
    ));
}

#[test]
fn bad_bottom_header_leaves_no_partial_output() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    std::fs::write(
        temp_dir.path().join("amp-bottom-pos.csv"),
        "Designator Val Package\nC1 100nF C_0402\n",
    )
    .unwrap();
    let job = AssemblyJob::new("amp", "1", temp_dir.path());

    let err = job.process().unwrap_err();

    assert!(matches!(err, AssemblyError::HeaderNotFound { path: Some(ref p), .. } if p.ends_with("amp-bottom-pos.csv")));
    assert!(!job.placement_output(BoardSide::Top).exists());
    assert!(!job.bom_output().exists());
    assert!(!job.output_dir().exists());
}

#[test]
fn crlf_position_rows_are_copied_byte_for_byte() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    let crlf = TOP_POS.replace('\n', "\r\n");
    std::fs::write(temp_dir.path().join("amp-top-pos.csv"), &crlf).unwrap();
    let job = AssemblyJob::new("amp", "1", temp_dir.path());

    job.process().unwrap();

    let written = std::fs::read_to_string(job.placement_output(BoardSide::Top)).unwrap();
    let (_, rows) = crlf.split_once("\r\n").unwrap();
    assert_eq!(written, format!("{TARGET_HEADER}\r\n{rows}"));
}

#[test]
fn malformed_bom_row_rejects_the_file() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    std::fs::write(
        temp_dir.path().join("amp.csv"),
        format!("{FRESH_BOM}\"only\",\"two\"\n"),
    )
    .unwrap();
    let job = AssemblyJob::new("amp", "1", temp_dir.path());

    assert!(matches!(
        job.process(),
        Err(AssemblyError::InvalidBomLine { .. })
    ));
}

// =============================================================================
// Interactive annotation
// =============================================================================

#[test]
fn annotation_is_saved_after_each_answer() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    let job = AssemblyJob::new("amp", "1", temp_dir.path());
    job.process().unwrap();

    // Annotate the first row, then abort on the second.
    let mut prompt = ScriptedPrompt::new(["C25744", "a"]);
    let err = job.annotate(&mut prompt).unwrap_err();
    assert!(err.is_user_abort());

    let saved = BomDocument::read(&job.bom_output()).unwrap();
    assert_eq!(saved.lines[0].part_number, "C25744");
    assert_eq!(saved.lines[1].part_number, "");
}

#[test]
fn annotation_runs_to_the_end() {
    let temp_dir = test_temp_dir();
    write_exports(temp_dir.path());
    let job = AssemblyJob::new("amp", "1", temp_dir.path());
    job.process().unwrap();

    let mut prompt = ScriptedPrompt::new(["", "C1525"]);
    job.annotate(&mut prompt).unwrap();

    let saved = BomDocument::read(&job.bom_output()).unwrap();
    assert_eq!(saved.lines[0].part_number, "");
    assert_eq!(saved.lines[1].part_number, "C1525");
}
