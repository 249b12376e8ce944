#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use gias_establishments::{Release, columns};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

/// A full-width extract for `release`: every registered header, one line per
/// row. Cells not named in a row are left empty.
pub fn extract_csv(release: Release, rows: &[Vec<(&str, &str)>]) -> String {
    let registry = columns::registry_for(release);
    let headers = registry.raw_names();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers).expect("write headers");
    for row in rows {
        let record = headers.iter().map(|header| {
            row.iter()
                .find(|(name, _)| name == header)
                .map(|(_, value)| *value)
                .unwrap_or("")
        });
        writer.write_record(record).expect("write row");
    }
    String::from_utf8(writer.into_inner().expect("flush csv")).expect("utf-8 csv")
}

/// Two open schools and a closed FE college, in the shape of a real extract.
pub fn sample_rows() -> Vec<Vec<(&'static str, &'static str)>> {
    vec![
        vec![
            ("URN", "100000"),
            ("LA (code)", "201"),
            ("LA (name)", "City of London"),
            ("EstablishmentNumber", "3614"),
            ("EstablishmentName", "The Aldgate School"),
            ("TypeOfEstablishment (name)", "Voluntary aided school"),
            ("EstablishmentStatus (name)", "Open"),
            ("OpenDate", "01-01-1900"),
            ("PhaseOfEducation (name)", "Primary"),
            ("StatutoryLowAge", "3"),
            ("StatutoryHighAge", "11"),
            ("FurtherEducationType (name)", "Not applicable"),
            ("NumberOfPupils", "263"),
            ("UKPRN", "10079319"),
            ("SEN1 (name)", "SpLD - Specific Learning Difficulty"),
            ("SEN3 (name)", "ASD - Autistic Spectrum Disorder"),
            ("TypeOfResourcedProvision (name)", "Resourced provision and SEN unit"),
            ("ResourcedProvisionOnRoll", "12"),
            ("SenUnitCapacity", "8"),
            ("Postcode", "EC3A 5DE"),
            ("Easting", "533498"),
            ("Northing", "181201"),
        ],
        vec![
            ("URN", "100001"),
            ("LA (code)", "201"),
            ("LA (name)", "City of London"),
            ("EstablishmentNumber", "6005"),
            ("EstablishmentName", "City of London School for Girls"),
            ("EstablishmentStatus (name)", "Open"),
            ("FurtherEducationType (name)", "Not applicable"),
            ("UKPRN", "10012345"),
            ("TypeOfResourcedProvision (name)", "Not applicable"),
            ("Postcode", "EC2Y 8BB"),
        ],
        vec![
            ("URN", "130400"),
            ("LA (code)", "202"),
            ("LA (name)", "Camden"),
            ("EstablishmentNumber", "8600"),
            ("EstablishmentName", "Westminster Kingsway College"),
            ("EstablishmentStatus (name)", "Closed"),
            ("CloseDate", "31-07-2020"),
            ("FurtherEducationType (name)", "General Further Education College"),
            ("SEN2 (name)", "Not Applicable"),
            ("TypeOfResourcedProvision (name)", "SEN unit"),
            ("SenUnitOnRoll", "4"),
        ],
    ]
}
