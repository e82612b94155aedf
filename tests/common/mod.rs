#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// One export line with the default column layout.
pub fn row(account: &str, name: &str, center: &str, date: &str, debit: &str, credit: &str) -> String {
    [account, name, center, "", date, "", "", debit, "", credit].join("\t")
}

/// A small 2018 export: a balance account, income with a deprecated
/// membership account, costs and financial items.
pub fn sample_export() -> Vec<String> {
    vec![
        "Huvudbok\tFortnox".to_string(),
        "Konto\tBenämning\tKS\tVer\tDatum\tText\tInfo\tDebet\t\tKredit".to_string(),
        row("1930", "Bank", "", "", "", ""),
        row("", "", "P1", "2018-01-05", "100,00", ""),
        row("", "", "P1", "2017-12-31", "5,00", ""),
        row("3010", "Medlemsavgifter", "", "", "", ""),
        row("", "", "P1", "2018-02-01", "", "200,00"),
        row("3890", "Medlemsavgift gammal", "", "", "", ""),
        row("", "", "P2", "2018-03-01", "", "50,00"),
        row("3990", "Övrigt", "", "", "", ""),
        row("", "", "P1", "2018-04-01", "", "10,00"),
        row("5010", "Lokalhyra", "", "", "", ""),
        row("", "", "P2", "2018-05-01", "80,00", ""),
        row("8310", "Ränta", "", "", "", ""),
        row("", "", "P1", "2018-06-01", "", "1,00"),
        row("8410", "Räntekostnad", "", "", "", ""),
        row("", "", "P1", "2018-07-01", "2,00", ""),
    ]
}

/// Writes `lines` to `dir/name`, Latin-1 encoded like a Fortnox export.
pub fn write_latin1_export(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let text = lines.join("\n") + "\n";
    let bytes: Vec<u8> = text
        .chars()
        .map(|ch| u8::try_from(u32::from(ch)).expect("latin-1 character"))
        .collect();
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write export");
    path
}
