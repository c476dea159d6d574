#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::Deserialize;

pub type AnyRes<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Deserialize)]
pub struct SuccessCase {
    pub desc: String,
    pub input: String,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub expected: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorCase {
    pub desc: String,
    pub input: String,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TestCase {
    Success(SuccessCase),
    Error(ErrorCase),
}

pub fn load_test_cases<T>(path: &str) -> AnyRes<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let file = File::open(get_resource_path(path)?)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn get_resource_path(path: impl AsRef<Path>) -> AnyRes<PathBuf> {
    let project_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    Ok(PathBuf::from(project_dir)
        .join("tests/resources")
        .join(path))
}

#[derive(Debug, Deserialize)]
pub struct IdentifiersCase {
    pub input: String,
    pub expected: Vec<String>,
}
