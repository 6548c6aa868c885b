use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::content::parse_options::ParseOptions;

/// Public facts about the site, used for absolute URLs and JSON-LD publisher data.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Site {
    pub name: String,
    pub base_url: String,
    #[serde(default = "default_blog_path")]
    pub blog_path: String,
    pub logo: Option<String>,
    pub default_image: Option<String>,
}

fn default_blog_path() -> String {
    "/blog".to_string()
}

impl Site {
    /// Leaves absolute URLs untouched and anchors paths at `base_url`.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.contains("://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn blog_url(&self) -> String {
        self.absolute_url(self.blog_path.trim_end_matches('/'))
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/{}", self.blog_url(), slug)
    }
}

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub preferences_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub page_size: u32,
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    #[serde(default)]
    pub parser: ParseOptions,
    pub feed: Option<Feed>,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent().ok_or_else(|| {
        io::Error::new(ErrorKind::NotFound, "Executable has no parent directory")
    })?;
    let rest = path.strip_prefix("${exe_dir}").unwrap_or(&path);
    Ok(exe_dir.join(rest))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths.content_dir = parse_path(cfg.paths.content_dir)?;
    cfg.paths.preferences_file = cfg.paths.preferences_file.map(parse_path).transpose()?;
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path).transpose()?;
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
