use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One original/translation association from the source file
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordPair {
    pub original: String,
    pub translation: String,
}

impl WordPair {
    pub fn new(original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translation: translation.into(),
        }
    }

    pub fn inverted(&self) -> Self {
        Self {
            original: self.translation.clone(),
            translation: self.original.clone(),
        }
    }
}

/// Parse a single line. `-` wins over a space as separator; only the first
/// occurrence splits, so translations may contain further dashes or spaces.
pub fn parse_line(line: &str) -> Option<WordPair> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (original, translation) = if trimmed.contains('-') {
        trimmed.split_once('-')?
    } else {
        trimmed.split_once(' ')?
    };

    let (original, translation) = (original.trim(), translation.trim());
    if original.is_empty() || translation.is_empty() {
        return None;
    }

    Some(WordPair::new(original, translation))
}

pub fn parse_lines<I, S>(lines: I) -> Vec<WordPair>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .collect()
}

pub fn parse_text(text: &str) -> Vec<WordPair> {
    parse_lines(text.lines())
}

pub fn load_pairs<P: AsRef<Path>>(path: P) -> io::Result<Vec<WordPair>> {
    let bytes = fs::read(path)?;
    Ok(parse_text(&String::from_utf8_lossy(&bytes)))
}

pub fn invert_pairs(pairs: &[WordPair]) -> Vec<WordPair> {
    pairs.iter().map(WordPair::inverted).collect()
}

/// Where the word list comes from. Re-read on every retry.
pub trait PairSource: std::fmt::Debug {
    fn load(&self) -> io::Result<Vec<WordPair>>;

    /// Label recorded in the history log
    fn name(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct FilePairSource {
    path: PathBuf,
}

impl FilePairSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PairSource for FilePairSource {
    fn load(&self) -> io::Result<Vec<WordPair>> {
        load_pairs(&self.path)
    }

    fn name(&self) -> Option<String> {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
    }
}

/// Fixed in-memory list, handy for tests and piped input
#[derive(Debug, Clone, Default)]
pub struct StaticPairSource {
    pub name: Option<String>,
    pub pairs: Vec<WordPair>,
}

impl PairSource for StaticPairSource {
    fn load(&self) -> io::Result<Vec<WordPair>> {
        Ok(self.pairs.clone())
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }
}
