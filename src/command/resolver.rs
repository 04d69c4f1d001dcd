//! Location resolution - converts location phrases to canonical paths

use std::path::{Path, PathBuf};

use ahash::AHashMap;

use crate::command::action::PRONOUN;
use crate::command::memory::ExecutionMemory;
use crate::command::names::{strip_trailing_punctuation, words, ARTICLES};
use crate::core::config::InterpreterConfig;
use crate::core::error::{InterpreterError, Result};
use crate::core::types::CanonicalLocation;

const PREPOSITIONS: [&str; 3] = ["on", "in", "from"];

/// Words that never name a location by themselves
const FILLER: [&str; 3] = ["folder", "directory", "me"];

/// Fixed vocabulary of location names mapped to platform paths
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: AHashMap<String, PathBuf>,
    default_area: PathBuf,
}

impl AliasTable {
    /// Build the table for the host platform rooted at `home`
    pub fn for_home(home: &Path) -> Self {
        let videos = if cfg!(target_os = "macos") {
            "Movies"
        } else {
            "Videos"
        };
        let library = if cfg!(target_os = "macos") {
            home.join("Library")
        } else {
            home.to_path_buf()
        };

        let mut entries = AHashMap::new();
        entries.insert("home".to_string(), home.to_path_buf());
        entries.insert("desktop".to_string(), home.join("Desktop"));
        entries.insert("downloads".to_string(), home.join("Downloads"));
        entries.insert("documents".to_string(), home.join("Documents"));
        entries.insert("music".to_string(), home.join("Music"));
        entries.insert("pictures".to_string(), home.join("Pictures"));
        entries.insert("videos".to_string(), home.join(videos));
        entries.insert("movies".to_string(), home.join(videos));
        entries.insert("library".to_string(), library);

        let default_area = home.join("Desktop");
        Self {
            entries,
            default_area,
        }
    }

    /// Build the table from configuration: platform aliases plus extras
    pub fn from_config(config: &InterpreterConfig) -> Self {
        let mut table = Self::for_home(&config.home_dir());
        for (name, path) in &config.aliases {
            table.entries.insert(name.to_lowercase(), path.clone());
        }
        if let Some(area) = table.entries.get(&config.default_area) {
            table.default_area = area.clone();
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn default_area(&self) -> &Path {
        &self.default_area
    }
}

/// Resolves location phrases against the alias table and execution memory
///
/// The resolver never mutates memory; the dispatcher records locations
/// after an action succeeds.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    aliases: AliasTable,
    home: PathBuf,
}

impl LocationResolver {
    pub fn new(aliases: AliasTable, home: PathBuf) -> Self {
        Self { aliases, home }
    }

    pub fn from_config(config: &InterpreterConfig) -> Self {
        Self::new(AliasTable::from_config(config), config.home_dir())
    }

    /// Resolve a raw phrase to a canonical location
    ///
    /// Order: pronoun, empty phrase, exact alias (prepositions and articles
    /// ignored, so `"in it"` is still the pronoun), `~` or absolute path, compound
    /// `"<name> on|in|from <alias>"`, then a literal path under the default area.
    pub fn resolve(&self, phrase: &str, memory: &ExecutionMemory) -> Result<CanonicalLocation> {
        let phrase = strip_trailing_punctuation(phrase);

        if phrase == PRONOUN {
            return Ok(self.remembered(memory));
        }

        if phrase.is_empty() {
            return Ok(self.default_location());
        }

        let normalized: Vec<&str> = words(phrase)
            .into_iter()
            .filter(|w| {
                !ARTICLES.contains(w) && !FILLER.contains(w) && !PREPOSITIONS.contains(w)
            })
            .collect();
        if let [single] = normalized.as_slice() {
            if *single == PRONOUN {
                return Ok(self.remembered(memory));
            }
            if let Some(path) = self.aliases.get(single) {
                return Ok(CanonicalLocation::new(path.to_path_buf()));
            }
        }

        // Home-relative and absolute paths are taken verbatim; a preposition
        // inside one never re-roots it under an alias.
        if let Some(expanded) = self.expand_home(phrase) {
            return Ok(CanonicalLocation::new(expanded));
        }
        if Path::new(phrase).is_absolute() {
            return Ok(CanonicalLocation::new(PathBuf::from(phrase)));
        }

        if let Some(location) = self.resolve_compound(phrase)? {
            return Ok(location);
        }

        Ok(self.literal(phrase))
    }

    fn remembered(&self, memory: &ExecutionMemory) -> CanonicalLocation {
        memory
            .last_resolved_location()
            .cloned()
            .unwrap_or_else(|| self.default_location())
    }

    /// The default area, used for empty phrases and relative paths
    pub fn default_location(&self) -> CanonicalLocation {
        CanonicalLocation::new(self.aliases.default_area().to_path_buf())
    }

    /// Location named `name` next to `source` (rename target)
    pub fn sibling(&self, source: &CanonicalLocation, name: &str) -> CanonicalLocation {
        let parent = source
            .as_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.aliases.default_area().to_path_buf());
        CanonicalLocation::new(parent.join(name))
    }

    /// Location `name` inside `parent`
    pub fn child(&self, parent: &CanonicalLocation, name: &str) -> CanonicalLocation {
        CanonicalLocation::new(parent.as_path().join(name))
    }

    /// Admit a path reported by a handler; relative paths land in the default area
    pub fn canonicalize(&self, path: PathBuf) -> CanonicalLocation {
        if path.is_absolute() {
            CanonicalLocation::new(path)
        } else {
            CanonicalLocation::new(self.aliases.default_area().join(path))
        }
    }

    fn expand_home(&self, phrase: &str) -> Option<PathBuf> {
        if phrase == "~" {
            return Some(self.home.clone());
        }
        phrase.strip_prefix("~/").map(|rest| self.home.join(rest))
    }

    fn resolve_compound(&self, phrase: &str) -> Result<Option<CanonicalLocation>> {
        let tokens = words(phrase);

        let mut matched: Option<&str> = None;
        for (i, token) in tokens.iter().enumerate() {
            if !PREPOSITIONS.contains(token) {
                continue;
            }
            let Some(next) = tokens[i + 1..].iter().find(|t| !ARTICLES.contains(*t)) else {
                continue;
            };
            if !self.aliases.contains(next) {
                continue;
            }
            match matched {
                Some(existing) if existing != *next => {
                    return Err(InterpreterError::ResolutionAmbiguous(format!(
                        "'{}' mentions both {} and {}",
                        phrase, existing, next
                    )));
                }
                _ => matched = Some(*next),
            }
        }

        let Some(alias) = matched else {
            return Ok(None);
        };
        let Some(base) = self.aliases.get(alias) else {
            return Ok(None);
        };

        let remainder: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|t| {
                *t != alias
                    && !PREPOSITIONS.contains(t)
                    && !ARTICLES.contains(t)
                    && !FILLER.contains(t)
            })
            .collect();
        let sub_path = strip_trailing_punctuation(&remainder.join(" ")).to_string();

        let path = if sub_path.is_empty() {
            base.to_path_buf()
        } else {
            base.join(sub_path)
        };
        Ok(Some(CanonicalLocation::new(path)))
    }

    fn literal(&self, phrase: &str) -> CanonicalLocation {
        let mut text = phrase;
        for article in ARTICLES {
            if let Some(rest) = text.strip_prefix(article).and_then(|r| r.strip_prefix(' ')) {
                text = rest;
                break;
            }
        }
        CanonicalLocation::new(self.aliases.default_area().join(text.trim()))
    }
}
