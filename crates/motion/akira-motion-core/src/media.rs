//! Viewport media queries and `match_media` groups.
//!
//! Each query of a group owns a setup closure. While the query matches, whatever
//! the setup registered lives in a child scope; when it stops matching that scope
//! is released.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::MotionContext;
use crate::error::MotionError;
use crate::ids::{MediaId, ScopeId};
use crate::outputs::MotionEvent;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MediaCondition {
    MinWidth(f32),
    MaxWidth(f32),
    MinHeight(f32),
    MaxHeight(f32),
}

impl MediaCondition {
    fn matches(self, width: f32, height: f32) -> bool {
        match self {
            MediaCondition::MinWidth(v) => width >= v,
            MediaCondition::MaxWidth(v) => width <= v,
            MediaCondition::MinHeight(v) => height >= v,
            MediaCondition::MaxHeight(v) => height <= v,
        }
    }
}

/// Conjunction of viewport conditions; empty means `all`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaQuery {
    conditions: Vec<MediaCondition>,
}

impl MediaQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn conditions(&self) -> &[MediaCondition] {
        &self.conditions
    }

    pub fn matches(&self, width: f32, height: f32) -> bool {
        self.conditions.iter().all(|c| c.matches(width, height))
    }
}

fn parse_condition(src: &str, full: &str) -> Result<MediaCondition, MotionError> {
    let invalid = || MotionError::InvalidMediaQuery {
        input: full.to_string(),
    };
    let inner = src
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let (feature, value) = inner.split_once(':').ok_or_else(invalid)?;
    let value = value.trim();
    let px: f32 = value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse()
        .map_err(|_| invalid())?;
    Ok(match feature.trim() {
        "min-width" => MediaCondition::MinWidth(px),
        "max-width" => MediaCondition::MaxWidth(px),
        "min-height" => MediaCondition::MinHeight(px),
        "max-height" => MediaCondition::MaxHeight(px),
        _ => return Err(invalid()),
    })
}

impl FromStr for MediaQuery {
    type Err = MotionError;

    /// `"(min-width: 800px)"`, `"all and (max-width: 799px)"`, `"all"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut conditions = Vec::new();
        for part in s.split(" and ") {
            let part = part.trim();
            if part == "all" || part == "screen" {
                continue;
            }
            conditions.push(parse_condition(part, s)?);
        }
        if conditions.is_empty() && s.trim().is_empty() {
            return Err(MotionError::InvalidMediaQuery { input: s.to_string() });
        }
        Ok(Self { conditions })
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return f.write_str("all");
        }
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            match c {
                MediaCondition::MinWidth(v) => write!(f, "(min-width: {v}px)")?,
                MediaCondition::MaxWidth(v) => write!(f, "(max-width: {v}px)")?,
                MediaCondition::MinHeight(v) => write!(f, "(min-height: {v}px)")?,
                MediaCondition::MaxHeight(v) => write!(f, "(max-height: {v}px)")?,
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for MediaQuery {
    type Error = MotionError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MediaQuery> for String {
    fn from(q: MediaQuery) -> Self {
        q.to_string()
    }
}

/// Setup run each time a query starts matching.
pub type MediaSetup = Box<dyn FnMut(&mut MotionContext)>;

pub(crate) struct MediaEntry {
    pub media: MediaId,
    /// Scope that registered the group.
    pub scope: ScopeId,
    pub query: MediaQuery,
    pub setup: Option<MediaSetup>,
    /// Child scope holding the setup's registrations while matching.
    pub active: Option<ScopeId>,
}

impl MotionContext {
    /// Register a group of `(query, setup)` pairs. Malformed queries are skipped
    /// with a warning. Setups of queries that match right away run before this returns.
    pub fn match_media<Q, F>(&mut self, queries: Vec<(Q, F)>) -> MediaId
    where
        Q: AsRef<str>,
        F: FnMut(&mut MotionContext) + 'static,
    {
        let media = self.ids.alloc_media();
        let scope = self.scopes.current();
        for (raw, setup) in queries {
            let query = match raw.as_ref().parse::<MediaQuery>() {
                Ok(q) => q,
                Err(err) => {
                    log::warn!("media query ignored: {err}");
                    continue;
                }
            };
            self.media.push(MediaEntry {
                media,
                scope,
                query,
                setup: Some(Box::new(setup)),
                active: None,
            });
        }
        self.evaluate_media();
        media
    }

    /// Whether any query of `media` currently matches.
    pub fn media_matches(&self, media: MediaId) -> bool {
        self.media
            .iter()
            .any(|m| m.media == media && m.active.is_some())
    }

    /// Remove a media group, releasing whatever its active queries registered.
    pub fn kill_media(&mut self, media: MediaId) {
        let active: Vec<ScopeId> = self
            .media
            .iter()
            .filter(|m| m.media == media)
            .filter_map(|m| m.active)
            .collect();
        self.media.retain(|m| m.media != media);
        for scope in active {
            self.release_scope(scope);
        }
    }

    /// Run setups of newly matching queries and release scopes of ones that stopped.
    ///
    /// Setups and releases may kill whole groups, so each entry is looked up again
    /// by group and position within the group rather than by index.
    pub(crate) fn evaluate_media(&mut self) {
        let vp = *self.scene.viewport();
        let mut seen: Vec<(MediaId, usize)> = Vec::with_capacity(self.media.len());
        for entry in &self.media {
            let nth = seen.iter().filter(|(m, _)| *m == entry.media).count();
            seen.push((entry.media, nth));
        }
        for (media, nth) in seen {
            let Some(idx) = self.media_slot(media, nth) else {
                continue;
            };
            let entry = &self.media[idx];
            let matches = entry.query.matches(vp.width, vp.height);
            let query = entry.query.to_string();
            match (matches, entry.active) {
                (true, None) => {
                    let child = self.ids.alloc_scope();
                    self.scopes.adopt(child, entry.scope, format!("media {query}"));
                    let setup = self.media[idx].setup.take();
                    self.media[idx].active = Some(child);
                    self.events.push(MotionEvent::MediaChanged {
                        media,
                        query,
                        matches: true,
                    });
                    if let Some(mut setup) = setup {
                        self.scopes.enter(child);
                        setup(self);
                        self.scopes.close(child);
                        // the setup may have killed its own group
                        if let Some(entry) = self.media.iter_mut().find(|m| m.active == Some(child)) {
                            entry.setup = Some(setup);
                        }
                    }
                }
                (false, Some(child)) => {
                    self.media[idx].active = None;
                    self.release_scope(child);
                    self.events.push(MotionEvent::MediaChanged {
                        media,
                        query,
                        matches: false,
                    });
                }
                _ => {}
            }
        }
    }

    /// Index of the `nth` query of group `media`.
    fn media_slot(&self, media: MediaId, nth: usize) -> Option<usize> {
        self.media
            .iter()
            .enumerate()
            .filter(|(_, m)| m.media == media)
            .nth(nth)
            .map(|(i, _)| i)
    }
}
