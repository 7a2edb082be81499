//! PEP 440 version parsing and ordering
//!
//! Release keys on PyPI are compared numerically segment by segment, with
//! pre-, post- and dev-release markers ordered the way pip orders them:
//!
//! `1.0.dev1 < 1.0a1 < 1.0b2 < 1.0rc1 < 1.0 < 1.0.post1 < 1.0+local < 1.1`
//!
//! Strings that are not valid PEP 440 versions (old `2004d`-style tags and
//! the like) have no `Version`; callers order them below every valid one.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PreKind {
    Alpha,
    Beta,
    Rc,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LocalSegment {
    // Variant order matters: alphanumeric segments sort before numeric ones.
    Text(String),
    Number(u64),
}

/// A parsed PEP 440 version
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreKind, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<Vec<LocalSegment>>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    DevOnly,
    Pre(PreKind, u64),
    Final,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DevKey {
    Dev(u64),
    Final,
}

impl Version {
    /// Parse a version string, returning `None` if it is not valid PEP 440.
    pub fn parse(input: &str) -> Option<Version> {
        let lowered = input.trim().to_ascii_lowercase();
        let text = lowered.strip_prefix('v').unwrap_or(&lowered);
        let mut cursor = Cursor::new(text);

        let first = cursor.number()?;
        let (epoch, mut release) = if cursor.eat(b'!') {
            (first, vec![cursor.number()?])
        } else {
            (0, vec![first])
        };
        while cursor.peek() == Some(b'.') && cursor.peek_digit_at(1) {
            cursor.advance(1);
            release.push(cursor.number()?);
        }

        let pre = cursor.pre_release();
        let post = cursor.post_release();
        let dev = cursor.dev_release();
        let local = if cursor.eat(b'+') {
            Some(cursor.local()?)
        } else {
            None
        };

        if !cursor.is_done() {
            return None;
        }

        Some(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    fn release_key(&self) -> &[u64] {
        let len = self
            .release
            .iter()
            .rposition(|&n| n != 0)
            .map_or(0, |i| i + 1);
        &self.release[..len]
    }

    fn pre_key(&self) -> PreKey {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => PreKey::DevOnly,
            (Some((kind, n)), _, _) => PreKey::Pre(kind, n),
            (None, _, _) => PreKey::Final,
        }
    }

    fn dev_key(&self) -> DevKey {
        self.dev.map_or(DevKey::Final, DevKey::Dev)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.release_key().cmp(other.release_key()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_digit_at(&self, offset: usize) -> bool {
        self.bytes
            .get(self.pos + offset)
            .is_some_and(|b| b.is_ascii_digit())
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn is_done(&self) -> bool {
        self.pos == self.bytes.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn separator(&mut self) -> bool {
        match self.peek() {
            Some(b'-' | b'_' | b'.') => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn number(&mut self) -> Option<u64> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }

    /// Consume the first of `words` found at the cursor.
    fn keyword(&mut self, words: &[&'static str]) -> Option<&'static str> {
        let rest = &self.bytes[self.pos..];
        let word = words.iter().find(|w| rest.starts_with(w.as_bytes()))?;
        self.pos += word.len();
        Some(*word)
    }

    /// Optional `[sep]N` after a marker keyword; a missing number means 0.
    fn marker_number(&mut self) -> u64 {
        let save = self.pos;
        self.separator();
        match self.number() {
            Some(n) => n,
            None => {
                self.pos = save;
                0
            }
        }
    }

    fn pre_release(&mut self) -> Option<(PreKind, u64)> {
        let save = self.pos;
        self.separator();
        let kind = match self.keyword(&["alpha", "beta", "preview", "pre", "rc", "a", "b", "c"]) {
            Some("alpha" | "a") => PreKind::Alpha,
            Some("beta" | "b") => PreKind::Beta,
            Some(_) => PreKind::Rc,
            None => {
                self.pos = save;
                return None;
            }
        };
        Some((kind, self.marker_number()))
    }

    fn post_release(&mut self) -> Option<u64> {
        let save = self.pos;
        if self.eat(b'-')
            && let Some(n) = self.number()
        {
            return Some(n);
        }
        self.pos = save;
        self.separator();
        if self.keyword(&["post", "rev", "r"]).is_some() {
            return Some(self.marker_number());
        }
        self.pos = save;
        None
    }

    fn dev_release(&mut self) -> Option<u64> {
        let save = self.pos;
        self.separator();
        if self.keyword(&["dev"]).is_some() {
            return Some(self.marker_number());
        }
        self.pos = save;
        None
    }

    fn local(&mut self) -> Option<Vec<LocalSegment>> {
        let mut segments = Vec::new();
        loop {
            let start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_alphanumeric()) {
                self.pos += 1;
            }
            if start == self.pos {
                return None;
            }
            let part = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
            segments.push(match part.parse::<u64>() {
                Ok(n) => LocalSegment::Number(n),
                Err(_) => LocalSegment::Text(part.to_string()),
            });
            if !self.separator() {
                return Some(segments);
            }
        }
    }
}
