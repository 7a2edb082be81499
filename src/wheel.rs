//! Wheel filename tag parsing
//!
//! Wheel filenames follow
//! `{name}-{version}(-{build})?-{python}-{abi}-{platform}.whl`, where each
//! of the last three fields may hold several `.`-separated values
//! (`py2.py3-none-any`). A filename stands for every combination.

/// One `(python, abi, platform)` tag combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelTag {
    pub python: String,
    pub abi: String,
    pub platform: String,
}

/// Expand the tags embedded in a wheel filename.
///
/// Returns `None` when the filename does not look like a wheel.
pub fn parse_tags(filename: &str) -> Option<Vec<WheelTag>> {
    let stem = filename
        .strip_suffix(".whl")
        .or_else(|| filename.strip_suffix(".WHL"))?;

    let parts: Vec<&str> = stem.split('-').collect();
    if !(5..=6).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    let [python, abi, platform] = &parts[parts.len() - 3..] else {
        return None;
    };

    let mut tags = Vec::new();
    for py in python.split('.') {
        for a in abi.split('.') {
            for plat in platform.split('.') {
                tags.push(WheelTag {
                    python: py.to_string(),
                    abi: a.to_string(),
                    platform: plat.to_string(),
                });
            }
        }
    }
    Some(tags)
}
