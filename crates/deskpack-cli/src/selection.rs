use std::collections::HashSet;

use anyhow::{anyhow, Context, Result};

/// No curated catalog comes close to this many entries; a range wider
/// than this is a typo, not a selection, and expanding it eagerly would
/// hang the session.
const MAX_RANGE_SPAN: u32 = 256;

/// Parses the menu id-selection syntax: comma-separated ids and inclusive
/// ranges, e.g. `1,3,7-10`. Duplicates collapse to the first occurrence.
/// Any malformed token rejects the whole selection; nothing is installed
/// from a partially valid one.
pub(crate) fn parse_selection(input: &str) -> Result<Vec<u32>> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(anyhow!("invalid selection '{input}': empty entry"));
        }

        match token.split_once('-') {
            Some((start, end)) => {
                let start: u32 = start
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid range start in '{token}'"))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid range end in '{token}'"))?;
                if start == 0 {
                    return Err(anyhow!("invalid range '{token}': ids start at 1"));
                }
                if end < start {
                    return Err(anyhow!("invalid range '{token}': end before start"));
                }
                if end - start >= MAX_RANGE_SPAN {
                    return Err(anyhow!(
                        "invalid range '{token}': spans more than {MAX_RANGE_SPAN} ids"
                    ));
                }
                for id in start..=end {
                    push_unique(&mut ids, &mut seen, id);
                }
            }
            None => {
                let id: u32 = token
                    .parse()
                    .with_context(|| format!("invalid id '{token}'"))?;
                if id == 0 {
                    return Err(anyhow!("invalid id '{token}': ids start at 1"));
                }
                push_unique(&mut ids, &mut seen, id);
            }
        }
    }

    if ids.is_empty() {
        return Err(anyhow!("selection is empty"));
    }
    Ok(ids)
}

fn push_unique(ids: &mut Vec<u32>, seen: &mut HashSet<u32>, id: u32) {
    if seen.insert(id) {
        ids.push(id);
    }
}
