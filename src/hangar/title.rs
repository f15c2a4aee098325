//! Parsing of RSI pledge titles into hangar CCU items.
//!
//! Imported hangars only carry the pledge title, e.g.
//! `"Upgrade - Mustang Alpha to Aurora LN Standard Edition"`.

use lazy_static::lazy_static;
use regex::Regex;

use super::models::HangarItem;

lazy_static! {
    static ref UPGRADE_TITLE: Regex =
        Regex::new(r"(?i)^\s*upgrade\s*-\s*(.+?)\s+to\s+(.+?)\s*$").unwrap();

    /// Edition suffixes that are not part of the target ship name
    static ref EDITION_SUFFIX: Regex =
        Regex::new(r"(?i)\s+(standard|warbond|best\s+in\s+show|upgrade)(\s+edition)?\s*$").unwrap();
}

/// Split an upgrade title into `(from, to)` ship names.
pub fn parse_upgrade_title(title: &str) -> Option<(String, String)> {
    let caps = UPGRADE_TITLE.captures(title)?;
    let from = caps.get(1)?.as_str().trim();
    let to = EDITION_SUFFIX.replace(caps.get(2)?.as_str(), "");
    let to = to.trim();

    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some((from.to_string(), to.to_string()))
}

/// Build a CCU item from a pledge title and the price paid.
pub fn item_from_title(title: &str, price: i64, owner: Option<&str>) -> Option<HangarItem> {
    let (from, to) = parse_upgrade_title(title)?;
    let mut item = HangarItem::ccu(&from, &to, price);
    if let Some(owner) = owner {
        item.owners.push(owner.to_string());
    }
    Some(item)
}
