use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

const ADDRESS_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

static FULL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", ADDRESS_PATTERN)).expect("address pattern is a valid regex")
});

static ADDRESS_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ADDRESS_PATTERN).expect("address pattern is a valid regex"));

/// Whether `address` is acceptable as a single recipient.
///
/// The pattern only anchors the final TLD segment, so dot placement is
/// checked separately.
pub fn is_valid_address(address: &str) -> bool {
    FULL_ADDRESS.is_match(address)
        && !address.contains("..")
        && !address.starts_with('.')
        && !address.ends_with('.')
        && !address.contains("..@")
        && !address.contains("@..")
}

/// Validates a comma-separated recipient list.
///
/// Blank entries are skipped, so an empty list is valid.
pub fn validate_address_list(list: &str) -> bool {
    split_address_list(list).all(is_valid_address)
}

/// 逗號切開、去空白、丟掉空項目
pub fn split_address_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|part| !part.is_empty())
}

/// Scans free-form text for addresses.
///
/// Matches are lowercased and deduplicated in first-seen order, then
/// re-checked with [`is_valid_address`], which is stricter about dots than
/// the scanning pattern.
pub fn extract_addresses(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ADDRESS_CANDIDATE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_lowercase())
        .filter(|address| seen.insert(address.clone()))
        .filter(|address| is_valid_address(address))
        .collect()
}

/// Merges imported addresses into the current recipient field.
///
/// Entries already in the field are lowercased and dropped if invalid.
pub fn merge_recipients(current: &str, imported: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    current
        .split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|address| is_valid_address(address))
        .chain(imported.iter().cloned())
        .filter(|address| seen.insert(address.clone()))
        .collect()
}
