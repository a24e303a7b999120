use log::{debug, trace};
use url::Url;

use crate::core::playlist::{Entry, UNKNOWN_TRACK_TITLE};
use crate::core::{Error, Result};

const EXTINF_DIRECTIVE: &str = "#EXTINF:";
const DIRECTIVE_PREFIX: char = '#';
const NETWORK_SCHEMES: [&str; 2] = ["http://", "https://"];
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse the given extended M3U playlist text into its ordered entries.
///
/// Each location line becomes an entry, titled by the last `#EXTINF` directive which preceded it.
/// Titles are everything after the first comma of the directive with surrounding whitespace trimmed,
/// so they are not byte-exact copies of the directive.
/// All other directive and comment lines are ignored.
/// When a `base_location` is given, relative and server-absolute locations are resolved against it.
///
/// # Arguments
///
/// * `text` - The raw playlist text.
/// * `base_location` - The address of the playlist document, if known.
///
/// # Returns
///
/// It returns the entries in the order they were found, which might be empty,
/// or [Error::InvalidBaseLocation] when a server-absolute location can't be resolved.
pub fn parse(text: &str, base_location: Option<&str>) -> Result<Vec<Entry>> {
    let mut entries = vec![];
    let mut pending_title: Option<String> = None;

    let text = text.trim_start_matches(BYTE_ORDER_MARK);

    for line in text.lines().map(str::trim).filter(|e| !e.is_empty()) {
        if let Some(directive) = line.strip_prefix(EXTINF_DIRECTIVE) {
            match extract_title(directive) {
                Some(title) => pending_title = Some(title.to_string()),
                None => trace!("Ignoring #EXTINF directive without title \"{}\"", line),
            }
        } else if line.starts_with(DIRECTIVE_PREFIX) {
            trace!("Skipping directive line \"{}\"", line);
        } else {
            let title = pending_title
                .take()
                .unwrap_or_else(|| UNKNOWN_TRACK_TITLE.to_string());
            let entry = Entry::new(title, resolve(line, base_location)?);

            trace!("Parsed playlist entry {}", entry);
            entries.push(entry);
        }
    }

    debug!("Parsed {} playlist entries", entries.len());
    Ok(entries)
}

/// Resolve the location line against the base location of the playlist.
///
/// Network addresses, or any line when no base location is known, are returned unchanged.
/// Lines starting with `/` are resolved against the scheme and host of the base,
/// all other lines against the directory of the base.
pub fn resolve(line: &str, base_location: Option<&str>) -> Result<String> {
    let base = match base_location.map(str::trim).filter(|e| !e.is_empty()) {
        Some(e) => e,
        None => return Ok(line.to_string()),
    };

    if is_network_address(line) {
        return Ok(line.to_string());
    }

    if line.starts_with('/') {
        let url = Url::parse(base).map_err(|e| Error::InvalidBaseLocation {
            location: base.to_string(),
            reason: e.to_string(),
        })?;
        let host = url.host_str().unwrap_or_default();

        return Ok(match url.port() {
            Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, line),
            None => format!("{}://{}{}", url.scheme(), host, line),
        });
    }

    let directory = base.rfind('/').map(|i| &base[..=i]).unwrap_or_default();
    Ok(format!("{}{}", directory, line))
}

/// Extract the title from the value of an `#EXTINF` directive, `<duration>,<title>`.
fn extract_title(directive: &str) -> Option<&str> {
    directive
        .split_once(',')
        .map(|(_, title)| title.trim())
        .filter(|e| !e.is_empty())
}

fn is_network_address(line: &str) -> bool {
    NETWORK_SCHEMES.iter().any(|scheme| {
        line.get(..scheme.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
            .is_some()
    })
}
