//! Form encoding and redirect parsing helpers

use autodj_core::ShowId;
use url::form_urlencoded::byte_serialize;

const SHOW_ID_KEY: &str = "radioShowID=";

/// Encode a value the way form bodies carry it
///
/// Alphanumerics and `* - . _` pass through, a space becomes `+`, and every
/// other byte of the UTF-8 encoding becomes `%XX`.
pub fn url_encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// Extract the show id from a start-show redirect target
///
/// The service redirects to something like
/// `/playlists/flowsheet?mode=modifyFlowsheet&radioShowID=123`. Parsing is
/// lenient in the same way the service's own links are: the leading digits
/// after `radioShowID=` are used and anything after them ignored. Zero,
/// negative, missing or non-numeric ids yield `None`.
pub fn parse_radio_show_id(location: &str) -> Option<ShowId> {
    let start = location.find(SHOW_ID_KEY)? + SHOW_ID_KEY.len();
    let value = location[start..].split('&').next().unwrap_or_default();
    let digits: &str = {
        let end = value
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(value.len());
        &value[..end]
    };
    digits.parse::<i32>().ok().and_then(ShowId::new)
}
