//! Transaction inspector links
//!
//! The inspector page takes the decoded message and signatures as query
//! parameters:
//!
//! - `/tx/inspector?message=<msg>` - bare message
//! - `/tx/inspector?message=<msg>&signatures=<sigs>` - signed transaction
//!
//! Each value is component-encoded first and then serialized as a form
//! query, so it arrives double-encoded (`+` becomes `%252B`). `<sigs>` is a
//! JSON array of base58 strings. The page decodes both layers.
//!
//! ## Example
//!
//! ```rust
//! use solx::inspector::{inspector_pathname, parse_inspector_pathname};
//! use solx::types::DecodedTransaction;
//!
//! let tx = DecodedTransaction { message: "AQ+/".to_string(), signatures: None };
//! let path = inspector_pathname(&tx).unwrap();
//! assert_eq!(path, "/tx/inspector?message=AQ%252B%252F");
//! assert_eq!(parse_inspector_pathname(&path), Some(tx));
//! ```

use anyhow::{Context, Result};
use url::form_urlencoded;

use crate::types::DecodedTransaction;

pub const INSPECTOR_PATH: &str = "/tx/inspector";

/// Build the inspector route for a decoded transaction
pub fn inspector_pathname(tx: &DecodedTransaction) -> Result<String> {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("message", &urlencoding::encode(&tx.message));

    if let Some(signatures) = &tx.signatures {
        let json = serde_json::to_string(signatures).context("serialize signatures")?;
        query.append_pair("signatures", &urlencoding::encode(&json));
    }

    Ok(format!("{INSPECTOR_PATH}?{}", query.finish()))
}

/// Reverse of [`inspector_pathname`]. Returns `None` for other routes or
/// malformed parameters.
pub fn parse_inspector_pathname(pathname: &str) -> Option<DecodedTransaction> {
    let query = pathname.trim().strip_prefix(INSPECTOR_PATH)?.strip_prefix('?')?;

    let mut message = None;
    let mut signatures = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = urlencoding::decode(&value).ok()?.into_owned();
        match key.as_ref() {
            "message" => message = Some(value),
            "signatures" => signatures = Some(serde_json::from_str::<Vec<String>>(&value).ok()?),
            _ => {}
        }
    }

    Some(DecodedTransaction {
        message: message?,
        signatures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_message_path() {
        let tx = DecodedTransaction {
            message: "AQID".to_string(),
            signatures: None,
        };
        assert_eq!(inspector_pathname(&tx).unwrap(), "/tx/inspector?message=AQID");
    }

    #[test]
    fn test_message_is_double_encoded() {
        let tx = DecodedTransaction {
            message: "ab+/cd==".to_string(),
            signatures: None,
        };
        assert_eq!(
            inspector_pathname(&tx).unwrap(),
            "/tx/inspector?message=ab%252B%252Fcd%253D%253D"
        );
    }

    #[test]
    fn test_signatures_are_json_then_encoded() {
        let tx = DecodedTransaction {
            message: "AQID".to_string(),
            signatures: Some(vec!["5xy".to_string(), "3ab".to_string()]),
        };
        // ["5xy","3ab"] -> %5B%225xy%22%2C%223ab%22%5D -> % escaped again
        assert_eq!(
            inspector_pathname(&tx).unwrap(),
            "/tx/inspector?message=AQID&signatures=%255B%25225xy%2522%252C%25223ab%2522%255D"
        );
    }

    #[test]
    fn test_parse_roundtrip_with_signatures() {
        let tx = DecodedTransaction {
            message: "ab+/cd==".to_string(),
            signatures: Some(vec![]),
        };
        let path = inspector_pathname(&tx).unwrap();
        assert_eq!(parse_inspector_pathname(&path), Some(tx));
    }

    #[test]
    fn test_parse_rejects_other_routes() {
        assert_eq!(parse_inspector_pathname("/tx/abc?message=AQID"), None);
        assert_eq!(parse_inspector_pathname("/tx/inspector"), None);
        assert_eq!(parse_inspector_pathname("/tx/inspector?signatures=%255B%255D"), None);
        assert_eq!(
            parse_inspector_pathname("/tx/inspector?message=AQID&signatures=notjson"),
            None
        );
    }
}
